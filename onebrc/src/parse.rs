//! Line parser: `<station>;<value>` into a borrowed [`Measurement`].

use crate::error::ParseErrorKind;
use memchr::memchr;

/// Field separator between station name and value.
pub const SEPARATOR: u8 = b';';

/// One reading, borrowed from the chunk buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement<'a> {
    /// Station name.
    pub station: &'a str,
    /// Reading, at full input precision.
    pub value: f64,
}

/// Parses a single line, without its `\n` terminator.
///
/// A trailing `\r` is ignored, as are trailing separators after the value
/// (`a;1.0;;` reads as `a;1.0`). Any other separator after the first one is
/// an error. The value must be a finite decimal number with no surrounding
/// whitespace.
pub fn parse_line(line: &[u8]) -> Result<Measurement<'_>, ParseErrorKind> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let semicolon_idx = memchr(SEPARATOR, line).ok_or(ParseErrorKind::MissingSeparator)?;
    let (station, value) = (&line[..semicolon_idx], &line[semicolon_idx + 1..]);
    let value = trim_trailing_separators(value);

    if memchr(SEPARATOR, value).is_some() {
        return Err(ParseErrorKind::ExtraSeparator);
    }

    let station = std::str::from_utf8(station).map_err(|_| ParseErrorKind::InvalidKey)?;
    let value = parse_value(value)?;

    Ok(Measurement { station, value })
}

fn trim_trailing_separators(field: &[u8]) -> &[u8] {
    match field.iter().rposition(|&b| b != SEPARATOR) {
        Some(last) => &field[..=last],
        None => &[],
    }
}

/// Parses a decimal value.
///
/// Readings of the usual `-?d{1,3}.d` shape go through an integer fast path;
/// `tenths / 10.0` is a correctly rounded division of two exact integers, so
/// it yields the same `f64` as the general parser.
pub fn parse_value(bytes: &[u8]) -> Result<f64, ParseErrorKind> {
    if let Some(value) = parse_tenths(bytes) {
        return Ok(value);
    }

    let text = std::str::from_utf8(bytes).map_err(|_| ParseErrorKind::InvalidValue)?;
    let value: f64 = text.parse().map_err(|_| ParseErrorKind::InvalidValue)?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseErrorKind::InvalidValue)
    }
}

fn parse_tenths(bytes: &[u8]) -> Option<f64> {
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let (decimal, integer) = match digits {
        [integer @ .., b'.', decimal] if (1..=3).contains(&integer.len()) => (*decimal, integer),
        _ => return None,
    };

    let mut tenths: u32 = 0;
    for &byte in integer.iter().chain(std::iter::once(&decimal)) {
        if !byte.is_ascii_digit() {
            return None;
        }
        tenths = tenths * 10 + u32::from(byte - b'0');
    }

    let value = f64::from(tenths) / 10.0;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let m = parse_line(b"Hamburg;12.0").unwrap();
        assert_eq!(m.station, "Hamburg");
        assert_eq!(m.value, 12.0);

        let m = parse_line(b"Bulawayo;-8.9").unwrap();
        assert_eq!(m.station, "Bulawayo");
        assert_eq!(m.value, -8.9);

        let m = parse_line(b"a;1.0;").unwrap();
        assert_eq!(m.station, "a");
        assert_eq!(m.value, 1.0);
    }

    #[test]
    fn test_parse_line_ignores_trailing_separators() {
        assert_eq!(
            parse_line(b"a;1.0;;"),
            Ok(Measurement {
                station: "a",
                value: 1.0
            })
        );
        assert_eq!(parse_line(b"a;-2.5;\r").unwrap().value, -2.5);
        assert_eq!(parse_line(b"a;;"), Err(ParseErrorKind::InvalidValue));
    }

    #[test]
    fn test_parse_line_keeps_full_precision() {
        let m = parse_line(b"Abha;5.35").unwrap();
        assert_eq!(m.value, 5.35);

        let m = parse_line(b"Abha;-0.125").unwrap();
        assert_eq!(m.value, -0.125);

        let m = parse_line(b"Abha;1234.5").unwrap();
        assert_eq!(m.value, 1234.5);
    }

    #[test]
    fn test_parse_line_strips_carriage_return() {
        let m = parse_line(b"Palembang;38.8\r").unwrap();
        assert_eq!(m.station, "Palembang");
        assert_eq!(m.value, 38.8);
    }

    #[test]
    fn test_parse_line_utf8_station() {
        let m = parse_line("São Paulo;21.4".as_bytes()).unwrap();
        assert_eq!(m.station, "São Paulo");
    }

    #[test]
    fn test_parse_line_empty_station_is_accepted() {
        let m = parse_line(b";1.0").unwrap();
        assert_eq!(m.station, "");
        assert_eq!(m.value, 1.0);
    }

    #[test]
    fn test_parse_line_missing_separator() {
        assert_eq!(
            parse_line(b"NoSeparatorHere"),
            Err(ParseErrorKind::MissingSeparator)
        );
        assert_eq!(parse_line(b""), Err(ParseErrorKind::MissingSeparator));
        assert_eq!(parse_line(b"\r"), Err(ParseErrorKind::MissingSeparator));
    }

    #[test]
    fn test_parse_line_extra_separator() {
        assert_eq!(parse_line(b"a;1.0;2.0"), Err(ParseErrorKind::ExtraSeparator));
        assert_eq!(parse_line(b"a;;1.0"), Err(ParseErrorKind::ExtraSeparator));
        assert_eq!(parse_line(b"a;1.0;2.0;"), Err(ParseErrorKind::ExtraSeparator));
    }

    #[test]
    fn test_parse_line_invalid_key() {
        assert_eq!(parse_line(b"\xff\xfe;1.0"), Err(ParseErrorKind::InvalidKey));
    }

    #[test]
    fn test_parse_line_invalid_value() {
        for line in [
            &b"a;"[..],
            b"a;abc",
            b"a; 1.0",
            b"a;1.0 ",
            b"a;NaN",
            b"a;inf",
            b"a;-infinity",
            b"a;1e400",
            b"a;1.2.3",
            b"a;-",
            b"a;\xff",
        ] {
            assert_eq!(
                parse_line(line),
                Err(ParseErrorKind::InvalidValue),
                "line {:?}",
                String::from_utf8_lossy(line)
            );
        }
    }

    #[test]
    fn test_fast_path_matches_general_parser() {
        for text in [
            "0.0", "-0.0", "0.1", "5.3", "-5.3", "9.9", "12.3", "-12.3", "99.9", "-99.9", "100.0",
            "999.9", "-999.9", "45.7", "0.7",
        ] {
            let fast = parse_tenths(text.as_bytes()).unwrap();
            let general: f64 = text.parse().unwrap();
            assert_eq!(fast.to_bits(), general.to_bits(), "value {text}");
        }
    }

    #[test]
    fn test_fast_path_declines_other_shapes() {
        for text in ["5", "5.35", ".5", "5.", "1000.0", "+1.0", "1e3", "-", "a.b"] {
            assert!(parse_tenths(text.as_bytes()).is_none(), "value {text}");
        }
    }

    #[test]
    fn test_parse_value_general_forms() {
        assert_eq!(parse_value(b"5"), Ok(5.0));
        assert_eq!(parse_value(b"+1.5"), Ok(1.5));
        assert_eq!(parse_value(b".5"), Ok(0.5));
        assert_eq!(parse_value(b"1e2"), Ok(100.0));
    }
}
