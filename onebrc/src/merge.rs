//! Merging chunk-local maps.

use crate::chunk::Stations;
use std::collections::hash_map::Entry;

/// Folds `partial` into `target`, consuming it.
///
/// Stations new to `target` are moved in; the rest are merged per key.
pub fn merge_into(target: &mut Stations, partial: Stations) {
    for (name, station) in partial {
        match target.entry(name) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(station),
            Entry::Vacant(entry) => {
                entry.insert(station);
            }
        }
    }
}

/// Merges any number of partial maps into one.
pub fn merge_all<I>(partials: I) -> Stations
where
    I: IntoIterator<Item = Stations>,
{
    partials.into_iter().fold(Stations::new(), |mut merged, partial| {
        merge_into(&mut merged, partial);
        merged
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    fn stations(entries: &[(&str, &[f64])]) -> Stations {
        let mut map = Stations::new();
        for (name, values) in entries {
            let mut station = Station::new();
            for &value in *values {
                station.update(value);
            }
            map.insert(name.to_string(), station);
        }
        map
    }

    #[test]
    fn test_merge_into_combines_shared_keys() {
        let mut target = stations(&[("Abha", &[3.0]), ("Zurich", &[1.0])]);
        merge_into(&mut target, stations(&[("Abha", &[7.0, 2.0])]));

        assert_eq!(target.len(), 2);
        assert_eq!(target["Abha"].min(), 2.0);
        assert_eq!(target["Abha"].max(), 7.0);
        assert_eq!(target["Abha"].count(), 3);
        assert_eq!(target["Zurich"].count(), 1);
    }

    #[test]
    fn test_merge_into_moves_new_keys() {
        let mut target = Stations::new();
        merge_into(&mut target, stations(&[("Hamburg", &[12.0, 8.0])]));

        assert_eq!(target.len(), 1);
        assert_eq!(target["Hamburg"].sum(), 20.0);
    }

    #[test]
    fn test_merge_all_is_order_independent() {
        let parts = || {
            vec![
                stations(&[("a", &[1.0, 2.0]), ("b", &[-4.0])]),
                stations(&[("b", &[5.5]), ("c", &[0.5])]),
                stations(&[("a", &[-1.0]), ("c", &[9.0, 3.0])]),
            ]
        };

        let forward = merge_all(parts());
        let backward = merge_all(parts().into_iter().rev());

        assert_eq!(forward, backward);
        assert_eq!(forward["a"].count(), 3);
        assert_eq!(forward["b"].min(), -4.0);
        assert_eq!(forward["c"].max(), 9.0);
    }

    #[test]
    fn test_merge_all_empty() {
        assert!(merge_all(Vec::new()).is_empty());
    }
}
