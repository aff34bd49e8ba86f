//! Shared load table.
//!
//! Maps substation name to its most recently sampled load. The sampler writes
//! a whole cycle at once; readers take a snapshot. Both go through the same
//! lock, so a reader sees either the previous cycle or the new one, never a mix.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

/// Last-known load per substation.
#[derive(Debug, Default)]
pub struct LoadTable {
    loads: RwLock<BTreeMap<String, f64>>,
}

impl LoadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit one sampling cycle under a single write window.
    ///
    /// Every sample overwrites the previous value for that substation.
    pub fn record_cycle<I>(&self, samples: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        // collect before locking so the write window only covers the inserts
        let samples: Vec<_> = samples.into_iter().collect();
        let mut loads = self.loads.write().unwrap_or_else(PoisonError::into_inner);
        for (name, load) in samples {
            loads.insert(name, load);
        }
    }

    /// Consistent copy of the table.
    pub fn snapshot(&self) -> LoadSnapshot {
        let loads = self.loads.read().unwrap_or_else(PoisonError::into_inner);
        LoadSnapshot {
            loads: loads.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.loads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.loads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Point-in-time view of the load table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LoadSnapshot {
    loads: BTreeMap<String, f64>,
}

impl LoadSnapshot {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.loads.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.loads.iter().map(|(name, load)| (name.as_str(), *load))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for LoadSnapshot {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            loads: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_absent_until_recorded() {
        let table = LoadTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("substation1"), None);

        table.record_cycle([("substation1".to_string(), 0.0)]);
        assert_eq!(table.get("substation1"), Some(0.0));
    }

    #[test]
    fn test_cycle_overwrites() {
        let table = LoadTable::new();
        table.record_cycle([("a".to_string(), 40.0), ("b".to_string(), 10.0)]);
        table.record_cycle([("a".to_string(), 5.0), ("b".to_string(), 70.0)]);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a"), Some(5.0));
        assert_eq!(snapshot.get("b"), Some(70.0));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let table = LoadTable::new();
        table.record_cycle([("a".to_string(), 1.0)]);
        let snapshot = table.snapshot();
        table.record_cycle([("a".to_string(), 2.0)]);
        assert_eq!(snapshot.get("a"), Some(1.0));
    }

    #[test]
    fn test_snapshot_serializes_as_map() {
        let snapshot: LoadSnapshot = [("b", 2.5), ("a", 1.0)].into_iter().collect();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json, serde_json::json!({"a": 1.0, "b": 2.5}));
    }

    #[test]
    fn test_readers_never_see_mixed_cycles() {
        let table = Arc::new(LoadTable::new());
        let names = ["a", "b", "c", "d"];

        let writer = {
            let table = table.clone();
            thread::spawn(move || {
                for cycle in 0..2_000 {
                    table.record_cycle(names.iter().map(|n| (n.to_string(), cycle as f64)));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let table = table.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = table.snapshot();
                        if snapshot.is_empty() {
                            continue;
                        }
                        assert_eq!(snapshot.len(), names.len());
                        let first = snapshot.get("a").unwrap();
                        assert!(
                            snapshot.iter().all(|(_, load)| load == first),
                            "torn snapshot: {:?}",
                            snapshot
                        );
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
