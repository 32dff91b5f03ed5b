use crate::error::Result;
use crate::metrics;
use crate::storage::{self, Storage, MISSED_KEYS_KEY};
use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissedKey {
    pub count: u32,
    pub last_missed: Option<DateTime<Local>>,
}

/// Per-key miss tally across every completed activity. Keys are the char that
/// was expected at a mismatched position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissedKeysProgress {
    pub missed_keys: BTreeMap<String, MissedKey>,
    pub total_misses: u32,
    pub last_updated: Option<DateTime<Local>>,
}

impl MissedKeysProgress {
    /// Tally the mismatches of `typed` against `target`; returns how many were found
    pub fn record(&mut self, target: &str, typed: &str, now: DateTime<Local>) -> usize {
        let mut found = 0;
        for (_, expected) in metrics::mismatches(target, typed) {
            let entry = self.missed_keys.entry(expected.to_string()).or_default();
            entry.count += 1;
            entry.last_missed = Some(now);
            found += 1;
        }
        if found > 0 {
            self.total_misses += found as u32;
            self.last_updated = Some(now);
        }
        found
    }

    /// The `n` most missed keys, most frequent first, ties broken by key
    pub fn top(&self, n: usize) -> Vec<(char, &MissedKey)> {
        self.missed_keys
            .iter()
            .filter_map(|(key, stat)| key.chars().next().map(|c| (c, stat)))
            .sorted_by(|(a, sa), (b, sb)| sb.count.cmp(&sa.count).then(a.cmp(b)))
            .take(n)
            .collect()
    }
}

#[derive(Debug)]
pub struct MissedKeysStore<S: Storage> {
    storage: S,
    data: MissedKeysProgress,
}

impl<S: Storage> MissedKeysStore<S> {
    pub fn load(storage: S) -> Self {
        let data = storage::load_or_default(&storage, MISSED_KEYS_KEY);
        Self { storage, data }
    }

    pub fn data(&self) -> &MissedKeysProgress {
        &self.data
    }

    pub fn record(&mut self, target: &str, typed: &str, now: DateTime<Local>) -> Result<usize> {
        let found = self.data.record(target, typed, now);
        if found > 0 {
            storage::save(&self.storage, MISSED_KEYS_KEY, &self.data)?;
        }
        Ok(found)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data = MissedKeysProgress::default();
        self.storage.remove(MISSED_KEYS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 2, h, 0, 0).unwrap()
    }

    #[test]
    fn counts_the_expected_char() {
        let mut progress = MissedKeysProgress::default();

        let found = progress.record("the cat sat", "the cat sar", at(9));

        assert_eq!(found, 1);
        assert_eq!(progress.total_misses, 1);
        assert_eq!(progress.missed_keys["t"].count, 1);
        assert!(!progress.missed_keys.contains_key("r"));
        assert_eq!(progress.last_updated, Some(at(9)));
    }

    #[test]
    fn clean_run_changes_nothing() {
        let mut progress = MissedKeysProgress::default();
        assert_eq!(progress.record("abc", "abc", at(9)), 0);
        assert_eq!(progress, MissedKeysProgress::default());
    }

    #[test]
    fn spaces_are_tracked_as_keys() {
        let mut progress = MissedKeysProgress::default();
        progress.record("a b", "axb", at(9));
        assert_eq!(progress.missed_keys[" "].count, 1);
    }

    #[test]
    fn top_orders_by_count_then_key() {
        let mut progress = MissedKeysProgress::default();
        progress.record("aabbc", "xxxxx", at(9));
        progress.record("cb", "xx", at(10));

        let top: Vec<(char, u32)> = progress.top(3).into_iter().map(|(c, s)| (c, s.count)).collect();
        assert_eq!(top, vec![('b', 3), ('a', 2), ('c', 2)]);
        assert_eq!(progress.missed_keys["b"].last_missed, Some(at(10)));
        assert_eq!(progress.total_misses, 7);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut progress = MissedKeysProgress::default();
        progress.record("a", "b", at(9));

        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["totalMisses"], 1);
        assert_eq!(json["missedKeys"]["a"]["count"], 1);
        assert!(json["missedKeys"]["a"]["lastMissed"].is_string());
    }

    #[test]
    fn store_roundtrip_and_clear() {
        let storage = MemoryStorage::new();
        {
            let mut store = MissedKeysStore::load(&storage);
            store.record("fj", "jf", at(9)).unwrap();
        }
        let mut store = MissedKeysStore::load(&storage);
        assert_eq!(store.data().total_misses, 2);

        store.clear().unwrap();
        assert_eq!(MissedKeysStore::load(&storage).data().total_misses, 0);
    }
}
