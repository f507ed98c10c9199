//! Gold-medal record with JSON persistence
//!
//! One flag per level. Loading is forgiving: a missing or corrupt file
//! starts a fresh record instead of failing.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::levels::LEVEL_COUNT;

/// Default file name, relative to wherever the host keeps its data
pub const MEDALS_FILE: &str = "encircle_medals.json";

/// Gold-medal record, one flag per level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedalLedger {
    golds: Vec<bool>,
}

impl Default for MedalLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MedalLedger {
    pub fn new() -> Self {
        Self {
            golds: vec![false; LEVEL_COUNT],
        }
    }

    /// Record a level outcome. Gold latches: replaying a level without
    /// reaching gold keeps an earlier gold.
    pub fn record(&mut self, level: usize, gold: bool) {
        if level >= self.golds.len() {
            self.golds.resize(level + 1, false);
        }
        if gold {
            self.golds[level] = true;
        }
    }

    pub fn is_gold(&self, level: usize) -> bool {
        self.golds.get(level).copied().unwrap_or(false)
    }

    pub fn gold_count(&self) -> usize {
        self.golds.iter().filter(|&&g| g).count()
    }

    pub fn all_gold(&self) -> bool {
        !self.golds.is_empty() && self.golds.iter().all(|&g| g)
    }

    /// Load the record, falling back to an empty one on any error
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(ledger) => {
                    log::info!("Loaded medal record from {}", path.display());
                    ledger
                }
                Err(err) => {
                    log::warn!("Corrupt medal record ({err}), starting fresh");
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No medal record found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the record as JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Medal record saved ({} golds)", self.gold_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gold_latches_across_replays() {
        let mut ledger = MedalLedger::new();
        assert!(!ledger.is_gold(2));
        ledger.record(2, true);
        assert!(ledger.is_gold(2));
        ledger.record(2, false);
        assert!(ledger.is_gold(2));
        assert_eq!(ledger.gold_count(), 1);
        assert!(!ledger.all_gold());
    }

    #[test]
    fn test_record_past_end_grows_the_ledger() {
        let mut ledger = MedalLedger::new();
        ledger.record(LEVEL_COUNT + 3, true);
        assert!(ledger.is_gold(LEVEL_COUNT + 3));
        assert!(!ledger.is_gold(LEVEL_COUNT + 2));
    }

    #[test]
    fn test_all_gold() {
        let mut ledger = MedalLedger::new();
        for level in 0..LEVEL_COUNT {
            ledger.record(level, true);
        }
        assert!(ledger.all_gold());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("medals_rt_{}.json", std::process::id()));
        let mut ledger = MedalLedger::new();
        ledger.record(0, true);
        ledger.record(3, true);
        ledger.save(&path).unwrap();

        let loaded = MedalLedger::load(&path);
        assert!(loaded.is_gold(0));
        assert!(!loaded.is_gold(1));
        assert!(loaded.is_gold(3));
        assert_eq!(loaded.gold_count(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_default_file_name_round_trips() {
        let dir = std::env::temp_dir().join(format!("encircle_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(MEDALS_FILE);

        let mut ledger = MedalLedger::new();
        ledger.record(4, true);
        ledger.save(&path).unwrap();
        let loaded = MedalLedger::load(&path);
        assert!(loaded.is_gold(4));
        assert_eq!(loaded.gold_count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_or_corrupt_starts_fresh() {
        let missing = std::env::temp_dir().join("medals_definitely_missing.json");
        let ledger = MedalLedger::load(&missing);
        assert_eq!(ledger.gold_count(), 0);

        let corrupt = std::env::temp_dir().join(format!("medals_bad_{}.json", std::process::id()));
        std::fs::write(&corrupt, "not json at all").unwrap();
        let ledger = MedalLedger::load(&corrupt);
        assert_eq!(ledger.gold_count(), 0);
        let _ = std::fs::remove_file(&corrupt);
    }
}
