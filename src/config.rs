//! Match settings.
//!
//! A flat set of named numeric parameters. Every field has a default, and a
//! JSON document only needs to name the fields it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters for a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Turn cutoff; at this turn the richer side wins.
    pub max_turns: u32,
    /// Gold each side starts with.
    pub start_gold: u64,
    /// Cells each side starts with.
    pub start_territory: u32,
    /// Size of the shared neutral pool at reset.
    pub neutral_territory: u32,
    /// Attack units each side starts with.
    pub start_attack: u32,
    /// Defense units each side starts with.
    pub start_defense: u32,
    /// Gold earned per owned cell per turn.
    pub gold_per_land: u64,
    /// Price of the first lifetime expansion cell.
    pub expand_base: u64,
    /// Price increase per lifetime expansion cell.
    pub expand_step: u64,
    /// Base price of an attack unit (also the sale refund basis).
    pub attack_base: u64,
    /// Price increase per attack unit held.
    pub attack_slope: u64,
    /// Base price of a defense unit (also the sale refund basis).
    pub defense_base: u64,
    /// Price increase per defense unit held.
    pub defense_slope: u64,
    /// Upkeep per attack unit per turn.
    pub maint_attack: u64,
    /// Upkeep per defense unit per turn.
    pub maint_defense: u64,
    /// Flat price of a scouting report.
    pub scout_cost: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_turns: 200,
            start_gold: 50,
            start_territory: 30,
            neutral_territory: 40,
            start_attack: 0,
            start_defense: 0,
            gold_per_land: 1,
            expand_base: 10,
            expand_step: 1,
            attack_base: 20,
            attack_slope: 1,
            defense_base: 9,
            defense_slope: 3,
            maint_attack: 4,
            maint_defense: 1,
            scout_cost: 20,
        }
    }
}

impl GameSettings {
    /// Parse settings from a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject parameter combinations the rules cannot run on.
    ///
    /// A free unit or cell would let a greedy purchase never end, and a cell
    /// total beyond `u32` would overflow the per-side land counters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad curve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expand_base == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "expand_base",
                reason: "the first expansion cell must cost gold",
            });
        }
        if self.attack_base == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "attack_base",
                reason: "the first attack unit must cost gold",
            });
        }
        if self.defense_base == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "defense_base",
                reason: "the first defense unit must cost gold",
            });
        }
        if self.total_cells() > u64::from(u32::MAX) {
            return Err(ConfigError::InvalidParameter {
                name: "neutral_territory",
                reason: "cells in play (both starting territories plus neutral) must fit in u32",
            });
        }
        Ok(())
    }

    /// Cells in play for the whole match: both starting territories plus the
    /// neutral pool.
    #[must_use]
    pub fn total_cells(&self) -> u64 {
        2 * u64::from(self.start_territory) + u64::from(self.neutral_territory)
    }

    /// Override the turn cutoff.
    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = GameSettings::default();
        assert_eq!(s.max_turns, 200);
        assert_eq!(s.start_gold, 50);
        assert_eq!(s.start_territory, 30);
        assert_eq!(s.neutral_territory, 40);
        assert_eq!(s.expand_base, 10);
        assert_eq!(s.defense_slope, 3);
        assert_eq!(s.scout_cost, 20);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = GameSettings::from_json_str(r#"{"max_turns": 12, "start_gold": 500}"#).unwrap();
        assert_eq!(s.max_turns, 12);
        assert_eq!(s.start_gold, 500);
        assert_eq!(s.neutral_territory, 40);
    }

    #[test]
    fn test_zero_base_price_rejected() {
        let err = GameSettings::from_json_str(r#"{"attack_base": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "attack_base", .. }
        ));
    }

    #[test]
    fn test_zero_expand_base_rejected() {
        let settings = GameSettings {
            expand_base: 0,
            ..GameSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidParameter { name: "expand_base", .. })
        ));
    }

    #[test]
    fn test_cell_total_must_fit_u32() {
        let settings = GameSettings {
            start_territory: 2_500_000_000,
            neutral_territory: 0,
            start_attack: 3_000_000_000,
            maint_attack: 0,
            ..GameSettings::default()
        };
        assert_eq!(settings.total_cells(), 5_000_000_000);
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidParameter { name: "neutral_territory", .. })
        ));

        let settings = GameSettings {
            start_territory: 4_000_000_000,
            neutral_territory: 400_000_000,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());

        // The largest total that still fits is accepted.
        let settings = GameSettings {
            start_territory: u32::MAX / 2,
            neutral_territory: 1,
            ..GameSettings::default()
        };
        assert_eq!(settings.total_cells(), u64::from(u32::MAX));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = GameSettings::from_json_str("{max_turns: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scout_cost": 7}}"#).unwrap();
        let s = GameSettings::from_json_file(file.path()).unwrap();
        assert_eq!(s.scout_cost, 7);
    }

    #[test]
    fn test_missing_file() {
        let err = GameSettings::from_json_file(Path::new("/nonexistent/duel.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
