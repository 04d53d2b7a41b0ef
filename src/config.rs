//! Tunable game balance, loaded from TOML.
//!
//! Every field has a default so a config file only needs the values it
//! changes. An empty file is a valid config.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::character::state::Realm;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub exploration: ExplorationConfig,
    pub battle: BattleConfig,
    pub progression: ProgressionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub max_daily_explores: u32,
    pub monster_chance: f64,
    pub treasure_chance: f64,
    /// Whatever is left after monster/treasure/item is "nothing found".
    pub item_chance: f64,
    pub treasure_gold_min: u64,
    pub treasure_gold_max: u64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_daily_explores: 20,
            monster_chance: 0.4,
            treasure_chance: 0.2,
            item_chance: 0.2,
            treasure_gold_min: 50,
            treasure_gold_max: 149,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub flee_chance: f64,
    pub critical_chance: f64,
    /// When false a critical hit only doubles the number shown in the log.
    pub critical_applies_to_hp: bool,
    pub drop_chance: f64,
    /// Pause before the enemy acts. 0 resolves the enemy turn immediately.
    pub turn_delay_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            flee_chance: 0.5,
            critical_chance: 0.1,
            critical_applies_to_hp: false,
            drop_chance: 0.3,
            turn_delay_ms: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub breakthrough_chance: f64,
    pub victory_realm: Realm,
    pub starting_age: u32,
    pub starting_max_age: u32,
    pub sub_level_lifespan_bonus: u32,
    pub breakthrough_lifespan_bonus: u32,
    pub cultivate_age_years: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            breakthrough_chance: 0.2,
            victory_realm: Realm::Tribulation,
            starting_age: 16,
            starting_max_age: 100,
            sub_level_lifespan_bonus: 5,
            breakthrough_lifespan_bonus: 20,
            cultivate_age_years: 1,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that make no sense and clamps the ones that are merely odd.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let probabilities = [
            ("exploration.monster_chance", self.exploration.monster_chance),
            ("exploration.treasure_chance", self.exploration.treasure_chance),
            ("exploration.item_chance", self.exploration.item_chance),
            ("battle.flee_chance", self.battle.flee_chance),
            ("battle.critical_chance", self.battle.critical_chance),
            ("battle.drop_chance", self.battle.drop_chance),
            ("progression.breakthrough_chance", self.progression.breakthrough_chance),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", name, p)));
            }
        }

        let e = &mut self.exploration;
        let total = e.monster_chance + e.treasure_chance + e.item_chance;
        if total > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "exploration chances sum to {}, must not exceed 1",
                total
            )));
        }
        if e.max_daily_explores == 0 {
            return Err(ConfigError::Invalid("exploration.max_daily_explores must be > 0".into()));
        }
        if e.treasure_gold_min > e.treasure_gold_max {
            warn!(
                "exploration.treasure_gold_max {} is below treasure_gold_min {}; clamping",
                e.treasure_gold_max, e.treasure_gold_min
            );
            e.treasure_gold_max = e.treasure_gold_min;
        }

        let p = &mut self.progression;
        if p.starting_max_age == 0 {
            return Err(ConfigError::Invalid("progression.starting_max_age must be > 0".into()));
        }
        if p.starting_age >= p.starting_max_age {
            warn!(
                "progression.starting_age {} is not below starting_max_age {}; clamping",
                p.starting_age, p.starting_max_age
            );
            p.starting_age = p.starting_max_age - 1;
        }
        if p.victory_realm == Realm::QiRefining {
            return Err(ConfigError::Invalid(
                "progression.victory_realm must be above the starting realm".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.exploration.max_daily_explores, 20);
        assert_eq!(cfg.progression.victory_realm, Realm::Tribulation);
        assert!(!cfg.battle.critical_applies_to_hp);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            r#"
            seed = 42

            [battle]
            flee_chance = 1.0

            [progression]
            victory_realm = "golden_core"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.battle.flee_chance, 1.0);
        assert_eq!(cfg.battle.drop_chance, 0.3);
        assert_eq!(cfg.progression.victory_realm, Realm::GoldenCore);
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let err = GameConfig::from_toml_str("[battle]\ncritical_chance = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn chances_over_one_rejected() {
        let err = GameConfig::from_toml_str(
            "[exploration]\nmonster_chance = 0.6\ntreasure_chance = 0.3\nitem_chance = 0.2",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn inverted_gold_range_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[exploration]\ntreasure_gold_min = 200\ntreasure_gold_max = 100",
        )
        .unwrap();
        assert_eq!(cfg.exploration.treasure_gold_max, 200);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("[battle\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
