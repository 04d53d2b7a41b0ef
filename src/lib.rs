//! Cultivation RPG core: a single-player text RPG about exploring, fighting
//! turn-based battles and climbing nine realms of cultivation before old age
//! catches up.
//!
//! Modules follow a data/rules split:
//! - `catalog`: read-only item, monster, skill and quest definitions
//! - `character`: realm progression, aging, equipment (`state` + `logic`)
//! - `battle`: the turn-based resolver (`state` + `logic`)
//! - `inventory`, `loadout`, `quest`: the player's bag, skills and quest log
//! - `session`: `GameSession`, which wires the stores into player actions
//! - `save`: per-store versioned JSON
//! - `config`, `rng`, `error`: tuning, randomness and I/O errors
//!
//! Nothing here installs a logger or touches the filesystem except
//! [`config::GameConfig::load`].

pub mod battle;
pub mod catalog;
pub mod character;
pub mod config;
pub mod error;
pub mod inventory;
pub mod loadout;
pub mod quest;
pub mod rng;
pub mod save;
pub mod session;

pub use config::GameConfig;
pub use error::{ConfigError, SaveError};
pub use rng::{GameRng, RandomSource, ScriptedRolls};
pub use session::{CultivateGain, ExploreOutcome, GameSession};
