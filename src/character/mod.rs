//! The player character and its progression rules.

pub mod logic;
pub mod state;

pub use state::{Character, EquipSlot, Equipment, Realm};
