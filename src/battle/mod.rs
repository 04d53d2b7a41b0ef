//! Turn-based combat: session state and the resolver rules.

pub mod logic;
pub mod state;

pub use state::{BattleSession, BattleStatus, Buff, BuffStat, Buffs, LogEntry, LogKind, Loot, SkillResult};
