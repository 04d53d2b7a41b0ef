//! Battle session data. One session per encounter; rules live in `logic`.

use serde::{Deserialize, Serialize};

use crate::catalog::items::Item;
use crate::catalog::monsters::Monster;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    Idle,
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffStat {
    Attack,
    Defense,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// Multiplier bonus, `0.5` = +50%.
    pub value: f64,
    /// Turns remaining.
    pub duration: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffs {
    pub attack: Vec<Buff>,
    pub defense: Vec<Buff>,
}

impl Buffs {
    pub fn apply(&mut self, stat: BuffStat, value: f64, duration: u32) {
        let buff = Buff { value, duration };
        match stat {
            BuffStat::Attack => self.attack.push(buff),
            BuffStat::Defense => self.defense.push(buff),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attack.is_empty() && self.defense.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Player,
    Enemy,
    System,
    Critical,
    Heal,
    Buff,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub message: String,
    pub kind: LogKind,
}

/// Rewards awaiting the player's claim after a victory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    pub exp: u64,
    pub gold: u64,
    pub items: Vec<Item>,
}

/// What a skill did, for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillResult {
    pub damage: Option<u32>,
    pub healing: Option<u32>,
    pub buff: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BattleSession {
    pub status: BattleStatus,
    pub turn: u32,
    pub enemy: Option<Monster>,
    /// Battle-local hp. Only written back to the character on defeat.
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemy_hp: u32,
    pub player_buffs: Buffs,
    pub enemy_buffs: Buffs,
    pub log: Vec<LogEntry>,
    pub loot: Option<Loot>,
    next_log_id: u64,
}

impl BattleSession {
    pub fn new() -> Self {
        Self {
            turn: 1,
            ..Default::default()
        }
    }

    pub fn add_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.next_log_id += 1;
        self.log.push(LogEntry {
            id: self.next_log_id,
            message: message.into(),
            kind,
        });
    }

    pub fn enemy_name(&self) -> &str {
        self.enemy.as_ref().map_or("", |m| m.name.as_str())
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, BattleStatus::Victory | BattleStatus::Defeat)
    }

    /// The last `n` log lines, oldest first.
    pub fn recent_log(&self, n: usize) -> &[LogEntry] {
        &self.log[self.log.len().saturating_sub(n)..]
    }
}
