//! Quest data and the starting quest board.

use serde::{Deserialize, Serialize};

use super::items::Rarity;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Available,
    Active,
    Completed,
    Claimed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    Kill,
    Collect,
    ReachLevel,
    Explore,
}

// Well-known objective targets that are not catalog ids.
pub const TARGET_EXPLORE: &str = "explore";
pub const TARGET_EQUIPMENT: &str = "equipment";
pub const TARGET_LEVEL: &str = "level";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    /// Monster id, item id, or one of the `TARGET_*` markers.
    pub target: String,
    pub current: u32,
    pub required: u32,
}

impl Objective {
    fn new(kind: ObjectiveKind, target: &str, current: u32, required: u32) -> Self {
        Self { kind, target: target.into(), current, required }
    }

    pub fn is_met(&self) -> bool {
        self.current >= self.required
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub exp: u64,
    pub gold: u64,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    /// Effective level required to accept the quest.
    pub level: u32,
    pub status: QuestStatus,
    pub objectives: Vec<Objective>,
    pub rewards: QuestReward,
}

impl Quest {
    pub fn all_objectives_met(&self) -> bool {
        self.objectives.iter().all(Objective::is_met)
    }
}

fn quest(
    id: &str,
    name: &str,
    description: &str,
    rarity: Rarity,
    level: u32,
    objectives: Vec<Objective>,
    rewards: QuestReward,
) -> Quest {
    Quest {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        level,
        status: QuestStatus::Available,
        objectives,
        rewards,
    }
}

fn reward(exp: u64, gold: u64, items: &[&str]) -> QuestReward {
    QuestReward {
        exp,
        gold,
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn seed_quests() -> Vec<Quest> {
    use ObjectiveKind::*;
    vec![
        quest(
            "quest-001", "修行の第一歩", "スライムを3体倒す", Rarity::Poor, 1,
            vec![Objective::new(Kill, "monster-slime", 0, 3)],
            reward(50, 20, &[]),
        ),
        quest(
            "quest-002", "初めての探索", "5回探索する", Rarity::Poor, 1,
            vec![Objective::new(Explore, TARGET_EXPLORE, 0, 5)],
            reward(30, 10, &["food-bread"]),
        ),
        quest(
            "quest-003", "装備を整える", "装備を1つ身に着ける", Rarity::Common, 1,
            vec![Objective::new(Collect, TARGET_EQUIPMENT, 0, 1)],
            reward(100, 50, &[]),
        ),
        quest(
            "quest-004", "成長の道", "レベル5に到達する", Rarity::Common, 1,
            vec![Objective::new(ReachLevel, TARGET_LEVEL, 1, 5)],
            reward(200, 100, &["weapon-wooden-sword"]),
        ),
        quest(
            "quest-005", "狩人", "大ネズミを10体倒す", Rarity::Uncommon, 3,
            vec![Objective::new(Kill, "monster-rat", 0, 10)],
            reward(300, 150, &["food-apple", "food-apple"]),
        ),
        quest(
            "quest-006", "勇者の道", "レベル10に到達する", Rarity::Rare, 5,
            vec![Objective::new(ReachLevel, TARGET_LEVEL, 1, 10)],
            reward(1000, 500, &["weapon-iron-sword", "equipment-leather-armor"]),
        ),
    ]
}
