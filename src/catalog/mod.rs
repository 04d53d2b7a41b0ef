//! Read-only reference data consumed by the game: items, monsters, skills
//! and the starting quest board.

pub mod items;
pub mod monsters;
pub mod quests;
pub mod skills;

pub use items::{ArmorSlot, Item, ItemCatalog, ItemKind, ItemType, Rarity};
pub use monsters::{Monster, MonsterCatalog};
pub use quests::{Objective, ObjectiveKind, Quest, QuestReward, QuestStatus};
pub use skills::{HealAmount, Skill, SkillCatalog, SkillEffect, SkillRarity, SkillType};

/// All catalogs bundled for a game session.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    pub items: ItemCatalog,
    pub monsters: MonsterCatalog,
    pub skills: SkillCatalog,
}
