//! Monster definitions and level-windowed weighted selection.

use serde::{Deserialize, Serialize};

use super::items::Rarity;
use crate::rng::RandomSource;

/// Monsters within this many levels of the player can be encountered.
pub const LEVEL_WINDOW: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub exp_reward: u64,
    pub gold_reward: u64,
    pub rarity: Rarity,
}

/// Encounter weight for a monster of the given rarity.
pub fn selection_weight(rarity: Rarity) -> u32 {
    match rarity {
        Rarity::Legendary => 1,
        Rarity::Epic => 3,
        Rarity::Rare => 10,
        Rarity::Uncommon => 30,
        Rarity::Common => 40,
        Rarity::Poor => 20,
    }
}

struct MonsterInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    level: u32,
    hp: u32,
    attack: u32,
    defense: u32,
    exp: u64,
    gold: u64,
    rarity: Rarity,
}

const MONSTERS: &[MonsterInfo] = &[
    MonsterInfo { id: "monster-dragon-ancient", name: "太古の巨龍", description: "龍族の王。比類なき力を持つ", level: 50, hp: 10000, attack: 500, defense: 300, exp: 5000, gold: 2000, rarity: Rarity::Legendary },
    MonsterInfo { id: "monster-demon-lord", name: "魔界の魔王", description: "魔界の支配者", level: 45, hp: 8000, attack: 450, defense: 250, exp: 4000, gold: 1500, rarity: Rarity::Legendary },
    MonsterInfo { id: "monster-dragon", name: "成龍", description: "強大な龍族", level: 30, hp: 5000, attack: 300, defense: 150, exp: 2000, gold: 800, rarity: Rarity::Epic },
    MonsterInfo { id: "monster-lich", name: "リッチ", description: "強大な魔法を操る不死の術師", level: 28, hp: 4000, attack: 350, defense: 100, exp: 1800, gold: 700, rarity: Rarity::Epic },
    MonsterInfo { id: "monster-titan", name: "タイタン", description: "神話の巨人", level: 32, hp: 6000, attack: 280, defense: 200, exp: 2200, gold: 900, rarity: Rarity::Epic },
    MonsterInfo { id: "monster-orc-chief", name: "オーク族長", description: "オーク部族の強き長", level: 15, hp: 1500, attack: 120, defense: 60, exp: 500, gold: 200, rarity: Rarity::Rare },
    MonsterInfo { id: "monster-dark-knight", name: "暗黒騎士", description: "堕ちた騎士", level: 18, hp: 1800, attack: 140, defense: 80, exp: 600, gold: 250, rarity: Rarity::Rare },
    MonsterInfo { id: "monster-vampire", name: "吸血鬼", description: "生命を啜る不死者", level: 20, hp: 2000, attack: 160, defense: 70, exp: 700, gold: 300, rarity: Rarity::Rare },
    MonsterInfo { id: "monster-goblin", name: "ゴブリン", description: "ずる賢い小鬼", level: 5, hp: 200, attack: 30, defense: 10, exp: 50, gold: 20, rarity: Rarity::Uncommon },
    MonsterInfo { id: "monster-wolf", name: "凶狼", description: "獰猛な獣", level: 7, hp: 300, attack: 40, defense: 15, exp: 70, gold: 30, rarity: Rarity::Uncommon },
    MonsterInfo { id: "monster-skeleton", name: "骸骨兵", description: "蘇った骸骨", level: 8, hp: 350, attack: 45, defense: 20, exp: 80, gold: 35, rarity: Rarity::Uncommon },
    MonsterInfo { id: "monster-slime", name: "スライム", description: "弱い軟体生物", level: 1, hp: 50, attack: 10, defense: 5, exp: 10, gold: 5, rarity: Rarity::Common },
    MonsterInfo { id: "monster-rat", name: "大ネズミ", description: "大きなネズミ", level: 2, hp: 80, attack: 15, defense: 8, exp: 20, gold: 8, rarity: Rarity::Common },
    MonsterInfo { id: "monster-bat", name: "吸血コウモリ", description: "どこにでもいるコウモリ", level: 3, hp: 100, attack: 18, defense: 6, exp: 25, gold: 10, rarity: Rarity::Common },
    MonsterInfo { id: "monster-slug", name: "ナメクジ", description: "とても弱い生き物", level: 1, hp: 30, attack: 5, defense: 2, exp: 5, gold: 2, rarity: Rarity::Poor },
];

impl MonsterInfo {
    fn to_monster(&self) -> Monster {
        Monster {
            id: self.id.into(),
            name: self.name.into(),
            description: self.description.into(),
            level: self.level,
            hp: self.hp,
            max_hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            exp_reward: self.exp,
            gold_reward: self.gold,
            rarity: self.rarity,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MonsterCatalog {
    monsters: Vec<Monster>,
}

impl Default for MonsterCatalog {
    fn default() -> Self {
        Self::new(MONSTERS.iter().map(MonsterInfo::to_monster).collect())
    }
}

impl MonsterCatalog {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self { monsters }
    }

    pub fn all(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn get(&self, id: &str) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    /// Monsters whose level lies within `level ± LEVEL_WINDOW` (inclusive).
    pub fn in_level_window(&self, level: u32) -> Vec<&Monster> {
        let lo = level.saturating_sub(LEVEL_WINDOW);
        let hi = level.saturating_add(LEVEL_WINDOW);
        self.monsters
            .iter()
            .filter(|m| m.level >= lo && m.level <= hi)
            .collect()
    }

    /// Weighted pick from the level window. `None` when nothing is in range.
    pub fn random_for_level(&self, level: u32, rng: &mut impl RandomSource) -> Option<Monster> {
        let pool = self.in_level_window(level);
        let first = pool.first()?;
        let total: u32 = pool.iter().map(|m| selection_weight(m.rarity)).sum();
        let mut remaining = rng.next_f64() * total as f64;
        for m in &pool {
            remaining -= selection_weight(m.rarity) as f64;
            if remaining <= 0.0 {
                return Some((*m).clone());
            }
        }
        Some((*first).clone())
    }
}
