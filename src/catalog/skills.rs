//! Static skill definitions.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl SkillRarity {
    /// Minimum effective level at which skills of this rarity can be learned.
    pub fn required_level(self) -> u32 {
        match self {
            SkillRarity::Common => 1,
            SkillRarity::Rare => 5,
            SkillRarity::Epic => 10,
            SkillRarity::Legendary => 15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkillType {
    Attack,
    Heal,
    Buff,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HealAmount {
    Flat(u32),
    /// Fraction of max hp, `1.0` = full heal.
    Percent(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillEffect {
    Attack { multiplier: f64 },
    Heal(HealAmount),
    /// Multiplicative bonuses (`0.3` = +30%) lasting `duration` turns.
    Buff {
        attack: Option<f64>,
        defense: Option<f64>,
        duration: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: SkillRarity,
    pub mp_cost: u32,
    pub cooldown: u32,
    pub max_level: u32,
    pub effect: SkillEffect,
}

impl Skill {
    pub fn skill_type(&self) -> SkillType {
        match self.effect {
            SkillEffect::Attack { .. } => SkillType::Attack,
            SkillEffect::Heal(_) => SkillType::Heal,
            SkillEffect::Buff { .. } => SkillType::Buff,
        }
    }
}

pub const POWER_STRIKE: &str = "power_strike";
pub const HEAL: &str = "heal";

fn seed_skills() -> Vec<Skill> {
    use SkillEffect::*;
    use SkillRarity::*;
    vec![
        Skill { id: POWER_STRIKE, name: "強撃", description: "攻撃力の150%のダメージ", rarity: Common, mp_cost: 10, cooldown: 0, max_level: 5, effect: Attack { multiplier: 1.5 } },
        Skill { id: HEAL, name: "治癒術", description: "HPを30回復", rarity: Common, mp_cost: 15, cooldown: 3, max_level: 5, effect: Heal(HealAmount::Flat(30)) },
        Skill { id: "defend", name: "防御の構え", description: "防御力+30%（2ターン）", rarity: Common, mp_cost: 10, cooldown: 2, max_level: 5, effect: Buff { attack: None, defense: Some(0.3), duration: 2 } },
        Skill { id: "fireball", name: "火球術", description: "攻撃力の200%のダメージ", rarity: Rare, mp_cost: 20, cooldown: 2, max_level: 5, effect: Attack { multiplier: 2.0 } },
        Skill { id: "lightning", name: "連鎖雷", description: "攻撃力の180%のダメージ", rarity: Rare, mp_cost: 25, cooldown: 3, max_level: 5, effect: Attack { multiplier: 1.8 } },
        Skill { id: "group_heal", name: "群体治癒", description: "HPを50回復", rarity: Rare, mp_cost: 30, cooldown: 4, max_level: 5, effect: Heal(HealAmount::Flat(50)) },
        Skill { id: "rage", name: "狂暴", description: "攻撃力+50%（3ターン）", rarity: Rare, mp_cost: 25, cooldown: 4, max_level: 3, effect: Buff { attack: Some(0.5), defense: None, duration: 3 } },
        Skill { id: "meteor", name: "流星火雨", description: "攻撃力の300%のダメージ", rarity: Epic, mp_cost: 40, cooldown: 4, max_level: 3, effect: Attack { multiplier: 3.0 } },
        Skill { id: "blizzard", name: "吹雪", description: "攻撃力の250%のダメージ", rarity: Epic, mp_cost: 35, cooldown: 3, max_level: 3, effect: Attack { multiplier: 2.5 } },
        Skill { id: "divine_heal", name: "神聖治癒", description: "HPを80回復", rarity: Epic, mp_cost: 45, cooldown: 5, max_level: 3, effect: Heal(HealAmount::Flat(80)) },
        Skill { id: "shield_wall", name: "盾の壁", description: "防御力+100%（2ターン）", rarity: Epic, mp_cost: 35, cooldown: 5, max_level: 3, effect: Buff { attack: None, defense: Some(1.0), duration: 2 } },
        Skill { id: "ultima", name: "究極奥義", description: "攻撃力の500%のダメージ", rarity: Legendary, mp_cost: 60, cooldown: 6, max_level: 1, effect: Attack { multiplier: 5.0 } },
        Skill { id: "resurrection", name: "蘇生の光", description: "HPを全回復", rarity: Legendary, mp_cost: 80, cooldown: 8, max_level: 1, effect: Heal(HealAmount::Percent(1.0)) },
        Skill { id: "god_mode", name: "神の加護", description: "攻撃力・防御力+100%（5ターン）", rarity: Legendary, mp_cost: 70, cooldown: 10, max_level: 1, effect: Buff { attack: Some(1.0), defense: Some(1.0), duration: 5 } },
    ]
}

#[derive(Clone, Debug)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self { skills: seed_skills() }
    }
}

impl SkillCatalog {
    pub fn all(&self) -> &[Skill] {
        &self.skills
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn by_type(&self, kind: SkillType) -> Vec<&Skill> {
        self.skills.iter().filter(|s| s.skill_type() == kind).collect()
    }

    pub fn random_by_rarity(&self, rarity: SkillRarity, rng: &mut impl RandomSource) -> Option<&Skill> {
        let pool: Vec<&Skill> = self.skills.iter().filter(|s| s.rarity == rarity).collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.pick_index(pool.len())])
    }

    pub fn learnable(&self, effective_level: u32) -> Vec<&Skill> {
        self.skills
            .iter()
            .filter(|s| effective_level >= s.rarity.required_level())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;

    #[test]
    fn fourteen_skills() {
        let cat = SkillCatalog::default();
        assert_eq!(cat.all().len(), 14);
        assert_eq!(cat.by_type(SkillType::Attack).len(), 6);
        assert_eq!(cat.by_type(SkillType::Heal).len(), 4);
        assert_eq!(cat.by_type(SkillType::Buff).len(), 4);
    }

    #[test]
    fn learnable_thresholds() {
        let cat = SkillCatalog::default();
        assert_eq!(cat.learnable(1).len(), 3);
        assert_eq!(cat.learnable(4).len(), 3);
        assert_eq!(cat.learnable(5).len(), 7);
        assert_eq!(cat.learnable(10).len(), 11);
        assert_eq!(cat.learnable(15).len(), 14);
        assert!(cat.learnable(0).is_empty());
    }

    #[test]
    fn resurrection_heals_by_percent() {
        let cat = SkillCatalog::default();
        let s = cat.get("resurrection").unwrap();
        assert_eq!(s.effect, SkillEffect::Heal(HealAmount::Percent(1.0)));
        assert_eq!(s.skill_type(), SkillType::Heal);
    }

    #[test]
    fn random_by_rarity_picks_from_pool() {
        let cat = SkillCatalog::default();
        let mut rng = ScriptedRolls::new().with_default_int(2);
        let s = cat.random_by_rarity(SkillRarity::Legendary, &mut rng).unwrap();
        assert_eq!(s.id, "god_mode");
    }

    #[test]
    fn unknown_skill_is_none() {
        assert!(SkillCatalog::default().get("kamehameha").is_none());
    }
}
