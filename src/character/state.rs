//! Character data: realms, stat tables, equipment. Mutation lives in `logic`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::items::{ArmorSlot, Item};
use crate::config::GameConfig;

pub const MAX_REALM_LEVEL: u32 = 3;
pub const DEFAULT_NAME: &str = "旅の修士";

// ── Realms ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    QiRefining,
    FoundationEstablishment,
    GoldenCore,
    NascentSoul,
    DeityTransformation,
    VoidRefining,
    BodyIntegration,
    Mahayana,
    Tribulation,
}

impl Realm {
    pub const ALL: [Realm; 9] = [
        Realm::QiRefining,
        Realm::FoundationEstablishment,
        Realm::GoldenCore,
        Realm::NascentSoul,
        Realm::DeityTransformation,
        Realm::VoidRefining,
        Realm::BodyIntegration,
        Realm::Mahayana,
        Realm::Tribulation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Realm> {
        Realm::ALL.get(self.index() + 1).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Realm::QiRefining => "練気期",
            Realm::FoundationEstablishment => "築基期",
            Realm::GoldenCore => "金丹期",
            Realm::NascentSoul => "元嬰期",
            Realm::DeityTransformation => "化神期",
            Realm::VoidRefining => "錬虚期",
            Realm::BodyIntegration => "合体期",
            Realm::Mahayana => "大乗期",
            Realm::Tribulation => "渡劫期",
        }
    }
}

/// Stats of a realm at sub-level 1.
pub struct RealmInfo {
    pub exp_to_next: u64,
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
}

pub fn realm_info(realm: Realm) -> RealmInfo {
    match realm {
        Realm::QiRefining => RealmInfo { exp_to_next: 100, max_hp: 100, max_mp: 50, attack: 10, defense: 5 },
        Realm::FoundationEstablishment => RealmInfo { exp_to_next: 1_000, max_hp: 300, max_mp: 150, attack: 40, defense: 20 },
        Realm::GoldenCore => RealmInfo { exp_to_next: 8_000, max_hp: 900, max_mp: 400, attack: 150, defense: 75 },
        Realm::NascentSoul => RealmInfo { exp_to_next: 50_000, max_hp: 2_500, max_mp: 1_000, attack: 450, defense: 220 },
        Realm::DeityTransformation => RealmInfo { exp_to_next: 300_000, max_hp: 7_000, max_mp: 2_800, attack: 1_300, defense: 650 },
        Realm::VoidRefining => RealmInfo { exp_to_next: 1_500_000, max_hp: 18_000, max_mp: 7_000, attack: 3_500, defense: 1_750 },
        Realm::BodyIntegration => RealmInfo { exp_to_next: 8_000_000, max_hp: 45_000, max_mp: 18_000, attack: 9_000, defense: 4_500 },
        Realm::Mahayana => RealmInfo { exp_to_next: 40_000_000, max_hp: 110_000, max_mp: 45_000, attack: 22_000, defense: 11_000 },
        Realm::Tribulation => RealmInfo { exp_to_next: 200_000_000, max_hp: 260_000, max_mp: 110_000, attack: 52_000, defense: 26_000 },
    }
}

/// Realm base values scaled by `2^(realm_level - 1)`.
pub fn realm_stats(realm: Realm, realm_level: u32) -> RealmInfo {
    let base = realm_info(realm);
    let factor = 1u32 << realm_level.clamp(1, MAX_REALM_LEVEL).saturating_sub(1);
    RealmInfo {
        exp_to_next: base.exp_to_next * factor as u64,
        max_hp: base.max_hp * factor,
        max_mp: base.max_mp * factor,
        attack: base.attack * factor,
        defense: base.defense * factor,
    }
}

/// Width of a realm on the effective-level scale: `3 × ∏(k+1)` for k in 1..=index.
pub fn realm_span(realm: Realm) -> u32 {
    3 * (1..=realm.index() as u32).map(|k| k + 1).product::<u32>()
}

pub fn effective_level(realm: Realm, realm_level: u32) -> u32 {
    let prior: u32 = Realm::ALL[..realm.index()].iter().map(|r| realm_span(*r)).sum();
    let span = realm_span(realm);
    prior + (realm_level.saturating_sub(1) * span) / 3 + 1
}

// ── Equipment ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Head,
    Body,
    Legs,
    Accessory,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 5] = [
        EquipSlot::Weapon,
        EquipSlot::Head,
        EquipSlot::Body,
        EquipSlot::Legs,
        EquipSlot::Accessory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "武器",
            EquipSlot::Head => "頭",
            EquipSlot::Body => "胴",
            EquipSlot::Legs => "脚",
            EquipSlot::Accessory => "装飾品",
        }
    }
}

impl From<ArmorSlot> for EquipSlot {
    fn from(slot: ArmorSlot) -> Self {
        match slot {
            ArmorSlot::Head => EquipSlot::Head,
            ArmorSlot::Body => EquipSlot::Body,
            ArmorSlot::Legs => EquipSlot::Legs,
            ArmorSlot::Accessory => EquipSlot::Accessory,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub head: Option<Item>,
    pub body: Option<Item>,
    pub legs: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Head => self.head.as_ref(),
            EquipSlot::Body => self.body.as_ref(),
            EquipSlot::Legs => self.legs.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Head => &mut self.head,
            EquipSlot::Body => &mut self.body,
            EquipSlot::Legs => &mut self.legs,
            EquipSlot::Accessory => &mut self.accessory,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        EquipSlot::ALL.into_iter().filter_map(move |s| self.get(s))
    }
}

// ── Character ─────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub realm: Realm,
    /// Sub-level within the realm, 1..=3.
    pub realm_level: u32,
    pub experience: u64,
    pub experience_to_next: u64,
    /// Set once sub-level 3 is maxed; experience then flows to `insight_experience`.
    pub insight: bool,
    pub insight_experience: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub base_attack: u32,
    pub base_defense: u32,
    pub equipment: Equipment,
    pub gold: u64,
    pub age: u32,
    pub max_age: u32,
    /// Years left. Floors at zero.
    pub lifespan: u32,
    pub has_won: bool,
    pub daily_explore_count: u32,
    pub last_explore_date: Option<NaiveDate>,
    pub max_daily_explores: u32,
}

impl Default for Character {
    fn default() -> Self {
        Self::from_config(DEFAULT_NAME, &GameConfig::default())
    }
}

impl Character {
    pub fn new(name: &str) -> Self {
        Self::from_config(name, &GameConfig::default())
    }

    pub fn from_config(name: &str, config: &GameConfig) -> Self {
        let stats = realm_stats(Realm::QiRefining, 1);
        let age = config.progression.starting_age;
        let max_age = config.progression.starting_max_age;
        Self {
            name: name.to_string(),
            realm: Realm::QiRefining,
            realm_level: 1,
            experience: 0,
            experience_to_next: stats.exp_to_next,
            insight: false,
            insight_experience: 0,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            mp: stats.max_mp,
            max_mp: stats.max_mp,
            base_attack: stats.attack,
            base_defense: stats.defense,
            equipment: Equipment::default(),
            gold: 0,
            age,
            max_age,
            lifespan: max_age.saturating_sub(age),
            has_won: false,
            daily_explore_count: 0,
            last_explore_date: None,
            max_daily_explores: config.exploration.max_daily_explores,
        }
    }

    /// Base attack plus the equipped weapon.
    pub fn attack(&self) -> u32 {
        self.base_attack + self.equipment.weapon.as_ref().map_or(0, Item::attack_bonus)
    }

    /// Base defense plus every equipped armor piece.
    pub fn defense(&self) -> u32 {
        self.base_defense + self.equipment.iter().map(Item::defense_bonus).sum::<u32>()
    }

    pub fn effective_level(&self) -> u32 {
        effective_level(self.realm, self.realm_level)
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.max_age
    }

    /// Explores left for `today`, counting a new day as a fresh allowance.
    pub fn remaining_explores(&self, today: NaiveDate) -> u32 {
        if self.last_explore_date != Some(today) {
            return self.max_daily_explores;
        }
        self.max_daily_explores.saturating_sub(self.daily_explore_count)
    }

    pub fn realm_title(&self) -> String {
        format!("{} {}層", self.realm.name(), self.realm_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::items::ItemCatalog;

    #[test]
    fn defaults() {
        let c = Character::default();
        assert_eq!(c.realm, Realm::QiRefining);
        assert_eq!(c.realm_level, 1);
        assert_eq!((c.experience, c.experience_to_next), (0, 100));
        assert_eq!((c.hp, c.max_hp, c.mp, c.max_mp), (100, 100, 50, 50));
        assert_eq!((c.attack(), c.defense()), (10, 5));
        assert_eq!((c.age, c.max_age, c.lifespan), (16, 100, 84));
        assert_eq!(c.max_daily_explores, 20);
        assert!(c.is_alive());
        assert!(!c.has_won);
    }

    #[test]
    fn realm_stats_double_per_sub_level() {
        let l1 = realm_stats(Realm::QiRefining, 1);
        let l2 = realm_stats(Realm::QiRefining, 2);
        let l3 = realm_stats(Realm::QiRefining, 3);
        assert_eq!((l1.exp_to_next, l2.exp_to_next, l3.exp_to_next), (100, 200, 400));
        assert_eq!((l1.max_hp, l2.max_hp, l3.max_hp), (100, 200, 400));
        assert_eq!(l3.attack, 40);
        let top = realm_stats(Realm::Tribulation, 3);
        assert_eq!(top.max_hp, 1_040_000);
    }

    #[test]
    fn spans_grow_factorially() {
        assert_eq!(realm_span(Realm::QiRefining), 3);
        assert_eq!(realm_span(Realm::FoundationEstablishment), 6);
        assert_eq!(realm_span(Realm::GoldenCore), 18);
        assert_eq!(realm_span(Realm::NascentSoul), 72);
    }

    #[test]
    fn effective_levels() {
        let lv = |r, l| effective_level(r, l);
        assert_eq!([lv(Realm::QiRefining, 1), lv(Realm::QiRefining, 2), lv(Realm::QiRefining, 3)], [1, 2, 3]);
        assert_eq!(
            [
                lv(Realm::FoundationEstablishment, 1),
                lv(Realm::FoundationEstablishment, 2),
                lv(Realm::FoundationEstablishment, 3)
            ],
            [4, 6, 8]
        );
        assert_eq!([lv(Realm::GoldenCore, 1), lv(Realm::GoldenCore, 2), lv(Realm::GoldenCore, 3)], [10, 16, 22]);
    }

    #[test]
    fn effective_level_strictly_increasing() {
        let mut prev = 0;
        for r in Realm::ALL {
            for l in 1..=MAX_REALM_LEVEL {
                let e = effective_level(r, l);
                assert!(e > prev, "{:?}/{} = {} not above {}", r, l, e, prev);
                prev = e;
            }
        }
    }

    #[test]
    fn realm_order_and_next() {
        assert!(Realm::QiRefining < Realm::Tribulation);
        assert_eq!(Realm::QiRefining.next(), Some(Realm::FoundationEstablishment));
        assert_eq!(Realm::Tribulation.next(), None);
    }

    #[test]
    fn totals_include_equipment() {
        let items = ItemCatalog::default();
        let mut c = Character::default();
        c.equipment.weapon = items.get("weapon-iron-sword").cloned();
        c.equipment.body = items.get("equipment-leather-armor").cloned();
        c.equipment.head = items.get("equipment-iron-helmet").cloned();
        assert_eq!(c.attack(), 10 + 80);
        assert_eq!(c.defense(), 5 + 60 + 50);
    }

    #[test]
    fn remaining_explores_resets_on_new_day() {
        let mut c = Character::default();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        c.last_explore_date = Some(day);
        c.daily_explore_count = 15;
        assert_eq!(c.remaining_explores(day), 5);
        assert_eq!(c.remaining_explores(day.succ_opt().unwrap()), 20);
    }

    #[test]
    fn death_is_age_at_cap() {
        let mut c = Character::default();
        c.age = 99;
        assert!(c.is_alive());
        c.age = 100;
        assert!(!c.is_alive());
    }
}
