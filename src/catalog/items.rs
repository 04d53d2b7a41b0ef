//! Item definitions and the item catalog (図鑑).

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

// ── Rarity ────────────────────────────────────────────────────

/// Shared by items, monsters and quests. Ordered from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Poor,
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Poor => "粗悪",
            Rarity::Common => "普通",
            Rarity::Uncommon => "良品",
            Rarity::Rare => "希少",
            Rarity::Epic => "叙事",
            Rarity::Legendary => "伝説",
        }
    }
}

/// Rarity of a battle drop for a uniform roll in `[0, 1)`.
pub fn victory_drop_rarity(roll: f64) -> Rarity {
    if roll < 0.01 {
        Rarity::Legendary
    } else if roll < 0.05 {
        Rarity::Epic
    } else if roll < 0.15 {
        Rarity::Rare
    } else if roll < 0.40 {
        Rarity::Uncommon
    } else if roll < 0.70 {
        Rarity::Common
    } else {
        Rarity::Poor
    }
}

/// Rarity of an item found while exploring. Slightly stingier than drops.
pub fn explore_find_rarity(roll: f64) -> Rarity {
    if roll < 0.01 {
        Rarity::Legendary
    } else if roll < 0.05 {
        Rarity::Epic
    } else if roll < 0.15 {
        Rarity::Rare
    } else if roll < 0.35 {
        Rarity::Uncommon
    } else if roll < 0.65 {
        Rarity::Common
    } else {
        Rarity::Poor
    }
}

// ── Items ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    Head,
    Body,
    Legs,
    Accessory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Equipment,
    Material,
    Food,
    Quest,
}

/// Kind-specific payload. Serialized with a `type` tag next to the common fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon {
        attack: u32,
        durability: u32,
        max_durability: u32,
    },
    Equipment {
        defense: u32,
        slot: ArmorSlot,
        durability: u32,
        max_durability: u32,
    },
    Material {
        quantity: u32,
    },
    Food {
        heal: u32,
        quantity: u32,
    },
    Quest {
        quest_id: String,
        quantity: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Weapon { .. } => ItemType::Weapon,
            ItemKind::Equipment { .. } => ItemType::Equipment,
            ItemKind::Material { .. } => ItemType::Material,
            ItemKind::Food { .. } => ItemType::Food,
            ItemKind::Quest { .. } => ItemType::Quest,
        }
    }

    /// Materials and food merge into one stack per id.
    pub fn is_stackable(&self) -> bool {
        matches!(self.kind, ItemKind::Material { .. } | ItemKind::Food { .. })
    }

    pub fn quantity(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Material { quantity }
            | ItemKind::Food { quantity, .. }
            | ItemKind::Quest { quantity, .. } => Some(quantity),
            ItemKind::Weapon { .. } | ItemKind::Equipment { .. } => None,
        }
    }

    pub(crate) fn quantity_mut(&mut self) -> Option<&mut u32> {
        match &mut self.kind {
            ItemKind::Material { quantity }
            | ItemKind::Food { quantity, .. }
            | ItemKind::Quest { quantity, .. } => Some(quantity),
            ItemKind::Weapon { .. } | ItemKind::Equipment { .. } => None,
        }
    }

    pub fn attack_bonus(&self) -> u32 {
        match self.kind {
            ItemKind::Weapon { attack, .. } => attack,
            _ => 0,
        }
    }

    pub fn defense_bonus(&self) -> u32 {
        match self.kind {
            ItemKind::Equipment { defense, .. } => defense,
            _ => 0,
        }
    }
}

fn weapon(id: &str, name: &str, description: &str, rarity: Rarity, attack: u32, durability: u32) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        kind: ItemKind::Weapon { attack, durability, max_durability: durability },
    }
}

fn armor(
    id: &str,
    name: &str,
    description: &str,
    rarity: Rarity,
    slot: ArmorSlot,
    defense: u32,
    durability: u32,
) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        kind: ItemKind::Equipment { defense, slot, durability, max_durability: durability },
    }
}

fn material(id: &str, name: &str, description: &str, rarity: Rarity, quantity: u32) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        kind: ItemKind::Material { quantity },
    }
}

fn food(id: &str, name: &str, description: &str, rarity: Rarity, heal: u32, quantity: u32) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        kind: ItemKind::Food { heal, quantity },
    }
}

fn quest_item(id: &str, name: &str, description: &str, rarity: Rarity, quest_id: &str, quantity: u32) -> Item {
    Item {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        rarity,
        kind: ItemKind::Quest { quest_id: quest_id.into(), quantity },
    }
}

pub fn seed_items() -> Vec<Item> {
    use ArmorSlot::*;
    use Rarity::*;
    vec![
        // Legendary
        weapon("weapon-excalibur", "誓約の聖剣", "光り輝く伝説の聖剣", Legendary, 1000, 5000),
        weapon("weapon-gungnir", "永劫の槍", "何物をも貫く神の槍", Legendary, 950, 5000),
        armor("equipment-armor-divine", "神聖の鎧", "神より賜りし不壊の鎧", Legendary, Body, 800, 5000),
        armor("equipment-helmet-crown", "王者の冠", "王権の象徴たる冠", Legendary, Head, 600, 5000),
        material("material-dragon-core", "龍の心臓", "巨龍の核。無尽の力を宿す", Legendary, 1),
        material("material-phoenix-feather", "鳳凰の羽", "不死鳥の羽。死者をも蘇らせる", Legendary, 1),
        food("food-ambrosia", "仙酒", "神々の糧。生命と法力を満たす", Legendary, 2000, 1),
        quest_item("quest-divine-relic", "神聖遺物", "失われた聖遺物を探せ", Legendary, "quest-divine", 1),
        // Epic
        weapon("weapon-dragon-slayer", "屠龍刀", "龍をも斬る神兵", Epic, 500, 2000),
        weapon("weapon-falchion", "青龍偃月刀", "威力無双の大刀", Epic, 480, 2000),
        weapon("weapon-thunder-hammer", "雷神の槌", "雷霆の力を宿す戦槌", Epic, 520, 1800),
        armor("equipment-dragon-scale", "龍鱗甲", "龍の鱗で編んだ鎧", Epic, Body, 400, 2000),
        armor("equipment-qilin-helmet", "麒麟の兜", "神獣麒麟の兜", Epic, Head, 350, 1800),
        armor("equipment-wind-walker", "疾風の脛当て", "羽のように軽い", Epic, Legs, 200, 2000),
        material("material-mithril", "ミスリル鉱石", "希少な魔法銀", Epic, 10),
        material("material-dragon-crystal", "龍晶", "巨龍の力の結晶", Epic, 5),
        food("food-ginseng", "万年人参", "千年に一度の霊薬", Epic, 800, 3),
        food("food-elixir", "霊丹", "生命と法力を大きく回復する", Epic, 600, 5),
        quest_item("quest-dragon-slayer", "屠龍令", "屠龍の依頼を示す令牌", Epic, "quest-dragon-slayer", 1),
        quest_item("quest-hero-medal", "英雄勲章", "英雄の証", Epic, "quest-hero-medal", 1),
        // Rare
        weapon("weapon-steel-sword", "精鋼の剣", "鋭い精鋼の宝剣", Rare, 150, 1000),
        weapon("weapon-frost-blade", "氷霜の刃", "冷気を帯びた宝剣", Rare, 180, 900),
        weapon("weapon-flame-sword", "烈焰の剣", "炎を纏う魔剣", Rare, 175, 900),
        armor("equipment-steel-armor", "精鋼の鎧", "精鋼で鍛えた鎧", Rare, Body, 120, 1000),
        armor("equipment-knight-helmet", "騎士の兜", "上質な騎士の兜", Rare, Head, 100, 800),
        armor("equipment-boots-swift", "迅速の靴", "足取りが軽くなる戦靴", Rare, Legs, 80, 900),
        material("material-gold-ingot", "金塊", "純金の延べ棒", Rare, 20),
        material("material-magic-crystal", "魔水晶", "魔力を帯びた水晶", Rare, 15),
        food("food-roasted-meat", "焼き肉", "中程度に体力を回復する", Rare, 150, 20),
        food("food-mana-potion", "法力薬", "法力を回復する薬", Rare, 100, 15),
        quest_item("quest-secret-letter", "密書", "謎めいた手紙", Rare, "quest-secret-letter", 1),
        quest_item("quest-ancient-map", "古地図", "宝の在処を記した地図", Rare, "quest-ancient-map", 1),
        // Uncommon
        weapon("weapon-iron-sword", "鉄の剣", "普通の鉄製の長剣", Uncommon, 80, 500),
        weapon("weapon-spear", "長槍", "よくある長槍", Uncommon, 75, 500),
        armor("equipment-leather-armor", "革鎧", "獣の革で作った鎧", Uncommon, Body, 60, 500),
        armor("equipment-iron-helmet", "鉄兜", "鉄製の兜", Uncommon, Head, 50, 400),
        material("material-iron-ore", "鉄鉱石", "ありふれた鉄鉱石", Uncommon, 50),
        material("material-herb", "薬草", "ありふれた薬草", Uncommon, 100),
        food("food-bread", "パン", "普通のパン", Uncommon, 80, 50),
        food("food-apple", "りんご", "新鮮な果物", Uncommon, 60, 30),
        quest_item("quest-herbalist", "採薬の依頼", "村長のために薬草を集める", Uncommon, "quest-herbalist", 1),
        // Common
        weapon("weapon-wooden-sword", "木刀", "稽古用の木刀", Common, 30, 200),
        weapon("weapon-stick", "木の棒", "ただの木の棒", Common, 15, 150),
        armor("equipment-cloth-armor", "布の服", "普通の布製の防具", Common, Body, 25, 300),
        armor("equipment-simple-ring", "ただの指輪", "飾り気のない指輪", Common, Accessory, 10, 500),
        material("material-wood", "木材", "普通の木材", Common, 100),
        material("material-stone", "石材", "普通の石", Common, 100),
        food("food-porridge", "粥", "あっさりした粥", Common, 40, 50),
        quest_item("quest-village-request", "村長の依頼", "村人の困りごとを解決する", Common, "quest-village-request", 1),
        // Poor
        weapon("weapon-broken-blade", "折れた剣", "折れているが、辛うじて使える", Poor, 8, 50),
        armor("equipment-tattered-cape", "ぼろぼろの外套", "擦り切れた外套", Poor, Accessory, 5, 100),
        material("material-scrap-metal", "屑鉄", "打ち捨てられた鉄くず", Poor, 200),
        material("material-broken-bone", "骨片", "砕けた骨", Poor, 150),
        food("food-moldy-bread", "カビた饅頭", "もう傷んでいる", Poor, 10, 100),
        quest_item("quest-map-fragment", "地図の切れ端", "破れた地図の一片", Poor, "quest-map-fragment", 5),
    ]
}

// ── Catalog ───────────────────────────────────────────────────

/// Every obtainable item. Lookups return clones so callers own what they receive.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self { items: seed_items() }
    }
}

impl ItemCatalog {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn by_type(&self, kind: ItemType) -> Vec<&Item> {
        self.items.iter().filter(|i| i.item_type() == kind).collect()
    }

    pub fn by_rarity(&self, rarity: Rarity) -> Vec<&Item> {
        self.items.iter().filter(|i| i.rarity == rarity).collect()
    }

    /// Returns `false` (and keeps the catalog unchanged) on a duplicate id.
    pub fn add(&mut self, item: Item) -> bool {
        if self.get(&item.id).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn random_by_rarity(&self, rarity: Rarity, rng: &mut impl RandomSource) -> Option<Item> {
        let pool = self.by_rarity(rarity);
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.pick_index(pool.len())].clone())
    }

    pub fn random_of_type(
        &self,
        kind: ItemType,
        rarity: Option<Rarity>,
        rng: &mut impl RandomSource,
    ) -> Option<Item> {
        let pool: Vec<&Item> = self
            .items
            .iter()
            .filter(|i| i.item_type() == kind && rarity.map_or(true, |r| i.rarity == r))
            .collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.pick_index(pool.len())].clone())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
