//! ストアごとのセーブ/ロード機能。
//!
//! キャラクター・所持品・スキル・クエストの4ストアをそれぞれ独立した JSON
//! として保存する。どのストアも同じ封筒 `{ version, store, data }` に包む。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（各ストアは `#[serde(default)]`
//!   なので欠けたフィールドは既定値で埋まる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//! - `store` が一致しない封筒（クエストのデータをキャラクターとして読む等）は拒否する。

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SaveError;

pub const SAVE_VERSION: u32 = 1;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    store: &'a str,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    store: String,
    data: serde_json::Value,
}

fn encode<T: Serialize>(store: &'static str, data: &T) -> Result<String, SaveError> {
    let envelope = Envelope {
        version: SAVE_VERSION,
        store,
        data,
    };
    Ok(serde_json::to_string(&envelope)?)
}

fn decode<T: DeserializeOwned>(store: &'static str, json: &str) -> Result<T, SaveError> {
    let raw: RawEnvelope = serde_json::from_str(json)?;

    if raw.store != store {
        warn!("{} セーブの読み込みを拒否: store={}", store, raw.store);
        return Err(SaveError::WrongStore {
            expected: store,
            found: raw.store,
        });
    }

    if raw.version < MIN_COMPATIBLE_VERSION {
        warn!(
            "{} セーブバージョンが古すぎます (saved={}, min_compatible={})",
            store, raw.version, MIN_COMPATIBLE_VERSION
        );
        return Err(SaveError::IncompatibleVersion {
            store,
            found: raw.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }

    if raw.version < SAVE_VERSION {
        warn!(
            "{} 旧バージョンのセーブデータをマイグレーション (saved={}, current={})",
            store, raw.version, SAVE_VERSION
        );
    } else if raw.version > SAVE_VERSION {
        warn!(
            "{} 新しいバージョンのセーブデータ (saved={}, current={})。未知のフィールドは無視します",
            store, raw.version, SAVE_VERSION
        );
    }

    Ok(serde_json::from_value(raw.data)?)
}

macro_rules! store_codec {
    ($module:ident, $name:literal, $ty:ty) => {
        pub mod $module {
            use super::*;

            pub const STORE: &str = $name;

            pub fn to_json(value: &$ty) -> Result<String, SaveError> {
                encode(STORE, value)
            }

            pub fn from_json(json: &str) -> Result<$ty, SaveError> {
                decode(STORE, json)
            }
        }
    };
}

store_codec!(character, "character", crate::character::Character);
store_codec!(inventory, "inventory", crate::inventory::Inventory);
store_codec!(skills, "skills", crate::loadout::SkillLoadout);
store_codec!(quests, "quests", crate::quest::QuestLog);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::items::ItemCatalog;
    use crate::catalog::quests::QuestStatus;
    use crate::catalog::skills::SkillCatalog;
    use crate::character::state::Realm;
    use crate::character::Character;
    use crate::inventory::Inventory;
    use crate::loadout::SkillLoadout;
    use crate::quest::QuestLog;
    use chrono::NaiveDate;

    #[test]
    fn character_roundtrip() {
        let mut original = Character::new("青雲子");
        original.realm = Realm::GoldenCore;
        original.realm_level = 2;
        original.insight_experience = 321;
        original.gold = 9999;
        original.has_won = true;
        original.last_explore_date = NaiveDate::from_ymd_opt(2024, 3, 9);
        let sword = ItemCatalog::default().get("weapon-iron-sword").cloned().unwrap();
        original.equipment.weapon = Some(sword);

        let json = character::to_json(&original).unwrap();
        let loaded = character::from_json(&json).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn envelope_carries_version_and_store() {
        let json = inventory::to_json(&Inventory::new()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], SAVE_VERSION);
        assert_eq!(v["store"], "inventory");
        assert!(v["data"].is_object());
    }

    #[test]
    fn stores_are_independent() {
        let mut bag = Inventory::new();
        let cat = ItemCatalog::default();
        bag.add(cat.get("food-bread").cloned().unwrap());
        bag.add(cat.get("weapon-wooden-sword").cloned().unwrap());

        let mut loadout = SkillLoadout::new();
        loadout.initialize_defaults();
        loadout.use_skill("heal", &SkillCatalog::default());

        let mut log = QuestLog::default();
        log.start_quest("quest-002");

        assert_eq!(inventory::from_json(&inventory::to_json(&bag).unwrap()).unwrap(), bag);
        assert_eq!(skills::from_json(&skills::to_json(&loadout).unwrap()).unwrap(), loadout);
        let quests_back = quests::from_json(&quests::to_json(&log).unwrap()).unwrap();
        assert_eq!(quests_back.get("quest-002").unwrap().status, QuestStatus::Active);
    }

    #[test]
    fn wrong_store_is_rejected() {
        let json = quests::to_json(&QuestLog::default()).unwrap();
        match character::from_json(&json) {
            Err(SaveError::WrongStore { expected, found }) => {
                assert_eq!(expected, "character");
                assert_eq!(found, "quests");
            }
            other => panic!("unexpected: {:?}", other.map(|c| c.name)),
        }
    }

    #[test]
    fn version_too_old_is_rejected() {
        let json = r#"{"version":0,"store":"skills","data":{"skills":[]}}"#;
        assert!(matches!(
            skills::from_json(json),
            Err(SaveError::IncompatibleVersion { store: "skills", found: 0, min: 1 })
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{"version":1,"store":"character","data":{"name":"新人","gold":42}}"#;
        let c = character::from_json(json).unwrap();
        assert_eq!(c.name, "新人");
        assert_eq!(c.gold, 42);
        assert_eq!(c.realm, Realm::QiRefining);
        assert_eq!(c.max_hp, 100);
        assert_eq!(c.max_daily_explores, 20);
    }

    #[test]
    fn newer_version_still_loads() {
        let json = r#"{"version":7,"store":"inventory","data":{"items":[],"future":true}}"#;
        assert!(inventory::from_json(json).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(character::from_json("{not json"), Err(SaveError::Json(_))));
        assert!(matches!(character::from_json(r#"{"store":"character"}"#), Err(SaveError::Json(_))));
    }
}
