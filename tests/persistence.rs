//! The four stores survive a save/load cycle independently, through strings
//! and through files on disk.

use std::fs;

use chrono::NaiveDate;

use cultivation_rpg::battle::BattleStatus;
use cultivation_rpg::save;
use cultivation_rpg::{GameConfig, GameSession, SaveError, ScriptedRolls};

fn played_session() -> GameSession<ScriptedRolls> {
    let mut s = GameSession::with_rng(GameConfig::default(), ScriptedRolls::new());
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    s.start_quest("quest-002");
    s.start_quest("quest-001");
    for _ in 0..5 {
        s.explore(today);
    }
    s.claim_quest("quest-002");

    let slime = s.catalogs.monsters.get("monster-slime").unwrap().clone();
    s.start_battle(slime);
    s.use_skill("heal");
    while s.battle.status == BattleStatus::PlayerTurn {
        s.attack();
    }
    s.claim_loot();
    s.cultivate();
    s
}

#[test]
fn every_store_roundtrips() {
    let s = played_session();

    let character = save::character::from_json(&save::character::to_json(&s.character).unwrap()).unwrap();
    let inventory = save::inventory::from_json(&save::inventory::to_json(&s.inventory).unwrap()).unwrap();
    let skills = save::skills::from_json(&save::skills::to_json(&s.skills).unwrap()).unwrap();
    let quests = save::quests::from_json(&save::quests::to_json(&s.quests).unwrap()).unwrap();

    assert_eq!(character, s.character);
    assert_eq!(inventory, s.inventory);
    assert_eq!(skills, s.skills);
    assert_eq!(quests, s.quests);
    assert!(inventory.get("food-bread").is_some());
    assert_eq!(character.daily_explore_count, 5);
}

#[test]
fn restored_session_keeps_playing() {
    let s = played_session();
    let mut restored = GameSession::with_rng(GameConfig::default(), ScriptedRolls::new());
    restored.character = save::character::from_json(&save::character::to_json(&s.character).unwrap()).unwrap();
    restored.quests = save::quests::from_json(&save::quests::to_json(&s.quests).unwrap()).unwrap();

    // quest-001 picks up where it left off: one slime down, two to go
    assert_eq!(restored.quests.get("quest-001").unwrap().objectives[0].current, 1);
    let slime = restored.catalogs.monsters.get("monster-slime").unwrap().clone();
    for _ in 0..2 {
        restored.start_battle(slime.clone());
        while restored.battle.status == BattleStatus::PlayerTurn {
            restored.attack();
        }
        restored.claim_loot();
    }
    assert!(restored.claim_quest("quest-001"));
}

#[test]
fn stores_written_to_disk_load_back() {
    let s = played_session();
    let dir = std::env::temp_dir().join(format!("cultivation-rpg-save-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join("character.json");
    fs::write(&path, save::character::to_json(&s.character).unwrap()).unwrap();
    let back = save::character::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, s.character);

    // a store file swapped for another is caught
    let wrong = dir.join("quests.json");
    fs::write(&wrong, save::quests::to_json(&s.quests).unwrap()).unwrap();
    let err = save::character::from_json(&fs::read_to_string(&wrong).unwrap()).unwrap_err();
    assert!(matches!(err, SaveError::WrongStore { .. }));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn config_from_toml_drives_session() {
    let toml = r#"
        seed = 99

        [exploration]
        max_daily_explores = 3

        [progression]
        starting_age = 30
    "#;
    let config = GameConfig::from_toml_str(toml).unwrap();
    let mut s = GameSession::new(config);
    assert_eq!(s.character.age, 30);
    assert_eq!(s.character.max_daily_explores, 3);

    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let mut explored = 0;
    while s.character.remaining_explores(today) > 0 {
        s.explore(today);
        while s.in_battle() {
            if s.battle.status == BattleStatus::PlayerTurn {
                s.attack();
            } else if !s.claim_loot() {
                s.acknowledge_defeat();
            }
        }
        explored += 1;
    }
    assert_eq!(explored, 3);
}

#[test]
fn invalid_config_is_rejected() {
    assert!(GameConfig::from_toml_str("[battle]\nflee_chance = 1.5").is_err());
    assert!(GameConfig::from_toml_str("[exploration]\nmonster_chance = 0.9\nitem_chance = 0.9").is_err());
    assert!(GameConfig::from_toml_str("seed = \"abc\"").is_err());
}
