//! Headless autoplay for the cultivation RPG.
//!
//! Plays a character automatically for a fixed number of steps and prints a
//! summary. Useful for balance checks: with `--seed` a run is reproducible.
//!
//! ```text
//! cultivation-rpg [--config PATH] [--seed N] [--steps N] [--save-dir DIR] [--resume] [-v...]
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::{debug, info};

use cultivation_rpg::battle::BattleStatus;
use cultivation_rpg::catalog::items::{Item, ItemKind};
use cultivation_rpg::catalog::quests::QuestStatus;
use cultivation_rpg::catalog::skills::HEAL;
use cultivation_rpg::character::logic::{insight_probability, slot_for};
use cultivation_rpg::save;
use cultivation_rpg::{ExploreOutcome, GameConfig, GameSession, RandomSource};

#[derive(Parser)]
#[command(name = "cultivation-rpg")]
#[command(about = "Autoplay a cultivation RPG character and report how far they got")]
#[command(version)]
struct Cli {
    /// Game config (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config's seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of player actions to take
    #[arg(long, default_value_t = 500)]
    steps: u32,

    /// Directory for the four store files (character/inventory/skills/quests .json)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Load stores from --save-dir before playing
    #[arg(long, requires = "save_dir")]
    resume: bool,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let mut game = GameSession::new(config);
    if let (true, Some(dir)) = (cli.resume, &cli.save_dir) {
        load_stores(&mut game, dir)?;
        info!("resumed from {}", dir.display());
    }

    let taken = autoplay(&mut game, cli.steps);
    print_summary(&game, taken);

    if let Some(dir) = &cli.save_dir {
        write_stores(&game, dir)?;
        info!("saved to {}", dir.display());
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // RUST_LOG still wins when set
    builder.parse_env("RUST_LOG");
    builder.init();
}

// ── Autoplay ─────────────────────────────────────────────────

const INSIGHT_ROLL_AT: f64 = 0.35;

/// Runs until the step budget, death, or ascension. Returns steps taken.
fn autoplay<R: RandomSource>(game: &mut GameSession<R>, steps: u32) -> u32 {
    let mut today = chrono::Local::now().date_naive();
    for step in 0..steps {
        if !game.character.is_alive() && !game.in_battle() {
            info!("{} died at step {}", game.character.name, step);
            return step;
        }
        if game.character.has_won && !game.in_battle() {
            info!("{} ascended at step {}", game.character.name, step);
            return step;
        }
        if game.in_battle() {
            fight(game);
        } else {
            town(game, &mut today);
        }
    }
    steps
}

fn fight<R: RandomSource>(game: &mut GameSession<R>) {
    match game.battle.status {
        BattleStatus::PlayerTurn => {
            let low = game.battle.player_hp * 3 < game.battle.player_max_hp;
            if low && game.use_skill(HEAL).is_some() {
                return;
            }
            if let Some(id) = game.strongest_ready_attack() {
                if game.use_skill(&id).is_some() {
                    return;
                }
            }
            game.attack();
        }
        BattleStatus::Victory => {
            if let Some(loot) = game.collect_victory() {
                debug!("loot: {} exp, {} gold, {} items", loot.exp, loot.gold, loot.items.len());
            }
            game.claim_loot();
        }
        BattleStatus::Defeat => {
            game.acknowledge_defeat();
        }
        BattleStatus::Idle | BattleStatus::EnemyTurn => {}
    }
}

fn town<R: RandomSource>(game: &mut GameSession<R>, today: &mut NaiveDate) {
    manage_quests(game);
    learn_new_skills(game);
    equip_upgrades(game);

    // Let the insight pool grow before rolling on it.
    if game.character.insight && insight_probability(game.character.insight_experience) >= INSIGHT_ROLL_AT {
        game.attain_insight();
        return;
    }
    if game.character.hp * 2 < game.character.max_hp {
        if !eat_something(game) {
            game.cultivate();
        }
        return;
    }
    match game.explore(*today) {
        ExploreOutcome::Exhausted => {
            game.cultivate();
            *today = today.succ_opt().unwrap_or(*today);
        }
        outcome => debug!("explore: {:?}", outcome),
    }
}

fn manage_quests<R: RandomSource>(game: &mut GameSession<R>) {
    let ids: Vec<(String, QuestStatus)> = game
        .quests
        .all()
        .iter()
        .map(|q| (q.id.clone(), q.status))
        .collect();
    for (id, status) in ids {
        match status {
            QuestStatus::Available => {
                game.start_quest(&id);
            }
            QuestStatus::Completed => {
                game.claim_quest(&id);
            }
            QuestStatus::Active | QuestStatus::Claimed => {}
        }
    }
}

fn learn_new_skills<R: RandomSource>(game: &mut GameSession<R>) {
    let level = game.character.effective_level();
    let ids: Vec<&'static str> = game
        .catalogs
        .skills
        .learnable(level)
        .into_iter()
        .filter(|s| !game.skills.has_skill(s.id))
        .map(|s| s.id)
        .collect();
    for id in ids {
        game.learn_skill(id);
    }
}

fn gear_score(item: &Item) -> u32 {
    item.attack_bonus() + item.defense_bonus()
}

/// Equips bag items that beat what their slot holds, one at a time so two
/// candidates for the same slot settle on the better one.
fn equip_upgrades<R: RandomSource>(game: &mut GameSession<R>) {
    loop {
        let upgrade = game.inventory.items().iter().find_map(|item| {
            let slot = slot_for(item)?;
            let current = game.character.equipment.get(slot).map_or(0, gear_score);
            (gear_score(item) > current).then(|| item.id.clone())
        });
        match upgrade {
            Some(id) if game.equip(&id) => {}
            _ => break,
        }
    }
}

fn eat_something<R: RandomSource>(game: &mut GameSession<R>) -> bool {
    let food = game
        .inventory
        .items()
        .iter()
        .find(|i| matches!(i.kind, ItemKind::Food { .. }))
        .map(|i| i.id.clone());
    match food {
        Some(id) => game.eat(&id).is_some(),
        None => false,
    }
}

// ── Output ───────────────────────────────────────────────────

fn print_summary<R: RandomSource>(game: &GameSession<R>, steps: u32) {
    let c = &game.character;
    println!("── {} ──", c.name);
    println!("steps      : {}", steps);
    println!("realm      : {} (level {})", c.realm_title(), c.effective_level());
    if c.insight {
        println!("insight    : {} accumulated", c.insight_experience);
    } else {
        println!("experience : {}/{}", c.experience, c.experience_to_next);
    }
    println!("hp / mp    : {}/{}  {}/{}", c.hp, c.max_hp, c.mp, c.max_mp);
    println!("atk / def  : {} / {}", c.attack(), c.defense());
    println!("age        : {} / {} ({} years left)", c.age, c.max_age, c.lifespan);
    println!("gold       : {}", c.gold);
    println!("bag        : {} entries", game.inventory.len());
    println!("skills     : {}", game.skills.learned().len());
    let claimed = game
        .quests
        .all()
        .iter()
        .filter(|q| q.status == QuestStatus::Claimed)
        .count();
    println!("quests     : {}/{} claimed", claimed, game.quests.all().len());
    let fate = if c.has_won {
        "ascended"
    } else if c.is_alive() {
        "still cultivating"
    } else {
        "died of old age"
    };
    println!("fate       : {}", fate);
    for line in game.log.iter().rev().take(5).rev() {
        println!("  {}", line);
    }
}

// ── Persistence ──────────────────────────────────────────────

fn store_path(dir: &Path, store: &str) -> PathBuf {
    dir.join(format!("{}.json", store))
}

fn write_stores<R: RandomSource>(game: &GameSession<R>, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let files = [
        (save::character::STORE, save::character::to_json(&game.character)?),
        (save::inventory::STORE, save::inventory::to_json(&game.inventory)?),
        (save::skills::STORE, save::skills::to_json(&game.skills)?),
        (save::quests::STORE, save::quests::to_json(&game.quests)?),
    ];
    for (store, json) in files {
        let path = store_path(dir, store);
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn read_store(dir: &Path, store: &str) -> Result<String> {
    let path = store_path(dir, store);
    fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_stores<R: RandomSource>(game: &mut GameSession<R>, dir: &Path) -> Result<()> {
    game.character = save::character::from_json(&read_store(dir, save::character::STORE)?)
        .context("character save")?;
    game.inventory = save::inventory::from_json(&read_store(dir, save::inventory::STORE)?)
        .context("inventory save")?;
    game.skills = save::skills::from_json(&read_store(dir, save::skills::STORE)?)
        .context("skills save")?;
    game.quests = save::quests::from_json(&read_store(dir, save::quests::STORE)?)
        .context("quests save")?;
    Ok(())
}
