//! Game session: one player's stores wired together.
//!
//! `GameSession` owns the config, catalogs, character, bag, skill loadout,
//! quest log, the current battle and the RNG. Each method is one player
//! action: it checks the gates the action needs (alive, not in battle,
//! item present ...), delegates the rules to the store modules, and keeps the
//! cross-store bookkeeping (quest progress, loot into the bag) consistent.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::battle::logic as battle_logic;
use crate::battle::{BattleSession, BattleStatus, LogKind, Loot, SkillResult};
use crate::catalog::items::{explore_find_rarity, victory_drop_rarity, Item, ItemKind};
use crate::catalog::monsters::Monster;
use crate::catalog::quests::{ObjectiveKind, QuestStatus, TARGET_EQUIPMENT, TARGET_EXPLORE};
use crate::catalog::skills::SkillEffect;
use crate::catalog::Catalogs;
use crate::character::logic as char_logic;
use crate::character::state::{Character, EquipSlot, DEFAULT_NAME};
use crate::config::GameConfig;
use crate::inventory::Inventory;
use crate::loadout::SkillLoadout;
use crate::quest::QuestLog;
use crate::rng::{GameRng, RandomSource};

const MAX_LOG: usize = 30;

/// What a single exploration turned up.
#[derive(Clone, Debug, PartialEq)]
pub enum ExploreOutcome {
    /// A battle has started against the named monster.
    Monster(String),
    Treasure(u64),
    Item(Item),
    Nothing,
    /// Today's allowance is used up.
    Exhausted,
    /// Refused: a battle is in progress.
    InBattle,
    /// Refused: the character has died of old age.
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CultivateGain {
    pub exp: u64,
    pub hp: u32,
    pub mp: u32,
    /// Sub-levels gained from the experience.
    pub levels: u32,
}

pub struct GameSession<R: RandomSource = GameRng> {
    pub config: GameConfig,
    pub catalogs: Catalogs,
    pub character: Character,
    pub inventory: Inventory,
    pub skills: SkillLoadout,
    pub quests: QuestLog,
    /// `Idle` when no encounter is running.
    pub battle: BattleSession,
    /// Messages from actions outside battle, newest last.
    pub log: Vec<String>,
    rng: R,
}

impl GameSession<GameRng> {
    /// New game seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        info!("new game, seed {}", rng.seed());
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let mut skills = SkillLoadout::new();
        skills.initialize_defaults();
        Self {
            character: Character::from_config(DEFAULT_NAME, &config),
            catalogs: Catalogs::default(),
            inventory: Inventory::new(),
            skills,
            quests: QuestLog::default(),
            battle: BattleSession::new(),
            log: Vec::new(),
            config,
            rng,
        }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn add_log(&mut self, text: &str) {
        self.log.push(text.to_string());
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    pub fn in_battle(&self) -> bool {
        self.battle.status != BattleStatus::Idle
    }

    fn sync_level(&mut self) {
        self.quests.sync_level(self.character.effective_level());
    }

    fn gain_exp(&mut self, amount: u64) -> u32 {
        let levels = char_logic::add_experience(&mut self.character, amount, &self.config.progression);
        self.sync_level();
        levels
    }

    /// Starts over: fresh character (same name), empty bag, starter skills
    /// and the full quest board.
    pub fn reset(&mut self) {
        char_logic::reset(&mut self.character, &self.config);
        self.inventory.clear();
        self.skills.initialize_defaults();
        self.quests = QuestLog::default();
        self.battle = BattleSession::new();
        self.log.clear();
    }

    // ── Exploration ──────────────────────────────────────────

    pub fn explore(&mut self, today: NaiveDate) -> ExploreOutcome {
        if char_logic::check_death(&self.character) {
            return ExploreOutcome::Dead;
        }
        if self.in_battle() {
            return ExploreOutcome::InBattle;
        }
        if !char_logic::use_explore(&mut self.character, today) {
            self.add_log("今日はもう探索できない。");
            return ExploreOutcome::Exhausted;
        }
        self.quests.record_progress(ObjectiveKind::Explore, TARGET_EXPLORE, 1);

        let cfg = self.config.exploration.clone();
        let roll = self.rng.next_f64();
        let outcome = if roll < cfg.monster_chance {
            let level = self.character.effective_level();
            match self.catalogs.monsters.random_for_level(level, &mut self.rng) {
                Some(monster) => {
                    let name = monster.name.clone();
                    self.add_log(&format!("{}に遭遇した！", name));
                    self.start_battle(monster);
                    ExploreOutcome::Monster(name)
                }
                None => ExploreOutcome::Nothing,
            }
        } else if roll < cfg.monster_chance + cfg.treasure_chance {
            let lo = cfg.treasure_gold_min as i64;
            let hi = cfg.treasure_gold_max as i64;
            let gold = self.rng.range_inclusive(lo, hi).max(0) as u64;
            char_logic::add_gold(&mut self.character, gold);
            self.add_log(&format!("宝箱を見つけた！ {}ゴールドを手に入れた！", gold));
            ExploreOutcome::Treasure(gold)
        } else if roll < cfg.monster_chance + cfg.treasure_chance + cfg.item_chance {
            let rarity = explore_find_rarity(self.rng.next_f64());
            match self.catalogs.items.random_by_rarity(rarity, &mut self.rng) {
                Some(item) => {
                    self.add_log(&format!("{}を見つけた！", item.name));
                    self.inventory.add(item.clone());
                    ExploreOutcome::Item(item)
                }
                None => ExploreOutcome::Nothing,
            }
        } else {
            ExploreOutcome::Nothing
        };

        if outcome == ExploreOutcome::Nothing {
            self.add_log("何も見つからなかった。");
        }
        debug!("explore: {:?}", outcome);
        outcome
    }

    // ── Cultivation ──────────────────────────────────────────

    /// Meditate for a while: experience, a little hp and mp, one step older.
    pub fn cultivate(&mut self) -> Option<CultivateGain> {
        if char_logic::check_death(&self.character) || self.in_battle() {
            return None;
        }
        let exp = self.rng.range_inclusive(10, 29) as u64;
        let hp = self.rng.range_inclusive(5, 14) as u32;
        let mp = self.rng.range_inclusive(5, 14) as u32;

        let levels = self.gain_exp(exp);
        char_logic::heal(&mut self.character, hp);
        char_logic::restore_mp(&mut self.character, mp);
        char_logic::increase_age(&mut self.character, self.config.progression.cultivate_age_years);

        self.add_log(&format!("修練した。経験値+{} HP+{} MP+{}", exp, hp, mp));
        Some(CultivateGain { exp, hp, mp, levels })
    }

    pub fn attempt_breakthrough(&mut self) -> bool {
        if char_logic::check_death(&self.character) {
            return false;
        }
        let ok = char_logic::attempt_breakthrough(&mut self.character, &self.config.progression, &mut self.rng);
        if ok {
            self.sync_level();
            self.add_log(&format!("突破成功！ {}に到達した！", self.character.realm_title()));
        } else {
            self.add_log("突破に失敗した…");
        }
        ok
    }

    pub fn attain_insight(&mut self) -> bool {
        if char_logic::check_death(&self.character) || !self.character.insight {
            return false;
        }
        let ok = char_logic::attain_insight(&mut self.character, &self.config.progression, &mut self.rng);
        if ok {
            self.sync_level();
            self.add_log(&format!("悟りを得た！ {}に到達した！", self.character.realm_title()));
        } else {
            self.add_log("悟りには至らなかった…");
        }
        ok
    }

    // ── Battle ───────────────────────────────────────────────

    /// Begins an encounter at full hp with every skill off cooldown.
    pub fn start_battle(&mut self, monster: Monster) -> bool {
        if self.in_battle() {
            return false;
        }
        self.skills.reset_cooldowns();
        battle_logic::start_battle(&mut self.battle, monster, self.character.max_hp);
        true
    }

    fn pace(&self) {
        let ms = self.config.battle.turn_delay_ms;
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }

    /// After the player acts: the enemy answers if the fight is still on.
    fn pass_turn(&mut self) {
        if !battle_logic::end_turn(&mut self.battle) {
            return;
        }
        self.pace();
        battle_logic::enemy_turn(&mut self.battle, self.character.defense(), &mut self.rng);
        if self.battle.status == BattleStatus::PlayerTurn {
            self.skills.reduce_cooldowns();
        }
    }

    pub fn attack(&mut self) -> bool {
        let acted = battle_logic::player_attack(
            &mut self.battle,
            self.character.attack(),
            &self.config.battle,
            &mut self.rng,
        );
        if acted {
            self.pass_turn();
        }
        acted
    }

    /// Casts a learned, ready skill. Mp is spent only when the skill resolves.
    pub fn use_skill(&mut self, id: &str) -> Option<SkillResult> {
        if self.battle.status != BattleStatus::PlayerTurn {
            return None;
        }
        match self.skills.cooldown(id) {
            None => return None,
            Some(0) => {}
            Some(_) => {
                self.battle.add_log("そのスキルはまだ使えない！", LogKind::System);
                return None;
            }
        }
        let skill = self.catalogs.skills.get(id)?;
        let cost = skill.mp_cost;
        let result = battle_logic::player_use_skill(
            &mut self.battle,
            skill,
            self.character.attack(),
            self.character.max_hp,
            self.character.mp,
            &mut self.rng,
        )?;
        char_logic::use_mp(&mut self.character, cost);
        self.skills.use_skill(id, &self.catalogs.skills);
        self.pass_turn();
        Some(result)
    }

    /// `Some(true)` when the escape worked, `Some(false)` when the enemy
    /// got a turn instead, `None` when there is nothing to flee from.
    pub fn flee(&mut self) -> Option<bool> {
        if self.battle.status != BattleStatus::PlayerTurn {
            return None;
        }
        if self.rng.chance(self.config.battle.flee_chance) {
            let msg = format!("{}から逃げ出した！", self.battle.enemy_name());
            debug!("fled on turn {}", self.battle.turn);
            battle_logic::end_battle(&mut self.battle);
            self.add_log(&msg);
            Some(true)
        } else {
            self.battle.add_log("逃げられなかった！", LogKind::System);
            self.pass_turn();
            Some(false)
        }
    }

    /// Pays out a won battle: experience, gold, a possible drop into the bag,
    /// and kill progress. The rewards are stored as the battle's loot.
    /// `None` unless the battle is won and not yet paid out.
    pub fn collect_victory(&mut self) -> Option<Loot> {
        if self.battle.status != BattleStatus::Victory || self.battle.loot.is_some() {
            return None;
        }
        let monster = self.battle.enemy.clone()?;

        let mut loot = Loot {
            exp: monster.exp_reward,
            gold: monster.gold_reward,
            items: Vec::new(),
        };
        if self.rng.chance(self.config.battle.drop_chance) {
            let rarity = victory_drop_rarity(self.rng.next_f64());
            if let Some(item) = self.catalogs.items.random_by_rarity(rarity, &mut self.rng) {
                self.inventory.add(item.clone());
                loot.items.push(item);
            }
        }

        self.gain_exp(loot.exp);
        char_logic::add_gold(&mut self.character, loot.gold);
        self.quests.record_progress(ObjectiveKind::Kill, &monster.id, 1);

        let mut msg = format!("経験値{}とゴールド{}を獲得！", loot.exp, loot.gold);
        for item in &loot.items {
            msg.push_str(&format!(" {}を手に入れた！", item.name));
        }
        self.battle.add_log(msg, LogKind::System);
        battle_logic::set_loot(&mut self.battle, loot.clone());
        Some(loot)
    }

    /// Closes a won battle, paying out first if that has not happened yet.
    pub fn claim_loot(&mut self) -> bool {
        if self.battle.status != BattleStatus::Victory {
            return false;
        }
        self.collect_victory();
        let msg = format!("{}との戦いに勝利した。", self.battle.enemy_name());
        battle_logic::end_battle(&mut self.battle);
        self.add_log(&msg);
        true
    }

    /// Closes a lost battle. The character is left at 0 hp.
    pub fn acknowledge_defeat(&mut self) -> bool {
        if self.battle.status != BattleStatus::Defeat {
            return false;
        }
        let hp = self.character.hp;
        char_logic::take_damage(&mut self.character, hp);
        let msg = format!("{}に敗れた…", self.battle.enemy_name());
        battle_logic::end_battle(&mut self.battle);
        self.add_log(&msg);
        true
    }

    // ── Bag & Equipment ──────────────────────────────────────

    /// Equips gear from the bag. A displaced item goes back into the bag.
    pub fn equip(&mut self, id: &str) -> bool {
        let Some(slot) = self.inventory.get(id).and_then(char_logic::slot_for) else {
            return false;
        };
        let Some(item) = self.inventory.remove(id) else {
            return false;
        };
        let name = item.name.clone();
        match char_logic::equip_item(&mut self.character, item, slot) {
            Ok(displaced) => {
                if let Some(old) = displaced {
                    self.inventory.add(old);
                }
                self.quests.record_progress(ObjectiveKind::Collect, TARGET_EQUIPMENT, 1);
                self.add_log(&format!("{}を装備した。", name));
                true
            }
            Err(item) => {
                self.inventory.add(item);
                false
            }
        }
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> bool {
        match char_logic::unequip_item(&mut self.character, slot) {
            Some(item) => {
                self.add_log(&format!("{}を外した。", item.name));
                self.inventory.add(item);
                true
            }
            None => false,
        }
    }

    /// Eats one food item from the bag. Returns the hp it restores.
    pub fn eat(&mut self, id: &str) -> Option<u32> {
        let heal = match self.inventory.get(id)?.kind {
            ItemKind::Food { heal, .. } => heal,
            _ => return None,
        };
        let food = self.inventory.take_one(id)?;
        char_logic::heal(&mut self.character, heal);
        self.add_log(&format!("{}を食べた。HPが{}回復した。", food.name, heal));
        Some(heal)
    }

    // ── Quests ───────────────────────────────────────────────

    /// Accepts a quest if the character's effective level meets its requirement.
    pub fn start_quest(&mut self, id: &str) -> bool {
        if char_logic::check_death(&self.character) {
            return false;
        }
        let Some(quest) = self.quests.get(id) else {
            return false;
        };
        if quest.level > self.character.effective_level() {
            return false;
        }
        if !self.quests.start_quest(id) {
            return false;
        }
        self.sync_level();
        true
    }

    /// Grants a completed quest's rewards and marks it claimed.
    pub fn claim_quest(&mut self, id: &str) -> bool {
        if char_logic::check_death(&self.character) {
            return false;
        }
        let Some(quest) = self.quests.get(id) else {
            return false;
        };
        if quest.status != QuestStatus::Completed {
            return false;
        }
        let rewards = quest.rewards.clone();
        let name = quest.name.clone();

        self.gain_exp(rewards.exp);
        char_logic::add_gold(&mut self.character, rewards.gold);
        for item_id in &rewards.items {
            match self.catalogs.items.get(item_id) {
                Some(item) => self.inventory.add(item.clone()),
                None => warn!("quest {} rewards unknown item {}", id, item_id),
            }
        }
        self.quests.claim_reward(id);
        self.add_log(&format!("クエスト「{}」の報酬を受け取った！", name));
        true
    }

    // ── Skills ───────────────────────────────────────────────

    /// Learns a skill whose rarity the character's level allows.
    pub fn learn_skill(&mut self, id: &str) -> bool {
        if char_logic::check_death(&self.character) {
            return false;
        }
        let Some(skill) = self.catalogs.skills.get(id) else {
            return false;
        };
        if skill.rarity.required_level() > self.character.effective_level() {
            return false;
        }
        let name = skill.name;
        if !self.skills.learn_skill(id, &self.catalogs.skills) {
            return false;
        }
        self.add_log(&format!("{}を習得した！", name));
        true
    }

    /// Id of the ready attack skill with the highest multiplier that the
    /// current mp can pay for.
    pub fn strongest_ready_attack(&self) -> Option<String> {
        self.skills
            .available()
            .into_iter()
            .filter_map(|s| self.catalogs.skills.get(&s.id))
            .filter(|def| def.mp_cost <= self.character.mp)
            .filter_map(|def| match def.effect {
                SkillEffect::Attack { multiplier } => Some((def.id, multiplier)),
                _ => None,
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id.to_string())
    }
}
