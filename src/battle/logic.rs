//! Turn-based battle resolver.
//!
//! State machine: Idle → PlayerTurn ⇄ EnemyTurn → Victory | Defeat.
//! Every action checks the current status first and does nothing outside
//! its phase. The resolver never touches the character: callers pass stat
//! snapshots in and read `player_hp` back out.

use log::debug;

use super::state::{BattleSession, BattleStatus, Buff, BuffStat, Buffs, LogKind, Loot, SkillResult};
use crate::catalog::monsters::Monster;
use crate::catalog::skills::{HealAmount, Skill, SkillEffect};
use crate::config::BattleConfig;
use crate::rng::RandomSource;

// ── Buff math ────────────────────────────────────────────────

fn stack(base: u32, buffs: &[Buff]) -> u32 {
    buffs
        .iter()
        .fold(base, |total, b| (total as f64 * (1.0 + b.value)).floor() as u32)
}

/// Attack after every attack buff, applied one at a time in insertion order.
pub fn total_attack(base: u32, buffs: &Buffs) -> u32 {
    stack(base, &buffs.attack)
}

pub fn total_defense(base: u32, buffs: &Buffs) -> u32 {
    stack(base, &buffs.defense)
}

/// One turn passes: every buff loses a turn and expired ones drop off.
pub fn reduce_buff_duration(buffs: &mut Buffs) {
    for list in [&mut buffs.attack, &mut buffs.defense] {
        for b in list.iter_mut() {
            b.duration = b.duration.saturating_sub(1);
        }
        list.retain(|b| b.duration > 0);
    }
}

fn roll_damage(attack: u32, defense: u32, variance: i64) -> u32 {
    (attack as i64 - defense as i64 + variance).max(1) as u32
}

// ── Battle ───────────────────────────────────────────────────

pub fn start_battle(b: &mut BattleSession, monster: Monster, player_max_hp: u32) {
    let name = monster.name.clone();
    *b = BattleSession::new();
    b.status = BattleStatus::PlayerTurn;
    b.player_hp = player_max_hp;
    b.player_max_hp = player_max_hp;
    b.enemy_hp = monster.hp;
    b.enemy = Some(monster);
    b.add_log(format!("{}が現れた！戦闘開始！", name), LogKind::System);
    debug!("battle started against {}", name);
}

fn land_hit(b: &mut BattleSession, damage: u32) {
    b.enemy_hp = b.enemy_hp.saturating_sub(damage);
    if b.enemy_hp == 0 {
        b.status = BattleStatus::Victory;
        let msg = format!("{}を倒した！", b.enemy_name());
        b.add_log(msg, LogKind::System);
        debug!("victory on turn {}", b.turn);
    }
}

/// Plain attack. Returns `false` outside the player's turn.
///
/// A critical hit doubles the damage shown in the log; it only doubles the
/// hp loss when `critical_applies_to_hp` is set.
pub fn player_attack(
    b: &mut BattleSession,
    attack: u32,
    cfg: &BattleConfig,
    rng: &mut impl RandomSource,
) -> bool {
    if b.status != BattleStatus::PlayerTurn {
        return false;
    }
    let Some(enemy_def) = b.enemy.as_ref().map(|m| m.defense) else {
        return false;
    };

    let atk = total_attack(attack, &b.player_buffs);
    let damage = roll_damage(atk, enemy_def, rng.range_inclusive(-5, 4));
    let critical = rng.chance(cfg.critical_chance);
    let shown = if critical { damage * 2 } else { damage };

    let msg = if critical {
        format!("会心の一撃！ {}に{}ダメージ！", b.enemy_name(), shown)
    } else {
        format!("{}に{}ダメージ！", b.enemy_name(), shown)
    };
    b.add_log(msg, if critical { LogKind::Critical } else { LogKind::Player });

    let dealt = if critical && cfg.critical_applies_to_hp { shown } else { damage };
    land_hit(b, dealt);
    true
}

/// Resolves a skill. `None` outside the player's turn or when `mp` is short.
pub fn player_use_skill(
    b: &mut BattleSession,
    skill: &Skill,
    attack: u32,
    max_hp: u32,
    mp: u32,
    rng: &mut impl RandomSource,
) -> Option<SkillResult> {
    if b.status != BattleStatus::PlayerTurn {
        return None;
    }
    let enemy_def = b.enemy.as_ref()?.defense;
    if mp < skill.mp_cost {
        b.add_log("法力が足りない！", LogKind::System);
        return None;
    }

    let mut result = SkillResult::default();
    match skill.effect {
        SkillEffect::Attack { multiplier } => {
            let atk = total_attack(attack, &b.player_buffs);
            let base = (atk as f64 * multiplier).floor() as u32;
            let damage = roll_damage(base, enemy_def, rng.range_inclusive(-5, 4));
            result.damage = Some(damage);
            result.message = format!("{}！ {}に{}ダメージ！", skill.name, b.enemy_name(), damage);
            b.add_log(result.message.clone(), LogKind::Player);
            land_hit(b, damage);
        }
        SkillEffect::Heal(amount) => {
            let healing = match amount {
                HealAmount::Flat(n) => n,
                HealAmount::Percent(p) => (max_hp as f64 * p).floor() as u32,
            };
            let before = b.player_hp;
            b.player_hp = b.player_hp.saturating_add(healing).min(max_hp);
            let healing = b.player_hp.saturating_sub(before);
            result.healing = Some(healing);
            result.message = format!("{}！ HPが{}回復した！", skill.name, healing);
            b.add_log(result.message.clone(), LogKind::Heal);
        }
        SkillEffect::Buff { attack: atk_buff, defense: def_buff, duration } => {
            let mut parts = Vec::new();
            if let Some(v) = atk_buff {
                b.player_buffs.apply(BuffStat::Attack, v, duration);
                parts.push(format!("攻撃力+{}%", (v * 100.0).floor() as u32));
            }
            if let Some(v) = def_buff {
                b.player_buffs.apply(BuffStat::Defense, v, duration);
                parts.push(format!("防御力+{}%", (v * 100.0).floor() as u32));
            }
            let summary = parts.join("、");
            result.message = format!("{}！ {}！", skill.name, summary);
            result.buff = Some(summary);
            b.add_log(result.message.clone(), LogKind::Buff);
        }
    }
    Some(result)
}

/// Hands control to the enemy. Buffs tick down here, before the enemy acts.
pub fn end_turn(b: &mut BattleSession) -> bool {
    if b.status != BattleStatus::PlayerTurn {
        return false;
    }
    reduce_buff_duration(&mut b.player_buffs);
    reduce_buff_duration(&mut b.enemy_buffs);
    b.status = BattleStatus::EnemyTurn;
    true
}

pub fn enemy_turn(b: &mut BattleSession, defense: u32, rng: &mut impl RandomSource) -> bool {
    if b.status != BattleStatus::EnemyTurn {
        return false;
    }
    let Some(enemy_atk) = b.enemy.as_ref().map(|m| total_attack(m.attack, &b.enemy_buffs)) else {
        return false;
    };

    let def = total_defense(defense, &b.player_buffs);
    let damage = roll_damage(enemy_atk, def, rng.range_inclusive(-4, 3));
    b.player_hp = b.player_hp.saturating_sub(damage);
    let msg = format!("{}の攻撃！ {}ダメージを受けた！", b.enemy_name(), damage);
    b.add_log(msg, LogKind::Enemy);

    if b.player_hp == 0 {
        b.status = BattleStatus::Defeat;
        b.add_log("力尽きた…", LogKind::System);
        debug!("defeat on turn {}", b.turn);
    } else {
        b.status = BattleStatus::PlayerTurn;
        b.turn += 1;
        debug!("turn {} begins", b.turn);
    }
    true
}

pub fn set_loot(b: &mut BattleSession, loot: Loot) {
    if b.status == BattleStatus::Victory {
        b.loot = Some(loot);
    }
}

/// Tears the encounter down, keeping nothing.
pub fn end_battle(b: &mut BattleSession) {
    *b = BattleSession::new();
}

// ── Tests ────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::catalog::items::Rarity;
    use crate::rng::GameRng;
    use proptest::prelude::*;

    fn monster(hp: u32, attack: u32, defense: u32) -> Monster {
        Monster {
            id: "monster-prop".into(),
            name: "影".into(),
            description: String::new(),
            level: 1,
            hp,
            max_hp: hp,
            attack,
            defense,
            exp_reward: 0,
            gold_reward: 0,
            rarity: Rarity::Poor,
        }
    }

    proptest! {
        #[test]
        fn prop_player_attack_floor_and_victory(
            hp in 1u32..500,
            def in 0u32..200,
            atk in 0u32..400,
            seed in any::<u64>(),
        ) {
            let mut b = BattleSession::new();
            start_battle(&mut b, monster(hp, 10, def), 100);
            let mut rng = GameRng::seeded(seed);
            player_attack(&mut b, atk, &BattleConfig::default(), &mut rng);
            prop_assert!(b.enemy_hp < hp);
            prop_assert_eq!(b.status == BattleStatus::Victory, b.enemy_hp == 0);
        }

        #[test]
        fn prop_enemy_turn_floor_and_defeat(
            player_hp in 1u32..500,
            enemy_atk in 0u32..600,
            def in 0u32..200,
            seed in any::<u64>(),
        ) {
            let mut b = BattleSession::new();
            start_battle(&mut b, monster(100, enemy_atk, 0), player_hp);
            end_turn(&mut b);
            let mut rng = GameRng::seeded(seed);
            enemy_turn(&mut b, def, &mut rng);
            prop_assert!(b.player_hp < player_hp);
            prop_assert_eq!(b.status == BattleStatus::Defeat, b.player_hp == 0);
        }

        #[test]
        fn prop_buff_durations_strictly_decrease(durations in prop::collection::vec(1u32..6, 0..8)) {
            let mut buffs = Buffs::default();
            for d in &durations {
                buffs.apply(BuffStat::Attack, 0.1, *d);
            }
            reduce_buff_duration(&mut buffs);
            let expected: Vec<u32> = durations.iter().filter(|d| **d > 1).map(|d| d - 1).collect();
            let got: Vec<u32> = buffs.attack.iter().map(|b| b.duration).collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_buff_stacking_never_lowers(base in 0u32..10_000, v in 0.0f64..2.0, n in 0usize..4) {
            let mut buffs = Buffs::default();
            for _ in 0..n {
                buffs.apply(BuffStat::Defense, v, 2);
            }
            prop_assert!(total_defense(base, &buffs) >= base);
        }
    }
}
