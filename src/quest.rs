//! Quest tracker: objective counters and the
//! Available → Active → Completed → Claimed lifecycle.
//!
//! Transitions only ever move forward. Objective updates are accepted only
//! while a quest is Active, so a quest cannot complete before it is started
//! or after it has been claimed.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::quests::{seed_quests, ObjectiveKind, Quest, QuestStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestLog {
    quests: Vec<Quest>,
}

impl Default for QuestLog {
    fn default() -> Self {
        Self::new(seed_quests())
    }
}

impl QuestLog {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.id == id)
    }

    fn with_status(&self, status: QuestStatus) -> Vec<&Quest> {
        self.quests.iter().filter(|q| q.status == status).collect()
    }

    pub fn all(&self) -> &[Quest] {
        &self.quests
    }

    pub fn available(&self) -> Vec<&Quest> {
        self.with_status(QuestStatus::Available)
    }

    pub fn active(&self) -> Vec<&Quest> {
        self.with_status(QuestStatus::Active)
    }

    pub fn completed(&self) -> Vec<&Quest> {
        self.with_status(QuestStatus::Completed)
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    fn transition(&mut self, id: &str, from: QuestStatus, to: QuestStatus) -> bool {
        match self.find_mut(id) {
            Some(q) if q.status == from => {
                q.status = to;
                debug!("quest {} {:?} -> {:?}", id, from, to);
                true
            }
            _ => false,
        }
    }

    pub fn start_quest(&mut self, id: &str) -> bool {
        self.transition(id, QuestStatus::Available, QuestStatus::Active)
    }

    /// Forces an active quest to Completed, filling every objective to its
    /// requirement so the quest stays consistent with its counters.
    pub fn complete_quest(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(q) if q.status == QuestStatus::Active => {
                for obj in &mut q.objectives {
                    obj.current = obj.required;
                }
                q.status = QuestStatus::Completed;
                debug!("quest {} forced complete", id);
                true
            }
            _ => false,
        }
    }

    /// Marks a completed quest claimed. Rewards are the caller's job.
    pub fn claim_reward(&mut self, id: &str) -> bool {
        self.transition(id, QuestStatus::Completed, QuestStatus::Claimed)
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.get(id).map_or(false, Quest::all_objectives_met)
    }

    /// Sets an objective's progress (clamped to its requirement) and
    /// completes the quest once every objective is met.
    pub fn update_objective(&mut self, id: &str, index: usize, progress: u32) -> bool {
        let Some(q) = self.find_mut(id) else {
            return false;
        };
        if q.status != QuestStatus::Active {
            return false;
        }
        let Some(obj) = q.objectives.get_mut(index) else {
            return false;
        };
        obj.current = progress.min(obj.required);
        debug!("quest {} objective {} at {}/{}", id, index, obj.current, obj.required);
        if q.all_objectives_met() {
            q.status = QuestStatus::Completed;
            debug!("quest {} completed", id);
        }
        true
    }

    fn matching(&self, pred: impl Fn(ObjectiveKind, &str) -> bool) -> Vec<(String, usize, u32)> {
        self.quests
            .iter()
            .filter(|q| q.status == QuestStatus::Active)
            .flat_map(|q| {
                q.objectives
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| pred(o.kind, &o.target))
                    .map(move |(i, o)| (q.id.clone(), i, o.current))
            })
            .collect()
    }

    /// Adds `amount` to every active objective of `kind` aimed at `target`.
    pub fn record_progress(&mut self, kind: ObjectiveKind, target: &str, amount: u32) {
        for (id, idx, current) in self.matching(|k, t| k == kind && t == target) {
            self.update_objective(&id, idx, current.saturating_add(amount));
        }
    }

    /// Raises reach-level objectives of active quests to `level`.
    pub fn sync_level(&mut self, level: u32) {
        for (id, idx, current) in self.matching(|k, _| k == ObjectiveKind::ReachLevel) {
            if level > current {
                self.update_objective(&id, idx, level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::quests::{TARGET_EXPLORE, TARGET_LEVEL};

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut log = QuestLog::default();
        assert!(!log.claim_reward("quest-001"));
        assert!(!log.complete_quest("quest-001"));
        assert!(log.start_quest("quest-001"));
        assert!(!log.start_quest("quest-001"));
        assert!(log.complete_quest("quest-001"));
        assert!(log.claim_reward("quest-001"));
        assert!(!log.claim_reward("quest-001"));
        assert_eq!(log.get("quest-001").unwrap().status, QuestStatus::Claimed);
    }

    #[test]
    fn forced_completion_fills_objectives() {
        let mut log = QuestLog::default();
        log.start_quest("quest-001");
        assert!(log.complete_quest("quest-001"));
        let q = log.get("quest-001").unwrap();
        assert_eq!(q.status, QuestStatus::Completed);
        assert_eq!(q.objectives[0].current, q.objectives[0].required);
        assert!(log.is_complete("quest-001"));
    }

    #[test]
    fn unknown_quest_is_noop() {
        let mut log = QuestLog::default();
        let before = log.clone();
        assert!(!log.start_quest("quest-999"));
        assert!(!log.update_objective("quest-999", 0, 5));
        assert!(!log.is_complete("quest-999"));
        assert_eq!(log, before);
    }

    #[test]
    fn objective_clamps_and_completes() {
        let mut log = QuestLog::default();
        log.start_quest("quest-001");
        assert!(log.update_objective("quest-001", 0, 2));
        assert_eq!(log.get("quest-001").unwrap().status, QuestStatus::Active);
        assert!(log.update_objective("quest-001", 0, 99));
        let q = log.get("quest-001").unwrap();
        assert_eq!(q.objectives[0].current, 3);
        assert_eq!(q.status, QuestStatus::Completed);
        assert!(log.is_complete("quest-001"));
        assert_eq!(log.completed().len(), 1);
    }

    #[test]
    fn inactive_quests_ignore_progress() {
        let mut log = QuestLog::default();
        assert!(!log.update_objective("quest-001", 0, 3));
        log.record_progress(ObjectiveKind::Kill, "monster-slime", 3);
        assert_eq!(log.get("quest-001").unwrap().objectives[0].current, 0);
        assert_eq!(log.get("quest-001").unwrap().status, QuestStatus::Available);
    }

    #[test]
    fn bad_objective_index() {
        let mut log = QuestLog::default();
        log.start_quest("quest-001");
        assert!(!log.update_objective("quest-001", 7, 1));
    }

    #[test]
    fn record_progress_accumulates() {
        let mut log = QuestLog::default();
        log.start_quest("quest-002");
        for _ in 0..4 {
            log.record_progress(ObjectiveKind::Explore, TARGET_EXPLORE, 1);
        }
        assert_eq!(log.get("quest-002").unwrap().status, QuestStatus::Active);
        log.record_progress(ObjectiveKind::Explore, TARGET_EXPLORE, 1);
        assert_eq!(log.get("quest-002").unwrap().status, QuestStatus::Completed);
        // already completed: further progress is ignored
        log.record_progress(ObjectiveKind::Explore, TARGET_EXPLORE, 1);
        assert_eq!(log.get("quest-002").unwrap().objectives[0].current, 5);
    }

    #[test]
    fn sync_level_never_lowers() {
        let mut log = QuestLog::default();
        log.start_quest("quest-004");
        log.start_quest("quest-006");
        log.sync_level(4);
        assert_eq!(log.get("quest-004").unwrap().objectives[0].current, 4);
        log.sync_level(2);
        assert_eq!(log.get("quest-004").unwrap().objectives[0].current, 4);
        log.sync_level(6);
        assert_eq!(log.get("quest-004").unwrap().status, QuestStatus::Completed);
        assert_eq!(log.get("quest-006").unwrap().objectives[0].current, 6);
        assert_eq!(log.get("quest-006").unwrap().objectives[0].target, TARGET_LEVEL);
    }

    #[test]
    fn filters() {
        let mut log = QuestLog::default();
        assert_eq!(log.available().len(), 6);
        log.start_quest("quest-003");
        assert_eq!(log.available().len(), 5);
        assert_eq!(log.active().len(), 1);
        assert_eq!(log.all().len(), 6);
    }
}
