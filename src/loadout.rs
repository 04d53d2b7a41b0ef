//! Learned skills, their levels and cooldowns.

use serde::{Deserialize, Serialize};

use crate::catalog::skills::{SkillCatalog, HEAL, POWER_STRIKE};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedSkill {
    pub id: String,
    pub level: u32,
    /// Turns until usable again. 0 = ready.
    pub cooldown: u32,
}

/// Skills in the order they were learned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillLoadout {
    skills: Vec<LearnedSkill>,
}

impl SkillLoadout {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut LearnedSkill> {
        self.skills.iter_mut().find(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&LearnedSkill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn has_skill(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn learned(&self) -> &[LearnedSkill] {
        &self.skills
    }

    /// Learned skills with no cooldown pending.
    pub fn available(&self) -> Vec<&LearnedSkill> {
        self.skills.iter().filter(|s| s.cooldown == 0).collect()
    }

    pub fn cooldown(&self, id: &str) -> Option<u32> {
        self.get(id).map(|s| s.cooldown)
    }

    /// `false` for an unknown id or a skill already known.
    pub fn learn_skill(&mut self, id: &str, catalog: &SkillCatalog) -> bool {
        if catalog.get(id).is_none() || self.has_skill(id) {
            return false;
        }
        self.skills.push(LearnedSkill { id: id.to_string(), level: 1, cooldown: 0 });
        true
    }

    /// Starts the catalog cooldown. Does nothing for a skill not learned.
    pub fn use_skill(&mut self, id: &str, catalog: &SkillCatalog) {
        let Some(def) = catalog.get(id) else {
            return;
        };
        if let Some(s) = self.find_mut(id) {
            s.cooldown = def.cooldown;
        }
    }

    pub fn reduce_cooldowns(&mut self) {
        for s in &mut self.skills {
            s.cooldown = s.cooldown.saturating_sub(1);
        }
    }

    pub fn reset_cooldowns(&mut self) {
        for s in &mut self.skills {
            s.cooldown = 0;
        }
    }

    /// Raises the skill one level up to its catalog cap.
    pub fn upgrade_skill(&mut self, id: &str, catalog: &SkillCatalog) -> bool {
        let Some(def) = catalog.get(id) else {
            return false;
        };
        match self.find_mut(id) {
            Some(s) if s.level < def.max_level => {
                s.level += 1;
                true
            }
            _ => false,
        }
    }

    pub fn forget_skill(&mut self, id: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s.id != id);
        self.skills.len() != before
    }

    /// Replaces the loadout with the two starter skills.
    pub fn initialize_defaults(&mut self) {
        self.skills = [POWER_STRIKE, HEAL]
            .into_iter()
            .map(|id| LearnedSkill { id: id.to_string(), level: 1, cooldown: 0 })
            .collect();
    }
}
