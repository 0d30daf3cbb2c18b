//! Worker (character) model.
//!
//! Workers perform jobs. Each worker has a bounded number of concurrent
//! job slots per activity kind and the skill levels that shorten job
//! durations.
//!
//! Worker records are caller-owned snapshots: schedulers copy the slot
//! counters they need and never write back.

use serde::{Deserialize, Serialize};

use super::ActivityKind;

/// Highest trainable skill level.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Skill levels that affect job duration.
///
/// Levels above [`MAX_SKILL_LEVEL`] are clamped, also when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSkills")]
pub struct Skills {
    /// Industry: -4% manufacturing time per level.
    pub industry: u8,
    /// Advanced Industry: -3% manufacturing time per level.
    pub advanced_industry: u8,
    /// Reactions: -4% reaction time per level.
    pub reactions: u8,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSkills {
    industry: u8,
    advanced_industry: u8,
    reactions: u8,
}

impl From<RawSkills> for Skills {
    fn from(raw: RawSkills) -> Self {
        Skills::default()
            .with_industry(raw.industry)
            .with_advanced_industry(raw.advanced_industry)
            .with_reactions(raw.reactions)
    }
}

/// Concurrent job slots for one activity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCapacity {
    /// Configured maximum concurrent jobs.
    pub max: i32,
    /// Jobs currently running.
    pub used: i32,
}

/// A worker with its slot capacities and skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerCapacity {
    /// Unique worker identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Manufacturing slots.
    pub manufacturing: SlotCapacity,
    /// Reaction slots.
    pub reaction: SlotCapacity,
    /// Duration-relevant skills.
    pub skills: Skills,
}

impl Skills {
    /// All duration skills at the same level.
    pub fn uniform(level: u8) -> Self {
        let level = level.min(MAX_SKILL_LEVEL);
        Self {
            industry: level,
            advanced_industry: level,
            reactions: level,
        }
    }

    /// Sets the Industry level.
    pub fn with_industry(mut self, level: u8) -> Self {
        self.industry = level.min(MAX_SKILL_LEVEL);
        self
    }

    /// Sets the Advanced Industry level.
    pub fn with_advanced_industry(mut self, level: u8) -> Self {
        self.advanced_industry = level.min(MAX_SKILL_LEVEL);
        self
    }

    /// Sets the Reactions level.
    pub fn with_reactions(mut self, level: u8) -> Self {
        self.reactions = level.min(MAX_SKILL_LEVEL);
        self
    }
}

impl SlotCapacity {
    /// Creates a capacity with no slots in use.
    pub fn new(max: i32) -> Self {
        Self { max, used: 0 }
    }

    /// Sets the number of slots in use.
    pub fn with_used(mut self, used: i32) -> Self {
        self.used = used;
        self
    }

    /// Free slots: `max - used`, floored at zero.
    #[inline]
    pub fn available(&self) -> u32 {
        (self.max - self.used).max(0) as u32
    }
}

impl WorkerCapacity {
    /// Creates a worker with no slots and untrained skills.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            manufacturing: SlotCapacity::default(),
            reaction: SlotCapacity::default(),
            skills: Skills::default(),
        }
    }

    /// Sets the worker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets manufacturing slots (max, used).
    pub fn with_manufacturing_slots(mut self, max: i32, used: i32) -> Self {
        self.manufacturing = SlotCapacity::new(max).with_used(used);
        self
    }

    /// Sets reaction slots (max, used).
    pub fn with_reaction_slots(mut self, max: i32, used: i32) -> Self {
        self.reaction = SlotCapacity::new(max).with_used(used);
        self
    }

    /// Sets skills.
    pub fn with_skills(mut self, skills: Skills) -> Self {
        self.skills = skills;
        self
    }

    /// Slot capacity for an activity kind.
    pub fn slots(&self, activity: ActivityKind) -> &SlotCapacity {
        match activity {
            ActivityKind::Manufacturing => &self.manufacturing,
            ActivityKind::Reaction => &self.reaction,
        }
    }

    /// Free slots for an activity kind.
    #[inline]
    pub fn available(&self, activity: ActivityKind) -> u32 {
        self.slots(activity).available()
    }

    /// Free slots for every activity kind, indexed by [`ActivityKind::index`].
    pub fn available_table(&self) -> [u32; 2] {
        ActivityKind::ALL.map(|kind| self.available(kind))
    }
}
