//! Activity kind model.
//!
//! Every plan step runs under exactly one activity kind. The two kinds have
//! their own slot pools on a worker and their own duration model, so the
//! kind is a closed enum rather than a free-form string.
//!
//! # Duration Model
//!
//! - **Manufacturing**: blueprint time efficiency, industry skills, structure
//!   and rig bonuses.
//! - **Reaction**: reactions skill and refinery/rig bonuses only. Blueprint
//!   time efficiency and the industry skills do not apply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::formula::DurationModel;

/// Production activity a step (and its slots) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Primary manufacturing from a blueprint.
    Manufacturing,
    /// Reaction formula run at a refinery.
    Reaction,
}

impl ActivityKind {
    /// Both kinds, in slot-table order.
    pub const ALL: [ActivityKind; 2] = [ActivityKind::Manufacturing, ActivityKind::Reaction];

    /// Index into per-activity slot tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ActivityKind::Manufacturing => 0,
            ActivityKind::Reaction => 1,
        }
    }

    /// Duration formula used for jobs of this kind.
    #[inline]
    pub fn duration_model(self) -> DurationModel {
        match self {
            ActivityKind::Manufacturing => DurationModel::Blueprint,
            ActivityKind::Reaction => DurationModel::Reaction,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Manufacturing => "manufacturing",
            ActivityKind::Reaction => "reaction",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown activity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity kind '{0}'")]
pub struct UnknownActivity(pub String);

impl FromStr for ActivityKind {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Ok(ActivityKind::Manufacturing),
            "reaction" | "reactions" => Ok(ActivityKind::Reaction),
            other => Err(UnknownActivity(other.to_string())),
        }
    }
}
