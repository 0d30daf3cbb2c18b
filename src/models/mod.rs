//! Production planning domain models.
//!
//! Plain data types for plans, recipes, jobs, workers and assignment
//! results. All types are serde-serializable so callers can load plans and
//! worker snapshots from their own storage.
//!
//! # Domain Mappings
//!
//! | u-industry | Scheduling term | Notes |
//! |------------|-----------------|-------|
//! | PlanStep | Operation | One blueprint under one activity |
//! | MergedJob | Job | Consolidated identical operations |
//! | WorkerCapacity | Parallel machine group | Slots per activity kind |
//! | AssignedFragment | Assignment | Worker share of a job |

mod activity;
mod allocation;
mod facility;
mod job;
mod recipe;
mod step;
mod worker;

pub use activity::{ActivityKind, UnknownActivity};
pub use allocation::{Allocation, AssignedFragment, Assignee};
pub use facility::{Facility, Location, RigTier, SecurityClass, StructureKind};
pub use job::{JobContext, MergeKey, MergedJob, PendingJob, SkipReason, SkippedStep};
pub use recipe::{Material, Recipe};
pub use step::{EfficiencyLevels, PlanStep, MAX_MATERIAL_EFFICIENCY, MAX_TIME_EFFICIENCY};
pub use worker::{Skills, SlotCapacity, WorkerCapacity, MAX_SKILL_LEVEL};
