//! Planning errors.
//!
//! Only structural problems abort a planning call. Per-step lookup failures
//! are reported as [`SkippedStep`](crate::models::SkippedStep)s and per-job
//! slot shortfalls as unassigned fragments.

/// Fatal plan structure errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The plan has no steps.
    #[error("plan has no steps")]
    EmptyPlan,
    /// No step is without a parent.
    #[error("plan has no root step (every step has a parent)")]
    NoRoot,
}
