//! Job models produced by the planner.
//!
//! # Lifecycle
//!
//! 1. The plan walk emits one [`PendingJob`] per resolved step.
//! 2. Pending jobs sharing a [`MergeKey`] are folded into one [`MergedJob`].
//! 3. Merged jobs are handed to the slot assigner, deepest first.

use serde::{Deserialize, Serialize};

use super::{ActivityKind, EfficiencyLevels, Facility, Location, PlanStep, Recipe};

/// Step context a job keeps so durations can be recomputed per worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContext {
    /// Blueprint identifier.
    pub blueprint_id: u32,
    /// Produced item type.
    pub product_type_id: u32,
    /// Produced item name.
    pub product_name: String,
    /// Activity kind.
    pub activity: ActivityKind,
    /// Blueprint research levels.
    pub efficiency: EfficiencyLevels,
    /// Facility context.
    pub facility: Facility,
    /// Facility tax rate.
    pub facility_tax: f64,
    /// Base run time (seconds). `None` when the recipe reported no usable time.
    pub base_time_seconds: Option<i64>,
    /// Units produced per run.
    pub output_per_run: i64,
    /// Descriptive location.
    pub location: Option<Location>,
}

/// Per-step result of the plan walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingJob {
    /// Originating step.
    pub step_id: String,
    /// Context for duration recomputation.
    pub context: JobContext,
    /// Number of runs.
    pub runs: i64,
    /// Estimated job cost. `None` = not estimable.
    pub cost: Option<f64>,
    /// Estimated duration (seconds). `None` = not estimable.
    pub duration: Option<i64>,
    /// Distance from the plan root (root = 0).
    pub depth: u32,
}

/// Equivalence class of interchangeable jobs.
///
/// Location and facility context are not part of the key: two jobs with the
/// same blueprint, activity, research levels and tax merge even when planned
/// for different structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub blueprint_id: u32,
    pub activity: ActivityKind,
    pub material_efficiency: u8,
    pub time_efficiency: u8,
    /// Facility tax, compared by bit pattern.
    pub tax_bits: u64,
}

/// Accumulated jobs for one [`MergeKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedJob {
    /// Step whose display fields this job carries.
    pub step_id: String,
    /// Context of that step.
    pub context: JobContext,
    /// Total runs across contributors.
    pub runs: i64,
    /// Total cost. `None` only if every contributor had none.
    pub cost: Option<f64>,
    /// Total duration (seconds). `None` only if every contributor had none.
    pub duration: Option<i64>,
    /// Deepest contributor depth.
    pub depth: u32,
    /// All contributing step ids, in walk order.
    pub step_ids: Vec<String>,
}

/// A step the walk could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStep {
    /// Step identifier.
    pub step_id: String,
    /// Product type of the step.
    pub product_type_id: u32,
    /// Product name (or type id if unnamed).
    pub product_name: String,
    /// Why the step was skipped.
    pub reason: SkipReason,
}

/// Why a step was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The recipe could not be resolved.
    BlueprintNotFound,
    /// The recipe resolved but its materials could not be loaded.
    MaterialsUnavailable,
}

impl JobContext {
    /// Builds a job context from a step and its resolved recipe.
    pub fn from_step(step: &PlanStep, recipe: &Recipe) -> Self {
        Self {
            blueprint_id: step.blueprint_id,
            product_type_id: step.product_type_id,
            product_name: step.display_name(),
            activity: step.activity,
            efficiency: step.efficiency,
            facility: step.facility.clone(),
            facility_tax: step.facility_tax,
            base_time_seconds: recipe.usable_base_time(),
            output_per_run: recipe.effective_output(),
            location: step.location.clone(),
        }
    }
}

impl PendingJob {
    /// Merge class of this job.
    pub fn merge_key(&self) -> MergeKey {
        MergeKey::of(&self.context)
    }
}

impl MergeKey {
    /// Merge class of a job context.
    pub fn of(context: &JobContext) -> Self {
        Self {
            blueprint_id: context.blueprint_id,
            activity: context.activity,
            material_efficiency: context.efficiency.material,
            time_efficiency: context.efficiency.time,
            tax_bits: context.facility_tax.to_bits(),
        }
    }
}

impl MergedJob {
    /// Folds another pending job into this one.
    ///
    /// Runs, cost and duration add up. A strictly deeper contributor takes
    /// over the depth and the display fields; ties keep the current ones.
    pub fn absorb(&mut self, job: PendingJob) {
        self.runs = self.runs.saturating_add(job.runs);
        self.cost = add_optional(self.cost, job.cost, |a, b| a + b);
        self.duration = add_optional(self.duration, job.duration, i64::saturating_add);
        self.step_ids.push(job.step_id.clone());
        if job.depth > self.depth {
            self.depth = job.depth;
            self.step_id = job.step_id;
            self.context = job.context;
        }
    }

    /// Merge class of this job.
    pub fn merge_key(&self) -> MergeKey {
        MergeKey::of(&self.context)
    }

    /// Activity kind.
    #[inline]
    pub fn activity(&self) -> ActivityKind {
        self.context.activity
    }

    /// Units this job produces.
    pub fn output_quantity(&self) -> i64 {
        self.runs.saturating_mul(self.context.output_per_run)
    }
}

impl From<PendingJob> for MergedJob {
    fn from(job: PendingJob) -> Self {
        Self {
            step_ids: vec![job.step_id.clone()],
            step_id: job.step_id,
            context: job.context,
            runs: job.runs,
            cost: job.cost,
            duration: job.duration,
            depth: job.depth,
        }
    }
}

impl SkipReason {
    /// Human-readable reason.
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::BlueprintNotFound => "blueprint data not found",
            SkipReason::MaterialsUnavailable => "failed to get materials",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SkippedStep {
    /// Records a skip for a step.
    pub fn new(step: &PlanStep, reason: SkipReason) -> Self {
        Self {
            step_id: step.id.clone(),
            product_type_id: step.product_type_id,
            product_name: step.display_name(),
            reason,
        }
    }
}

fn add_optional<T: Default>(a: Option<T>, b: Option<T>, add: impl Fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(add(a.unwrap_or_default(), b.unwrap_or_default())),
    }
}
