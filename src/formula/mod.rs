//! Economic formulas and duration models.
//!
//! The planner and the schedulers never compute efficiency bonuses or job
//! costs themselves. They ask an [`EconomicFormulas`] implementation, which
//! callers can replace to match their own game data or tax rules.
//! [`StandardFormulas`] implements the conventional industry formulas.
//!
//! # Duration Models
//!
//! Manufacturing and reactions use different duration formulas. The split is
//! expressed once, in [`DurationModel`], and reused by both the plan walk
//! (plan-level estimate) and the slot assigner (per-worker recomputation).
//!
//! ```
//! use u_industry::formula::{DurationModel, EconomicFormulas, StandardFormulas};
//! use u_industry::models::{EfficiencyLevels, Facility, Skills};
//!
//! let formulas = StandardFormulas::new();
//! let skills = Skills::uniform(5);
//! let facility = Facility::station();
//! let levels = EfficiencyLevels::new(10, 20);
//!
//! let blueprint = DurationModel::Blueprint.time_factor(&formulas, levels, &skills, &facility);
//! let reaction = DurationModel::Reaction.time_factor(&formulas, levels, &skills, &facility);
//! assert!(blueprint < reaction); // TE and industry skills only apply to manufacturing
//! ```

mod standard;

pub use standard::StandardFormulas;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::{
    ActivityKind, EfficiencyLevels, Facility, JobContext, Material, Recipe, Skills,
};

/// Combined material and time multipliers for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyFactors {
    /// Multiplier on material consumption (≤ 1.0 with bonuses).
    pub material: f64,
    /// Multiplier on run time (≤ 1.0 with bonuses).
    pub time: f64,
}

/// Cost and duration estimate for a batch of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JobEstimate {
    /// Job installation cost. `None` = not estimable.
    pub cost: Option<f64>,
    /// Total duration (seconds). `None` = not estimable.
    pub duration: Option<i64>,
}

/// Industry arithmetic consumed by the planner and schedulers.
///
/// Implementations must be pure: identical inputs yield identical outputs.
pub trait EconomicFormulas: Send + Sync + Debug {
    /// Material multiplier from blueprint ME and facility bonuses.
    fn material_factor(
        &self,
        levels: EfficiencyLevels,
        facility: &Facility,
        activity: ActivityKind,
    ) -> f64;

    /// Manufacturing time multiplier: blueprint TE, industry skills, facility.
    fn time_factor(&self, levels: EfficiencyLevels, skills: &Skills, facility: &Facility) -> f64;

    /// Reaction time multiplier: reactions skill and facility only.
    fn reaction_time_factor(&self, skills: &Skills, facility: &Facility) -> f64;

    /// Cost and duration of `runs` runs of a recipe.
    fn estimate(
        &self,
        runs: i64,
        recipe: &Recipe,
        materials: &[Material],
        context: &JobContext,
        skills: &Skills,
    ) -> JobEstimate;

    /// Material and time multipliers for a step.
    fn combined_factors(
        &self,
        levels: EfficiencyLevels,
        skills: &Skills,
        facility: &Facility,
        activity: ActivityKind,
    ) -> EfficiencyFactors {
        EfficiencyFactors {
            material: self.material_factor(levels, facility, activity),
            time: activity
                .duration_model()
                .time_factor(self, levels, skills, facility),
        }
    }

    /// Duration of one run after the time multiplier.
    ///
    /// Non-positive base times yield 0; otherwise at least one second.
    fn cycle_seconds(&self, base_seconds: i64, time_factor: f64) -> i64 {
        if base_seconds <= 0 {
            return 0;
        }
        (ceil_rounded(base_seconds as f64 * time_factor) as i64).max(1)
    }

    /// Units of one material needed for `runs` runs.
    ///
    /// Never less than one unit per run.
    fn batch_quantity(&self, runs: i64, base_quantity: i64, material_factor: f64) -> i64 {
        let runs = runs.max(0);
        let needed = ceil_rounded(runs as f64 * base_quantity as f64 * material_factor) as i64;
        needed.max(runs)
    }
}

/// Duration formula family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationModel {
    /// Blueprint manufacturing: TE, Industry, Advanced Industry, facility.
    Blueprint,
    /// Reactions: Reactions skill and facility.
    Reaction,
}

impl DurationModel {
    /// Time multiplier under this model.
    pub fn time_factor<F: EconomicFormulas + ?Sized>(
        self,
        formulas: &F,
        levels: EfficiencyLevels,
        skills: &Skills,
        facility: &Facility,
    ) -> f64 {
        match self {
            DurationModel::Blueprint => formulas.time_factor(levels, skills, facility),
            DurationModel::Reaction => formulas.reaction_time_factor(skills, facility),
        }
    }

    /// Duration of `runs` runs of a job for the given skills.
    ///
    /// Returns `None` when the job has no usable base run time.
    pub fn job_seconds<F: EconomicFormulas + ?Sized>(
        self,
        formulas: &F,
        context: &JobContext,
        skills: &Skills,
        runs: i64,
    ) -> Option<i64> {
        let base = context.base_time_seconds?;
        let factor = self.time_factor(formulas, context.efficiency, skills, &context.facility);
        Some(formulas.cycle_seconds(base, factor).saturating_mul(runs.max(0)))
    }
}

/// Ceiling after rounding to two decimals.
///
/// Products like `10 × 10 × 0.9` land at `90.00000000000001`; a plain ceiling
/// would add a spurious unit.
pub(crate) fn ceil_rounded(value: f64) -> f64 {
    ((value * 100.0).round() / 100.0).ceil()
}
