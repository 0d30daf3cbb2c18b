//! Demand propagation over the plan tree.
//!
//! # Algorithm
//!
//! Depth-first from the root with the target quantity:
//! 1. Resolve the step's recipe (skip the branch if missing).
//! 2. `runs = max(1, ceil(quantity / output_per_run))`.
//! 3. Resolve materials (skip the branch if unavailable).
//! 4. For each child building a consumed material, request
//!    `batch_quantity(runs, base_qty, material_factor)` units at `depth + 1`.
//! 5. Estimate cost/duration and emit a pending job.
//!
//! Each visit returns its own [`Branch`]; callers absorb child branches, so
//! no accumulator is shared across recursive calls.
//!
//! # Complexity
//! O(n · m) where n = steps, m = materials per recipe.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::PlanError;
use crate::formula::{DurationModel, EconomicFormulas};
use crate::models::{JobContext, PendingJob, PlanStep, SkipReason, SkippedStep};
use crate::resolver::RecipeResolver;

/// Parent → children adjacency and the root of a plan.
#[derive(Debug)]
pub(crate) struct PlanIndex<'s> {
    root: &'s PlanStep,
    children: HashMap<&'s str, Vec<&'s PlanStep>>,
    max_depth: u32,
}

impl<'s> PlanIndex<'s> {
    /// Indexes steps. Fails on an empty plan or a plan without root.
    ///
    /// With several roots the first one in input order is used.
    pub(crate) fn build(steps: &'s [PlanStep]) -> Result<Self, PlanError> {
        if steps.is_empty() {
            return Err(PlanError::EmptyPlan);
        }

        let mut root: Option<&PlanStep> = None;
        let mut children: HashMap<&str, Vec<&PlanStep>> = HashMap::new();

        for step in steps {
            match &step.parent_id {
                Some(parent) => children.entry(parent.as_str()).or_default().push(step),
                None if root.is_none() => root = Some(step),
                None => warn!(
                    step = %step.id,
                    "plan has more than one root; ignoring extra root"
                ),
            }
        }

        let root = root.ok_or(PlanError::NoRoot)?;
        Ok(Self {
            root,
            children,
            // A tree of n steps is at most n - 1 levels deep.
            max_depth: steps.len().saturating_sub(1) as u32,
        })
    }

    /// The root step.
    pub(crate) fn root(&self) -> &'s PlanStep {
        self.root
    }

    /// Children of a step, in input order.
    pub(crate) fn children_of(&self, step_id: &str) -> &[&'s PlanStep] {
        self.children.get(step_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Everything one subtree contributed.
#[derive(Debug, Default)]
pub(crate) struct Branch {
    pub(crate) jobs: Vec<PendingJob>,
    pub(crate) skipped: Vec<SkippedStep>,
    pub(crate) production: Vec<(String, i64)>,
    pub(crate) depths: Vec<(String, u32)>,
}

impl Branch {
    fn absorb(&mut self, other: Branch) {
        self.jobs.extend(other.jobs);
        self.skipped.extend(other.skipped);
        self.production.extend(other.production);
        self.depths.extend(other.depths);
    }

    fn skip(mut self, step: &PlanStep, reason: SkipReason) -> Self {
        warn!(step = %step.id, product = %step.display_name(), %reason, "skipping plan branch");
        self.skipped.push(SkippedStep::new(step, reason));
        self
    }
}

/// Runs needed for `quantity` units at `output_per_run` units per run.
///
/// At least one run; a non-positive output counts as one unit per run.
pub(crate) fn required_runs(quantity: i64, output_per_run: i64) -> i64 {
    let output = output_per_run.max(1) as u64;
    let quantity = quantity.max(0) as u64;
    // quantity <= i64::MAX and output >= 1, so the quotient fits.
    (quantity.div_ceil(output) as i64).max(1)
}

/// Read-only inputs shared by every visit.
pub(crate) struct Walker<'a, 's, R: ?Sized, F: ?Sized> {
    pub(crate) index: &'a PlanIndex<'s>,
    pub(crate) resolver: &'a R,
    pub(crate) formulas: &'a F,
}

impl<R, F> Walker<'_, '_, R, F>
where
    R: RecipeResolver + ?Sized,
    F: EconomicFormulas + ?Sized,
{
    /// Evaluates `step` for `quantity` units and recurses into its children.
    pub(crate) fn visit(&self, step: &PlanStep, quantity: i64, depth: u32) -> Branch {
        let mut branch = Branch::default();
        if depth > self.index.max_depth {
            warn!(step = %step.id, depth, "plan nesting exceeds step count; stopping descent");
            return branch;
        }
        branch.depths.push((step.id.clone(), depth));

        let recipe = match self.resolver.resolve(step.blueprint_id, step.activity) {
            Ok(Some(recipe)) => recipe,
            Ok(None) => return branch.skip(step, SkipReason::BlueprintNotFound),
            Err(err) => {
                debug!(step = %step.id, error = %err, "recipe lookup failed");
                return branch.skip(step, SkipReason::BlueprintNotFound);
            }
        };

        let output = recipe.effective_output();
        let runs = required_runs(quantity, output);
        branch.production.push((step.id.clone(), runs.saturating_mul(output)));

        let materials = match self.resolver.materials(step.blueprint_id, step.activity) {
            Ok(materials) => materials,
            Err(err) => {
                debug!(step = %step.id, error = %err, "material lookup failed");
                return branch.skip(step, SkipReason::MaterialsUnavailable);
            }
        };

        let material_factor =
            self.formulas
                .material_factor(step.efficiency, &step.facility, step.activity);

        let mut base_quantities: HashMap<u32, i64> = HashMap::new();
        for m in &materials {
            base_quantities.entry(m.type_id).or_insert(m.quantity);
        }

        for child in self.index.children_of(&step.id) {
            if let Some(&base_qty) = base_quantities.get(&child.product_type_id) {
                let needed = self.formulas.batch_quantity(runs, base_qty, material_factor);
                branch.absorb(self.visit(child, needed, depth + 1));
            }
        }

        let context = JobContext::from_step(step, &recipe);
        let mut estimate = self
            .formulas
            .estimate(runs, &recipe, &materials, &context, &step.skills);
        // Reactions get their own duration model; the generic estimate
        // assumes blueprint time efficiency.
        if step.activity.duration_model() == DurationModel::Reaction {
            estimate.duration =
                DurationModel::Reaction.job_seconds(self.formulas, &context, &step.skills, runs);
        }

        debug!(
            step = %step.id,
            quantity,
            runs,
            depth,
            duration = ?estimate.duration,
            "planned step"
        );

        branch.jobs.push(PendingJob {
            step_id: step.id.clone(),
            context,
            runs,
            cost: estimate.cost,
            duration: estimate.duration,
            depth,
        });
        branch
    }
}
