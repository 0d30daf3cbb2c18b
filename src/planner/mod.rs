//! Demand propagation and job merging.
//!
//! Turns a plan tree and a target quantity into merged jobs, ordered
//! deepest first.
//!
//! # Algorithm
//!
//! 1. Index the plan and locate its root.
//! 2. Walk the tree depth-first, propagating material demand to child steps
//!    (see [`walk`](self) module docs).
//! 3. Merge interchangeable jobs and sort them deepest first.
//!
//! # Failure Semantics
//!
//! Only an empty plan or a plan without a root is an error. Steps whose
//! recipe or materials cannot be resolved are listed in
//! [`PlanOutcome::skipped`] and their subtree is not planned.
//!
//! # Example
//!
//! ```
//! use u_industry::formula::StandardFormulas;
//! use u_industry::models::{Material, PlanStep, Recipe};
//! use u_industry::planner::Planner;
//! use u_industry::resolver::RecipeBook;
//!
//! let book = RecipeBook::new()
//!     .with_recipe(Recipe::new(1, 100).with_time(600).with_output(10), vec![Material::new(200, 2)])
//!     .with_recipe(Recipe::new(2, 200).with_time(60), vec![]);
//! let steps = vec![
//!     PlanStep::new("root", 1, 100),
//!     PlanStep::new("part", 2, 200).with_parent("root"),
//! ];
//!
//! let formulas = StandardFormulas::new();
//! let outcome = Planner::new(&book, &formulas).plan(&steps, 25).unwrap();
//! assert_eq!(outcome.jobs[0].step_id, "part");
//! assert_eq!(outcome.jobs[0].runs, 6); // 3 root runs × 2 parts
//! assert_eq!(outcome.jobs[1].runs, 3);
//! ```

mod merge;
mod walk;

pub use merge::merge_jobs;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::PlanError;
use crate::formula::EconomicFormulas;
use crate::models::{MergedJob, PendingJob, PlanStep, SkippedStep};
use crate::resolver::RecipeResolver;
use crate::validation::validate_plan;
use walk::{PlanIndex, Walker};

/// Result of planning a production tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Merged jobs, deepest first.
    pub jobs: Vec<MergedJob>,
    /// Steps that could not be planned.
    pub skipped: Vec<SkippedStep>,
    /// Units produced per step id.
    pub production: HashMap<String, i64>,
    /// Depth per visited step id.
    pub depths: HashMap<String, u32>,
}

/// Pending jobs before merging, with the walk's diagnostics.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// One job per planned step, children before parents.
    pub jobs: Vec<PendingJob>,
    /// Steps that could not be planned.
    pub skipped: Vec<SkippedStep>,
    /// Units produced per step id.
    pub production: HashMap<String, i64>,
    /// Depth per visited step id.
    pub depths: HashMap<String, u32>,
}

/// Plans production trees against a recipe source and formula set.
#[derive(Debug)]
pub struct Planner<'a, R: ?Sized, F: ?Sized> {
    resolver: &'a R,
    formulas: &'a F,
}

impl<'a, R, F> Planner<'a, R, F>
where
    R: RecipeResolver + ?Sized,
    F: EconomicFormulas + ?Sized,
{
    /// Creates a planner.
    pub fn new(resolver: &'a R, formulas: &'a F) -> Self {
        Self { resolver, formulas }
    }

    /// Plans `quantity` units of the root product.
    pub fn plan(&self, steps: &[PlanStep], quantity: i64) -> Result<PlanOutcome, PlanError> {
        let walked = self.walk(steps, quantity)?;
        let jobs = merge_jobs(walked.jobs);
        debug!(
            merged = jobs.len(),
            skipped = walked.skipped.len(),
            "plan merged"
        );
        Ok(PlanOutcome {
            jobs,
            skipped: walked.skipped,
            production: walked.production,
            depths: walked.depths,
        })
    }

    /// Walks the plan without merging.
    pub fn walk(&self, steps: &[PlanStep], quantity: i64) -> Result<WalkOutcome, PlanError> {
        let index = PlanIndex::build(steps)?;
        if let Err(issues) = validate_plan(steps) {
            for issue in &issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        let walker = Walker {
            index: &index,
            resolver: self.resolver,
            formulas: self.formulas,
        };
        let branch = walker.visit(index.root(), quantity, 0);

        Ok(WalkOutcome {
            jobs: branch.jobs,
            skipped: branch.skipped,
            production: branch.production.into_iter().collect(),
            depths: branch.depths.into_iter().collect(),
        })
    }
}

impl PlanOutcome {
    /// Whether every visited step was planned.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Sum of known job costs.
    pub fn total_cost(&self) -> f64 {
        self.jobs.iter().filter_map(|j| j.cost).sum()
    }

    /// Sum of runs over all jobs.
    pub fn total_runs(&self) -> i64 {
        self.jobs.iter().fold(0i64, |acc, j| acc.saturating_add(j.runs))
    }

    /// Deepest job depth, or 0 for an empty plan.
    pub fn max_depth(&self) -> u32 {
        self.jobs.first().map(|j| j.depth).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::StandardFormulas;
    use crate::models::{ActivityKind, Material, Recipe, SkipReason, Skills};
    use crate::resolver::{RecipeBook, ResolveError};

    // Capital part (root) ← 2 × plate (mfg) ← 5 × alloy (reaction)
    //                     ← 3 × circuit (mfg) ← 1 × plate (mfg)
    fn sample_book() -> RecipeBook {
        RecipeBook::new()
            .with_recipe(
                Recipe::new(1, 100).with_time(3600).with_output(10),
                vec![Material::new(200, 2), Material::new(300, 3)],
            )
            .with_recipe(
                Recipe::new(2, 200).with_time(600),
                vec![Material::new(400, 5)],
            )
            .with_recipe(
                Recipe::new(3, 300).with_time(1200),
                vec![Material::new(200, 1)],
            )
            .with_recipe(
                Recipe::new(4, 400)
                    .with_activity(ActivityKind::Reaction)
                    .with_time(10_800)
                    .with_output(100),
                vec![Material::new(500, 100)],
            )
    }

    fn sample_steps() -> Vec<PlanStep> {
        vec![
            PlanStep::new("root", 1, 100).with_product_name("Capital Part"),
            PlanStep::new("plate", 2, 200).with_parent("root").with_product_name("Plate"),
            PlanStep::new("alloy", 4, 400)
                .with_parent("plate")
                .with_product_name("Alloy")
                .with_activity(ActivityKind::Reaction),
            PlanStep::new("circuit", 3, 300).with_parent("root").with_product_name("Circuit"),
            PlanStep::new("circuit_plate", 2, 200)
                .with_parent("circuit")
                .with_product_name("Plate"),
        ]
    }

    #[test]
    fn test_scenario_root_runs_ceiling() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let steps = vec![PlanStep::new("root", 1, 100)];
        let outcome = Planner::new(&book, &formulas).plan(&steps, 25).unwrap();

        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.jobs[0].runs, 3);
        assert_eq!(outcome.production["root"], 30);
        assert_eq!(outcome.depths["root"], 0);
    }

    #[test]
    fn test_demand_propagation_and_merge() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let outcome = Planner::new(&book, &formulas).plan(&sample_steps(), 25).unwrap();

        // root: 3 runs → plate 6, circuit 9 → circuit_plate 9 → plates merge to 15
        // plate (depth 1) 6 runs → alloy 30 units → 1 reaction run
        assert!(outcome.is_complete());
        assert_eq!(outcome.production["plate"], 6);
        assert_eq!(outcome.production["circuit"], 9);
        assert_eq!(outcome.production["circuit_plate"], 9);
        assert_eq!(outcome.production["alloy"], 100);

        let plates: Vec<&MergedJob> = outcome
            .jobs
            .iter()
            .filter(|j| j.context.blueprint_id == 2)
            .collect();
        assert_eq!(plates.len(), 1);
        assert_eq!(plates[0].runs, 15);
        assert_eq!(plates[0].depth, 2);
        assert_eq!(plates[0].step_id, "circuit_plate");
        assert_eq!(plates[0].duration, Some(15 * 600));

        assert_eq!(outcome.jobs.len(), 4);
        assert_eq!(outcome.total_runs(), 15 + 1 + 9 + 3);
        assert_eq!(outcome.max_depth(), 2);
    }

    #[test]
    fn test_jobs_sorted_deepest_first() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let outcome = Planner::new(&book, &formulas).plan(&sample_steps(), 100).unwrap();

        for pair in outcome.jobs.windows(2) {
            assert!(pair[0].depth >= pair[1].depth);
        }
        assert_eq!(outcome.jobs.last().unwrap().step_id, "root");
    }

    #[test]
    fn test_reaction_uses_reaction_duration() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let mut steps = sample_steps();
        for s in &mut steps {
            *s = s
                .clone()
                .with_efficiency(10, 20)
                .with_skills(Skills::uniform(5).with_reactions(0));
        }
        let outcome = Planner::new(&book, &formulas).plan(&steps, 25).unwrap();

        let alloy = outcome
            .jobs
            .iter()
            .find(|j| j.context.activity == ActivityKind::Reaction)
            .unwrap();
        // Reactions skill 0, no TE/industry bonuses: full base time.
        assert_eq!(alloy.duration, Some(alloy.runs * 10_800));

        let root = outcome.jobs.iter().find(|j| j.step_id == "root").unwrap();
        assert!(root.duration.unwrap() < root.runs * 3600);
    }

    #[test]
    fn test_missing_blueprint_skips_branch() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let mut steps = sample_steps();
        steps[1].blueprint_id = 99; // plate under root

        let outcome = Planner::new(&book, &formulas).plan(&steps, 25).unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].step_id, "plate");
        assert_eq!(outcome.skipped[0].reason, SkipReason::BlueprintNotFound);
        assert_eq!(outcome.skipped[0].product_name, "Plate");

        // Nothing below the skipped step is planned.
        assert!(!outcome.production.contains_key("plate"));
        assert!(!outcome.production.contains_key("alloy"));
        assert!(outcome
            .jobs
            .iter()
            .all(|j| j.context.activity != ActivityKind::Reaction));
        // The other branch is unaffected.
        assert_eq!(outcome.production["circuit_plate"], 9);
    }

    #[derive(Debug)]
    struct NoMaterials(RecipeBook);

    impl RecipeResolver for NoMaterials {
        fn resolve(
            &self,
            blueprint_id: u32,
            activity: ActivityKind,
        ) -> Result<Option<Recipe>, ResolveError> {
            self.0.resolve(blueprint_id, activity)
        }

        fn materials(&self, _: u32, _: ActivityKind) -> Result<Vec<Material>, ResolveError> {
            Err(ResolveError::Unavailable {
                detail: "offline".into(),
            })
        }
    }

    #[test]
    fn test_material_failure_records_production_then_skips() {
        let resolver = NoMaterials(sample_book());
        let formulas = StandardFormulas::new();
        let outcome = Planner::new(&resolver, &formulas)
            .plan(&sample_steps(), 25)
            .unwrap();

        assert!(outcome.jobs.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].reason, SkipReason::MaterialsUnavailable);
        assert_eq!(outcome.production["root"], 30);
    }

    #[test]
    fn test_structural_errors() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let planner = Planner::new(&book, &formulas);

        assert_eq!(planner.plan(&[], 1).unwrap_err(), PlanError::EmptyPlan);

        let rootless = vec![PlanStep::new("a", 1, 100).with_parent("ghost")];
        assert_eq!(planner.plan(&rootless, 1).unwrap_err(), PlanError::NoRoot);
    }

    #[test]
    fn test_unmatched_child_not_visited() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let steps = vec![
            PlanStep::new("root", 1, 100),
            // Builds item 999, which root does not consume.
            PlanStep::new("stray", 2, 999).with_parent("root"),
        ];
        let outcome = Planner::new(&book, &formulas).plan(&steps, 10).unwrap();
        assert_eq!(outcome.jobs.len(), 1);
        assert!(!outcome.depths.contains_key("stray"));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let book = sample_book();
        let formulas = StandardFormulas::new().with_adjusted_price(500, 12.5);
        let planner = Planner::new(&book, &formulas);

        let a = planner.plan(&sample_steps(), 40).unwrap();
        let b = planner.plan(&sample_steps(), 40).unwrap();
        assert_eq!(a.jobs, b.jobs);
        assert_eq!(a.skipped, b.skipped);
        assert_eq!(a.production, b.production);
    }

    #[test]
    fn test_walk_keeps_unmerged_jobs() {
        let book = sample_book();
        let formulas = StandardFormulas::new();
        let walked = Planner::new(&book, &formulas)
            .walk(&sample_steps(), 25)
            .unwrap();
        assert_eq!(walked.jobs.len(), 5);
        // Post-order: children are emitted before their parent.
        assert_eq!(walked.jobs.last().unwrap().step_id, "root");
    }

    #[test]
    fn test_huge_demand_saturates() {
        use crate::scheduler::{MakespanEstimator, SlotAssigner};
        use crate::models::WorkerCapacity;

        let book = RecipeBook::new()
            .with_recipe(
                Recipe::new(1, 100).with_time(3600),
                vec![Material::new(200, 100_000_000)],
            )
            .with_recipe(Recipe::new(2, 200).with_time(600).with_output(10), vec![]);
        let steps = vec![
            PlanStep::new("root", 1, 100),
            PlanStep::new("part", 2, 200).with_parent("root"),
        ];
        let formulas = StandardFormulas::new();

        let outcome = Planner::new(&book, &formulas)
            .plan(&steps, 1_000_000_000_000)
            .unwrap();

        assert_eq!(outcome.jobs.len(), 2);
        let part = &outcome.jobs[0];
        assert_eq!(part.step_id, "part");
        assert_eq!(part.runs, i64::MAX / 10 + 1);
        assert_eq!(part.duration, Some(i64::MAX));
        assert_eq!(outcome.production["part"], i64::MAX);
        assert_eq!(outcome.production["root"], 1_000_000_000_000);
        assert_eq!(outcome.total_runs(), part.runs + 1_000_000_000_000);

        let pool = vec![WorkerCapacity::new("c1").with_manufacturing_slots(2, 0)];
        let allocation = SlotAssigner::new(&formulas).assign(&outcome.jobs, &pool);
        let part_runs: i64 = allocation.fragments_of_job(0).iter().map(|f| f.runs).sum();
        assert_eq!(part_runs, part.runs);
        assert_eq!(MakespanEstimator::new().estimate(&allocation.fragments, &pool), i64::MAX);
    }
}
