//! What-if comparison of worker pool sizes.
//!
//! Runs the assigner and the makespan estimator once per candidate size and
//! reports the resulting makespan and per-worker load, so a caller can see
//! where adding workers stops paying off.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MakespanEstimator, SlotAssigner};
use crate::formula::EconomicFormulas;
use crate::models::{Allocation, Assignee, MergedJob, WorkerCapacity};

/// Candidate pool sizes to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Number of workers taken from the front of the pool.
    pub pool_sizes: Vec<usize>,
}

impl PreviewRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate size.
    pub fn with_size(mut self, workers: usize) -> Self {
        self.pool_sizes.push(workers);
        self
    }

    /// Every size from 1 to `max` inclusive.
    pub fn up_to(max: usize) -> Self {
        Self {
            pool_sizes: (1..=max).collect(),
        }
    }
}

/// Load carried by one assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerWorkload {
    pub assignee: Assignee,
    pub fragments: usize,
    pub runs: i64,
    /// Sum of fragment durations, ignoring parallel slots.
    pub busy_seconds: i64,
}

/// Outcome for one pool size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolPreview {
    pub workers: usize,
    pub makespan_seconds: i64,
    pub unassigned_runs: i64,
    pub workloads: Vec<WorkerWorkload>,
}

/// Evaluates every requested pool size, smallest first.
///
/// Sizes above the pool length are clamped and duplicates collapse.
pub fn preview<F: EconomicFormulas + ?Sized>(
    jobs: &[MergedJob],
    pool: &[WorkerCapacity],
    request: &PreviewRequest,
    formulas: &F,
) -> Vec<PoolPreview> {
    let mut sizes: Vec<usize> = request
        .pool_sizes
        .iter()
        .map(|&n| n.min(pool.len()))
        .collect();
    sizes.sort_unstable();
    sizes.dedup();

    let estimator = MakespanEstimator::new();
    sizes
        .into_iter()
        .map(|workers| {
            let active = &pool[..workers];
            let allocation = SlotAssigner::new(formulas)
                .with_max_workers(workers)
                .assign(jobs, pool);
            let makespan_seconds = estimator.estimate(&allocation.fragments, active);
            debug!(workers, makespan_seconds, unassigned = allocation.unassigned_runs, "pool preview");
            PoolPreview {
                workers,
                makespan_seconds,
                unassigned_runs: allocation.unassigned_runs,
                workloads: workloads(&allocation, active),
            }
        })
        .collect()
}

fn workloads(allocation: &Allocation, active: &[WorkerCapacity]) -> Vec<WorkerWorkload> {
    let mut assignees: Vec<Assignee> = active.iter().map(|w| Assignee::worker(&w.id)).collect();
    if allocation.fragments.iter().any(|f| f.assignee.is_unassigned()) {
        assignees.push(Assignee::Unassigned);
    }

    assignees
        .into_iter()
        .map(|assignee| {
            let mine = allocation.fragments_for(&assignee);
            WorkerWorkload {
                fragments: mine.len(),
                runs: mine.iter().fold(0i64, |acc, f| acc.saturating_add(f.runs)),
                busy_seconds: mine
                    .iter()
                    .fold(0i64, |acc, f| acc.saturating_add(f.duration_or_zero())),
                assignee,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::StandardFormulas;
    use crate::models::{JobContext, PlanStep, Recipe};

    fn job(blueprint_id: u32, runs: i64, depth: u32) -> MergedJob {
        let step = PlanStep::new(format!("s{blueprint_id}"), blueprint_id, blueprint_id);
        let recipe = Recipe::new(blueprint_id, blueprint_id).with_time(60);
        MergedJob {
            step_id: step.id.clone(),
            context: JobContext::from_step(&step, &recipe),
            runs,
            cost: None,
            duration: Some(runs * 60),
            depth,
            step_ids: vec![step.id],
        }
    }

    fn pool() -> Vec<WorkerCapacity> {
        (1..=3)
            .map(|i| WorkerCapacity::new(format!("c{i}")).with_manufacturing_slots(1, 0))
            .collect()
    }

    #[test]
    fn test_request_builders() {
        assert_eq!(PreviewRequest::up_to(3).pool_sizes, vec![1, 2, 3]);
        assert_eq!(PreviewRequest::new().with_size(2).pool_sizes, vec![2]);
    }

    #[test]
    fn test_sizes_clamped_sorted_deduplicated() {
        let formulas = StandardFormulas::new();
        let request = PreviewRequest {
            pool_sizes: vec![5, 1, 3, 1],
        };
        let previews = preview(&[job(1, 6, 0)], &pool(), &request, &formulas);
        let sizes: Vec<usize> = previews.iter().map(|p| p.workers).collect();
        assert_eq!(sizes, vec![1, 3]);
    }

    #[test]
    fn test_more_workers_shorten_makespan() {
        let formulas = StandardFormulas::new();
        let previews = preview(&[job(1, 6, 0)], &pool(), &PreviewRequest::up_to(3), &formulas);

        let spans: Vec<i64> = previews.iter().map(|p| p.makespan_seconds).collect();
        assert_eq!(spans, vec![360, 180, 120]);
        assert!(previews.iter().all(|p| p.unassigned_runs == 0));
    }

    #[test]
    fn test_workloads_in_pool_order_then_unassigned() {
        let formulas = StandardFormulas::new();
        let jobs = vec![job(1, 4, 0), job(2, 2, 0)];
        let previews = preview(&jobs, &pool(), &PreviewRequest::new().with_size(1), &formulas);

        let p = &previews[0];
        assert_eq!(p.unassigned_runs, 2);
        let names: Vec<String> = p.workloads.iter().map(|w| w.assignee.to_string()).collect();
        assert_eq!(names, vec!["c1", "<unassigned>"]);
        assert_eq!(p.workloads[0].runs, 4);
        assert_eq!(p.workloads[0].busy_seconds, 240);
        assert_eq!(p.workloads[1].fragments, 1);
    }

    #[test]
    fn test_zero_size_and_empty_pool() {
        let formulas = StandardFormulas::new();
        let previews = preview(&[job(1, 2, 0)], &[], &PreviewRequest::up_to(2), &formulas);
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].workers, 0);
        assert_eq!(previews[0].unassigned_runs, 2);
        assert_eq!(previews[0].makespan_seconds, 120);
    }

    #[test]
    fn test_no_sizes_requested() {
        let formulas = StandardFormulas::new();
        assert!(preview(&[job(1, 2, 0)], &pool(), &PreviewRequest::new(), &formulas).is_empty());
    }
}
