//! Slot-constrained job assignment.
//!
//! # Algorithm
//!
//! 1. Take the first `max_workers` workers of the pool, in supplied order.
//! 2. Snapshot each worker's free slots per activity as the baseline.
//! 3. Walk jobs in order (deepest first). When the depth changes, reset the
//!    working slot table to the baseline: shallower work only starts after
//!    the deeper level has finished and released its slots.
//! 4. Split each job across every worker with a free slot for its activity:
//!    `ceil(runs / k)` runs each until the runs are exhausted. Every eligible
//!    worker consumes one slot.
//! 5. A job with no eligible worker becomes one unassigned fragment.
//! 6. Fragment durations are recomputed for the assigned worker's skills.
//!
//! The caller's worker records are never modified; slot counters live in a
//! private table indexed by pool position.
//!
//! # Complexity
//! O(j · w) where j = jobs, w = active workers.

use tracing::{debug, warn};

use crate::formula::EconomicFormulas;
use crate::models::{Allocation, AssignedFragment, Assignee, MergedJob, WorkerCapacity};

/// Distributes merged jobs over a worker pool under slot limits.
///
/// # Example
///
/// ```
/// use u_industry::formula::StandardFormulas;
/// use u_industry::models::{Assignee, WorkerCapacity};
/// use u_industry::scheduler::SlotAssigner;
///
/// let formulas = StandardFormulas::new();
/// let pool = vec![WorkerCapacity::new("c1").with_manufacturing_slots(1, 0)];
/// let allocation = SlotAssigner::new(&formulas).assign(&[], &pool);
/// assert!(allocation.is_fully_assigned());
/// ```
#[derive(Debug, Clone)]
pub struct SlotAssigner<'a, F: ?Sized> {
    formulas: &'a F,
    max_workers: Option<usize>,
}

impl<'a, F: EconomicFormulas + ?Sized> SlotAssigner<'a, F> {
    /// Creates an assigner using the whole pool.
    pub fn new(formulas: &'a F) -> Self {
        Self {
            formulas,
            max_workers: None,
        }
    }

    /// Limits the number of workers taken from the front of the pool.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Assigns jobs (deepest first) to workers.
    pub fn assign(&self, jobs: &[MergedJob], pool: &[WorkerCapacity]) -> Allocation {
        let active = self.active_pool(pool);
        let baseline: Vec<[u32; 2]> = active.iter().map(WorkerCapacity::available_table).collect();
        let mut free = baseline.clone();
        let mut current_depth: Option<u32> = None;
        let mut allocation = Allocation::new();

        for (job_index, job) in jobs.iter().enumerate() {
            if current_depth != Some(job.depth) {
                free.clone_from(&baseline);
                current_depth = Some(job.depth);
            }

            let slot = job.activity().index();
            let eligible: Vec<usize> = (0..active.len()).filter(|&i| free[i][slot] > 0).collect();

            if eligible.is_empty() {
                warn!(
                    job = job_index,
                    product = %job.context.product_name,
                    activity = %job.activity(),
                    runs = job.runs,
                    "no free slot; job left unassigned"
                );
                allocation.add_fragment(fragment(
                    job_index,
                    job,
                    job.runs,
                    job.duration,
                    Assignee::Unassigned,
                ));
                continue;
            }

            let shares = split_runs(job.runs, eligible.len());
            for (position, &worker_index) in eligible.iter().enumerate() {
                free[worker_index][slot] -= 1;
                let Some(&runs) = shares.get(position) else {
                    continue;
                };
                let worker = &active[worker_index];
                let duration = self.fragment_duration(job, worker, runs);
                allocation.add_fragment(fragment(
                    job_index,
                    job,
                    runs,
                    duration,
                    Assignee::worker(&worker.id),
                ));
            }

            debug!(
                job = job_index,
                depth = job.depth,
                workers = shares.len(),
                runs = job.runs,
                "job assigned"
            );
        }

        allocation
    }

    fn active_pool<'p>(&self, pool: &'p [WorkerCapacity]) -> &'p [WorkerCapacity] {
        let n = self.max_workers.unwrap_or(pool.len()).min(pool.len());
        &pool[..n]
    }

    /// Duration of `runs` runs of `job` for `worker`.
    ///
    /// Without a base run time, the job's own estimate is scaled by run share.
    fn fragment_duration(&self, job: &MergedJob, worker: &WorkerCapacity, runs: i64) -> Option<i64> {
        match job.context.base_time_seconds {
            Some(_) => job.activity().duration_model().job_seconds(
                self.formulas,
                &job.context,
                &worker.skills,
                runs,
            ),
            None => job.duration.map(|d| scale_ceil(d, runs, job.runs)),
        }
    }
}

/// Splits `total` runs over `k` workers: `ceil(total / k)` each until the
/// runs run out. Shares are positive and sum to `total`.
pub fn split_runs(total: i64, k: usize) -> Vec<i64> {
    if total <= 0 || k == 0 {
        return Vec::new();
    }
    let k = k as i64;
    let per = total / k + i64::from(total % k != 0);
    let mut remaining = total;
    let mut shares = Vec::with_capacity(k as usize);
    while remaining > 0 {
        let share = per.min(remaining);
        shares.push(share);
        remaining -= share;
    }
    shares
}

/// `ceil(value × part / whole)`, or `value` when `whole` is not positive.
fn scale_ceil(value: i64, part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return value;
    }
    let scaled = i128::from(value) * i128::from(part);
    let whole = i128::from(whole);
    let q = scaled / whole;
    let q = if scaled % whole > 0 { q + 1 } else { q };
    q as i64
}

fn fragment(
    job_index: usize,
    job: &MergedJob,
    runs: i64,
    duration: Option<i64>,
    assignee: Assignee,
) -> AssignedFragment {
    AssignedFragment {
        job_index,
        blueprint_id: job.context.blueprint_id,
        product_name: job.context.product_name.clone(),
        activity: job.activity(),
        runs,
        duration,
        depth: job.depth,
        assignee,
    }
}
