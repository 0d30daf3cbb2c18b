//! Makespan estimation for an allocation.
//!
//! # Algorithm
//!
//! Depths run strictly one after another, deepest first. Within a depth,
//! every worker × activity group runs in parallel with the others, and each
//! group packs its fragments onto as many lanes as the worker has slots for
//! that activity, using Longest Processing Time first (LPT):
//!
//! 1. Sort durations descending.
//! 2. Place each on the least loaded lane (lowest index on ties).
//! 3. Group completion = heaviest lane.
//!
//! Depth time is the slowest group; the makespan is the sum over depths.
//! Unassigned fragments at a depth share a single lane.
//!
//! # Complexity
//! O(f log f + f · s) where f = fragments, s = max slots per worker.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{ActivityKind, AssignedFragment, Assignee, WorkerCapacity};

/// Time spent on one depth level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSpan {
    /// Depth (root = 0).
    pub depth: u32,
    /// Seconds until the slowest group at this depth finishes.
    pub seconds: i64,
    /// Assignee of the slowest group (first in assignee order on ties).
    pub bottleneck: Option<Assignee>,
}

/// Makespan with per-depth detail, deepest depth first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakespanBreakdown {
    /// Total seconds (sum of depth spans).
    pub total_seconds: i64,
    /// Per-depth spans, deepest first.
    pub depths: Vec<DepthSpan>,
}

/// Estimates wall-clock time of an allocation.
#[derive(Debug, Clone, Default)]
pub struct MakespanEstimator;

impl MakespanEstimator {
    /// Creates an estimator.
    pub fn new() -> Self {
        Self
    }

    /// Total makespan in seconds.
    pub fn estimate(&self, fragments: &[AssignedFragment], pool: &[WorkerCapacity]) -> i64 {
        self.breakdown(fragments, pool).total_seconds
    }

    /// Makespan split by depth.
    ///
    /// A worker's manufacturing and reaction fragments form two separate
    /// groups that run in parallel, each on its own slot lanes. They are not
    /// packed together as one per-worker group.
    pub fn breakdown(
        &self,
        fragments: &[AssignedFragment],
        pool: &[WorkerCapacity],
    ) -> MakespanBreakdown {
        let workers: HashMap<&str, &WorkerCapacity> =
            pool.iter().map(|w| (w.id.as_str(), w)).collect();

        // depth → (assignee, activity) → durations
        let mut levels: BTreeMap<u32, BTreeMap<(Assignee, Option<ActivityKind>), Vec<i64>>> =
            BTreeMap::new();
        for fragment in fragments {
            let activity = match fragment.assignee {
                Assignee::Worker(_) => Some(fragment.activity),
                Assignee::Unassigned => None,
            };
            levels
                .entry(fragment.depth)
                .or_default()
                .entry((fragment.assignee.clone(), activity))
                .or_default()
                .push(fragment.duration_or_zero());
        }

        let mut breakdown = MakespanBreakdown::default();
        for (depth, groups) in levels.into_iter().rev() {
            let mut span = DepthSpan {
                depth,
                seconds: 0,
                bottleneck: None,
            };
            for ((assignee, activity), durations) in groups {
                let lanes = lane_count(&workers, &assignee, activity);
                let completion = lpt_completion(durations, lanes);
                if span.bottleneck.is_none() || completion > span.seconds {
                    span.seconds = completion;
                    span.bottleneck = Some(assignee);
                }
            }
            breakdown.total_seconds = breakdown.total_seconds.saturating_add(span.seconds);
            breakdown.depths.push(span);
        }
        breakdown
    }
}

/// Parallel lanes for a group: the worker's configured slots, at least 1.
fn lane_count(
    workers: &HashMap<&str, &WorkerCapacity>,
    assignee: &Assignee,
    activity: Option<ActivityKind>,
) -> usize {
    let (Some(id), Some(activity)) = (assignee.worker_id(), activity) else {
        return 1;
    };
    workers
        .get(id)
        .map(|w| w.slots(activity).max)
        .filter(|&max| max > 0)
        .map_or(1, |max| max as usize)
}

/// LPT completion time of `durations` on `lanes` parallel lanes.
pub fn lpt_completion(mut durations: Vec<i64>, lanes: usize) -> i64 {
    let lanes = lanes.max(1);
    durations.sort_unstable_by(|a, b| b.cmp(a));

    let mut loads = vec![0i64; lanes.min(durations.len().max(1))];
    for d in durations {
        let mut target = 0;
        for (i, &load) in loads.iter().enumerate() {
            if load < loads[target] {
                target = i;
            }
        }
        loads[target] = loads[target].saturating_add(d.max(0));
    }
    loads.into_iter().max().unwrap_or(0)
}
