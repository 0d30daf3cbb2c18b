//! Allocation (assignment result) model.
//!
//! An allocation splits merged jobs into per-worker fragments. Jobs that
//! found no free slot appear as a single fragment owned by
//! [`Assignee::Unassigned`] so that no demand is silently dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ActivityKind;

/// Who a fragment is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignee {
    /// A worker from the pool, by id.
    Worker(String),
    /// No worker had a free slot.
    Unassigned,
}

/// One worker's share of a merged job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedFragment {
    /// Index of the originating job in the assigner's input.
    pub job_index: usize,
    /// Blueprint of the originating job.
    pub blueprint_id: u32,
    /// Product name of the originating job.
    pub product_name: String,
    /// Activity kind.
    pub activity: ActivityKind,
    /// Runs in this fragment.
    pub runs: i64,
    /// Duration for this assignee (seconds). `None` = not estimable.
    pub duration: Option<i64>,
    /// Depth of the originating job.
    pub depth: u32,
    /// Assigned worker.
    pub assignee: Assignee,
}

/// Result of slot-constrained assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Fragments in assignment order.
    pub fragments: Vec<AssignedFragment>,
    /// Runs that could not be placed on any worker.
    pub unassigned_runs: i64,
}

impl Assignee {
    /// Creates a worker assignee.
    pub fn worker(id: impl Into<String>) -> Self {
        Assignee::Worker(id.into())
    }

    /// Worker id, or `None` for the sentinel.
    pub fn worker_id(&self) -> Option<&str> {
        match self {
            Assignee::Worker(id) => Some(id),
            Assignee::Unassigned => None,
        }
    }

    /// Whether this is the unassigned sentinel.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Assignee::Unassigned)
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignee::Worker(id) => f.write_str(id),
            Assignee::Unassigned => f.write_str("<unassigned>"),
        }
    }
}

impl AssignedFragment {
    /// Duration with absent estimates counted as zero.
    #[inline]
    pub fn duration_or_zero(&self) -> i64 {
        self.duration.unwrap_or(0)
    }
}

impl Allocation {
    /// Creates an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment.
    pub fn add_fragment(&mut self, fragment: AssignedFragment) {
        if fragment.assignee.is_unassigned() {
            self.unassigned_runs = self.unassigned_runs.saturating_add(fragment.runs);
        }
        self.fragments.push(fragment);
    }

    /// Whether every run found a worker.
    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned_runs == 0
    }

    /// Fragments belonging to an assignee.
    pub fn fragments_for(&self, assignee: &Assignee) -> Vec<&AssignedFragment> {
        self.fragments
            .iter()
            .filter(|f| &f.assignee == assignee)
            .collect()
    }

    /// Fragments originating from a job.
    pub fn fragments_of_job(&self, job_index: usize) -> Vec<&AssignedFragment> {
        self.fragments
            .iter()
            .filter(|f| f.job_index == job_index)
            .collect()
    }

    /// Total runs placed on an assignee.
    pub fn runs_for(&self, assignee: &Assignee) -> i64 {
        self.fragments_for(assignee)
            .iter()
            .fold(0i64, |acc, f| acc.saturating_add(f.runs))
    }

    /// Number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(job_index: usize, runs: i64, assignee: Assignee) -> AssignedFragment {
        AssignedFragment {
            job_index,
            blueprint_id: 1,
            product_name: "Widget".into(),
            activity: ActivityKind::Manufacturing,
            runs,
            duration: Some(runs * 60),
            depth: 0,
            assignee,
        }
    }

    fn sample_allocation() -> Allocation {
        let mut a = Allocation::new();
        a.add_fragment(fragment(0, 5, Assignee::worker("c1")));
        a.add_fragment(fragment(0, 3, Assignee::worker("c2")));
        a.add_fragment(fragment(1, 7, Assignee::worker("c1")));
        a.add_fragment(fragment(2, 4, Assignee::Unassigned));
        a
    }

    #[test]
    fn test_unassigned_runs_tracked() {
        let a = sample_allocation();
        assert_eq!(a.unassigned_runs, 4);
        assert!(!a.is_fully_assigned());
        assert_eq!(a.fragment_count(), 4);
    }

    #[test]
    fn test_runs_for_assignee() {
        let a = sample_allocation();
        assert_eq!(a.runs_for(&Assignee::worker("c1")), 12);
        assert_eq!(a.runs_for(&Assignee::worker("c2")), 3);
        assert_eq!(a.runs_for(&Assignee::worker("c9")), 0);
        assert_eq!(a.fragments_of_job(0).len(), 2);
    }

    #[test]
    fn test_assignee_display() {
        assert_eq!(Assignee::worker("c1").to_string(), "c1");
        assert_eq!(Assignee::Unassigned.to_string(), "<unassigned>");
        assert_eq!(Assignee::Unassigned.worker_id(), None);
        assert_eq!(Assignee::worker("c1").worker_id(), Some("c1"));
    }

    #[test]
    fn test_empty_allocation() {
        let a = Allocation::new();
        assert!(a.is_fully_assigned());
        assert_eq!(a.fragment_count(), 0);
    }
}
