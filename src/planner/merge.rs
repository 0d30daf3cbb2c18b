//! Job consolidation.
//!
//! Pending jobs with the same [`MergeKey`] are interchangeable and become a
//! single [`MergedJob`]. The result is ordered deepest first, which is the
//! dependency order every scheduler relies on.

use std::collections::HashMap;

use crate::models::{MergeKey, MergedJob, PendingJob};

/// Merges pending jobs by key and sorts the result by depth, deepest first.
///
/// Groups keep the order of their first contributor among equal depths.
pub fn merge_jobs(jobs: Vec<PendingJob>) -> Vec<MergedJob> {
    let mut positions: HashMap<MergeKey, usize> = HashMap::new();
    let mut merged: Vec<MergedJob> = Vec::new();

    for job in jobs {
        let key = job.merge_key();
        match positions.get(&key) {
            Some(&i) => merged[i].absorb(job),
            None => {
                positions.insert(key, merged.len());
                merged.push(MergedJob::from(job));
            }
        }
    }

    // Stable: equal depths keep first-seen order.
    merged.sort_by(|a, b| b.depth.cmp(&a.depth));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, JobContext, PlanStep, Recipe};

    fn job(step_id: &str, blueprint_id: u32, runs: i64, depth: u32) -> PendingJob {
        let step = PlanStep::new(step_id, blueprint_id, blueprint_id + 1000);
        let recipe = Recipe::new(blueprint_id, blueprint_id + 1000).with_time(100);
        PendingJob {
            step_id: step_id.into(),
            context: JobContext::from_step(&step, &recipe),
            runs,
            cost: Some(runs as f64),
            duration: Some(runs * 100),
            depth,
        }
    }

    #[test]
    fn test_merge_identical_jobs() {
        let merged = merge_jobs(vec![job("a", 1, 3, 2), job("b", 1, 4, 1), job("root", 9, 1, 0)]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].context.blueprint_id, 1);
        assert_eq!(merged[0].runs, 7);
        assert_eq!(merged[0].depth, 2);
        assert_eq!(merged[0].cost, Some(7.0));
        assert_eq!(merged[0].duration, Some(700));
        assert_eq!(merged[0].step_ids, vec!["a", "b"]);
        assert_eq!(merged[1].step_id, "root");
    }

    #[test]
    fn test_activity_splits_groups() {
        let mut reaction = job("r", 1, 2, 1);
        reaction.context.activity = ActivityKind::Reaction;
        let merged = merge_jobs(vec![job("m", 1, 2, 1), reaction]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_efficiency_splits_groups() {
        let mut researched = job("b", 1, 2, 1);
        researched.context.efficiency.material = 10;
        let merged = merge_jobs(vec![job("a", 1, 2, 1), researched]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_sorted_deepest_first_and_stable() {
        let merged = merge_jobs(vec![
            job("root", 1, 1, 0),
            job("x", 2, 1, 1),
            job("y", 3, 1, 2),
            job("z", 4, 1, 1),
        ]);
        let order: Vec<&str> = merged.iter().map(|j| j.step_id.as_str()).collect();
        assert_eq!(order, vec!["y", "x", "z", "root"]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_jobs(Vec::new()).is_empty());
    }
}
