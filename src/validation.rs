//! Input validation for production plans and worker pools.
//!
//! Checks structural integrity before planning. Detects:
//! - Duplicate step or worker IDs
//! - Missing parent references
//! - Missing or multiple roots
//! - Parent cycles
//! - Steps unreachable from the root
//! - Slot counters with more slots in use than configured
//!
//! The planner only refuses plans without steps or without a root; the
//! remaining issues are reported so callers can surface them.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (DFS)

use crate::models::{ActivityKind, PlanStep, WorkerCapacity};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A step references a parent that doesn't exist.
    MissingParent,
    /// No step is without a parent.
    NoRoot,
    /// More than one step is without a parent.
    MultipleRoots,
    /// Following parent links returns to the starting step.
    CyclicParent,
    /// A step cannot be reached from the root.
    Unreachable,
    /// A worker has more slots in use than configured.
    SlotOverflow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a production plan.
///
/// Checks:
/// 1. No duplicate step IDs
/// 2. Every parent reference resolves
/// 3. Exactly one root
/// 4. No parent cycles
/// 5. Every step is reachable from the root
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_plan(steps: &[PlanStep]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for step in steps {
        if !ids.insert(step.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate step ID: {}", step.id),
            ));
        }
    }

    for step in steps {
        if let Some(parent) = &step.parent_id {
            if !ids.contains(parent.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingParent,
                    format!("Step '{}' references unknown parent '{}'", step.id, parent),
                ));
            }
        }
    }

    let roots: Vec<&str> = steps
        .iter()
        .filter(|s| s.is_root())
        .map(|s| s.id.as_str())
        .collect();
    match roots.len() {
        0 if !steps.is_empty() => errors.push(ValidationError::new(
            ValidationErrorKind::NoRoot,
            "Plan has no root step",
        )),
        0 | 1 => {}
        _ => errors.push(ValidationError::new(
            ValidationErrorKind::MultipleRoots,
            format!("Plan has {} root steps: {}", roots.len(), roots.join(", ")),
        )),
    }

    if let Some(cycle_err) = detect_cycles(steps) {
        errors.push(cycle_err);
    }

    if let Some(&root) = roots.first() {
        for id in unreachable_from(root, steps) {
            errors.push(ValidationError::new(
                ValidationErrorKind::Unreachable,
                format!("Step '{id}' is not reachable from root '{root}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a worker pool.
///
/// Checks:
/// 1. No duplicate worker IDs
/// 2. No slot counter with `used > max`
pub fn validate_pool(pool: &[WorkerCapacity]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for worker in pool {
        if !ids.insert(worker.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", worker.id),
            ));
        }

        for kind in ActivityKind::ALL {
            let slots = worker.slots(kind);
            if slots.used > slots.max {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SlotOverflow,
                    format!(
                        "Worker '{}' uses {} of {} {} slots",
                        worker.id, slots.used, slots.max, kind
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects a cycle in the parent links.
///
/// Each step has at most one parent, so the graph is a functional graph:
/// walking parent links from any step either ends at a root, at a missing
/// parent, or revisits a step.
fn detect_cycles(steps: &[PlanStep]) -> Option<ValidationError> {
    let parent_of: HashMap<&str, &str> = steps
        .iter()
        .filter_map(|s| s.parent_id.as_deref().map(|p| (s.id.as_str(), p)))
        .collect();

    let mut settled: HashSet<&str> = HashSet::new();
    for step in steps {
        let mut path: HashSet<&str> = HashSet::new();
        let mut current = step.id.as_str();
        loop {
            if settled.contains(current) {
                break;
            }
            if !path.insert(current) {
                return Some(ValidationError::new(
                    ValidationErrorKind::CyclicParent,
                    format!("Circular parent chain detected involving step '{current}'"),
                ));
            }
            match parent_of.get(current) {
                Some(&parent) => current = parent,
                None => break,
            }
        }
        settled.extend(path);
    }

    None
}

/// Step ids not reachable from `root` via child links, in input order.
fn unreachable_from<'a>(root: &'a str, steps: &'a [PlanStep]) -> Vec<&'a str> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for step in steps {
        if let Some(parent) = &step.parent_id {
            children.entry(parent.as_str()).or_default().push(step.id.as_str());
        }
    }

    let mut reached: HashSet<&str> = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(id) {
            stack.extend(kids.iter().copied());
        }
    }

    steps
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| !reached.contains(id))
        .collect()
}
