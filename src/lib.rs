//! Production planning core for the U-Engine ecosystem.
//!
//! Expands a hierarchical production plan into concrete jobs, distributes
//! them over a pool of workers with limited parallel slots, and estimates
//! the wall-clock time of the whole run.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `PlanStep`, `Recipe`, `PendingJob`,
//!   `MergedJob`, `WorkerCapacity`, `Allocation`, `Facility`
//! - **`resolver`**: Recipe and material lookup (`RecipeResolver`, `RecipeBook`)
//! - **`formula`**: Material/time factors and cost (`EconomicFormulas`,
//!   `DurationModel`, `StandardFormulas`)
//! - **`planner`**: Demand propagation and job merging
//! - **`scheduler`**: Slot-constrained assignment, makespan, pool preview
//! - **`validation`**: Input integrity checks (duplicate IDs, parent cycles,
//!   unreachable steps, slot counters)
//!
//! # Pipeline
//!
//! ```text
//! PlanStep[] ──Planner──▶ MergedJob[] ──SlotAssigner──▶ Allocation ──MakespanEstimator──▶ seconds
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

pub mod error;
pub mod formula;
pub mod models;
pub mod planner;
pub mod resolver;
pub mod scheduler;
pub mod validation;

pub use error::PlanError;
pub use formula::{DurationModel, EconomicFormulas, StandardFormulas};
pub use planner::{PlanOutcome, Planner};
pub use resolver::{RecipeBook, RecipeResolver, ResolveError};
pub use scheduler::{MakespanEstimator, SlotAssigner};
