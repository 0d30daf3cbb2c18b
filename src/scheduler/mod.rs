//! Slot-constrained assignment and makespan estimation.
//!
//! Turns merged jobs into per-worker fragments and estimates how long the
//! resulting production run takes.
//!
//! # Algorithm
//!
//! `SlotAssigner` is a greedy, deepest-first, split-evenly heuristic: each
//! job is spread over every worker with a free slot for its activity. It is
//! not optimal, but it mirrors how jobs are actually started level by level.
//!
//! # Makespan
//!
//! `MakespanEstimator` sums per-depth completion times, packing each
//! worker's fragments onto its slots with LPT.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 5
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod assign;
mod makespan;
mod preview;

pub use assign::{split_runs, SlotAssigner};
pub use makespan::{lpt_completion, DepthSpan, MakespanBreakdown, MakespanEstimator};
pub use preview::{preview, PoolPreview, PreviewRequest, WorkerWorkload};
