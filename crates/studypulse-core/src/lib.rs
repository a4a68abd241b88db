//! studypulse-core: Hierarchical learning-progress aggregation.
//!
//! This crate defines the data model, the store traits the engine reads
//! through, and the three read-only aggregation operations that turn
//! content-interaction records into multi-level progress snapshots.

pub mod class;
pub mod engine;
pub mod error;
pub mod graph;
pub mod guard;
pub mod model;
pub mod snapshot;
pub mod statistics;
pub mod student;
pub mod topic;
pub mod traits;
pub mod vark;

pub use engine::{AggregatorConfig, ProgressService};
pub use traits::Stores;
