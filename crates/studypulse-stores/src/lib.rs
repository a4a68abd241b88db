//! studypulse-stores: Store backends and configuration.
//!
//! Implements every store trait from `studypulse-core` over an in-memory
//! dataset loaded from JSON, and loads the TOML configuration used by the
//! CLI.

pub mod config;
pub mod dataset;
pub mod memory;

pub use config::{load_config_from, StudypulseConfig};
pub use dataset::{ClassMembership, Dataset, ValidationWarning};
pub use memory::{Collection, MemoryStore};
