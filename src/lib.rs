pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::memory::InMemoryStore;
pub use config::RulesConfig;
pub use crate::core::validator::{DepartmentCheck, ValidationService};
pub use utils::error::{GuardError, Result, Violation};
