//! Data models
//!
//! Rust structs representing database entities.

mod project;

pub use project::{Project, ProjectCreate, ProjectStatus, ProjectUpdate};
