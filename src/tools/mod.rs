//! MarketLens operations
//!
//! Service-level operations behind the HTTP handlers.

pub mod projects;
pub mod status;
