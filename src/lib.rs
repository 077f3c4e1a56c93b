//! MarketLens Library
//!
//! Material cost calculation, marketplace research and project tracking.

pub mod api;
pub mod build_info;
pub mod config;
pub mod costing;
pub mod db;
pub mod market;
pub mod models;
pub mod tools;
