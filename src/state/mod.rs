//! State module for census data
//!
//! This module holds the values that flow through a census run.
//!
//! # Components
//!
//! - `Instance`: A candidate deployment read from the directory
//! - `Disposition` / `Category`: What the classifier decided about a probed instance
//! - `Outcome`: The single result a worker emits per candidate

mod instance;
mod outcome;

// Re-export main types
pub use instance::Instance;
pub use outcome::{Category, Disposition, Outcome};
