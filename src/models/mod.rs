//! Presentation models for CLI output
//!
//! `display` turns API records into table rows; `view` decides what a query
//! result renders as.

pub mod display;
pub mod view;

pub use view::{Placeholder, ViewState};
