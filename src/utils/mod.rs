//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod logging;
pub mod units;

pub use units::{parse_ether, parse_gwei, parse_units};
