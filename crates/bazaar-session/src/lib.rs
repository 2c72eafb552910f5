//! Session tokens shared across Bazaar crates.
//!
//! Provides JWT issue/validation and the session cookie builders.

pub mod cookie;
pub mod token;
