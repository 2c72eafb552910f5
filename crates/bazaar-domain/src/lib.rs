//! Domain types shared across Bazaar crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod listing;
pub mod pagination;
pub mod phone;
pub mod ticket;
pub mod user;
