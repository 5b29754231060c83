//! Domain types shared across YK-Intelligence crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Shared by the portal service and its client.

pub mod client;
pub mod profile;
pub mod role;
