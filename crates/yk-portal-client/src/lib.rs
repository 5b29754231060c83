//! Client-side companion of the portal: API client and inactivity monitor.

pub mod client;
pub mod error;
pub mod inactivity;
