//! Service plumbing shared by YK-Intelligence binaries: tracing setup,
//! health checks, request ids and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
