//! Session types shared by the portal service and its clients.
//!
//! Provides the session cookie builders, the local access-token pre-check and
//! the `RequestSession` extractor.

pub mod cookie;
pub mod session;
pub mod token;
