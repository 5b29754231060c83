//! Test utilities for YK-Intelligence services.
//!
//! Provides `MockSession` cookie headers and provider-style access tokens.
//! Import in `#[cfg(test)]` blocks and integration tests only.

pub mod auth;
