//! Test utilities
//!
//! Manual in-memory implementations of the repository ports and fixtures
//! for unit and router tests.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
