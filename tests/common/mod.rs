//! Shared test utilities for reel integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

pub mod assertions;
pub mod builders;
pub mod fake_backend;
pub mod fixtures;

pub use builders::*;
pub use fake_backend::*;
pub use fixtures::*;
