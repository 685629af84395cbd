//! Test utilities for effect verification
//!
//! Signal generators and analysis helpers shared by unit tests, integration
//! tests and benchmarks. Enabled with the `test-utils` feature.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
