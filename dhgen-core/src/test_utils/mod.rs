//! Test utilities shared by unit tests, integration tests and benches
//!
//! Seeded generators for reproducible runs, randomness sources that fail on
//! purpose, and a cheap stand-in primitive for exercising the pipeline
//! without curve arithmetic.

pub mod deterministic_rng;
pub mod rng_doubles;
pub mod stub_primitive;

pub use deterministic_rng::*;
pub use rng_doubles::*;
pub use stub_primitive::*;
