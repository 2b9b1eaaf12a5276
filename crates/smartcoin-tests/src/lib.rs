//! # smartcoin-tests
//!
//! Integration tests for the Smartcoin consensus core.
//!
//! This crate provides:
//! - Sanity tests for network profiles and genesis blocks
//! - Historical difficulty fixtures, checked directly and end to end
//! - Proof-of-work hashing and validation tests
//! - Property-based tests for rule lookup, compact targets and validation

pub mod generators;
pub mod harness;




#[cfg(test)]
mod property_tests;

pub use generators::*;
pub use harness::*;
