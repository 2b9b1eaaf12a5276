//! Error types for the consensus core.
//!
//! Only configuration problems are errors here. A candidate block that fails
//! proof-of-work or carries a malformed compact target is a normal rejection
//! and is reported as `false`, not as an error.

use thiserror::Error;

/// Consensus errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Network name not recognised (expected "main", "test" or "regtest").
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Genesis block built from the network's literal parameters does not
    /// match the hardcoded expectation.
    #[error("Genesis mismatch on {network}: {field} is {got}, expected {expected}")]
    GenesisMismatch {
        network: String,
        field: &'static str,
        got: String,
        expected: String,
    },

    /// Rule-set table cannot answer every height.
    #[error("Invalid rule store: {0}")]
    InvalidRuleStore(String),

    /// Malformed header bytes or hash string.
    #[error("Invalid block header: {0}")]
    InvalidHeader(String),

    /// Underlying hash primitive rejected its parameters.
    #[error("PoW hashing failed: {0}")]
    PowHash(String),
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
