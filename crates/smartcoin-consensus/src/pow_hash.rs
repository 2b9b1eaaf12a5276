//! Proof-of-work hash selection.
//!
//! Smartcoin launched on scrypt, switched to X11 by timestamp and later went
//! back. The algorithm is picked from the header time alone, never from the
//! height, so a header can be hashed without any chain context.

use crate::header::{BlockHash, BlockHeader};
use crate::{ConsensusError, ConsensusResult};

/// Headers with a time at or after this value (and before
/// [`X11_WINDOW_END`]) are hashed with X11.
pub const X11_WINDOW_START: u32 = 1_406_160_001;

/// First header time hashed with scrypt again.
pub const X11_WINDOW_END: u32 = 1_721_779_200;

/// scrypt cost parameter as log2(N); N = 1024.
pub const SCRYPT_LOG_N: u8 = 10;
pub const SCRYPT_R: u32 = 1;
pub const SCRYPT_P: u32 = 1;
pub const SCRYPT_OUTPUT_LEN: usize = 32;

/// Hash function used for proof of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowAlgorithm {
    Scrypt,
    X11,
}

impl PowAlgorithm {
    /// Algorithm in force for a header with the given time.
    pub fn for_time(time: u32) -> Self {
        if (X11_WINDOW_START..X11_WINDOW_END).contains(&time) {
            PowAlgorithm::X11
        } else {
            PowAlgorithm::Scrypt
        }
    }

    /// Hash raw bytes, normally a serialized header.
    pub fn hash(self, data: &[u8]) -> ConsensusResult<BlockHash> {
        match self {
            PowAlgorithm::Scrypt => scrypt_hash(data),
            PowAlgorithm::X11 => x11_hash(data),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowAlgorithm::Scrypt => "scrypt",
            PowAlgorithm::X11 => "x11",
        }
    }
}

/// PoW hash of a header, over its 80-byte serialization.
pub fn compute_pow_hash(header: &BlockHeader) -> ConsensusResult<BlockHash> {
    PowAlgorithm::for_time(header.time).hash(&header.serialize())
}

/// scrypt(N=1024, r=1, p=1) with the input as both password and salt.
fn scrypt_hash(data: &[u8]) -> ConsensusResult<BlockHash> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, SCRYPT_OUTPUT_LEN)
        .map_err(|e| ConsensusError::PowHash(format!("scrypt params: {e}")))?;

    let mut out = [0u8; 32];
    scrypt::scrypt(data, data, &params, &mut out)
        .map_err(|e| ConsensusError::PowHash(format!("scrypt: {e}")))?;
    Ok(BlockHash::from_bytes(out))
}

#[cfg(feature = "x11")]
fn x11_hash(data: &[u8]) -> ConsensusResult<BlockHash> {
    Ok(BlockHash::from_bytes(rs_x11_hash::get_x11_hash(data)))
}

#[cfg(not(feature = "x11"))]
fn x11_hash(_data: &[u8]) -> ConsensusResult<BlockHash> {
    Err(ConsensusError::PowHash(
        "built without the x11 feature".to_string(),
    ))
}
