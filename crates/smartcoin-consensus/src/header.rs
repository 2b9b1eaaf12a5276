//! Block header and 256-bit hash types.
//!
//! The header serializes to exactly 80 bytes, little-endian, in field order:
//! version, previous block hash, merkle root, time, bits, nonce. Both the
//! identity hash and the PoW hash are computed over these bytes.

use crate::compact::CompactTarget;
use crate::{ConsensusError, ConsensusResult};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Serialized header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// A 256-bit hash in internal byte order.
///
/// Displayed and parsed in reversed (big-endian) hex, the form used by block
/// explorers and the hardcoded constants in the network tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// The all-zero hash.
    pub const ZERO: BlockHash = BlockHash([0u8; 32]);

    /// Wrap bytes in internal order.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Bytes in internal order.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Interpret the hash as an unsigned 256-bit integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }

    /// Parse a reversed-hex hash. Panics on malformed input; meant for the
    /// literal constants in the network tables.
    pub(crate) fn from_hex_const(s: &str) -> Self {
        match s.parse() {
            Ok(hash) => hash,
            Err(e) => panic!("invalid hash literal {s}: {e}"),
        }
    }
}

impl FromStr for BlockHash {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let decoded = hex::decode(trimmed)
            .map_err(|e| ConsensusError::InvalidHeader(format!("invalid hash hex '{s}': {e}")))?;
        let mut bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            ConsensusError::InvalidHeader(format!("hash must be 32 bytes, got {}", v.len()))
        })?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({self})")
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Double SHA-256.
pub fn sha256d(data: &[u8]) -> BlockHash {
    let first = Sha256::digest(data);
    BlockHash(Sha256::digest(first).into())
}

/// Block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: BlockHash,
    pub merkle_root: BlockHash,
    /// UNIX seconds.
    pub time: u32,
    pub bits: CompactTarget,
    pub nonce: u32,
}

impl BlockHeader {
    /// Serialize to the 80-byte wire form.
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_block_hash.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_consensus().to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Parse the 80-byte wire form.
    pub fn parse(bytes: &[u8]) -> ConsensusResult<Self> {
        if bytes.len() != HEADER_SIZE {
            return Err(ConsensusError::InvalidHeader(format!(
                "header must be {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let hash_at = |offset: usize| {
            let mut hash = [0u8; 32];
            hash.copy_from_slice(&bytes[offset..offset + 32]);
            BlockHash(hash)
        };

        Ok(Self {
            version: u32_at(0) as i32,
            prev_block_hash: hash_at(4),
            merkle_root: hash_at(36),
            time: u32_at(68),
            bits: CompactTarget::from_consensus(u32_at(72)),
            nonce: u32_at(76),
        })
    }

    /// Identity hash used for chain linkage (double SHA-256).
    pub fn hash(&self) -> BlockHash {
        sha256d(&self.serialize())
    }

    /// Proof-of-work hash; algorithm depends on the header time.
    pub fn pow_hash(&self) -> ConsensusResult<BlockHash> {
        crate::pow_hash::compute_pow_hash(self)
    }
}
