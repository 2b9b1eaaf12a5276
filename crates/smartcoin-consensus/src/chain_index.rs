//! Read-only view of the block index.
//!
//! The index itself is owned by the node; retargeting only needs to step from
//! an entry to its predecessor. `InMemoryChain` is a contiguous height-indexed
//! implementation for tools and tests.

use crate::compact::CompactTarget;
use crate::header::BlockHash;
use serde::{Deserialize, Serialize};

/// The per-block data the consensus core reads from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    #[serde(default)]
    pub hash: BlockHash,
    pub height: u32,
    /// Header time, UNIX seconds.
    pub time: u32,
    pub bits: CompactTarget,
}

impl ChainEntry {
    pub fn new(height: u32, time: u32, bits: CompactTarget) -> Self {
        Self {
            hash: BlockHash::ZERO,
            height,
            time,
            bits,
        }
    }
}

/// Predecessor lookup over an append-only chain.
pub trait ChainIndex {
    /// The parent of `entry`, or `None` at genesis or where the available
    /// history ends.
    fn predecessor(&self, entry: &ChainEntry) -> Option<ChainEntry>;

    /// Walk back `steps` blocks from `entry`, stopping early if history runs
    /// out. Returns the block reached and how many steps were taken.
    fn ancestor(&self, entry: &ChainEntry, steps: u32) -> (ChainEntry, u32) {
        let mut current = *entry;
        let mut taken = 0;
        while taken < steps {
            match self.predecessor(&current) {
                Some(prev) => current = prev,
                None => break,
            }
            taken += 1;
        }
        (current, taken)
    }
}

/// Contiguous run of entries starting at some base height.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChain {
    base_height: u32,
    entries: Vec<ChainEntry>,
}

impl InMemoryChain {
    /// An empty chain whose first entry will sit at height 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty chain whose first entry will sit at `base_height`. Entries
    /// below the base are treated as unavailable.
    pub fn starting_at(base_height: u32) -> Self {
        Self {
            base_height,
            entries: Vec::new(),
        }
    }

    /// Build from entries with consecutive heights. Returns `None` if the
    /// heights have gaps.
    pub fn from_entries(entries: Vec<ChainEntry>) -> Option<Self> {
        let base_height = entries.first().map(|e| e.height).unwrap_or(0);
        let contiguous = entries
            .iter()
            .enumerate()
            .all(|(i, e)| u64::from(e.height) == u64::from(base_height) + i as u64);
        contiguous.then_some(Self {
            base_height,
            entries,
        })
    }

    /// Append the next block; its height is assigned here.
    pub fn push(&mut self, time: u32, bits: CompactTarget) -> ChainEntry {
        let entry = ChainEntry::new(self.next_height(), time, bits);
        self.entries.push(entry);
        entry
    }

    /// Entry at `height`, if held.
    pub fn get(&self, height: u32) -> Option<&ChainEntry> {
        let offset = height.checked_sub(self.base_height)?;
        self.entries.get(offset as usize)
    }

    pub fn tip(&self) -> Option<&ChainEntry> {
        self.entries.last()
    }

    pub fn base_height(&self) -> u32 {
        self.base_height
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_height(&self) -> u32 {
        self.base_height + self.entries.len() as u32
    }
}

impl ChainIndex for InMemoryChain {
    fn predecessor(&self, entry: &ChainEntry) -> Option<ChainEntry> {
        let parent_height = entry.height.checked_sub(1)?;
        self.get(parent_height).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits() -> CompactTarget {
        CompactTarget::from_consensus(0x1e0ffff0)
    }

    #[test]
    fn test_push_assigns_heights() {
        let mut chain = InMemoryChain::starting_at(100);
        let first = chain.push(10, bits());
        let second = chain.push(20, bits());
        assert_eq!(first.height, 100);
        assert_eq!(second.height, 101);
        assert_eq!(chain.tip().map(|e| e.height), Some(101));
        assert_eq!(chain.get(100).map(|e| e.time), Some(10));
        assert!(chain.get(99).is_none());
        assert!(chain.get(102).is_none());
    }

    #[test]
    fn test_predecessor_stops_at_base() {
        let mut chain = InMemoryChain::starting_at(5);
        let first = chain.push(10, bits());
        let second = chain.push(20, bits());
        assert_eq!(chain.predecessor(&second), Some(first));
        assert_eq!(chain.predecessor(&first), None);

        let mut genesis_chain = InMemoryChain::new();
        let genesis = genesis_chain.push(0, bits());
        assert_eq!(genesis_chain.predecessor(&genesis), None);
    }

    #[test]
    fn test_ancestor_reports_steps_taken() {
        let mut chain = InMemoryChain::new();
        for i in 0..10 {
            chain.push(i * 60, bits());
        }
        let tip = *chain.tip().unwrap();

        let (block, taken) = chain.ancestor(&tip, 4);
        assert_eq!((block.height, taken), (5, 4));

        let (block, taken) = chain.ancestor(&tip, 50);
        assert_eq!((block.height, taken), (0, 9));
    }

    #[test]
    fn test_from_entries_requires_contiguous_heights() {
        let entries = vec![
            ChainEntry::new(7, 1, bits()),
            ChainEntry::new(8, 2, bits()),
        ];
        let chain = InMemoryChain::from_entries(entries).unwrap();
        assert_eq!(chain.base_height(), 7);

        let gapped = vec![ChainEntry::new(7, 1, bits()), ChainEntry::new(9, 2, bits())];
        assert!(InMemoryChain::from_entries(gapped).is_none());
    }

    #[test]
    fn test_appending_leaves_earlier_entries_untouched() {
        let mut chain = InMemoryChain::new();
        let first = chain.push(10, bits());
        let snapshot = chain.clone();
        for i in 1..20 {
            chain.push(10 + i * 40, CompactTarget::from_consensus(0x1c1a1206));
        }
        assert_eq!(chain.get(0), Some(&first));
        assert_eq!(chain.get(0), snapshot.get(0));
        assert_eq!(chain.len(), 20);
    }

    #[test]
    fn test_hashes_survive_predecessor_walk() {
        let mut parent = ChainEntry::new(3, 100, bits());
        parent.hash = BlockHash::from_bytes([0xaa; 32]);
        let mut tip = ChainEntry::new(4, 140, bits());
        tip.hash = BlockHash::from_bytes([0xbb; 32]);

        let chain = InMemoryChain::from_entries(vec![parent, tip]).unwrap();
        assert_eq!(chain.predecessor(&tip).map(|e| e.hash), Some(parent.hash));
    }

    #[test]
    fn test_entry_json_without_hash() {
        let entry: ChainEntry =
            serde_json::from_str(r#"{"height": 239, "time": 1386475638, "bits": 504365040}"#)
                .unwrap();
        assert_eq!(entry.height, 239);
        assert_eq!(entry.bits, CompactTarget::from_consensus(0x1e0ffff0));
        assert_eq!(entry.hash, BlockHash::ZERO);
    }
}
