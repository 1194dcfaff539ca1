//! Bit position allocator shared by every power.

use super::bitset::CapabilityBitset;

/// Tracks which bit positions are taken and how many bytes every capability
/// bitset must currently hold.
#[derive(Debug, Default)]
pub struct BitAllocator {
    taken: CapabilityBitset,
    byte_len: usize,
}

impl BitAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current storage length, in bytes, of every capability bitset.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn is_taken(&self, bit: u32) -> bool {
        self.taken.get(bit)
    }

    /// Pick the `count` lowest free positions without claiming them.
    pub fn plan(&self, count: usize) -> Vec<u32> {
        (0u32..)
            .filter(|bit| !self.is_taken(*bit))
            .take(count)
            .collect()
    }

    /// Bytes needed to address every bit in `bits`.
    pub fn required_len(&self, bits: &[u32]) -> usize {
        bits.iter()
            .map(|bit| (*bit / 8) as usize + 1)
            .max()
            .unwrap_or(0)
            .max(self.byte_len)
    }

    /// Mark `bits` taken. The caller must already have grown every bitset
    /// to [`required_len`](Self::required_len).
    pub fn claim(&mut self, bits: &[u32]) {
        let len = self.required_len(bits);
        self.taken.extend_to(len);
        self.byte_len = len;
        for bit in bits {
            self.taken.set(*bit);
        }
    }

    pub fn release(&mut self, bits: &[u32]) {
        for bit in bits {
            self.taken.clear(*bit);
        }
    }

    pub fn taken_count(&self) -> usize {
        (0..(self.byte_len * 8) as u32)
            .filter(|bit| self.is_taken(*bit))
            .count()
    }
}
