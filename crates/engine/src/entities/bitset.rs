//! Growable byte-packed capability storage.

use std::collections::TryReserveError;

/// One capability bitset. Every bitset held by a [`PowerSpace`] has the same
/// length; growth goes through the space so they all move together.
///
/// [`PowerSpace`]: super::PowerSpace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityBitset {
    bytes: Vec<u8>,
}

impl CapabilityBitset {
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when no bit is set.
    pub fn is_clear(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Bits past the end read as unset.
    pub fn get(&self, bit: u32) -> bool {
        let (byte, mask) = locate(bit);
        self.bytes.get(byte).is_some_and(|b| b & mask != 0)
    }

    pub fn set(&mut self, bit: u32) {
        let (byte, mask) = locate(bit);
        match self.bytes.get_mut(byte) {
            Some(b) => *b |= mask,
            None => debug_assert!(false, "bit {} outside a {} byte bitset", bit, self.len()),
        }
    }

    pub fn clear(&mut self, bit: u32) {
        let (byte, mask) = locate(bit);
        if let Some(b) = self.bytes.get_mut(byte) {
            *b &= !mask;
        }
    }

    /// Reserve room for `len` bytes without changing the visible length.
    pub fn reserve_to(&mut self, len: usize) -> Result<(), TryReserveError> {
        let additional = len.saturating_sub(self.bytes.len());
        self.bytes.try_reserve(additional)
    }

    /// Zero-extend to `len` bytes. Call after `reserve_to` so this cannot
    /// reallocate.
    pub fn extend_to(&mut self, len: usize) {
        if len > self.bytes.len() {
            self.bytes.resize(len, 0);
        }
    }
}

fn locate(bit: u32) -> (usize, u8) {
    ((bit / 8) as usize, 1u8 << (bit % 8))
}
