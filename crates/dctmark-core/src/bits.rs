//! Bounded bit payloads.
//!
//! [`BitSequence`] is the unit of data flowing through the pipeline: produced
//! by the text codec or the error correction encoder, consumed by the embedder,
//! and handed back by the extractor.

/// An ordered sequence of bits with multi-bit value accessors.
///
/// Values are packed MSB-first, so `add_value(0b10_1100, 6)` appends the bit
/// `1` first. The same ordering applies when packing to bytes for the error
/// correction path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bit at `index`, or `false` past the end.
    ///
    /// Out-of-range reads map to zero bits so that a short extraction result
    /// decodes as padding rather than panicking.
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    pub fn add_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    pub fn add_value(&mut self, value: u32, count: usize) {
        debug_assert!(count <= 32);
        for shift in (0..count).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    /// Read `count` bits starting at `offset` as an MSB-first value.
    pub fn value(&self, offset: usize, count: usize) -> u32 {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for i in 0..count {
            value = (value << 1) | u32::from(self.get(offset + i));
        }
        value
    }

    /// A copy cut or zero-padded to exactly `len` bits.
    pub fn fitted(&self, len: usize) -> Self {
        let mut bits = self.bits.clone();
        bits.resize(len, false);
        Self { bits }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// Pack into bytes, MSB-first, zero-filling the final partial byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.bits.len().div_ceil(8)];
        for (i, bit) in self.bits.iter().enumerate() {
            if *bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }

    /// Unpack the first `len` bits of `bytes`, MSB-first.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Self {
        debug_assert!(len <= bytes.len() * 8);
        let bits = (0..len)
            .map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0)
            .collect();
        Self { bits }
    }

    /// Number of positions at which `self` and `other` disagree.
    ///
    /// Shorter sequences are treated as zero-padded.
    pub fn hamming_distance(&self, other: &Self) -> usize {
        let len = self.len().max(other.len());
        (0..len).filter(|&i| self.get(i) != other.get(i)).count()
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}
