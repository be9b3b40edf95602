//! Watermark parameters and the capacity arithmetic derived from them.

use crate::charset::BITS_PER_CHAR;
use crate::error::WatermarkError;
use crate::grid::GRID_SIZE;
use crate::result::Result;

/// All parameters a watermark operation depends on.
///
/// Embedding and extraction must run with identical values; the box size, the
/// error correction level and both seeds are effectively the key of the mark.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Side length of one bit box on the 128×128 grid, `1..=128`.
    pub box_size: usize,
    /// Reed-Solomon parity bytes appended to the payload, 0 disables ECC.
    pub ecc_bytes: usize,
    /// Blend strength of the mark into the carrier brightness, `0.0..=1.0`.
    pub opacity: f64,
    /// Seed of the watermark-side cell permutation.
    pub seed_watermark: u64,
    /// Seed of the embedding-side coefficient permutation.
    pub seed_embedding: u64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            box_size: 10,
            ecc_bytes: 0,
            opacity: 1.0,
            seed_watermark: 19,
            seed_embedding: 24,
        }
    }
}

impl WatermarkConfig {
    /// Validate all parameters, consuming and returning the config.
    pub fn validated(self) -> Result<Self> {
        if self.box_size == 0 || self.box_size > GRID_SIZE {
            return Err(WatermarkError::InvalidBoxSize(self.box_size));
        }
        if !(0.0..=1.0).contains(&self.opacity) || self.opacity.is_nan() {
            return Err(WatermarkError::InvalidOpacity(self.opacity));
        }
        let total_bits = self.total_bits();
        if self.ecc_bytes * 8 >= total_bits {
            return Err(WatermarkError::EccCapacityExceeded {
                ecc_bytes: self.ecc_bytes,
                total_bits,
            });
        }
        let codeword_bytes = self.data_bits().div_ceil(8) + self.ecc_bytes;
        if codeword_bytes > 255 {
            return Err(WatermarkError::EccBlockTooLarge(codeword_bytes));
        }
        Ok(self)
    }

    /// Bits the grid can hold at this box size, parity included.
    pub fn total_bits(&self) -> usize {
        let boxes = GRID_SIZE / self.box_size;
        boxes * boxes
    }

    /// Payload bits left after the parity bytes.
    pub fn data_bits(&self) -> usize {
        self.total_bits() - self.ecc_bytes * 8
    }

    /// Whole characters the payload can carry.
    pub fn max_text_len(&self) -> usize {
        self.data_bits() / BITS_PER_CHAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity() {
        let config = WatermarkConfig::default().validated().unwrap();
        assert_eq!(config.total_bits(), 144);
        assert_eq!(config.data_bits(), 144);
        assert_eq!(config.max_text_len(), 24);
    }

    #[test]
    fn parity_shrinks_the_payload() {
        let config = WatermarkConfig {
            ecc_bytes: 4,
            ..WatermarkConfig::default()
        }
        .validated()
        .unwrap();
        assert_eq!(config.total_bits(), 144);
        assert_eq!(config.data_bits(), 112);
        assert_eq!(config.max_text_len(), 18);
    }

    #[test]
    fn smaller_boxes_raise_capacity() {
        let config = WatermarkConfig {
            box_size: 4,
            ..WatermarkConfig::default()
        };
        assert_eq!(config.total_bits(), 1024);
        assert_eq!(config.max_text_len(), 170);
    }

    #[test]
    fn rejects_bad_box_size() {
        for box_size in [0usize, 129, 1000] {
            let result = WatermarkConfig {
                box_size,
                ..WatermarkConfig::default()
            }
            .validated();
            assert!(matches!(result, Err(WatermarkError::InvalidBoxSize(b)) if b == box_size));
        }
    }

    #[test]
    fn rejects_bad_opacity() {
        for opacity in [-0.1f64, 1.01, f64::NAN] {
            let result = WatermarkConfig {
                opacity,
                ..WatermarkConfig::default()
            }
            .validated();
            assert!(matches!(result, Err(WatermarkError::InvalidOpacity(_))));
        }
    }

    #[test]
    fn rejects_parity_eating_the_whole_capacity() {
        // box 10 → 144 bits, 18 parity bytes consume all of them
        let result = WatermarkConfig {
            ecc_bytes: 18,
            ..WatermarkConfig::default()
        }
        .validated();
        assert!(matches!(
            result,
            Err(WatermarkError::EccCapacityExceeded {
                ecc_bytes: 18,
                total_bits: 144
            })
        ));
    }
}
