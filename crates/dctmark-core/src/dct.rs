//! Parametric N×N cosine transform.
//!
//! One transform instance serves the 8×8 carrier blocks, another the 4×4
//! watermark sub-blocks. The orthonormal basis is computed once per size and
//! cached for the lifetime of the process.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Sample bias removed before the forward transform and restored by the
/// inverse, so mid-gray maps to an all-zero coefficient block.
const SAMPLE_BIAS: f64 = 128.0;

/// Separable 2-D DCT over N×N integer blocks.
#[derive(Debug, Clone)]
pub struct Dct {
    n: usize,
    /// Orthonormal basis, row-major: `basis[i * n + j] = C[i][j]`.
    basis: Vec<f64>,
}

impl Dct {
    /// Build the transform for `n`×`n` blocks.
    pub fn new(n: usize) -> Self {
        let mut basis = vec![0.0; n * n];
        let scale0 = 1.0 / (n as f64).sqrt();
        let scale = (2.0 / n as f64).sqrt();
        for j in 0..n {
            basis[j] = scale0;
        }
        for i in 1..n {
            for j in 0..n {
                basis[i * n + j] =
                    scale * (PI * (2 * j + 1) as f64 * i as f64 / (2 * n) as f64).cos();
            }
        }
        Self { n, basis }
    }

    /// The shared 4×4 transform for watermark sub-blocks.
    pub fn watermark() -> &'static Dct {
        static DCT4: OnceLock<Dct> = OnceLock::new();
        DCT4.get_or_init(|| Dct::new(4))
    }

    /// The shared 8×8 transform for carrier blocks.
    pub fn carrier() -> &'static Dct {
        static DCT8: OnceLock<Dct> = OnceLock::new();
        DCT8.get_or_init(|| Dct::new(8))
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Forward transform: `round(C · (x − 128) · Cᵗ)`.
    ///
    /// `input` and `output` are row-major n×n blocks.
    pub fn forward(&self, input: &[i32], output: &mut [i32]) {
        let n = self.n;
        debug_assert_eq!(input.len(), n * n);
        debug_assert_eq!(output.len(), n * n);

        // tmp = C · (x − bias)
        let mut tmp = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    acc += self.basis[i * n + k] * (input[k * n + j] as f64 - SAMPLE_BIAS);
                }
                tmp[i * n + j] = acc;
            }
        }
        // out = tmp · Cᵗ
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    acc += tmp[i * n + k] * self.basis[j * n + k];
                }
                output[i * n + j] = acc.round() as i32;
            }
        }
    }

    /// Inverse transform: `round(Cᵗ · y · C) + 128`.
    ///
    /// `clamp` limits the result to the pixel range [0, 255]; the 4×4
    /// watermark path passes `false` because its samples are not pixels.
    pub fn inverse(&self, input: &[i32], output: &mut [i32], clamp: bool) {
        let n = self.n;
        debug_assert_eq!(input.len(), n * n);
        debug_assert_eq!(output.len(), n * n);

        // tmp = Cᵗ · y
        let mut tmp = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    acc += self.basis[k * n + i] * input[k * n + j] as f64;
                }
                tmp[i * n + j] = acc;
            }
        }
        // out = tmp · C + bias
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    acc += tmp[i * n + k] * self.basis[k * n + j];
                }
                let value = (acc + SAMPLE_BIAS).round() as i32;
                output[i * n + j] = if clamp { value.clamp(0, 255) } else { value };
            }
        }
    }
}
