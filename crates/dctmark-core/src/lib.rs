//! # Dctmark Core API
//!
//! Invisible text watermarks in the frequency domain of an image.
//!
//! The payload is rendered onto a 128×128 working grid, shuffled by two
//! seed-keyed permutations, pushed through a 4×4 cosine transform with
//! quantization and blended into the mid-band coefficients of every 8×8
//! brightness block of the carrier. Extraction mirrors the pipeline and
//! recovers the text without access to the unmarked original.
//!
//! The main entry point is [`Watermarker`], configured by a
//! [`WatermarkConfig`]:
//!
//! ```rust
//! use dctmark_core::{WatermarkConfig, Watermarker};
//! use image::{Rgba, RgbaImage};
//!
//! let watermarker = Watermarker::new(WatermarkConfig::default())
//!     .expect("default config is valid");
//!
//! let mut image = RgbaImage::from_pixel(256, 256, Rgba([128, 128, 128, 255]));
//! watermarker
//!     .embed_text(&mut image, "hello world")
//!     .expect("carrier is large enough");
//!
//! let text = watermarker.extract_text(&image).expect("extraction works");
//! assert_eq!(text, "hello world");
//! ```
//!
//! Both sides must agree on the full configuration. The box size, the error
//! correction level and the two seeds act as the key of the mark; extraction
//! with a different key yields garbage without any way to detect it.

#![warn(clippy::redundant_else)]

pub mod bitmap;
pub mod bits;
pub mod cancel;
pub mod charset;
pub mod color;
pub mod commands;
pub mod config;
pub mod dct;
pub mod ecc;
pub mod error;
pub mod grid;
pub mod permutation;
pub mod quant;
pub mod result;
pub mod scan;
pub mod watermarker;

pub use crate::bits::BitSequence;
pub use crate::cancel::CancellationToken;
pub use crate::config::WatermarkConfig;
pub use crate::ecc::{ErrorCorrection, ReedSolomon};
pub use crate::error::WatermarkError;
pub use crate::result::Result;
pub use crate::watermarker::{EmbedReport, Watermarker};
