//! The embedding and extraction pipelines.
//!
//! [`Watermarker`] ties the stages together: text codec, error correction,
//! bitmap rendering, the two keyed permutations, the 4×4 and 8×8 cosine
//! transforms and the diagonal scan between them. Extraction runs the same
//! stages mirrored. Both directions must agree on every parameter in
//! [`WatermarkConfig`]; extraction with different seeds yields garbage bits
//! without any way to detect the mismatch.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::bitmap::{denoise, from_bitmap, to_bitmap};
use crate::bits::BitSequence;
use crate::cancel::CancellationToken;
use crate::charset::{bits_to_text, text_to_bits};
use crate::color::{hsb_to_rgb, rgb_to_hsb};
use crate::config::WatermarkConfig;
use crate::dct::Dct;
use crate::ecc::{ErrorCorrection, ReedSolomon};
use crate::error::WatermarkError;
use crate::grid::{Grid, GRID_CELLS, GRID_SIZE};
use crate::permutation::Permutation;
use crate::quant::{dequantize, quantize};
use crate::result::Result;
use crate::scan::{delinearize, linearize};

/// Carrier coefficient slots per 8×8 block, (row, col) on the mid band.
const COEFF_SLOTS: [(usize, usize); 4] = [(1, 4), (2, 3), (3, 2), (4, 1)];

/// What an embed operation actually did to the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    /// Bits the caller supplied.
    pub payload_bits: usize,
    /// Bits carried after fitting to the data capacity.
    pub embedded_bits: usize,
    /// Whether fitting cut payload bits off.
    pub truncated: bool,
    /// Coefficient stream values the carrier had room for, at most 16384.
    pub coefficients_written: usize,
}

/// Embeds and extracts watermarks according to one [`WatermarkConfig`].
pub struct Watermarker {
    config: WatermarkConfig,
    ecc: Box<dyn ErrorCorrection>,
    cancel: CancellationToken,
}

impl Watermarker {
    /// Create a watermarker after validating `config`.
    pub fn new(config: WatermarkConfig) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
            ecc: Box::new(ReedSolomon),
            cancel: CancellationToken::new(),
        })
    }

    /// Swap in a different error correction codec.
    pub fn with_error_correction(mut self, ecc: Box<dyn ErrorCorrection>) -> Self {
        self.ecc = ecc;
        self
    }

    /// Attach a cancellation token shared with the caller.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Embed `text` into the carrier brightness.
    ///
    /// The text is folded to the 6-bit alphabet and space-padded or cut to
    /// the configured capacity; a cut is visible in the report.
    pub fn embed_text(&self, image: &mut RgbaImage, text: &str) -> Result<EmbedReport> {
        let bits = text_to_bits(text, self.config.max_text_len());
        self.embed_bits(image, &bits)
    }

    /// Embed a raw bit payload into the carrier brightness.
    ///
    /// The image is only modified on success; any error or cancellation
    /// leaves it untouched.
    pub fn embed_bits(&self, image: &mut RgbaImage, bits: &BitSequence) -> Result<EmbedReport> {
        self.check_carrier(image)?;

        let data_bits = self.config.data_bits();
        let truncated = bits.len() > data_bits;
        let payload = bits.fitted(data_bits);
        let wire = self.ecc.encode(&payload, self.config.ecc_bytes)?;
        debug_assert_eq!(wire.len(), self.config.total_bits());
        debug!(
            "embedding {} payload bits as {} wire bits (truncated: {truncated})",
            bits.len(),
            wire.len()
        );

        let grid = to_bitmap(&wire, self.config.box_size);
        let grid = self.permutation_watermark().gather_grid(&grid);
        let grid = self.transform_watermark(&grid, Direction::Forward)?;
        let grid = self.permutation_embedding().gather_grid(&grid);
        let stream = linearize(&grid);

        let mut plane = brightness_plane(image);
        let written = self.write_coefficients(&mut plane, &stream)?;
        debug!(
            "carrier holds {written} of {} coefficient values",
            stream.len()
        );

        *image = recompose(image, &plane);
        Ok(EmbedReport {
            payload_bits: bits.len(),
            embedded_bits: data_bits,
            truncated,
            coefficients_written: written,
        })
    }

    /// Recover the payload bits from a marked carrier.
    pub fn extract_bits(&self, image: &RgbaImage) -> Result<BitSequence> {
        self.check_carrier(image)?;

        let plane = brightness_plane(image);
        let stream = self.read_coefficients(&plane)?;
        debug!("read {} coefficient values from the carrier", stream.len());

        let grid = delinearize(&stream);
        let grid = self.permutation_embedding().scatter_grid(&grid);
        let grid = self.transform_watermark(&grid, Direction::Inverse)?;
        let mut grid = self.permutation_watermark().scatter_grid(&grid);

        denoise(&mut grid, self.config.box_size);
        let wire = from_bitmap(&grid, self.config.box_size, self.config.total_bits());
        self.ecc.decode(&wire, self.config.ecc_bytes)
    }

    /// Recover the text payload, right-trimmed of its space padding.
    pub fn extract_text(&self, image: &RgbaImage) -> Result<String> {
        let bits = self.extract_bits(image)?;
        Ok(bits_to_text(&bits, self.config.max_text_len())
            .trim_end()
            .to_string())
    }

    fn check_carrier(&self, image: &RgbaImage) -> Result<()> {
        if image.width() < GRID_SIZE as u32 || image.height() < GRID_SIZE as u32 {
            return Err(WatermarkError::CarrierTooSmall(
                image.width(),
                image.height(),
            ));
        }
        Ok(())
    }

    fn permutation_watermark(&self) -> Permutation {
        Permutation::from_seed(self.config.seed_watermark, GRID_CELLS)
    }

    fn permutation_embedding(&self) -> Permutation {
        Permutation::from_seed(self.config.seed_embedding, GRID_CELLS)
    }

    /// Run the 4×4 transform plus (de)quantization over the working grid.
    fn transform_watermark(&self, grid: &Grid, direction: Direction) -> Result<Grid> {
        let dct = Dct::watermark();
        let n = dct.size();
        let mut out = Grid::working();
        let mut block = [0i32; 16];
        let mut scratch = [0i32; 16];

        for by in 0..GRID_SIZE / n {
            self.cancel.check()?;
            for bx in 0..GRID_SIZE / n {
                grid.read_block(by * n, bx * n, n, &mut block);
                match direction {
                    Direction::Forward => {
                        dct.forward(&block, &mut scratch);
                        quantize(&scratch, &mut block);
                    }
                    Direction::Inverse => {
                        dequantize(&block, &mut scratch);
                        dct.inverse(&scratch, &mut block, false);
                    }
                }
                out.write_block(by * n, bx * n, n, &block);
            }
        }
        Ok(out)
    }

    /// Blend the coefficient stream into the carrier plane, block by block.
    ///
    /// Returns how many stream values the plane had room for. A small
    /// carrier truncates the zig-zag stream; extraction zero-fills the rest
    /// and the box threshold absorbs the loss.
    fn write_coefficients(&self, plane: &mut Grid, stream: &[i32]) -> Result<usize> {
        let dct = Dct::carrier();
        let n = dct.size();
        let opacity = self.config.opacity;
        let mut block = [0i32; 64];
        let mut coeffs = [0i32; 64];
        let mut recon = [0i32; 64];
        let mut cursor = 0usize;

        for by in 0..plane.height() / n {
            self.cancel.check()?;
            for bx in 0..plane.width() / n {
                plane.read_block(by * n, bx * n, n, &mut block);
                dct.forward(&block, &mut coeffs);
                for &(row, col) in &COEFF_SLOTS {
                    coeffs[row * n + col] = stream.get(cursor).copied().unwrap_or(0);
                    cursor += 1;
                }
                dct.inverse(&coeffs, &mut recon, true);
                for i in 0..n * n {
                    let blended =
                        f64::from(block[i]) * (1.0 - opacity) + f64::from(recon[i]) * opacity;
                    block[i] = (blended.round() as i32).clamp(0, 255);
                }
                plane.write_block(by * n, bx * n, n, &block);
            }
        }
        Ok(cursor.min(stream.len()))
    }

    /// Read the coefficient stream back, zero-filled to the full grid.
    fn read_coefficients(&self, plane: &Grid) -> Result<Vec<i32>> {
        let dct = Dct::carrier();
        let n = dct.size();
        let mut block = [0i32; 64];
        let mut coeffs = [0i32; 64];
        let mut stream = Vec::with_capacity(GRID_CELLS);

        'blocks: for by in 0..plane.height() / n {
            self.cancel.check()?;
            for bx in 0..plane.width() / n {
                if stream.len() == GRID_CELLS {
                    break 'blocks;
                }
                plane.read_block(by * n, bx * n, n, &mut block);
                dct.forward(&block, &mut coeffs);
                for &(row, col) in &COEFF_SLOTS {
                    stream.push(coeffs[row * n + col]);
                }
            }
        }
        stream.truncate(GRID_CELLS);
        Ok(stream)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Inverse,
}

impl Permutation {
    fn gather_grid(&self, grid: &Grid) -> Grid {
        Grid::from_cells(grid.width(), grid.height(), self.gather(grid.cells()))
    }

    fn scatter_grid(&self, grid: &Grid) -> Grid {
        Grid::from_cells(grid.width(), grid.height(), self.scatter(grid.cells()))
    }
}

/// The carrier brightness as an integer plane, zero-padded up to 8×8 blocks.
fn brightness_plane(image: &RgbaImage) -> Grid {
    let width = (image.width() as usize).div_ceil(8) * 8;
    let height = (image.height() as usize).div_ceil(8) * 8;
    let mut plane = Grid::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let hsb = rgb_to_hsb(r, g, b);
        plane.set(
            y as usize,
            x as usize,
            (hsb.brightness * 255.0).round() as i32,
        );
    }
    plane
}

/// Rebuild the image with the plane as its new brightness, keeping hue,
/// saturation and alpha of every pixel.
fn recompose(image: &RgbaImage, plane: &Grid) -> RgbaImage {
    let mut out = image.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let mut hsb = rgb_to_hsb(r, g, b);
        hsb.brightness = f64::from(plane.get(y as usize, x as usize)) / 255.0;
        let (nr, ng, nb) = hsb_to_rgb(hsb);
        *pixel = Rgba([nr, ng, nb, a]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_carrier(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn text_round_trip_on_gray_carrier() {
        let watermarker = Watermarker::new(WatermarkConfig::default()).unwrap();
        let mut image = gray_carrier(256, 256);
        let report = watermarker.embed_text(&mut image, "hello world").unwrap();
        assert!(!report.truncated);
        assert_eq!(report.embedded_bits, 144);

        assert_eq!(watermarker.extract_text(&image).unwrap(), "hello world");
    }

    #[test]
    fn carrier_below_minimum_is_rejected() {
        let watermarker = Watermarker::new(WatermarkConfig::default()).unwrap();
        let mut image = gray_carrier(127, 256);
        let result = watermarker.embed_text(&mut image, "x");
        assert!(matches!(
            result,
            Err(WatermarkError::CarrierTooSmall(127, 256))
        ));
        assert!(matches!(
            watermarker.extract_bits(&image),
            Err(WatermarkError::CarrierTooSmall(127, 256))
        ));
    }

    #[test]
    fn overlong_payload_is_reported_truncated() {
        let watermarker = Watermarker::new(WatermarkConfig::default()).unwrap();
        let mut image = gray_carrier(256, 256);
        let bits: BitSequence = (0..200).map(|i| i % 2 == 0).collect();
        let report = watermarker.embed_bits(&mut image, &bits).unwrap();
        assert!(report.truncated);
        assert_eq!(report.payload_bits, 200);
        assert_eq!(report.embedded_bits, 144);
    }

    #[test]
    fn cancelled_embed_leaves_the_carrier_untouched() {
        let cancel = CancellationToken::new();
        let watermarker = Watermarker::new(WatermarkConfig::default())
            .unwrap()
            .with_cancellation(cancel.clone());
        cancel.cancel();

        let mut image = gray_carrier(256, 256);
        let original = image.clone();
        let result = watermarker.embed_text(&mut image, "hello");
        assert!(matches!(result, Err(WatermarkError::Cancelled)));
        assert_eq!(image, original);
    }

    #[test]
    fn small_carrier_truncates_the_coefficient_stream() {
        let watermarker = Watermarker::new(WatermarkConfig::default()).unwrap();
        let mut image = gray_carrier(128, 128);
        let report = watermarker.embed_text(&mut image, "hi").unwrap();
        // 16×16 blocks at 4 slots each
        assert_eq!(report.coefficients_written, 1024);
    }

    #[test]
    fn padded_plane_is_block_aligned() {
        let image = gray_carrier(130, 250);
        let plane = brightness_plane(&image);
        assert_eq!(plane.width(), 136);
        assert_eq!(plane.height(), 256);
        assert_eq!(plane.get(0, 0), 128);
        // padding cells stay zero
        assert_eq!(plane.get(0, 135), 0);
    }

    #[test]
    fn recompose_keeps_alpha_and_hue() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([40, 180, 90, 77]));
        let mut plane = brightness_plane(&image);
        for y in 0..8 {
            for x in 0..8 {
                plane.set(y, x, 128);
            }
        }
        let out = recompose(&image, &plane);
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!(a, 77);
        assert_eq!(r.max(g).max(b), 128);
        // green stays the dominant channel
        assert!(g > r && g > b);
    }
}
