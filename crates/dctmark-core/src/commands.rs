//! File based entry points used by the command line interface.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::error;

use crate::config::WatermarkConfig;
use crate::error::WatermarkError;
use crate::result::Result;
use crate::watermarker::{EmbedReport, Watermarker};

/// Embed `text` into the carrier at `carrier` and save the marked image
/// to `destination`.
pub fn embed_file(
    carrier: &Path,
    destination: &Path,
    text: &str,
    config: WatermarkConfig,
) -> Result<EmbedReport> {
    let mut image = open_carrier(carrier)?;
    let report = Watermarker::new(config)?.embed_text(&mut image, text)?;
    save_image(&image, destination)?;
    Ok(report)
}

/// Extract the watermark text from the image at `carrier`.
pub fn extract_file(carrier: &Path, config: WatermarkConfig) -> Result<String> {
    let image = open_carrier(carrier)?;
    Watermarker::new(config)?.extract_text(&image)
}

fn open_carrier(file: &Path) -> Result<RgbaImage> {
    Ok(image::open(file)
        .map_err(|e| {
            error!("Error opening carrier {file:?}: {e}");
            WatermarkError::InvalidImageMedia
        })?
        .to_rgba8())
}

fn save_image(image: &RgbaImage, file: &Path) -> Result<()> {
    let format = match file.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            ImageFormat::Jpeg
        }
        _ => ImageFormat::Png,
    };
    let mut writer = BufWriter::new(File::create(file)?);
    image.write_to(&mut writer, format).map_err(|e| {
        error!("Error saving image {file:?}: {e}");
        WatermarkError::ImageEncodingError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let carrier = dir.path().join("carrier.png");
        let marked = dir.path().join("marked.png");

        let image = RgbaImage::from_pixel(256, 256, Rgba([128, 128, 128, 255]));
        save_image(&image, &carrier).unwrap();

        let report = embed_file(
            &carrier,
            &marked,
            "hello world",
            WatermarkConfig::default(),
        )
        .unwrap();
        assert!(!report.truncated);

        let text = extract_file(&marked, WatermarkConfig::default()).unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn missing_carrier_is_invalid_media() {
        let result = extract_file(Path::new("does-not-exist.png"), WatermarkConfig::default());
        assert!(matches!(result, Err(WatermarkError::InvalidImageMedia)));
    }
}
