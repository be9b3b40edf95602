use std::path::PathBuf;

use clap::Args;

use dctmark_core::{Result, WatermarkConfig};

/// Embeds a text watermark into an image
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Carrier image (PNG or JPEG), used readonly
    #[arg(short = 'i', long = "in", value_name = "carrier image", required = true)]
    pub carrier: PathBuf,

    /// The marked image will be stored as this file
    #[arg(short = 'o', long = "out", value_name = "output image", required = true)]
    pub output: PathBuf,

    /// The watermark text, folded to the 6-bit alphabet
    #[arg(short, long, value_name = "text", required = true)]
    pub message: String,
}

impl EmbedArgs {
    pub fn run(self, config: WatermarkConfig) -> Result<()> {
        let report = dctmark_core::commands::embed_file(
            &self.carrier,
            &self.output,
            &self.message,
            config,
        )?;
        if report.truncated {
            eprintln!(
                "warning: message was cut to {} bits to fit the capacity",
                report.embedded_bits
            );
        }
        println!("Watermark embedded into {:?}", self.output);
        Ok(())
    }
}
