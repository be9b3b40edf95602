use std::path::PathBuf;

use clap::Args;

use dctmark_core::{Result, WatermarkConfig};

/// Extracts the text watermark from a marked image
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source image that carries the watermark
    #[arg(short = 'i', long = "in", value_name = "marked image", required = true)]
    pub carrier: PathBuf,
}

impl ExtractArgs {
    pub fn run(self, config: WatermarkConfig) -> Result<()> {
        let text = dctmark_core::commands::extract_file(&self.carrier, config)?;
        println!("{text}");
        Ok(())
    }
}
