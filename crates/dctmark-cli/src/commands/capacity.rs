use clap::Args;

use dctmark_core::{Result, WatermarkConfig};

/// Prints the payload capacity of the current configuration
#[derive(Args, Debug)]
pub struct CapacityArgs {}

impl CapacityArgs {
    pub fn run(self, config: WatermarkConfig) -> Result<()> {
        let config = config.validated()?;
        println!("total bits:    {}", config.total_bits());
        println!("data bits:     {}", config.data_bits());
        println!("max text len:  {}", config.max_text_len());
        Ok(())
    }
}
