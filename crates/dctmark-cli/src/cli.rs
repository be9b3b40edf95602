use clap::{Parser, Subcommand};

use dctmark_core::WatermarkConfig;

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Side length of one bit box on the 128x128 watermark grid
    #[arg(long = "box-size", value_name = "cells", default_value = "10")]
    pub box_size: usize,

    /// Reed-Solomon parity bytes, 0 disables error correction
    #[arg(long = "ecc-bytes", value_name = "bytes", default_value = "0")]
    pub ecc_bytes: usize,

    /// Blend strength of the mark, 0.0 (invisible and unreadable) to 1.0
    #[arg(long, value_name = "factor", default_value = "1.0")]
    pub opacity: f64,

    /// Seed of the watermark cell shuffle, part of the key
    #[arg(long = "seed-watermark", value_name = "seed", default_value = "19")]
    pub seed_watermark: u64,

    /// Seed of the coefficient shuffle, part of the key
    #[arg(long = "seed-embedding", value_name = "seed", default_value = "24")]
    pub seed_embedding: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn config(&self) -> WatermarkConfig {
        WatermarkConfig {
            box_size: self.box_size,
            ecc_bytes: self.ecc_bytes,
            opacity: self.opacity,
            seed_watermark: self.seed_watermark,
            seed_embedding: self.seed_embedding,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Embed(embed::EmbedArgs),
    Extract(extract::ExtractArgs),
    Capacity(capacity::CapacityArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_library() {
        let args = CliArgs::parse_from(["dctmark", "capacity"]);
        assert_eq!(args.config(), WatermarkConfig::default());
    }

    #[test]
    fn options_reach_the_config() {
        let args = CliArgs::parse_from([
            "dctmark",
            "--box-size",
            "16",
            "--ecc-bytes",
            "2",
            "--seed-watermark",
            "7",
            "capacity",
        ]);
        let config = args.config();
        assert_eq!(config.box_size, 16);
        assert_eq!(config.ecc_bytes, 2);
        assert_eq!(config.seed_watermark, 7);
        assert_eq!(config.seed_embedding, 24);
    }
}
