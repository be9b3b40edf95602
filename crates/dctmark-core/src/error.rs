use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a carrier that cannot hold a watermark at all
    #[error("Carrier image of {0}x{1} is below the minimum of 128x128 pixels")]
    CarrierTooSmall(u32, u32),

    /// Represents a bit box size outside of the working grid
    #[error("Box size {0} is invalid, must be within 1..=128")]
    InvalidBoxSize(usize),

    /// Represents an opacity outside of the blendable range
    #[error("Opacity {0} is invalid, must be within 0.0..=1.0")]
    InvalidOpacity(f64),

    /// Represents an error correction level that leaves no room for data
    #[error("{ecc_bytes} bytes of error correction exceed the total capacity of {total_bits} bits")]
    EccCapacityExceeded {
        ecc_bytes: usize,
        total_bits: usize,
    },

    /// Represents a codeword that does not fit a single Reed-Solomon block
    #[error("Codeword of {0} bytes exceeds the 255 byte Reed-Solomon block size")]
    EccBlockTooLarge(usize),

    /// Represents more bit errors than the configured parity can repair
    #[error("Too many bit errors for {parity_bytes} parity bytes to correct")]
    EccUncorrectable { parity_bytes: usize },

    /// Represents a cooperative cancellation, the carrier is left untouched
    #[error("Operation was cancelled")]
    Cancelled,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
