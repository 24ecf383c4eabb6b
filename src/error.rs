//! Error Module
//!
//! Typed failure conditions raised by the scanning pipeline.

use thiserror::Error;

/// Conditions the pipeline reports when it cannot produce an analysis.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The image is missing, empty or could not be decoded.
    #[error("Invalid image input: {0}")]
    InvalidInput(String),

    /// A region resolved to zero pixels for the given image size.
    #[error("Region '{name}' is empty for a {width}x{height} image")]
    InvalidRegion {
        name: &'static str,
        width: u32,
        height: u32,
    },

    /// The OCR engine rejected the image or failed to recognize it.
    #[error("OCR failed: {0}")]
    Ocr(String),
}
