//! OCR Module
//!
//! Handles text extraction from preprocessed crops using the tesseract-rs crate.

use crate::error::ScanError;
use anyhow::{Context, Result, anyhow};
use image::GrayImage;
use log::{debug, info};
use std::path::PathBuf;
use tesseract_rs::TesseractAPI;

/// Anything that can turn an image into text.
///
/// The pipeline only depends on this trait, so tests can swap Tesseract out
/// for canned responses.
pub trait TextRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String>;
}

/// Gets the default location where this version of `tesseract-rs` caches its data.
/// The build script downloads language files here.
fn get_tessdata_dir() -> Result<PathBuf> {
    let base_path = if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").context("HOME env var not set")?;
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
    } else if cfg!(target_os = "linux") {
        let home = std::env::var("HOME").context("HOME env var not set")?;
        PathBuf::from(home).join(".tesseract-rs")
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").context("APPDATA env var not set")?;
        PathBuf::from(appdata)
    } else {
        return Err(anyhow!("Unsupported operating system"));
    };
    Ok(base_path.join("tesseract-rs").join("tessdata"))
}

/// Tesseract-backed recognizer. One engine instance is reused for every crop.
pub struct TesseractRecognizer {
    api: TesseractAPI,
}

impl TesseractRecognizer {
    /// Initializes Tesseract for `lang` from the bundled tessdata directory.
    pub fn new(lang: &str) -> Result<Self> {
        let tessdata_dir = get_tessdata_dir().context("Could not determine tessdata directory")?;
        let tessdata = tessdata_dir
            .to_str()
            .ok_or_else(|| anyhow!("tessdata path is not valid UTF-8: {:?}", tessdata_dir))?;

        let api = TesseractAPI::new();
        api.init(tessdata, lang)
            .with_context(|| format!("Failed to initialize Tesseract with language '{}'", lang))?;
        info!("Tesseract initialized with language '{}'", lang);

        Ok(TesseractRecognizer { api })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String> {
        let (width, height) = image.dimensions();
        self.api
            .set_image(
                image.as_raw(),
                width as i32,
                height as i32,
                1,            // bytes per pixel for Luma8
                width as i32, // bytes per line
            )
            .map_err(|e| ScanError::Ocr(format!("failed to set {}x{} image: {}", width, height, e)))?;

        let text = self
            .api
            .get_utf8_text()
            .map_err(|e| ScanError::Ocr(format!("failed to recognize text: {}", e)))?;
        debug!(
            "Recognized {} characters from {}x{} crop",
            text.chars().count(),
            width,
            height
        );

        Ok(text)
    }
}
