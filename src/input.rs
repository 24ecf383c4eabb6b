//! Input Module
//!
//! Loads the screenshot to analyze, either from a file or as a base64 payload
//! on stdin (the form the web client posts, optionally as a data URL).

use crate::error::ScanError;
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the screenshot comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    File(PathBuf),
    /// Base64-encoded image bytes read from standard input.
    Stdin,
}

impl InputSource {
    /// `-` selects stdin, anything else is a file path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            InputSource::Stdin
        } else {
            InputSource::File(arg.to_path_buf())
        }
    }
}

/// Loads and decodes the screenshot as 8-bit RGB.
pub fn load_image(source: &InputSource) -> Result<RgbImage> {
    match source {
        InputSource::File(path) => {
            info!("Loading screenshot from {:?}", path);
            let image = image::open(path)
                .map_err(|e| ScanError::InvalidInput(format!("{:?}: {}", path, e)))?;
            Ok(image.to_rgb8())
        }
        InputSource::Stdin => {
            info!("Reading base64 screenshot from stdin");
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("Failed to read stdin")?;
            decode_base64_image(&payload)
        }
    }
}

/// Decodes a base64 image, with or without a `data:<mime>;base64,` prefix.
pub fn decode_base64_image(payload: &str) -> Result<RgbImage> {
    let encoded = match payload.find(";base64,") {
        Some(pos) if payload.trim_start().starts_with("data:") => &payload[pos + ";base64,".len()..],
        _ => payload,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ScanError::InvalidInput(format!("bad base64 payload: {}", e)))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| ScanError::InvalidInput(format!("undecodable image data: {}", e)))?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 200, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Path::new("shot.png")),
            InputSource::File(PathBuf::from("shot.png"))
        );
    }

    #[test]
    fn test_decode_plain_and_data_url() {
        let encoded = png_base64(12, 7);

        let plain = decode_base64_image(&encoded).unwrap();
        assert_eq!(plain.dimensions(), (12, 7));

        let url = format!("data:image/png;base64,{}\n", encoded);
        let from_url = decode_base64_image(&url).unwrap();
        assert_eq!(from_url.get_pixel(0, 0), &Rgb([10, 200, 30]));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_base64_image("data:image/png;base64,@@@").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid image input"));

        let not_an_image = STANDARD.encode(b"hello");
        assert!(decode_base64_image(&not_an_image).is_err());
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let err = load_image(&InputSource::File(PathBuf::from("/nonexistent/shot.png"))).unwrap_err();
        assert!(err.downcast_ref::<ScanError>().is_some());
    }
}
