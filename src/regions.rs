//! Region Module
//!
//! Fixed screen regions of the game UI, expressed as fractions of the
//! screenshot size, and the cropping that turns them into pixel buffers.

use crate::error::ScanError;
use image::{GenericImageView, RgbImage};

/// A named rectangle defined as fractions of image width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(name: &'static str, top: f64, left: f64, width: f64, height: f64) -> Self {
        Region { name, top, left, width, height }
    }

    /// Resolves the region to `(x, y, width, height)` in pixels, clamped to the image.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let fw = image_width as f64;
        let fh = image_height as f64;
        let x = ((fw * self.left).floor() as u32).min(image_width);
        let y = ((fh * self.top).floor() as u32).min(image_height);
        let w = ((fw * self.width).floor() as u32).min(image_width - x);
        let h = ((fh * self.height).floor() as u32).min(image_height - y);
        (x, y, w, h)
    }
}

/// Top-left banner naming the current screen.
pub const INFO: Region = Region::new("info", 0.0, 0.0, 0.13, 0.11);
pub const CHARACTER_PAGE: Region = Region::new("characterPage", 0.09, 0.09, 0.22, 0.18);
pub const WEAPON_PAGE: Region = Region::new("weaponPage", 0.11, 0.09, 0.215, 0.25);
pub const ECHO_PAGE: Region = Region::new("echoPage", 0.12, 0.73, 0.23, 0.34);

/// Sequence node indicators, in unlock order. The last one uses a different art style.
pub const SEQUENCE_SLOTS: [Region; 6] = [
    Region::new("s1", 0.1047, 0.647, 0.0234, 0.0454),
    Region::new("s2", 0.259, 0.733, 0.028, 0.047),
    Region::new("s3", 0.473, 0.765, 0.0234, 0.0454),
    Region::new("s4", 0.682, 0.734, 0.025, 0.0454),
    Region::new("s5", 0.8364, 0.645, 0.029, 0.046),
    Region::new("s6", 0.895, 0.527, 0.025, 0.047),
];

/// Crops `region` out of `image`.
///
/// Fails with [`ScanError::InvalidRegion`] when the crop would contain no pixels.
pub fn crop(image: &RgbImage, region: &Region) -> Result<RgbImage, ScanError> {
    let (width, height) = image.dimensions();
    let (x, y, w, h) = region.to_pixels(width, height);
    if w == 0 || h == 0 {
        return Err(ScanError::InvalidRegion {
            name: region.name,
            width,
            height,
        });
    }
    Ok(image.view(x, y, w, h).to_image())
}
