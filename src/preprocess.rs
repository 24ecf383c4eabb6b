//! Preprocessing Module
//!
//! Turns a colour crop of the game UI into a clean black-and-white image that
//! Tesseract reads reliably: grayscale, denoise, local contrast, threshold.

use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::contrast::{otsu_level, threshold};
use imageproc::filter::median_filter;

// CLAHE parameters. The clip limit is relative to a flat histogram.
const CLAHE_CLIP_LIMIT: f32 = 2.0;
const CLAHE_GRID: u32 = 8;

/// Full preprocessing pipeline: grayscale → median denoise → CLAHE → Otsu threshold.
pub fn preprocess(image: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(image);
    let denoised = median_filter(&gray, 1, 1);
    let enhanced = clahe(&denoised, CLAHE_CLIP_LIMIT, CLAHE_GRID);
    binarize(&enhanced)
}

/// Global binarization at the Otsu level. Pixels above the level become white.
pub fn binarize(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    threshold(image, level)
}

/// Contrast Limited Adaptive Histogram Equalization.
///
/// The image is split into a `grid` x `grid` set of tiles (fewer when the image
/// is smaller than the grid). Each tile gets its own clipped, equalized lookup
/// table, and every pixel is mapped by bilinear interpolation between the four
/// nearest tile centres.
pub fn clahe(image: &GrayImage, clip_limit: f32, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let tiles_x = grid.clamp(1, width) as usize;
    let tiles_y = grid.clamp(1, height) as usize;
    let tile_w = width as f32 / tiles_x as f32;
    let tile_h = height as f32 / tiles_y as f32;

    let mut luts = vec![[0u8; 256]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        let y0 = (ty as f32 * tile_h) as u32;
        let y1 = (((ty + 1) as f32 * tile_h) as u32).min(height);
        for tx in 0..tiles_x {
            let x0 = (tx as f32 * tile_w) as u32;
            let x1 = (((tx + 1) as f32 * tile_w) as u32).min(width);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let area = (x1 - x0) * (y1 - y0);
            luts[ty * tiles_x + tx] = tile_lut(&mut hist, area, clip_limit);
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let value = image.get_pixel(x, y)[0] as usize;
        let (tx0, tx1, ax) = neighbours(x, tile_w, tiles_x);
        let (ty0, ty1, ay) = neighbours(y, tile_h, tiles_y);

        let top = lerp(
            luts[ty0 * tiles_x + tx0][value],
            luts[ty0 * tiles_x + tx1][value],
            ax,
        );
        let bottom = lerp(
            luts[ty1 * tiles_x + tx0][value],
            luts[ty1 * tiles_x + tx1][value],
            ax,
        );
        let mapped = top + (bottom - top) * ay;
        Luma([mapped.round().clamp(0.0, 255.0) as u8])
    })
}

/// Clips the histogram, redistributes the excess and returns the scaled CDF.
fn tile_lut(hist: &mut [u32; 256], area: u32, clip_limit: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if area == 0 {
        return lut;
    }

    let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let bonus = excess / 256;
    let residual = (excess % 256) as usize;
    for bin in hist.iter_mut() {
        *bin += bonus;
    }
    if residual > 0 {
        let step = (256 / residual).max(1);
        for bin in hist.iter_mut().step_by(step).take(residual) {
            *bin += 1;
        }
    }

    let scale = 255.0 / area as f32;
    let mut cumulative = 0u32;
    for (value, count) in hist.iter().enumerate() {
        cumulative += count;
        lut[value] = (cumulative as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// Finds the two tiles whose centres bracket `pos` and the weight of the second.
fn neighbours(pos: u32, tile_size: f32, tiles: usize) -> (usize, usize, f32) {
    let f = (pos as f32 + 0.5) / tile_size - 0.5;
    let first = (f.floor().max(0.0) as usize).min(tiles - 1);
    let second = (first + 1).min(tiles - 1);
    let weight = if first == second {
        0.0
    } else {
        (f - first as f32).clamp(0.0, 1.0)
    };
    (first, second, weight)
}

fn lerp(a: u8, b: u8, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Dark UI background with a bright text-like bar through the middle.
    fn banner(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if y > height / 3 && y < 2 * height / 3 && x % 7 != 0 {
                Rgb([235, 230, 220])
            } else {
                Rgb([30 + (x % 20) as u8, 35, 50])
            }
        })
    }

    #[test]
    fn test_preprocess_is_binary() {
        let processed = preprocess(&banner(120, 40));
        for pixel in processed.pixels() {
            assert!(
                pixel[0] == 0 || pixel[0] == 255,
                "Pixel value should be 0 or 255, got {}",
                pixel[0]
            );
        }
    }

    #[test]
    fn test_preprocess_preserves_dimensions() {
        let processed = preprocess(&banner(97, 33));
        assert_eq!(processed.dimensions(), (97, 33));
    }

    #[test]
    fn test_preprocess_separates_text_from_background() {
        let processed = preprocess(&banner(120, 42));
        // Centre of the bright bar vs. a background corner.
        assert_eq!(processed.get_pixel(60, 21)[0], 255);
        assert_eq!(processed.get_pixel(3, 2)[0], 0);
    }

    #[test]
    fn test_clahe_keeps_flat_image_flat() {
        let flat = GrayImage::from_pixel(32, 32, Luma([90]));
        let out = clahe(&flat, CLAHE_CLIP_LIMIT, CLAHE_GRID);
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn test_clahe_handles_images_smaller_than_grid() {
        let tiny = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 60 + y * 20) as u8]));
        let out = clahe(&tiny, CLAHE_CLIP_LIMIT, CLAHE_GRID);
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn test_clahe_preserves_ordering_within_a_tile() {
        let ramp = GrayImage::from_fn(16, 16, |x, _| Luma([(x * 10) as u8]));
        let out = clahe(&ramp, CLAHE_CLIP_LIMIT, 1);
        for x in 1..16 {
            assert!(out.get_pixel(x, 0)[0] >= out.get_pixel(x - 1, 0)[0]);
        }
    }
}
