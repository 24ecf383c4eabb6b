//! Sequence Module
//!
//! Reads the six resonance-chain nodes by colour instead of text. Unlocked
//! nodes glow yellow; the sixth node is drawn differently and is compared
//! against its blue locked state instead.

use image::RgbImage;
use log::debug;

/// Inclusive HSV band on OpenCV's 8-bit scale (H 0-179, S and V 0-255).
#[derive(Debug, Clone, Copy)]
struct HsvBand {
    lower: [u8; 3],
    upper: [u8; 3],
}

impl HsvBand {
    const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        HsvBand { lower, upper }
    }

    fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

const YELLOW: HsvBand = HsvBand::new([45, 100, 150], [65, 255, 255]);
const FINAL_YELLOW: HsvBand = HsvBand::new([30, 50, 100], [75, 255, 255]);
const FINAL_BLUE: HsvBand = HsvBand::new([100, 30, 30], [130, 255, 255]);

/// Percentage of yellow pixels above which a regular node counts as unlocked.
const UNLOCKED_MIN_PERCENT: f64 = 0.1;

pub const SLOT_COUNT: usize = 6;

/// Unlock state of every node plus the trusted sequence count.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReading {
    pub states: [bool; SLOT_COUNT],
    pub sequence: usize,
}

/// Classifies each slot crop and counts the leading run of unlocked nodes.
pub fn read_sequence(slots: &[RgbImage; SLOT_COUNT]) -> SequenceReading {
    let mut states = [false; SLOT_COUNT];
    for (i, slot) in slots.iter().enumerate() {
        states[i] = if i == SLOT_COUNT - 1 {
            let yellow = band_percent(slot, &FINAL_YELLOW);
            let blue = band_percent(slot, &FINAL_BLUE);
            debug!("Slot {} yellow ratio: {:.3}%, blue ratio: {:.3}%", i + 1, yellow, blue);
            yellow > blue
        } else {
            let yellow = band_percent(slot, &YELLOW);
            debug!("Slot {} yellow ratio: {:.3}%", i + 1, yellow);
            yellow > UNLOCKED_MIN_PERCENT
        };
    }

    SequenceReading {
        states,
        sequence: leading_unlocked(&states),
    }
}

/// Length of the unbroken run of unlocked nodes from the first one.
///
/// Nodes unlock strictly in order, so anything after a gap is a misread.
pub fn leading_unlocked(states: &[bool]) -> usize {
    states.iter().take_while(|&&unlocked| unlocked).count()
}

/// Share of the image's pixels inside `band`, in percent.
fn band_percent(image: &RgbImage, band: &HsvBand) -> f64 {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let hits = image
        .pixels()
        .filter(|p| band.contains(rgb_to_hsv(p[0], p[1], p[2])))
        .count() as u64;
    hits as f64 / total as f64 * 100.0
}

/// Converts RGB to HSV on OpenCV's 8-bit scale.
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    [
        ((h / 2.0).round() as u8).min(179),
        (s * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    ]
}
