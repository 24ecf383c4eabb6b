//! Pipeline Module
//!
//! Drives one screenshot through classification and the matching extractor,
//! and wraps the outcome in the JSON envelope returned to callers.

use crate::classifier::{PageType, classify};
use crate::debug::{DebugSink, NoopSink};
use crate::error::ScanError;
use crate::extract::{self, CharacterInfo, WeaponInfo};
use crate::input::{InputSource, load_image};
use crate::ocr::TextRecognizer;
use crate::preprocess::preprocess;
use crate::reference::ReferenceData;
use crate::regions::{self, Region};
use crate::sequence::{SLOT_COUNT, read_sequence};
use anyhow::{Context, Result, anyhow};
use image::{DynamicImage, RgbImage};
use log::{debug, info, warn};
use serde::Serialize;

/// Structured data read from one screenshot, tagged by page type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Analysis {
    Character(CharacterInfo),
    Weapon(WeaponInfo),
    Sequences { sequence: usize },
    Echo { raw_text: String },
    Forte { skills: Vec<String> },
    #[serde(rename = "unknown")]
    Unknown,
}

impl Analysis {
    pub fn page_type(&self) -> PageType {
        match self {
            Analysis::Character(_) => PageType::Character,
            Analysis::Weapon(_) => PageType::Weapon,
            Analysis::Sequences { .. } => PageType::Sequences,
            Analysis::Echo { .. } => PageType::Echo,
            Analysis::Forte { .. } => PageType::Forte,
            Analysis::Unknown => PageType::Unknown,
        }
    }
}

/// `{"success": true, "analysis": {...}}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResponse {
    pub fn success(analysis: Analysis) -> Self {
        ScanResponse {
            success: true,
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failure(error: &anyhow::Error) -> Self {
        ScanResponse {
            success: false,
            analysis: None,
            error: Some(format!("{:#}", error)),
        }
    }
}

/// The screenshot analysis pipeline.
///
/// Holds only borrowed collaborators; one instance can analyze any number of
/// screenshots in sequence.
pub struct Pipeline<'a> {
    reference: &'a ReferenceData,
    recognizer: &'a dyn TextRecognizer,
    sink: &'a dyn DebugSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(reference: &'a ReferenceData, recognizer: &'a dyn TextRecognizer) -> Self {
        Pipeline {
            reference,
            recognizer,
            sink: &NoopSink,
        }
    }

    pub fn with_debug_sink(mut self, sink: &'a dyn DebugSink) -> Self {
        self.sink = sink;
        self
    }

    /// Loads the screenshot from `source` and analyzes it. Load failures are
    /// reported in the envelope like any other error.
    pub fn process_source(&self, source: &InputSource) -> ScanResponse {
        match load_image(source) {
            Ok(image) => {
                info!("Analyzing {}x{} screenshot", image.width(), image.height());
                self.process(&image)
            }
            Err(e) => {
                warn!("Could not load screenshot: {:#}", e);
                ScanResponse::failure(&e)
            }
        }
    }

    /// Analyzes `image` and never fails: errors become a failure envelope.
    pub fn process(&self, image: &RgbImage) -> ScanResponse {
        match self.analyze(image) {
            Ok(analysis) => ScanResponse::success(analysis),
            Err(e) => {
                warn!("Screenshot analysis failed: {:#}", e);
                ScanResponse::failure(&e)
            }
        }
    }

    /// Classifies the screenshot from its info banner and extracts the page's fields.
    pub fn analyze(&self, image: &RgbImage) -> Result<Analysis> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidInput(format!("image is {}x{}", width, height)).into());
        }
        self.sink.save("full_original", &DynamicImage::ImageRgb8(image.clone()));

        let info_text = self
            .read_region(image, &regions::INFO)
            .context("Failed to read info region")?;
        debug!("Info region raw text:\n{}", info_text);

        let page = classify(&info_text);
        info!("Determined page type: {}", page);

        let analysis = match page {
            PageType::Character => {
                let text = self.read_region(image, &regions::CHARACTER_PAGE)?;
                debug!("Character region raw text:\n{}", text);
                Analysis::Character(extract::character_info(&text, self.reference))
            }
            PageType::Weapon => {
                let text = self.read_region(image, &regions::WEAPON_PAGE)?;
                debug!("Weapon region raw text:\n{}", text);
                Analysis::Weapon(extract::weapon_info(&text, self.reference))
            }
            PageType::Echo => {
                // No dedicated echo parser yet: return the cleaned panel text.
                let text = self.read_region(image, &regions::ECHO_PAGE)?;
                debug!("Echo region raw text:\n{}", text);
                Analysis::Echo {
                    raw_text: extract::clean_text(&text),
                }
            }
            PageType::Sequences => {
                let slots = self.crop_slots(image)?;
                let reading = read_sequence(&slots);
                debug!("Sequence slot states: {:?}", reading.states);
                Analysis::Sequences {
                    sequence: reading.sequence,
                }
            }
            PageType::Forte => Analysis::Forte { skills: Vec::new() },
            PageType::Unknown => Analysis::Unknown,
        };

        debug!("Extracted analysis: {:?}", analysis);
        Ok(analysis)
    }

    /// Crop, preprocess and OCR one region.
    fn read_region(&self, image: &RgbImage, region: &Region) -> Result<String> {
        let cropped = regions::crop(image, region)?;
        self.sink.save(
            &format!("{}_original", region.name),
            &DynamicImage::ImageRgb8(cropped.clone()),
        );

        let processed = preprocess(&cropped);
        let text = self
            .recognizer
            .recognize(&processed)
            .with_context(|| format!("OCR failed on region '{}'", region.name))?;
        self.sink.save(
            &format!("{}_processed", region.name),
            &DynamicImage::ImageLuma8(processed),
        );
        Ok(text)
    }

    fn crop_slots(&self, image: &RgbImage) -> Result<[RgbImage; SLOT_COUNT]> {
        let slots = regions::SEQUENCE_SLOTS
            .iter()
            .map(|region| -> Result<RgbImage> {
                let slot = regions::crop(image, region)?;
                self.sink.save(
                    &format!("{}_original", region.name),
                    &DynamicImage::ImageRgb8(slot.clone()),
                );
                Ok(slot)
            })
            .collect::<Result<Vec<_>>>()?;
        slots
            .try_into()
            .map_err(|_| anyhow!("Expected {} sequence slots", SLOT_COUNT))
    }
}
