//! WuwaScan - Core Library
//!
//! Reads structured game data out of a single screenshot: the info banner is
//! OCR'd to decide which screen it is, then the matching panel is cropped and
//! parsed (or, for resonance chains, read by colour).

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

pub mod classifier;
pub mod debug;
pub mod error;
pub mod extract;
pub mod input;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod reference;
pub mod regions;
pub mod sequence;

pub use classifier::PageType;
pub use error::ScanError;
pub use pipeline::{Analysis, Pipeline, ScanResponse};

use debug::{DebugSink, DirectorySink, NoopSink};
use input::InputSource;
use ocr::TesseractRecognizer;
use reference::ReferenceData;

/// Application configuration structure.
#[derive(Debug)]
pub struct Config {
    pub input: InputSource,
    /// Write the JSON response here instead of stdout.
    pub output: Option<PathBuf>,
    /// Directory holding `Characters.json` and `Weapons.json`.
    pub data_dir: PathBuf,
    pub lang: String,
    /// When set, intermediate crops are written here.
    pub debug_dir: Option<PathBuf>,
    pub pretty: bool,
}

/// Analyzes one screenshot and emits the JSON response.
///
/// Analysis failures are reported inside the returned response; an `Err` means
/// the tool itself could not run (OCR engine setup, writing the output).
pub fn run(config: Config) -> Result<ScanResponse> {
    info!("Initializing scan with config: {:?}", config);

    // 1. Collaborators
    let reference = ReferenceData::load(&config.data_dir);
    let recognizer = TesseractRecognizer::new(&config.lang).context("OCR engine setup failed")?;
    let sink: Box<dyn DebugSink> = match &config.debug_dir {
        Some(dir) => {
            info!("Writing debug crops to {:?}", dir);
            Box::new(DirectorySink::new(dir))
        }
        None => Box::new(NoopSink),
    };
    let pipeline = Pipeline::new(&reference, &recognizer).with_debug_sink(sink.as_ref());

    // 2. Load and analyze
    let response = pipeline.process_source(&config.input);

    // 3. Emit
    let json = if config.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    match &config.output {
        Some(path) => {
            if let Some(parent_dir) = path.parent() {
                fs::create_dir_all(parent_dir).context("Failed to create output directory")?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote response to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(response)
}
