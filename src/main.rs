//! WuwaScan - Main Application Entrypoint
//!
//! This file is responsible for parsing command-line arguments, initializing
//! the application environment (like logging), and dispatching the core
//! scanning logic.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use wuwa_scan::input::InputSource;
use wuwa_scan::run;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// A command-line tool that reads character, weapon and sequence data from game screenshots.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the screenshot (e.g., shot.png), or "-" to read base64 from stdin
    #[arg(short, long)]
    input: PathBuf,

    /// File to write the JSON response to (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory containing Characters.json and Weapons.json
    #[arg(short, long, default_value = "Data")]
    data_dir: PathBuf,

    /// OCR language (e.g., "eng" for English)
    #[arg(short, long, default_value_t = String::from("eng"))]
    lang: String,

    /// Save original and processed crops to this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,

    /// Logging verbosity level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Info,
    Debug,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = Args::parse();

    // 1. Initialize Logger
    let log_level = match args.log_level {
        LogLevel::Error => "error",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting WuwaScan...");

    // 2. Create a configuration object from arguments
    let config = wuwa_scan::Config {
        input: InputSource::from_arg(&args.input),
        output: args.output,
        data_dir: args.data_dir,
        lang: args.lang,
        debug_dir: args.debug_dir,
        pretty: args.pretty,
    };

    // 3. Run the main application logic
    let exit_code = match run(config) {
        Ok(response) if response.success => {
            info!("Scan completed successfully.");
            0
        }
        Ok(_) => {
            error!("Scan finished without a result.");
            1
        }
        Err(e) => {
            error!("Application failed: {:#}", e);
            2
        }
    };

    #[cfg(feature = "dhat-heap")]
    drop(_profiler);
    std::process::exit(exit_code);
}
