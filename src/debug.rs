//! Debug Sink Module
//!
//! Optional side channel for inspecting what the pipeline actually looked at.
//! Writes are best-effort: failures are logged and never affect the result.

use image::DynamicImage;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Receives intermediate images keyed by a short name such as `info_processed`.
pub trait DebugSink {
    fn save(&self, name: &str, image: &DynamicImage);
}

/// Discards everything. Used when no debug directory is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DebugSink for NoopSink {
    fn save(&self, _name: &str, _image: &DynamicImage) {}
}

/// Writes each image as `<dir>/<name>.jpg`, overwriting the previous run.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: &Path) -> Self {
        DirectorySink {
            dir: dir.to_path_buf(),
        }
    }
}

impl DebugSink for DirectorySink {
    fn save(&self, name: &str, image: &DynamicImage) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("Failed to create debug directory {:?}: {}", self.dir, e);
            return;
        }
        let path = self.dir.join(format!("{}.jpg", name));
        match image.save(&path) {
            Ok(()) => debug!("Saved debug image {:?}", path),
            Err(e) => warn!("Failed to save debug image {:?}: {}", path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    #[test]
    fn test_directory_sink_writes_jpeg() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(&dir.path().join("debug"));
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([200])));

        sink.save("info_processed", &img);

        let written = dir.path().join("debug").join("info_processed.jpg");
        assert!(written.exists());
        let reloaded = image::open(&written).unwrap().to_luma8();
        assert_eq!(reloaded.dimensions(), (8, 8));
    }

    #[test]
    fn test_directory_sink_swallows_errors() {
        let dir = tempdir().unwrap();
        // A regular file where the directory should be.
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();

        let sink = DirectorySink::new(&blocker);
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        sink.save("full_original", &img);

        assert!(!blocker.join("full_original.jpg").exists());
    }
}
