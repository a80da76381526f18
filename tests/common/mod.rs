//! Shared test utilities for integration tests

#![allow(dead_code)]

use std::path::Path;

use screensnap::{
    Capturer,
    capture::{MockBackend, composite_from_mock},
};
use tempfile::TempDir;

/// Scratch output directory plus a capturer writing into it
pub struct Harness {
    pub dir:      TempDir,
    pub capturer: Capturer,
}

impl Harness {
    /// Mock backend with window capture, writing `format` files
    pub fn new(format: &str) -> Self {
        Self::with_backend(MockBackend::new(), format)
    }

    /// Mock backend as on a platform without window enumeration
    pub fn without_window_capture(format: &str) -> Self {
        Self::with_backend(MockBackend::new().without_window_capture(), format)
    }

    pub fn with_backend(mock: MockBackend, format: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let capturer = Capturer::new(composite_from_mock(mock), format, dir.path())
            .expect("valid format");
        Self { dir, capturer }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of entries in the output directory
    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.path())
            .expect("read output dir")
            .count()
    }
}

/// Reads `path` back and returns the detected encoding and dimensions
pub fn decode(path: &Path) -> (image::ImageFormat, (u32, u32)) {
    let bytes = std::fs::read(path).expect("read screenshot");
    let format = image::guess_format(&bytes).expect("recognizable image");
    let img = image::load_from_memory(&bytes).expect("decodable image");
    (format, (img.width(), img.height()))
}
