//! Capture orchestration
//!
//! [`Capturer`] is the single entry point for taking a screenshot. One call
//! runs these steps in order:
//!
//! 1. Validate the filename, or generate one when none is given
//! 2. Create the output directory and resolve the absolute target path
//! 3. Acquire pixels from the backend (window or full screen)
//! 4. Encode and write the file
//!
//! Failures in steps 1-2 are validation errors; failures in steps 3-4 are
//! capture failures. Nothing is retried. Either a complete file exists at the
//! returned path or an error is returned.
//!
//! # Examples
//!
//! ```
//! use screensnap::{
//!     Capturer,
//!     capture::{MockBackend, composite_from_mock},
//! };
//!
//! let dir = tempfile::tempdir().unwrap();
//! let capturer = Capturer::new(composite_from_mock(MockBackend::new()), "jpg", dir.path()).unwrap();
//!
//! let output = capturer.capture(Some("shot")).unwrap();
//! assert!(output.path.ends_with("shot.jpg"));
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    capture::{AcquiredImage, CompositeBackend},
    error::{CaptureError, CaptureResult, FilenameRule, MAX_FILENAME_LEN},
    model::{
        Capabilities, CaptureOutput, CaptureRequest, CaptureSource, ImageFormat, ResolvedTarget,
    },
    util::{encode::encode_image, filename},
};

/// Takes screenshots with a fixed format into a fixed directory
#[derive(Debug)]
pub struct Capturer {
    backend:           CompositeBackend,
    format:            ImageFormat,
    output_dir:        PathBuf,
    timestamped_names: bool,
}

impl Capturer {
    /// Creates a capturer, validating `format` once for its lifetime
    ///
    /// The output directory is not touched until the first capture.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidFormat`] unless `format` is `png`,
    /// `jpg` or `jpeg` (any case).
    pub fn new(
        backend: CompositeBackend,
        format: &str,
        output_dir: impl Into<PathBuf>,
    ) -> CaptureResult<Self> {
        let format = ImageFormat::normalize(format)?;

        Ok(Self {
            backend,
            format,
            output_dir: output_dir.into(),
            timestamped_names: true,
        })
    }

    /// Chooses between `screenshot_<timestamp>` (default) and
    /// `screenshot_<n>` auto names
    pub fn with_timestamped_names(mut self, enabled: bool) -> Self {
        self.timestamped_names = enabled;
        self
    }

    /// Output format
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Output directory, as configured
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Capabilities of the underlying backend
    pub fn capabilities(&self) -> Capabilities {
        self.backend.capabilities()
    }

    /// The underlying backend
    pub fn backend(&self) -> &CompositeBackend {
        &self.backend
    }

    /// Builds a request with this capturer's format and directory
    pub fn request(&self, filename: Option<&str>, window_title: Option<&str>) -> CaptureRequest {
        CaptureRequest {
            raw_filename:        filename.map(str::to_string),
            format:              self.format,
            output_directory:    self.output_dir.clone(),
            window_title_filter: window_title.map(str::to_string),
        }
    }

    /// Captures the full screen
    ///
    /// `None` or an empty filename selects an auto-generated name.
    pub fn capture(&self, filename: Option<&str>) -> CaptureResult<CaptureOutput> {
        self.execute(&self.request(filename, None))
    }

    /// Captures the first window whose title contains `title`
    ///
    /// Falls back to the full screen when no window matches or window capture
    /// is unavailable; the fallback is reported in [`CaptureOutput::source`].
    pub fn capture_window(
        &self,
        title: &str,
        filename: Option<&str>,
    ) -> CaptureResult<CaptureOutput> {
        self.execute(&self.request(filename, Some(title)))
    }

    /// Runs one capture request to completion
    pub fn execute(&self, request: &CaptureRequest) -> CaptureResult<CaptureOutput> {
        let target = self.resolve_target(request)?;
        tracing::debug!("Resolved target: {}", target.absolute_path.display());

        let acquired = self.acquire(request)?;
        if let Some(notice) = acquired.source.fallback() {
            tracing::debug!("Capture downgraded: {}", notice);
        }

        let bytes = encode_image(&acquired.image, target.format)?;

        if let Err(e) = fs::write(&target.absolute_path, &bytes) {
            tracing::error!(
                "Failed to write {}: {}",
                target.absolute_path.display(),
                e
            );
            // Leave nothing behind on a partial write
            let _ = fs::remove_file(&target.absolute_path);
            return Err(CaptureError::IoError(e));
        }

        tracing::info!(
            "Saved screenshot to {} ({} bytes)",
            target.absolute_path.display(),
            bytes.len()
        );

        Ok(CaptureOutput {
            path:      target.absolute_path,
            byte_size: bytes.len() as u64,
            source:    acquired.source,
        })
    }

    /// Validates the filename and resolves the absolute output path
    ///
    /// Creates the output directory (and parents) if it does not exist.
    /// Auto-generated names that already exist get a `_<n>` suffix; explicit
    /// names are returned as is and will be overwritten.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::InvalidFilename`] if the name is rejected
    /// - [`CaptureError::OutputDirectory`] if the directory cannot be created
    pub fn resolve_target(&self, request: &CaptureRequest) -> CaptureResult<ResolvedTarget> {
        let raw = request.raw_filename.as_deref().unwrap_or_default();
        let sanitized = filename::sanitize_filename(raw)?;

        let explicit_name = if sanitized.is_empty() {
            None
        } else {
            let name = filename::with_extension(&sanitized, request.format);
            let length = name.chars().count();
            if length > MAX_FILENAME_LEN {
                return Err(CaptureError::InvalidFilename {
                    filename: raw.to_string(),
                    rule:     FilenameRule::TooLong { length },
                });
            }
            Some(name)
        };

        let directory = Self::prepare_directory(&request.output_directory)?;

        let name = match explicit_name {
            Some(name) => name,
            None => self.free_auto_name(&directory, request.format),
        };

        Ok(ResolvedTarget {
            absolute_path: directory.join(name),
            format:        request.format,
        })
    }

    fn prepare_directory(directory: &Path) -> CaptureResult<PathBuf> {
        let output_directory_error = |source: std::io::Error| CaptureError::OutputDirectory {
            path: directory.to_path_buf(),
            source,
        };

        fs::create_dir_all(directory).map_err(output_directory_error)?;
        std::path::absolute(directory).map_err(output_directory_error)
    }

    /// Picks the first auto name not already present in `directory`
    fn free_auto_name(&self, directory: &Path, format: ImageFormat) -> String {
        if self.timestamped_names {
            let base = filename::generate_filename(format);
            if !directory.join(&base).exists() {
                return base;
            }

            (1..)
                .map(|n| filename::with_counter(&base, n))
                .find(|candidate| !directory.join(candidate).exists())
                .unwrap_or(base)
        } else {
            (1..)
                .map(|n| filename::sequential_filename(format, n))
                .find(|candidate| !directory.join(candidate).exists())
                .unwrap_or_else(|| filename::sequential_filename(format, 0))
        }
    }

    fn acquire(&self, request: &CaptureRequest) -> CaptureResult<AcquiredImage> {
        match request.window_title_filter.as_deref() {
            Some(filter) => {
                if !self.backend.capabilities().supports_window_capture() {
                    tracing::debug!("Window capture unavailable, full screen will be used");
                }
                self.backend.capture_window_by_title(filter)
            }
            None => Ok(AcquiredImage {
                image:  self.backend.capture_full_screen()?,
                source: CaptureSource::FullScreen { fallback: None },
            }),
        }
    }
}
