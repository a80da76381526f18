//! Error types for screenshot capture operations
//!
//! Every failure the capture path can produce is a [`CaptureError`]. Errors
//! fall into a small taxonomy (see [`ErrorCategory`]): validation errors are
//! the caller's fault and are never retried, capture failures come from the
//! environment (display session, OS capture call, encoder, disk) and are
//! surfaced with the underlying cause attached.
//!
//! Policy fallbacks (window not found, window capture unavailable) are not
//! errors and never appear here; they are reported through
//! [`CaptureSource`](crate::model::CaptureSource).

use std::{fmt, path::PathBuf};

/// Maximum filename length accepted by the sanitizer, in characters
pub const MAX_FILENAME_LEN: usize = 255;

/// Characters rejected in filenames on every platform
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// The specific sanitization rule a filename violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameRule {
    /// The name contains directory components or is a `.`/`..` segment
    PathComponents,
    /// The name is longer than [`MAX_FILENAME_LEN`] characters
    TooLong {
        /// Length of the rejected name in characters
        length: usize,
    },
    /// The name contains one of [`RESERVED_CHARS`]
    ReservedCharacter(char),
    /// The name contains a control character (including NUL)
    ControlCharacter,
}

impl fmt::Display for FilenameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilenameRule::PathComponents => write!(f, "path components not allowed"),
            FilenameRule::TooLong { length } => {
                write!(f, "filename too long ({} chars). Max: {}", length, MAX_FILENAME_LEN)
            }
            FilenameRule::ReservedCharacter(c) => write!(f, "invalid character '{}'", c),
            FilenameRule::ControlCharacter => write!(f, "control characters not allowed"),
        }
    }
}

/// Broad classification of a [`CaptureError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Requested encoding is not supported (configuration time)
    InvalidFormat,
    /// Filename rejected by the sanitizer
    InvalidFilename,
    /// Other user-input problem detected before capture (output directory)
    Validation,
    /// OS capture, encoding or file write failed
    CaptureFailure,
    /// Writing the preferences file failed
    Preferences,
}

/// Comprehensive error type for screenshot capture operations
///
/// Each variant includes enough context for a human-readable message and
/// provides a remediation hint through [`remediation_hint()`](Self::remediation_hint).
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Requested image format is not one of png, jpg, jpeg
    #[error("Invalid format '{format}'. Must be one of: png, jpg, jpeg")]
    InvalidFormat {
        /// The format string as supplied by the caller
        format: String,
    },

    /// Filename failed sanitization
    #[error("Invalid filename '{filename}': {rule}")]
    InvalidFilename {
        /// The filename as supplied by the caller
        filename: String,
        /// The rule that was violated
        rule:     FilenameRule,
    },

    /// Output directory could not be created
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDirectory {
        /// Directory that could not be created
        path:   PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No capture backend is available for the requested operation
    #[error("Capture backend '{backend}' is not available: {reason}")]
    BackendNotAvailable {
        /// Backend name
        backend: &'static str,
        /// Why it is unavailable
        reason:  String,
    },

    /// The OS-level capture call failed
    #[error("Failed to capture screenshot via {backend}: {reason}")]
    CaptureFailed {
        /// Backend that failed
        backend: &'static str,
        /// Underlying cause
        reason:  String,
    },

    /// Target window was closed during capture
    #[error("Target window was closed or became invalid during capture")]
    WindowClosed,

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// I/O error while writing the screenshot
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Preferences file could not be written
    #[error("Failed to save preferences to {}: {reason}", path.display())]
    PreferencesWrite {
        /// Preferences file location
        path:   PathBuf,
        /// Underlying cause
        reason: String,
    },
}

impl CaptureError {
    /// Classifies this error into the capture error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            CaptureError::InvalidFormat { .. } => ErrorCategory::InvalidFormat,
            CaptureError::InvalidFilename { .. } => ErrorCategory::InvalidFilename,
            CaptureError::OutputDirectory { .. } => ErrorCategory::Validation,
            CaptureError::BackendNotAvailable { .. }
            | CaptureError::CaptureFailed { .. }
            | CaptureError::WindowClosed
            | CaptureError::EncodingFailed { .. }
            | CaptureError::IoError(_) => ErrorCategory::CaptureFailure,
            CaptureError::PreferencesWrite { .. } => ErrorCategory::Preferences,
        }
    }

    /// Returns true for errors caused by caller input (never worth retrying)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::InvalidFormat | ErrorCategory::InvalidFilename | ErrorCategory::Validation
        )
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use screensnap::error::{CaptureError, FilenameRule};
    ///
    /// let error = CaptureError::InvalidFilename {
    ///     filename: "../etc/passwd".to_string(),
    ///     rule:     FilenameRule::PathComponents,
    /// };
    ///
    /// assert!(error.remediation_hint().contains("--output-dir"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::InvalidFormat { .. } => "Use --format png, --format jpg or --format jpeg.",
            CaptureError::InvalidFilename { rule, .. } => match rule {
                FilenameRule::PathComponents => {
                    "Pass a bare file name. Use --output-dir to choose where the screenshot is \
                     written."
                }
                FilenameRule::TooLong { .. } => "Shorten the file name to 255 characters or fewer.",
                FilenameRule::ReservedCharacter(_) | FilenameRule::ControlCharacter => {
                    "Remove characters that are not allowed in file names: < > : \" / \\ | ? *"
                }
            },
            CaptureError::OutputDirectory { .. } => {
                "Check that the output directory path is valid and that you have permission to \
                 create it."
            }
            CaptureError::BackendNotAvailable { .. } => {
                "Screen capture needs a graphical session. Make sure a display is available \
                 (DISPLAY or WAYLAND_DISPLAY on Linux) and that the binary was built with the \
                 xcap-backend feature."
            }
            CaptureError::CaptureFailed { .. } => {
                "The operating system refused the capture. Check screen recording permissions and \
                 retry."
            }
            CaptureError::WindowClosed => {
                "The target window was closed while capturing. Keep the window open, or capture \
                 the full screen instead."
            }
            CaptureError::EncodingFailed { .. } => "Image encoding failed. Try --format png.",
            CaptureError::IoError(_) => {
                "An I/O error occurred. Check file permissions and disk space."
            }
            CaptureError::PreferencesWrite { .. } => {
                "Check that the preferences file location is writable, or pass --config with a \
                 different path."
            }
        }
    }
}
