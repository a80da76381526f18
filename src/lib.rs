//! screensnap: quick screen and window screenshots for troubleshooting
//!
//! This library validates output filenames, picks a capture backend for the
//! current platform (falling back from window to full-screen capture when
//! needed) and writes PNG or JPEG files. [`Capturer`] is the entry point.

pub mod capture;
pub mod capturer;
pub mod error;
pub mod model;
pub mod util;

pub use capturer::Capturer;
pub use error::{CaptureError, CaptureResult};
