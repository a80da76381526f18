//! Platform detection
//!
//! Detects the operating system and the display session at runtime. The
//! result drives backend selection in
//! [`create_default_backend`](crate::capture::create_default_backend): a
//! Linux session with neither `$WAYLAND_DISPLAY` nor `$DISPLAY` has nothing
//! to capture.

use std::env;

use crate::model::{BackendType, PlatformInfo};

/// Detects the current platform and display backend
///
/// # Platform-specific behavior
///
/// ## Linux
/// - `$WAYLAND_DISPLAY` set and non-empty: `BackendType::Wayland`
/// - otherwise `$DISPLAY` set and non-empty: `BackendType::X11`
/// - otherwise `BackendType::None`
///
/// ## Windows / macOS
/// - Always `BackendType::Windows` / `BackendType::MacOS`
///
/// ## Other platforms
/// - `BackendType::None`
///
/// # Examples
///
/// ```
/// use screensnap::util::detect::detect_platform;
///
/// let platform = detect_platform();
/// println!("Running on: {} with backend: {}", platform.os, platform.backend);
/// ```
pub fn detect_platform() -> PlatformInfo {
    detect_platform_with_env(|key| env::var(key).ok())
}

/// Platform detection with an injectable environment lookup
fn detect_platform_with_env<F>(_env_provider: F) -> PlatformInfo
where
    F: Fn(&str) -> Option<String>,
{
    #[cfg(target_os = "linux")]
    {
        PlatformInfo::new("linux".to_string(), detect_linux_backend(&_env_provider))
    }

    #[cfg(target_os = "windows")]
    {
        PlatformInfo::new("windows".to_string(), BackendType::Windows)
    }

    #[cfg(target_os = "macos")]
    {
        PlatformInfo::new("macos".to_string(), BackendType::MacOS)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        PlatformInfo::new(env::consts::OS.to_string(), BackendType::None)
    }
}

#[cfg(target_os = "linux")]
fn detect_linux_backend<F>(env_provider: &F) -> BackendType
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |key: &str| env_provider(key).is_some_and(|value| !value.is_empty());

    if is_set("WAYLAND_DISPLAY") {
        BackendType::Wayland
    } else if is_set("DISPLAY") {
        BackendType::X11
    } else {
        BackendType::None
    }
}
