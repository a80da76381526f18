//! Output filename validation and generation
//!
//! [`sanitize_filename`] is pure string validation: it never touches the
//! filesystem and rejects rather than corrects. [`generate_filename`] builds
//! the default `screenshot_<YYYYMMDD_HHMMSS>.<ext>` name from local time.
//!
//! Two auto-generated names taken within the same second are identical.
//! Resolving that collision is left to the caller, which can probe the
//! directory and use [`with_counter`].

use chrono::{Local, NaiveDateTime};

use crate::{
    error::{CaptureError, CaptureResult, FilenameRule, MAX_FILENAME_LEN, RESERVED_CHARS},
    model::ImageFormat,
};

/// Prefix shared by every auto-generated name
pub const AUTO_NAME_PREFIX: &str = "screenshot_";

/// Validates a caller-supplied filename
///
/// An empty input is passed through unchanged; it means "generate a name".
/// Otherwise the name is rejected when:
///
/// - it is not a single path component (contains `/` or `\`, or is `.`/`..`)
/// - it is longer than 255 characters
/// - it contains one of `< > : " / \ | ? *`
/// - it contains a control character
///
/// # Errors
///
/// Returns [`CaptureError::InvalidFilename`] naming the violated rule.
///
/// # Examples
///
/// ```
/// use screensnap::util::filename::sanitize_filename;
///
/// assert_eq!(sanitize_filename("shot.png").unwrap(), "shot.png");
/// assert_eq!(sanitize_filename("").unwrap(), "");
/// assert!(sanitize_filename("../etc/passwd").is_err());
/// assert!(sanitize_filename("what?.png").is_err());
/// ```
pub fn sanitize_filename(raw: &str) -> CaptureResult<String> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    let reject = |rule: FilenameRule| {
        tracing::debug!("Rejected filename '{}': {}", raw, rule);
        Err(CaptureError::InvalidFilename {
            filename: raw.to_string(),
            rule,
        })
    };

    // Final component taken on both separator styles, regardless of host OS
    let basename = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    if basename != raw || basename == "." || basename == ".." {
        return reject(FilenameRule::PathComponents);
    }

    let length = raw.chars().count();
    if length > MAX_FILENAME_LEN {
        return reject(FilenameRule::TooLong { length });
    }

    if let Some(c) = raw.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return reject(FilenameRule::ReservedCharacter(c));
    }

    if raw.chars().any(char::is_control) {
        return reject(FilenameRule::ControlCharacter);
    }

    Ok(raw.to_string())
}

/// Appends the format's extension unless `name` already ends with it
///
/// The comparison ignores ASCII case, so `shot.PNG` is kept as is for PNG.
/// Only the requested format's own spelling counts: `shot.jpeg` requested as
/// `jpg` becomes `shot.jpeg.jpg`.
///
/// # Examples
///
/// ```
/// use screensnap::{model::ImageFormat, util::filename::with_extension};
///
/// assert_eq!(with_extension("shot.png", ImageFormat::Png), "shot.png");
/// assert_eq!(with_extension("shot", ImageFormat::Jpg), "shot.jpg");
/// ```
pub fn with_extension(name: &str, format: ImageFormat) -> String {
    let ext = format.extension();
    let has_extension = name
        .rsplit_once('.')
        .is_some_and(|(_, found)| found.eq_ignore_ascii_case(ext));

    if has_extension {
        name.to_string()
    } else {
        format!("{}.{}", name, ext)
    }
}

/// Generates the default filename from the current local time
///
/// Second resolution: `screenshot_20240315_093000.png`.
pub fn generate_filename(format: ImageFormat) -> String {
    filename_for_timestamp(format, Local::now().naive_local())
}

/// Builds the timestamped filename for a given instant
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use screensnap::{model::ImageFormat, util::filename::filename_for_timestamp};
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 15)
///     .and_then(|d| d.and_hms_opt(9, 30, 0))
///     .unwrap();
/// assert_eq!(
///     filename_for_timestamp(ImageFormat::Jpeg, at),
///     "screenshot_20240315_093000.jpeg"
/// );
/// ```
pub fn filename_for_timestamp(format: ImageFormat, at: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        AUTO_NAME_PREFIX,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Builds the `screenshot_<n>.<ext>` name used when timestamps are disabled
pub fn sequential_filename(format: ImageFormat, n: u32) -> String {
    format!("{}{}.{}", AUTO_NAME_PREFIX, n, format.extension())
}

/// Inserts `_<n>` before the extension: `a.png` becomes `a_2.png`
pub fn with_counter(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", name, n),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rule_of(raw: &str) -> FilenameRule {
        match sanitize_filename(raw) {
            Err(CaptureError::InvalidFilename { rule, .. }) => rule,
            other => panic!("expected InvalidFilename for {:?}, got {:?}", raw, other),
        }
    }

    #[test]
    fn test_plain_names_pass_through() {
        for name in ["shot", "shot.png", "my screenshot.jpg", "a..b.png", ".hidden"] {
            assert_eq!(sanitize_filename(name).unwrap(), name);
        }
    }

    #[test]
    fn test_empty_is_auto_name_sentinel() {
        assert_eq!(sanitize_filename("").unwrap(), "");
    }

    #[test]
    fn test_rejects_path_components() {
        for raw in [
            "../evil.png",
            "..\\evil.png",
            "dir/shot.png",
            "dir\\shot.png",
            "/abs.png",
            "shot.png/",
            "..",
            ".",
            "a/../b",
        ] {
            assert_eq!(rule_of(raw), FilenameRule::PathComponents, "{}", raw);
        }
    }

    #[test]
    fn test_length_limit_counts_chars() {
        let max = "a".repeat(MAX_FILENAME_LEN);
        assert!(sanitize_filename(&max).is_ok());

        let long = "a".repeat(MAX_FILENAME_LEN + 1);
        assert_eq!(rule_of(&long), FilenameRule::TooLong { length: 256 });

        // Multi-byte characters count once each
        let wide = "é".repeat(MAX_FILENAME_LEN);
        assert!(sanitize_filename(&wide).is_ok());
    }

    #[test]
    fn test_rejects_reserved_characters() {
        for c in ['<', '>', ':', '"', '|', '?', '*'] {
            let raw = format!("shot{}1.png", c);
            assert_eq!(rule_of(&raw), FilenameRule::ReservedCharacter(c));
        }
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(rule_of("shot\n.png"), FilenameRule::ControlCharacter);
        assert_eq!(rule_of("shot\0.png"), FilenameRule::ControlCharacter);
    }

    #[test]
    fn test_error_message_names_rule() {
        let err = sanitize_filename("x?.png").unwrap_err();
        assert_eq!(err.to_string(), "Invalid filename 'x?.png': invalid character '?'");
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("shot.png", ImageFormat::Png), "shot.png");
        assert_eq!(with_extension("shot.PNG", ImageFormat::Png), "shot.PNG");
        assert_eq!(with_extension("shot", ImageFormat::Jpg), "shot.jpg");
        assert_eq!(with_extension("shot.jpg", ImageFormat::Jpeg), "shot.jpg.jpeg");
        assert_eq!(with_extension("shot.", ImageFormat::Png), "shot..png");
        assert_eq!(with_extension(".png", ImageFormat::Png), ".png");
        assert_eq!(with_extension(".png", ImageFormat::Jpg), ".png.jpg");
    }

    #[test]
    fn test_filename_for_timestamp() {
        let at = NaiveDate::from_ymd_opt(2026, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap();

        assert_eq!(
            filename_for_timestamp(ImageFormat::Png, at),
            "screenshot_20260102_030405.png"
        );
        assert_eq!(
            filename_for_timestamp(ImageFormat::Jpg, at),
            "screenshot_20260102_030405.jpg"
        );
    }

    #[test]
    fn test_generate_filename_shape() {
        let name = generate_filename(ImageFormat::Jpeg);
        assert!(name.starts_with(AUTO_NAME_PREFIX));
        assert!(name.ends_with(".jpeg"));
        // screenshot_ + YYYYMMDD_HHMMSS + .jpeg
        assert_eq!(name.len(), AUTO_NAME_PREFIX.len() + 15 + 5);
        assert!(sanitize_filename(&name).is_ok());
    }

    #[test]
    fn test_sequential_filename() {
        assert_eq!(sequential_filename(ImageFormat::Png, 1), "screenshot_1.png");
        assert_eq!(sequential_filename(ImageFormat::Jpg, 12), "screenshot_12.jpg");
    }

    #[test]
    fn test_with_counter() {
        assert_eq!(
            with_counter("screenshot_20260102_030405.png", 1),
            "screenshot_20260102_030405_1.png"
        );
        assert_eq!(with_counter("noext", 3), "noext_3");
    }
}
