//! Window title matching
//!
//! A window filter selects the first window (in backend enumeration order)
//! whose title contains the filter as a case-insensitive substring.
//! Enumeration order is platform-defined and may change between calls, so
//! "first" is only stable for a single enumeration.
//!
//! An empty filter is a substring of every title and therefore selects the
//! first window.

use crate::model::WindowInfo;

/// Returns the first window whose title contains `substring`, ignoring case
///
/// # Examples
///
/// ```
/// use screensnap::{capture::matching::find_by_title, model::WindowInfo};
///
/// let windows = vec![
///     WindowInfo::new("1", "Terminal"),
///     WindowInfo::new("2", "Google Chrome"),
/// ];
///
/// assert_eq!(find_by_title("chrome", &windows).unwrap().id, "2");
/// assert_eq!(find_by_title("", &windows).unwrap().id, "1");
/// assert!(find_by_title("Firefox", &windows).is_none());
/// ```
pub fn find_by_title<'a>(substring: &str, windows: &'a [WindowInfo]) -> Option<&'a WindowInfo> {
    let substring_lower = substring.to_lowercase();

    let found = windows
        .iter()
        .find(|window| window.title.to_lowercase().contains(&substring_lower));

    if let Some(window) = found {
        tracing::debug!(
            "Substring matched window: {} (title: {})",
            window.id,
            window.title
        );
    }

    found
}
