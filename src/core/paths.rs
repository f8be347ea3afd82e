//! Path normalization utilities
//!
//! Ignore rules and results always see '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path form handed to the ignore matcher; directories carry a trailing '/'
pub fn rule_path(path: &str, is_dir: bool) -> String {
    if is_dir && !path.ends_with('/') {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}

/// Check if a file name is hidden (starts with '.')
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Last path segment as a lossy string
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
