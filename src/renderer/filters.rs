use crate::config::PythonVersion;

// Re-export the case conversion functions registered as filters
pub use cruet::case::{
    kebab::to_kebab_case, pascal::to_pascal_case, screaming_snake::to_screaming_snake_case,
    snake::to_snake_case, train::to_train_case,
};

/// The CPython wheel tag of a version, e.g. `3.10` becomes `cp310`.
/// Values that are not versions are returned unchanged.
pub fn cpython_tag(version: &str) -> String {
    match version.parse::<PythonVersion>() {
        Ok(version) => format!("cp{}{}", version.major, version.minor),
        Err(_) => version.to_string(),
    }
}

/// Python requirement markers, e.g. `3.8` becomes `>=3.8`.
pub fn min_version_spec(version: &str) -> String {
    format!(">={version}")
}

/// An RST section underline as long as `title`.
pub fn rst_underline(title: &str, marker: &str) -> String {
    marker.repeat(title.chars().count())
}
