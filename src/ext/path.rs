use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Extension trait for Path to provide convenient string conversion methods
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Returns
    /// * `Ok(&str)` - A string slice representing the path
    /// * `Err(Error)` - If the path contains invalid Unicode characters
    ///
    /// # Examples
    /// ```
    /// use xcookie::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// The `/`-separated form of a relative path, used as the key of the
    /// manifest and matched against `--regen` globs on every platform.
    ///
    /// # Examples
    /// ```
    /// use xcookie::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("requirements").join("tests.txt");
    /// assert_eq!(path.to_manifest_key().unwrap(), "requirements/tests.txt");
    /// ```
    fn to_manifest_key(&self) -> Result<String>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_manifest_key(&self) -> Result<String> {
        let mut parts = Vec::new();
        for component in self.components() {
            match component {
                Component::Normal(part) => parts.push(Path::new(part).to_str_checked()?),
                Component::CurDir => {}
                _ => {
                    return Err(Error::ProcessError {
                        path: self.display().to_string(),
                        e: "expected a relative path inside the repository".to_string(),
                    })
                }
            }
        }
        Ok(parts.join("/"))
    }
}
