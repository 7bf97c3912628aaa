//! Scanner configuration.
//!
//! ```toml
//! strict = false
//! void_elements = ["br", "hr", "img"]
//! ```

use serde::Deserialize;

use crate::MarkupError;

/// HTML elements that never take a closing tag.
const DEFAULT_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Markup scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Fail on unbalanced tags instead of keeping them as literal text.
    pub strict: bool,
    /// Element names that are never closed and occupy no text.
    pub void_elements: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            strict: false,
            void_elements: DEFAULT_VOID_ELEMENTS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }
}

impl MarkupConfig {
    /// Parse configuration from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Config`] if the TOML is invalid or has wrong types.
    pub fn from_toml_str(content: &str) -> Result<Self, MarkupError> {
        Ok(toml::from_str(content)?)
    }

    /// Whether `name` is configured as a void element (case-insensitive).
    #[must_use]
    pub fn is_void(&self, name: &str) -> bool {
        self.void_elements
            .iter()
            .any(|void| void.eq_ignore_ascii_case(name))
    }
}
