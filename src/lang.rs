use crate::error::{ReleaseError, Result};
use crate::version::SemanticVersion;

/// Language-specific release conventions.
///
/// Currently only Go projects carry special behavior (the `v` tag prefix and
/// the module-path major-version rule). New ecosystems get a new variant
/// here rather than ad-hoc flags in the formatting code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Go,
}

impl Language {
    /// Parse a language name as given on the command line. An empty name
    /// means "no language-specific behavior".
    pub fn parse(name: &str) -> Result<Option<Language>> {
        if name.is_empty() {
            return Ok(None);
        }
        if name.eq_ignore_ascii_case("go") {
            Ok(Some(Language::Go))
        } else {
            Err(ReleaseError::config(format!(
                "unsupported language: '{}'",
                name
            )))
        }
    }

    /// Prefix applied to version numbers when forming tag names.
    pub fn tag_prefix(&self) -> &'static str {
        match self {
            Language::Go => "v",
        }
    }
}

/// Format a version as a tag name, applying the language prefix if any.
pub fn tag_name(lang: Option<Language>, version: &SemanticVersion) -> String {
    match lang {
        Some(lang) => format!("{}{}", lang.tag_prefix(), version),
        None => version.to_string(),
    }
}
