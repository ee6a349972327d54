//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name or detected from a file name.

use crate::error::{Error, Result};
use crate::format::Format;
use std::collections::HashMap;
use std::path::Path;

/// Registry of project formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
///
/// let format = registry.get("scrivener")?;
/// let loaded = loader::load(path, format)?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| Error::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Extensions are compared case-sensitively, as returned by [`Path::extension`].
    ///
    /// ```ignore
    /// let registry = FormatRegistry::default();
    /// assert_eq!(registry.detect_format_from_filename("book.scrivx"), Some("scrivener".to_string()));
    /// assert_eq!(registry.detect_format_from_filename("book.docx"), None);
    /// ```
    pub fn detect_format_from_filename(&self, filename: impl AsRef<Path>) -> Option<String> {
        let extension = filename.as_ref().extension().and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.extension() == extension)
            .map(|format| format.name().to_string())
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::ScrivenerFormat);
        registry.register(crate::formats::PlottrFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Document, Node};

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn extension(&self) -> &str {
            "tst"
        }
        fn root_label(&self) -> &str {
            "TestRoot"
        }
        fn parse(&self, _source: &str, _path: &Path) -> Result<Document> {
            Ok(Document::new(Node::new("TestRoot")))
        }
        fn serialize(&self, _doc: &Document) -> Result<String> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.formats.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_get() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let format = registry.get("test");
        assert!(format.is_ok());
        assert_eq!(format.unwrap().name(), "test");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = FormatRegistry::new();
        match registry.get("nonexistent") {
            Err(Error::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            Err(other) => panic!("Expected FormatNotFound error, got {other:?}"),
            Ok(_) => panic!("Expected FormatNotFound error"),
        }
    }

    #[test]
    fn test_registry_replace_format() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat); // Replace

        assert_eq!(registry.list_formats().len(), 1);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["plottr", "scrivener"]);
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::with_defaults();

        assert_eq!(
            registry.detect_format_from_filename("book.scrivx"),
            Some("scrivener".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("/path/to/book.scriv/book.scrivx"),
            Some("scrivener".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("book.pltr"),
            Some("plottr".to_string())
        );

        assert_eq!(registry.detect_format_from_filename("book.docx"), None);
        assert_eq!(registry.detect_format_from_filename("book"), None);
    }

    #[test]
    fn test_detect_format_case_sensitive() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.detect_format_from_filename("BOOK.SCRIVX"), None);
    }
}
