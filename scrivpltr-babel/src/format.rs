//! Format trait definition
//!
//! This module defines the core Format trait that both project formats implement.
//! The trait provides a uniform interface for parsing, validating and serializing documents,
//! so the loader, the writer and the conversion pipeline never need to know which format
//! they are handling.

use crate::error::{Error, Result};
use crate::tree::{Document, Node, MAX_DEPTH};
use std::path::Path;

/// Trait for project document formats
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn extension(&self) -> &str {
///         "mine"
///     }
///
///     fn root_label(&self) -> &str {
///         "MyProject"
///     }
///
///     fn parse(&self, source: &str, path: &Path) -> Result<Document> {
///         todo!()
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "scrivener", "plottr")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extension required for this format, without the leading dot.
    fn extension(&self) -> &str;

    /// Type label of the project container node produced when converting into this format.
    fn root_label(&self) -> &str;

    /// Parse source text into a Document.
    ///
    /// `path` is only used to label errors.
    fn parse(&self, source: &str, path: &Path) -> Result<Document>;

    /// Check format-specific invariants (such as a version marker) on a parsed document.
    ///
    /// Formats without such invariants accept every parsed document.
    fn validate(&self, _doc: &Document, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Set the root attributes [`Format::validate`] requires on a freshly converted root.
    fn stamp_root(&self, _root: &mut Node) {}

    /// Serialize a Document into source text.
    fn serialize(&self, doc: &Document) -> Result<String>;
}

pub(crate) fn serialization_error(format: &dyn Format, message: impl std::fmt::Display) -> Error {
    Error::Serialization(format!("{}: {message}", format.name()))
}

/// Refuse to write trees that could not be read back.
pub(crate) fn check_depth(format: &dyn Format, doc: &Document) -> Result<()> {
    let depth = doc.depth();
    if depth > MAX_DEPTH {
        return Err(serialization_error(
            format,
            format!("tree is {depth} levels deep, at most {MAX_DEPTH} are supported"),
        ));
    }
    Ok(())
}
