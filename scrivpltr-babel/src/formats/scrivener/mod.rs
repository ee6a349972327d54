//! Scrivener project format (`.scrivx`)
//!
//! A Scrivener 3 project is an XML document whose root element carries a `Version`
//! attribute. Only `Version="2.0"` is accepted: earlier project layouts use a different
//! binder schema and are rejected at load time rather than converted partially.
//!
//! # Element Mapping
//!
//! | XML construct              | Tree                                   |
//! |----------------------------|----------------------------------------|
//! | Element tag name           | `Node::type_label`                     |
//! | Attributes (in order)      | `Node::attributes`                     |
//! | Direct character data      | `Node::text` (trimmed, `None` if blank)|
//! | Child elements             | `Node::children`                       |
//! | Comments, PIs, whitespace  | dropped                                |
//!
//! # Lossy Conversions
//!
//! - Namespace prefixes on tags and attributes are dropped.
//! - Leading and trailing whitespace of character data is trimmed.
//! - Character data interleaved between child elements is merged and written before the
//!   children on output.

use crate::error::{Error, Result};
use crate::format::{check_depth, serialization_error, Format};
use crate::tree::{Document, Node};
use std::path::Path;

mod parser;
mod serializer;

/// Version marker a Scrivener 3 project must carry.
pub const REQUIRED_VERSION: &str = "2.0";

/// Root attribute holding the version marker.
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Type label of the Scrivener project container.
pub const ROOT_LABEL: &str = "ScrivenerProject";

#[derive(Debug, Default, Clone, Copy)]
pub struct ScrivenerFormat;

impl Format for ScrivenerFormat {
    fn name(&self) -> &str {
        "scrivener"
    }

    fn description(&self) -> &str {
        "Scrivener 3 project XML"
    }

    fn extension(&self) -> &str {
        "scrivx"
    }

    fn root_label(&self) -> &str {
        ROOT_LABEL
    }

    fn parse(&self, source: &str, path: &Path) -> Result<Document> {
        parser::parse_document(source).map_err(|e| Error::parse(path, e))
    }

    fn validate(&self, doc: &Document, path: &Path) -> Result<()> {
        match doc.root.attribute(VERSION_ATTRIBUTE) {
            Some(REQUIRED_VERSION) => Ok(()),
            found => Err(Error::UnsupportedVersion {
                path: path.to_path_buf(),
                expected: REQUIRED_VERSION.to_string(),
                found: found.map(str::to_string),
            }),
        }
    }

    /// Converted roots always carry the required version, whatever the source had.
    fn stamp_root(&self, root: &mut Node) {
        match root.attributes.get_mut(VERSION_ATTRIBUTE) {
            Some(version) => *version = REQUIRED_VERSION.to_string(),
            None => {
                root.attributes.shift_insert(
                    0,
                    VERSION_ATTRIBUTE.to_string(),
                    REQUIRED_VERSION.to_string(),
                );
            }
        }
    }

    fn serialize(&self, doc: &Document) -> Result<String> {
        check_depth(self, doc)?;
        serializer::serialize_document(doc).map_err(|e| serialization_error(self, e))
    }
}
