//! Plottr project format (`.pltr`)
//!
//! Plottr projects are JSON. The tree is stored directly as nested node objects:
//!
//! ```text
//! {
//!   "type": "PlottrProject",
//!   "attributes": { "title": "My Book" },
//!   "children": [
//!     { "type": "PlottrChapter", "children": [ { "type": "PlottrScene" } ] }
//!   ]
//! }
//! ```
//!
//! `attributes`, `text` and `children` may be omitted. Unlike Scrivener, Plottr files carry
//! no version marker we depend on, so every well-formed tree is accepted.
//!
//! Trees deeper than [`MAX_DEPTH`] are rejected both ways, so every file written here can
//! be read back.

use crate::error::{Error, Result};
use crate::format::{check_depth, serialization_error, Format};
use crate::tree::{Document, MAX_DEPTH};
use std::path::Path;

/// Type label of the Plottr project container.
pub const ROOT_LABEL: &str = "PlottrProject";

#[derive(Debug, Default, Clone, Copy)]
pub struct PlottrFormat;

impl Format for PlottrFormat {
    fn name(&self) -> &str {
        "plottr"
    }

    fn description(&self) -> &str {
        "Plottr project JSON"
    }

    fn extension(&self) -> &str {
        "pltr"
    }

    fn root_label(&self) -> &str {
        ROOT_LABEL
    }

    fn parse(&self, source: &str, path: &Path) -> Result<Document> {
        let doc: Document = serde_json::from_str(source).map_err(|e| Error::parse(path, e))?;
        let depth = doc.depth();
        if depth > MAX_DEPTH {
            return Err(Error::parse(
                path,
                format!("nodes are nested {depth} levels deep, at most {MAX_DEPTH} are supported"),
            ));
        }
        Ok(doc)
    }

    fn serialize(&self, doc: &Document) -> Result<String> {
        check_depth(self, doc)?;
        let mut json =
            serde_json::to_string_pretty(doc).map_err(|e| serialization_error(self, e))?;
        json.push('\n');
        Ok(json)
    }
}
