//! Mapping-driven conversion between Scrivener and Plottr projects
//!
//!     This crate converts writing projects between a Scrivener 3 project (`.scrivx`, XML) and a
//!     Plottr project (`.pltr`, JSON). Node types are translated through a user editable mapping
//!     table; everything else (attributes, text, ordering) is carried through as is.
//!
//!     This is a pure lib, that is, it powers scrivpltr-cli but is shell agnostic: no code here
//!     prints, reads env vars or installs a log subscriber. Diagnostics go through `tracing`.
//!
//! Architecture
//!
//!     Both formats parse into the same tree (./tree.rs). Formats only deal with their text
//!     representation, the mapping table only with type labels, and the conversion engine
//!     only with trees. The loader and pipeline glue these together.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Error and ErrorKind
//!     ├── tree.rs                 # Node / Document
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── scrivener           # XML: parser.rs, serializer.rs, version check
//!     │   └── plottr              # JSON node tree
//!     ├── loader.rs               # Staged load (path, kind, parse, version) and write
//!     ├── mappings.rs             # Mapping table, defaults, persistence, resolution
//!     ├── convert.rs              # Tree walk and omission report
//!     └── pipeline.rs             # Detect direction, load, convert, write
//!
//! Testing
//!
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Lossy Conversions
//!
//!     Any node whose type has no enabled rule is dropped together with its subtree. The report
//!     returned by the conversion lists every such drop. Round tripping A→B→A is exact only when
//!     every type in the tree is enabled in both directions.

pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod loader;
pub mod mappings;
pub mod pipeline;
pub mod registry;
pub mod tree;

pub use convert::{convert, Conversion, ConversionReport, Omission};
pub use error::{Error, ErrorKind, Result};
pub use format::Format;
pub use loader::LoadedDocument;
pub use mappings::{Direction, MappingLoad, MappingRule, MappingTable, Persistence};
pub use registry::FormatRegistry;
pub use tree::{Document, Node};
