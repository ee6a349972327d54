//! Node-type mapping table
//!
//! The mapping table translates node type labels between the two formats. Each rule pairs a
//! Scrivener type with a Plottr type, so one table serves both conversion directions: the
//! [`Direction`] decides which side of a rule is the source and which is the target.
//!
//! The table is persisted as a JSON array whose objects use the keys `plottr`, `scrivener`,
//! `description` and `use`. These names are part of the on-disk contract and must not change.
//!
//! Loading never fails. A missing or unreadable file is replaced by [`default_rules`], and the
//! defaults are written back unless the caller asks for [`Persistence::Skip`]. The outcome
//! ([`MappingLoad`]) tells the caller whether that happened and why.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Which format is read and which is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ScrivenerToPlottr,
    PlottrToScrivener,
}

impl Direction {
    /// Registry name of the format being read.
    pub fn source_format(self) -> &'static str {
        match self {
            Direction::ScrivenerToPlottr => "scrivener",
            Direction::PlottrToScrivener => "plottr",
        }
    }

    /// Registry name of the format being written.
    pub fn target_format(self) -> &'static str {
        self.inverse().source_format()
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::ScrivenerToPlottr => Direction::PlottrToScrivener,
            Direction::PlottrToScrivener => Direction::ScrivenerToPlottr,
        }
    }

    /// The direction that reads `format`, if it is one of the two project formats.
    pub fn from_source_format(format: &str) -> Option<Self> {
        match format {
            "scrivener" => Some(Direction::ScrivenerToPlottr),
            "plottr" => Some(Direction::PlottrToScrivener),
            _ => None,
        }
    }
}

/// One Scrivener type ↔ Plottr type translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub plottr: String,
    pub scrivener: String,
    pub description: String,
    #[serde(rename = "use")]
    pub enabled: bool,
}

impl MappingRule {
    /// An enabled rule.
    pub fn new(
        scrivener: impl Into<String>,
        plottr: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        MappingRule {
            plottr: plottr.into(),
            scrivener: scrivener.into(),
            description: description.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The type this rule matches when reading in `direction`.
    pub fn source(&self, direction: Direction) -> &str {
        match direction {
            Direction::ScrivenerToPlottr => &self.scrivener,
            Direction::PlottrToScrivener => &self.plottr,
        }
    }

    /// The type this rule produces when writing in `direction`.
    pub fn target(&self, direction: Direction) -> &str {
        self.source(direction.inverse())
    }
}

/// The built-in table used when no usable configuration exists.
pub fn default_rules() -> Vec<MappingRule> {
    vec![
        MappingRule::new(
            "ScrivenerScene",
            "PlottrScene",
            "Maps a Plottr scene to a Scrivener scene.",
        ),
        MappingRule::new(
            "ScrivenerChapter",
            "PlottrChapter",
            "Maps a Plottr chapter to a Scrivener chapter.",
        ),
    ]
}

/// Whether [`MappingTable::load_with`] may write the default table back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    #[default]
    Write,
    Skip,
}

/// Outcome of [`MappingTable::load`].
#[derive(Debug)]
pub struct MappingLoad {
    pub table: MappingTable,
    /// Why the defaults were substituted (`NotFound` or `MappingLoadFailure`), if they were.
    pub fallback: Option<Error>,
    /// Set when the defaults could not be written back.
    pub persist_error: Option<Error>,
}

impl MappingLoad {
    pub fn defaults_substituted(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Ordered list of mapping rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        MappingTable { rules }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_rules())
    }

    /// Load the table at `path`, substituting and persisting the defaults if needed.
    pub fn load(path: impl AsRef<Path>) -> MappingLoad {
        Self::load_with(path, Persistence::Write)
    }

    /// Load the table at `path`, substituting the defaults if needed.
    ///
    /// With [`Persistence::Skip`] the filesystem is never written.
    pub fn load_with(path: impl AsRef<Path>, persistence: Persistence) -> MappingLoad {
        let path = path.as_ref();

        let reason = match read_table(path) {
            Ok(table) => {
                tracing::info!("Loaded mappings from {}", path.display());
                return MappingLoad {
                    table,
                    fallback: None,
                    persist_error: None,
                };
            }
            Err(reason) => reason,
        };

        match &reason {
            Error::NotFound { .. } => tracing::warn!(
                "Mappings file {} does not exist, using default mappings",
                path.display()
            ),
            other => {
                tracing::error!("{other}");
                tracing::warn!("Using default mappings due to an error");
            }
        }

        let table = Self::with_defaults();
        let persist_error = match persistence {
            Persistence::Write => table.save(path).err(),
            Persistence::Skip => None,
        };

        MappingLoad {
            table,
            fallback: Some(reason),
            persist_error,
        }
    }

    /// Write the table to `path` as pretty JSON, replacing the file.
    ///
    /// Missing parent directories are created.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let written = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
        .and_then(|_| fs::write(path, json));

        match written {
            Ok(()) => {
                tracing::info!("Saved mappings to {}", path.display());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error saving mappings file {}: {e}", path.display());
                Err(Error::io(path, e))
            }
        }
    }

    fn to_json(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(out)
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: MappingRule) {
        self.rules.push(rule);
    }

    /// Enable the rule at `index`. Returns `false` (and changes nothing) when out of range.
    pub fn enable(&mut self, index: usize) -> bool {
        self.edit(index, "Enabled", |rule| rule.enabled = true)
    }

    /// Disable the rule at `index`. Returns `false` (and changes nothing) when out of range.
    pub fn disable(&mut self, index: usize) -> bool {
        self.edit(index, "Disabled", |rule| rule.enabled = false)
    }

    /// Replace the description of the rule at `index`. Returns `false` when out of range.
    pub fn update_description(&mut self, index: usize, description: impl Into<String>) -> bool {
        let description = description.into();
        self.edit(index, "Updated description for", |rule| {
            rule.description = description
        })
    }

    fn edit(&mut self, index: usize, action: &str, apply: impl FnOnce(&mut MappingRule)) -> bool {
        match self.rules.get_mut(index) {
            Some(rule) => {
                apply(rule);
                tracing::info!("{action} mapping at index {index}");
                true
            }
            None => {
                tracing::warn!("Mapping at index {index} not found");
                false
            }
        }
    }

    /// Target type of the first enabled rule whose source side is `source_type`.
    pub fn resolve(&self, direction: Direction, source_type: &str) -> Option<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled)
            .find(|rule| rule.source(direction) == source_type)
            .map(|rule| rule.target(direction))
    }

    /// Source types claimed by more than one enabled rule, in first-appearance order.
    pub fn ambiguous_sources(&self, direction: Direction) -> Vec<String> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for rule in self.rules.iter().filter(|rule| rule.enabled) {
            *counts.entry(rule.source(direction)).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(source, _)| source.to_string())
            .collect()
    }

    /// Lookup over the enabled rules for one direction.
    ///
    /// Duplicate source types resolve to the first listed rule; each one is logged.
    pub fn view(&self, direction: Direction) -> MappingView<'_> {
        let mut targets = HashMap::new();
        for rule in self.rules.iter().filter(|rule| rule.enabled) {
            targets
                .entry(rule.source(direction))
                .or_insert(rule.target(direction));
        }

        let ambiguous = self.ambiguous_sources(direction);
        for source in &ambiguous {
            tracing::warn!(
                "Mapping source type '{source}' appears in several enabled rules; the first one wins"
            );
        }

        MappingView {
            direction,
            targets,
            ambiguous,
        }
    }
}

impl From<Vec<MappingRule>> for MappingTable {
    fn from(rules: Vec<MappingRule>) -> Self {
        Self::new(rules)
    }
}

fn read_table(path: &Path) -> Result<MappingTable> {
    let source = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::MappingLoadFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    serde_json::from_str(&source).map_err(|e| Error::MappingLoadFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Enabled rules of a [`MappingTable`] for a single direction.
#[derive(Debug, Clone)]
pub struct MappingView<'a> {
    direction: Direction,
    targets: HashMap<&'a str, &'a str>,
    ambiguous: Vec<String>,
}

impl<'a> MappingView<'a> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn resolve(&self, source_type: &str) -> Option<&'a str> {
        self.targets.get(source_type).copied()
    }

    pub fn ambiguous(&self) -> &[String] {
        &self.ambiguous
    }
}
