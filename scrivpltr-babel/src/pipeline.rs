//! Conversion pipeline.
//!
//! Provides a high-level API that converts a project file on disk into the other format:
//! pick the direction, load and validate the source, convert it with a mapping table and
//! write the result. This is what the CLI runs.
//!
//! For more control over the individual steps, use [`crate::loader`], [`crate::convert()`]
//! and [`FormatRegistry`] directly.

use crate::convert::{convert, ConversionReport};
use crate::error::{Error, Result};
use crate::loader;
use crate::mappings::{Direction, MappingTable};
use crate::registry::FormatRegistry;
use crate::tree::Document;
use std::path::{Path, PathBuf};

/// Specifies how to convert a project file.
///
/// ```ignore
/// let spec = ConvertSpec::new("book.scrivx")
///     .with_output_path("book.pltr")
///     .with_direction(Direction::ScrivenerToPlottr);
/// ```
///
/// Without a direction, it is detected from the input extension. Without an output path, the
/// input path with the target format's extension is used; an existing file there is only
/// replaced when `overwrite` is set, since it is usually the project that was converted from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSpec {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub direction: Option<Direction>,
    /// Convert without writing the target file.
    pub dry_run: bool,
    /// Replace an existing file at the default output path.
    pub overwrite: bool,
}

impl ConvertSpec {
    pub fn new(input: impl AsRef<Path>) -> Self {
        ConvertSpec {
            input: input.as_ref().to_path_buf(),
            output: None,
            direction: None,
            dry_run: false,
            overwrite: false,
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// The result of a successful [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutcome {
    pub direction: Direction,
    /// Where the target was written; `None` for dry runs.
    pub output: Option<PathBuf>,
    /// Folder containing the source project.
    pub source_folder: PathBuf,
    pub document: Document,
    pub report: ConversionReport,
}

/// Detect the conversion direction from the input file name.
pub fn detect_direction(registry: &FormatRegistry, input: &Path) -> Result<Direction> {
    registry
        .detect_format_from_filename(input)
        .and_then(|name| Direction::from_source_format(&name))
        .ok_or_else(|| {
            let extensions: Vec<String> = registry
                .list_formats()
                .iter()
                .filter_map(|name| registry.get(name).ok())
                .map(|format| format.extension().to_string())
                .collect();
            Error::InvalidFileType {
                path: input.to_path_buf(),
                expected: extensions.join(" or ."),
            }
        })
}

/// Load, convert and write according to `spec`.
///
/// # Errors
///
/// Any loader error for the input, [`Error::Io`] if the output cannot be written,
/// [`Error::InvalidFileType`] when the direction cannot be detected, or
/// [`Error::OutputExists`] when the default output path is taken and `overwrite` is unset.
pub fn run(spec: &ConvertSpec, table: &MappingTable) -> Result<ConvertOutcome> {
    let registry = FormatRegistry::with_defaults();

    let direction = match spec.direction {
        Some(direction) => direction,
        None => detect_direction(&registry, &spec.input)?,
    };
    let source_format = registry.get(direction.source_format())?;
    let target_format = registry.get(direction.target_format())?;

    tracing::info!(
        "Converting {} to {}",
        source_format.description(),
        target_format.description()
    );

    let loaded = loader::load(&spec.input, source_format)?;

    let output = match &spec.output {
        Some(path) => path.clone(),
        None => {
            let path = spec.input.with_extension(target_format.extension());
            if !spec.dry_run && !spec.overwrite && path.exists() {
                tracing::error!("Not replacing existing {}", path.display());
                return Err(Error::OutputExists { path });
            }
            path
        }
    };

    let conversion = convert(&loaded.document, table, direction);
    log_report(&conversion.report);

    let output = if spec.dry_run {
        None
    } else {
        loader::write(&output, &conversion.document, target_format)?;
        Some(output)
    };

    Ok(ConvertOutcome {
        direction,
        output,
        source_folder: loaded.folder,
        document: conversion.document,
        report: conversion.report,
    })
}

fn log_report(report: &ConversionReport) {
    for omission in &report.omitted {
        tracing::warn!(
            "No enabled mapping for '{}' at {}; skipped {} node(s)",
            omission.type_label,
            omission.path,
            omission.subtree_size
        );
    }
    tracing::info!(
        "Converted {} node(s), omitted {}",
        report.converted,
        report.omitted_count()
    );
}
