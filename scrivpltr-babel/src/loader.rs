//! Staged document loading and writing.
//!
//! Loading runs four stages in order, each depending on the previous one succeeding:
//!
//! 1. PathCheck: the path must exist (`NotFound`; other metadata errors are `IoFailure`).
//! 2. KindCheck: it must be a regular file (`NotAFile`) with the format's extension
//!    (`InvalidFileType`).
//! 3. Parse: the whole file is read and parsed (`ParseFailure`).
//! 4. VersionCheck: [`Format::validate`] runs on the parsed tree (`UnsupportedVersion`).
//!
//! The first failing stage ends the load. Nothing is returned unless every stage passed.

use crate::error::{Error, Result};
use crate::format::Format;
use crate::tree::Document;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A document that passed every load stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document: Document,
    /// The file the document was read from.
    pub path: PathBuf,
    /// Folder containing `path`, where sibling resource files live.
    pub folder: PathBuf,
}

/// Load and validate the document at `path` as `format`.
pub fn load(path: impl AsRef<Path>, format: &dyn Format) -> Result<LoadedDocument> {
    let path = path.as_ref();

    let metadata = check_path(path)?;
    check_kind(path, &metadata, format)?;
    let document = parse_file(path, format)?;
    check_version(&document, path, format)?;

    let folder = container_folder(path);
    tracing::info!(folder = %folder.display(), "{} project folder", format.name());

    Ok(LoadedDocument {
        document,
        path: path.to_path_buf(),
        folder,
    })
}

/// Serialize `document` as `format` and write it to `path`, replacing any existing file.
pub fn write(path: impl AsRef<Path>, document: &Document, format: &dyn Format) -> Result<()> {
    let path = path.as_ref();
    let text = format.serialize(document)?;
    fs::write(path, text).map_err(|e| {
        tracing::error!("Failed to write {}: {e}", path.display());
        Error::io(path, e)
    })?;
    tracing::info!("Wrote {} document to {}", format.name(), path.display());
    Ok(())
}

fn check_path(path: &Path) -> Result<fs::Metadata> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::error!("The provided file path does not exist: {}", path.display());
            Err(Error::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            tracing::error!("Could not inspect {}: {e}", path.display());
            Err(Error::io(path, e))
        }
    }
}

fn check_kind(path: &Path, metadata: &fs::Metadata, format: &dyn Format) -> Result<()> {
    if !metadata.is_file() {
        tracing::error!("The provided path is not a valid file: {}", path.display());
        return Err(Error::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let extension = path.extension().and_then(|ext| ext.to_str());
    if extension != Some(format.extension()) {
        tracing::error!(
            "The provided file is not a .{} file: {}",
            format.extension(),
            path.display()
        );
        return Err(Error::InvalidFileType {
            path: path.to_path_buf(),
            expected: format.extension().to_string(),
        });
    }

    tracing::info!("Valid {} file: {}", format.name(), path.display());
    Ok(())
}

fn parse_file(path: &Path, format: &dyn Format) -> Result<Document> {
    tracing::info!("Attempting to load {} file: {}", format.name(), path.display());

    let source = fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read {}: {e}", path.display());
        Error::parse(path, e)
    })?;

    let document = format.parse(&source, path).inspect_err(|e| {
        tracing::error!("{e}");
    })?;

    tracing::info!("Successfully parsed {}", path.display());
    Ok(document)
}

fn check_version(document: &Document, path: &Path, format: &dyn Format) -> Result<()> {
    format.validate(document, path).inspect_err(|e| {
        tracing::error!("{e}");
    })
}

fn container_folder(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formats::{PlottrFormat, ScrivenerFormat};
    use crate::tree::Node;
    use tempfile::tempdir;

    const PROJECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ScrivenerProject Version="2.0">
  <ScrivenerChapter>
    <ScrivenerScene/>
  </ScrivenerChapter>
</ScrivenerProject>"#;

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("absent.scrivx"), &ScrivenerFormat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("book.scrivx");
        fs::create_dir(&project).unwrap();

        let err = load(&project, &ScrivenerFormat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAFile);
        assert_eq!(err.path(), Some(project.as_path()));
    }

    #[test]
    fn extension_is_checked_before_parsing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xml");
        fs::write(&path, "this is not xml").unwrap();

        let err = load(&path, &ScrivenerFormat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFileType);
    }

    #[test]
    fn malformed_content_is_parse_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.scrivx");
        fs::write(&path, "<ScrivenerProject Version=\"2.0\">").unwrap();

        let err = load(&path, &ScrivenerFormat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn records_container_folder() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.scrivx");
        fs::write(&path, PROJECT).unwrap();

        let loaded = load(&path, &ScrivenerFormat).expect("load");
        assert_eq!(loaded.folder, dir.path());
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.document.root.type_label, "ScrivenerProject");
        assert_eq!(loaded.document.node_count(), 3);
    }

    #[test]
    fn folder_of_bare_file_name_is_empty() {
        assert_eq!(container_folder(Path::new("book.scrivx")), PathBuf::new());
    }

    #[test]
    fn write_then_load_plottr() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.pltr");
        let doc = Document::new(
            Node::new("PlottrProject").with_child(Node::new("PlottrScene").with_text("Arrival")),
        );

        write(&path, &doc, &PlottrFormat).expect("write");
        let loaded = load(&path, &PlottrFormat).expect("load");
        assert_eq!(loaded.document, doc);
    }

    #[test]
    fn write_into_missing_directory_is_io_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("book.pltr");
        let doc = Document::new(Node::new("PlottrProject"));

        let err = write(&path, &doc, &PlottrFormat).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }
}
