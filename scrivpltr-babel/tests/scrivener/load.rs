use scrivpltr_babel::formats::ScrivenerFormat;
use scrivpltr_babel::loader;
use scrivpltr_babel::{Error, ErrorKind};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/scrivener/fixtures")
        .join(name)
}

#[test]
fn test_load_version_2_project() {
    let path = fixture("project.scrivx");
    let loaded = loader::load(&path, &ScrivenerFormat).expect("Failed to load");

    let root = &loaded.document.root;
    assert_eq!(root.type_label, "ScrivenerProject");
    assert_eq!(root.attribute("Version"), Some("2.0"));
    assert_eq!(root.attribute("Creator"), Some("SCRMAC-3.3.6"));

    // Attributes keep document order
    let keys: Vec<_> = root.attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Template", "Version", "Identifier", "Creator"]);

    let labels: Vec<_> = root.children.iter().map(|n| n.type_label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["ScrivenerChapter", "ScrivenerChapter", "Research"]
    );

    let departure = &root.children[0];
    assert_eq!(departure.children[0].text.as_deref(), Some("Departure"));
    assert_eq!(
        departure.children[2].children[0].text.as_deref(),
        Some("Packing & leaving")
    );

    assert_eq!(loaded.folder, fixture(""));
}

#[test]
fn test_load_version_1_project_is_rejected() {
    let path = fixture("project_v1.scrivx");
    let err = loader::load(&path, &ScrivenerFormat).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    match &err {
        Error::UnsupportedVersion {
            path: reported,
            found,
            ..
        } => {
            assert_eq!(reported, &path);
            assert_eq!(found.as_deref(), Some("1.0"));
        }
        other => panic!("Expected UnsupportedVersion, found {other:?}"),
    }
    assert!(err.to_string().contains("got 1.0"));
}

#[test]
fn test_missing_version_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bare.scrivx");
    fs::write(&path, "<ScrivenerProject><Binder/></ScrivenerProject>").unwrap();

    match loader::load(&path, &ScrivenerFormat).unwrap_err() {
        Error::UnsupportedVersion { found, .. } => assert_eq!(found, None),
        other => panic!("Expected UnsupportedVersion, found {other:?}"),
    }
}

#[test]
fn test_wrong_extension_is_rejected_before_parsing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("project.xml");
    fs::copy(fixture("project.scrivx"), &path).unwrap();

    let err = loader::load(&path, &ScrivenerFormat).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFileType);

    // Extension matching is case-sensitive
    let upper = dir.path().join("project.SCRIVX");
    fs::copy(fixture("project.scrivx"), &upper).unwrap();
    assert_eq!(
        loader::load(&upper, &ScrivenerFormat).unwrap_err().kind(),
        ErrorKind::InvalidFileType
    );
}

#[test]
fn test_scriv_bundle_directory_is_not_a_file() {
    let dir = tempdir().unwrap();
    let bundle = dir.path().join("book.scrivx");
    fs::create_dir(&bundle).unwrap();

    let err = loader::load(&bundle, &ScrivenerFormat).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAFile);
}

#[test]
fn test_missing_file_is_not_found() {
    let err = loader::load(fixture("does-not-exist.scrivx"), &ScrivenerFormat).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("does-not-exist.scrivx"));
}

#[test]
fn test_invalid_utf8_is_parse_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binary.scrivx");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x3c]).unwrap();

    let err = loader::load(&path, &ScrivenerFormat).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}
