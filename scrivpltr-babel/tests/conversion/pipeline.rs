use scrivpltr_babel::format::Format;
use scrivpltr_babel::formats::ScrivenerFormat;
use scrivpltr_babel::loader;
use scrivpltr_babel::pipeline::{run, ConvertSpec};
use scrivpltr_babel::{Direction, MappingRule, MappingTable};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/scrivener/fixtures")
        .join(name)
}

fn table_with_titles() -> MappingTable {
    let mut table = MappingTable::with_defaults();
    table.push(MappingRule::new("Title", "Title", "Keeps item titles."));
    table
}

#[test]
fn test_fixture_to_plottr_and_back() {
    let dir = tempdir().unwrap();
    let plottr = dir.path().join("book.pltr");
    let table = table_with_titles();

    let forward = run(
        &ConvertSpec::new(fixture("project.scrivx")).with_output_path(&plottr),
        &table,
    )
    .expect("forward conversion");

    assert_eq!(forward.direction, Direction::ScrivenerToPlottr);
    assert_eq!(forward.report.omitted.len(), 1);
    assert_eq!(forward.report.omitted[0].path, "/ScrivenerProject/Research[2]");
    assert_eq!(forward.report.omitted_count(), 2);

    let written = fs::read_to_string(&plottr).unwrap();
    assert!(written.contains("\"type\": \"PlottrChapter\""));
    assert!(written.contains("Packing & leaving"));
    assert!(!written.contains("Research"));

    let scrivener = dir.path().join("restored.scrivx");
    let backward = run(
        &ConvertSpec::new(&plottr).with_output_path(&scrivener),
        &table,
    )
    .expect("backward conversion");
    assert_eq!(backward.direction, Direction::PlottrToScrivener);
    assert!(backward.report.is_lossless());

    // Everything but the unmapped research folder comes back
    let original = loader::load(fixture("project.scrivx"), &ScrivenerFormat).unwrap();
    let mut expected = original.document.clone();
    expected.root.children.truncate(2);

    let restored = loader::load(&scrivener, &ScrivenerFormat).expect("restored project loads");
    assert_eq!(restored.document, expected);
}

#[test]
fn test_default_mappings_drop_titles() {
    let dir = tempdir().unwrap();
    let outcome = run(
        &ConvertSpec::new(fixture("project.scrivx"))
            .with_output_path(dir.path().join("book.pltr"))
            .dry_run(true),
        &MappingTable::with_defaults(),
    )
    .unwrap();

    let omitted: Vec<_> = outcome
        .report
        .omitted
        .iter()
        .map(|o| o.type_label.as_str())
        .collect();
    assert_eq!(
        omitted,
        vec!["Title", "Title", "Title", "Title", "Research"]
    );
    assert_eq!(
        outcome.report.omitted[0].path,
        "/ScrivenerProject/ScrivenerChapter[0]/Title[0]"
    );
}

#[test]
fn test_restored_xml_keeps_version_marker() {
    let dir = tempdir().unwrap();
    let plottr = dir.path().join("book.pltr");
    let table = table_with_titles();
    run(
        &ConvertSpec::new(fixture("project.scrivx")).with_output_path(&plottr),
        &table,
    )
    .unwrap();

    let loaded = loader::load(&plottr, &scrivpltr_babel::formats::PlottrFormat).unwrap();
    let back = scrivpltr_babel::convert(&loaded.document, &table, Direction::PlottrToScrivener);
    let xml = ScrivenerFormat.serialize(&back.document).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ScrivenerProject Template=\"No\" Version=\"2.0\""));
}
