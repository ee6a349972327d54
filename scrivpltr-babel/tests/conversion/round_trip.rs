//! Property tests for the conversion engine and the two serializers.

use proptest::prelude::*;
use scrivpltr_babel::format::Format;
use scrivpltr_babel::formats::{PlottrFormat, ScrivenerFormat};
use scrivpltr_babel::tree::Attributes;
use scrivpltr_babel::{convert, Direction, Document, MappingTable, Node};
use std::path::Path;

fn label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ScrivenerScene".to_string()),
        Just("ScrivenerChapter".to_string()),
    ]
}

fn attributes() -> impl Strategy<Value = Attributes> {
    prop::collection::vec(("[A-Z][a-zA-Z]{0,6}", "[a-z0-9\"'&<> ]{0,8}"), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect::<Attributes>())
}

fn text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z&<>]{1,10}")
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = (label(), attributes(), text()).prop_map(|(type_label, attributes, text)| Node {
        type_label,
        attributes,
        text,
        children: Vec::new(),
    });

    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            label(),
            attributes(),
            text(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(type_label, attributes, text, children)| Node {
                type_label,
                attributes,
                text,
                children,
            })
    })
}

fn project() -> impl Strategy<Value = Document> {
    (attributes(), prop::collection::vec(node(), 0..4)).prop_map(|(attributes, children)| {
        let mut root = Node::new("ScrivenerProject").with_children(children);
        root.attributes = attributes;
        root.attributes
            .shift_insert(0, "Version".to_string(), "2.0".to_string());
        Document::new(root)
    })
}

proptest! {
    #[test]
    fn conversion_is_deterministic(doc in project()) {
        let table = MappingTable::with_defaults();
        let first = convert(&doc, &table, Direction::ScrivenerToPlottr);
        let second = convert(&doc, &table, Direction::ScrivenerToPlottr);

        prop_assert_eq!(&first.report, &second.report);
        prop_assert_eq!(
            PlottrFormat.serialize(&first.document).unwrap(),
            PlottrFormat.serialize(&second.document).unwrap()
        );
    }

    #[test]
    fn mapped_trees_survive_a_round_trip(doc in project()) {
        let table = MappingTable::with_defaults();
        let there = convert(&doc, &table, Direction::ScrivenerToPlottr);
        prop_assert!(there.report.is_lossless());

        let back = convert(&there.document, &table, Direction::PlottrToScrivener);
        prop_assert!(back.report.is_lossless());
        prop_assert_eq!(back.document, doc);
    }

    #[test]
    fn disabled_types_account_for_every_lost_node(doc in project()) {
        let mut table = MappingTable::with_defaults();
        table.disable(0);

        let result = convert(&doc, &table, Direction::ScrivenerToPlottr);
        prop_assert_eq!(
            result.report.converted + result.report.omitted_count(),
            doc.node_count()
        );
        prop_assert_eq!(result.report.converted, result.document.node_count());
    }

    #[test]
    fn scrivener_xml_reparses_to_same_tree(doc in project()) {
        let xml = ScrivenerFormat.serialize(&doc).unwrap();
        let reparsed = ScrivenerFormat.parse(&xml, Path::new("p.scrivx")).unwrap();
        prop_assert_eq!(reparsed, doc);
    }

    #[test]
    fn plottr_json_reparses_to_same_tree(doc in project()) {
        let converted = convert(&doc, &MappingTable::with_defaults(), Direction::ScrivenerToPlottr);
        let json = PlottrFormat.serialize(&converted.document).unwrap();
        let reparsed = PlottrFormat.parse(&json, Path::new("p.pltr")).unwrap();
        prop_assert_eq!(reparsed, converted.document);
    }
}
