//! Mapping-driven tree conversion
//!
//! Walks a source [`Document`] depth-first, pre-order, and builds the target tree:
//!
//! - The root is the project container. It always becomes the target format's root label,
//!   keeping its attributes and text, and its children are walked. The target format then
//!   stamps the root attributes it requires ([`Format::stamp_root`]), so a Plottr project
//!   always becomes a loadable Scrivener project.
//! - Every other node is looked up in the mapping table for the conversion direction. A match
//!   produces a node with the target type and the same attributes, text and (converted)
//!   children. No match drops the node with its whole subtree and records an [`Omission`].
//!
//! Omissions are never errors: the conversion always completes and the report says what was
//! lost. The walk reads nothing but its arguments, so equal inputs give equal outputs. It
//! recurses once per level; loaded documents are at most
//! [`MAX_DEPTH`](crate::tree::MAX_DEPTH) deep.
//!
//! Converting with a table and then converting the result back with the same table
//! reproduces every node whose type is enabled in both directions.

use crate::format::Format;
use crate::formats::{PlottrFormat, ScrivenerFormat};
use crate::mappings::{Direction, MappingTable, MappingView};
use crate::tree::{Document, Node};

/// A node dropped because no enabled rule matched its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Omission {
    /// Location in the source tree, e.g. `/ScrivenerProject/Binder[0]/BinderItem[2]`.
    pub path: String,
    pub type_label: String,
    /// Nodes lost with this omission, the node itself included.
    pub subtree_size: usize,
}

/// What happened during a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub direction: Direction,
    /// Nodes written to the target tree, root included.
    pub converted: usize,
    /// Dropped subtrees in traversal order.
    pub omitted: Vec<Omission>,
    /// Source types claimed by several enabled rules.
    pub ambiguous: Vec<String>,
}

impl ConversionReport {
    fn new(direction: Direction, ambiguous: Vec<String>) -> Self {
        ConversionReport {
            direction,
            converted: 0,
            omitted: Vec::new(),
            ambiguous,
        }
    }

    /// Total number of source nodes lost, descendants included.
    pub fn omitted_count(&self) -> usize {
        self.omitted.iter().map(|o| o.subtree_size).sum()
    }

    pub fn is_lossless(&self) -> bool {
        self.omitted.is_empty()
    }
}

/// A converted tree together with its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub document: Document,
    pub report: ConversionReport,
}

/// The format written in `direction`.
pub fn target_format(direction: Direction) -> &'static dyn Format {
    match direction {
        Direction::ScrivenerToPlottr => &PlottrFormat,
        Direction::PlottrToScrivener => &ScrivenerFormat,
    }
}

/// Root label of the format written in `direction`.
pub fn target_root_label(direction: Direction) -> &'static str {
    target_format(direction).root_label()
}

/// Convert `source` using the enabled rules of `table` for `direction`.
pub fn convert(source: &Document, table: &MappingTable, direction: Direction) -> Conversion {
    let view = table.view(direction);
    let mut report = ConversionReport::new(direction, view.ambiguous().to_vec());

    let target = target_format(direction);
    let root = &source.root;
    let root_path = format!("/{}", root.type_label);
    let mut target_root = Node {
        type_label: target.root_label().to_string(),
        attributes: root.attributes.clone(),
        text: root.text.clone(),
        children: Vec::new(),
    };
    target.stamp_root(&mut target_root);
    report.converted += 1;
    target_root.children = convert_children(&root.children, &root_path, &view, &mut report);

    Conversion {
        document: Document::new(target_root),
        report,
    }
}

fn convert_children(
    children: &[Node],
    parent_path: &str,
    view: &MappingView<'_>,
    report: &mut ConversionReport,
) -> Vec<Node> {
    let mut converted = Vec::with_capacity(children.len());

    for (index, child) in children.iter().enumerate() {
        let path = format!("{parent_path}/{}[{index}]", child.type_label);

        let Some(target_type) = view.resolve(&child.type_label) else {
            report.omitted.push(Omission {
                path,
                type_label: child.type_label.clone(),
                subtree_size: child.subtree_size(),
            });
            continue;
        };

        let mut node = Node {
            type_label: target_type.to_string(),
            attributes: child.attributes.clone(),
            text: child.text.clone(),
            children: Vec::new(),
        };
        report.converted += 1;
        node.children = convert_children(&child.children, &path, view, report);
        converted.push(node);
    }

    converted
}
