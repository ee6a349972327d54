use crate::tree::{Document, Node, MAX_DEPTH};
use roxmltree::NodeType;

pub(super) fn parse_document(source: &str) -> Result<Document, String> {
    let xml = roxmltree::Document::parse(source).map_err(|e| e.to_string())?;
    element_to_node(xml.root_element(), 1).map(Document::new)
}

fn element_to_node(element: roxmltree::Node, depth: usize) -> Result<Node, String> {
    if depth > MAX_DEPTH {
        return Err(format!(
            "<{}> is nested more than {MAX_DEPTH} levels deep",
            element.tag_name().name()
        ));
    }

    let mut node = Node::new(element.tag_name().name());

    for attr in element.attributes() {
        node.attributes
            .insert(attr.name().to_string(), attr.value().to_string());
    }

    let mut text = String::new();
    for child in element.children() {
        match child.node_type() {
            NodeType::Element => node.children.push(element_to_node(child, depth + 1)?),
            NodeType::Text => text.push_str(child.text().unwrap_or_default()),
            _ => {}
        }
    }

    let text = text.trim();
    if !text.is_empty() {
        node.text = Some(text.to_string());
    }

    Ok(node)
}
