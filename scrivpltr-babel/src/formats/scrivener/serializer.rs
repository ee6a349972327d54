use crate::tree::{Document, Node};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Callers bound the tree depth first; this recurses once per level.
pub(super) fn serialize_document(doc: &Document) -> Result<String, String> {
    let mut output = String::from(XML_DECLARATION);
    output.push('\n');
    write_node(&mut output, &doc.root, 0)?;
    Ok(output)
}

fn write_node(output: &mut String, node: &Node, indent_level: usize) -> Result<(), String> {
    let indent = "  ".repeat(indent_level);
    let tag = &node.type_label;
    check_name(tag, "element")?;

    output.push_str(&format!("{indent}<{tag}"));
    for (key, value) in &node.attributes {
        check_name(key, "attribute")?;
        check_chars(value, key)?;
        output.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
    }

    if let Some(text) = &node.text {
        check_chars(text, tag)?;
    }

    match (&node.text, node.children.is_empty()) {
        (None, true) => output.push_str("/>\n"),
        (Some(text), true) => {
            output.push_str(&format!(">{}</{tag}>\n", escape_xml(text)));
        }
        (text, false) => {
            output.push_str(">\n");
            if let Some(text) = text {
                output.push_str(&format!("{indent}  {}\n", escape_xml(text)));
            }
            for child in &node.children {
                write_node(output, child, indent_level + 1)?;
            }
            output.push_str(&format!("{indent}</{tag}>\n"));
        }
    }

    Ok(())
}

/// XML 1.0 names without namespace prefixes, which would need declarations.
fn check_name(name: &str, what: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start(first) && chars.all(is_name_char),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("{name:?} is not a valid XML {what} name"))
    }
}

fn is_name_start(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Control characters other than tab and line breaks cannot appear in XML 1.0, escaped or not.
fn check_chars(value: &str, owner: &str) -> Result<(), String> {
    let allowed = |c: &char| {
        matches!(c,
            '\t' | '\n' | '\r' | ' '..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
    };
    match value.chars().find(|c| !allowed(c)) {
        Some(c) => Err(format!("{owner}: character {c:?} cannot be written to XML")),
        None => Ok(()),
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

/// Whitespace is normalized to spaces in attribute values unless written as references.
fn escape_attribute(value: &str) -> String {
    escape_xml(value)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}
