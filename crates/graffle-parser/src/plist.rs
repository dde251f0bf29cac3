//! Apple property-list XML decoding.

use log::{debug, trace};
use roxmltree::{Document, Node, ParsingOptions};

use crate::{
    error::{ParseError, Result},
    value::{Dict, Value},
};

/// Deepest `<dict>`/`<array>` nesting accepted by [`decode`].
pub const MAX_NESTING: usize = 512;

/// Decodes property-list XML into a [`Value`] tree.
///
/// The `<plist>` wrapper element is skipped and its single payload value is
/// returned. A document whose root element is itself a plist value (`<dict>`,
/// `<array>`, ...) is decoded directly.
///
/// # Errors
///
/// Returns [`ParseError::MalformedMarkup`] when the XML cannot be parsed,
/// when no payload value exists, when an element is not a valid plist
/// value, or when containers nest deeper than [`MAX_NESTING`].
pub fn decode(markup: &str) -> Result<Value> {
    // Property lists always carry a DOCTYPE pointing at Apple's DTD.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(markup, options)
        .map_err(|err| ParseError::MalformedMarkup(err.to_string()))?;

    let root = document.root_element();
    let payload = if root.has_tag_name("plist") {
        root.children()
            .find(Node::is_element)
            .ok_or_else(|| ParseError::MalformedMarkup("empty <plist> element".to_string()))?
    } else {
        root
    };

    debug!(root = payload.tag_name().name(); "Decoding property list");
    decode_node(payload, 0)
}

fn decode_node(node: Node<'_, '_>, depth: usize) -> Result<Value> {
    let tag = node.tag_name().name();
    trace!(tag, depth; "Decoding element");

    if depth > MAX_NESTING {
        return Err(malformed(
            node,
            format!("values nested deeper than {MAX_NESTING} levels"),
        ));
    }

    match tag {
        "dict" => decode_dict(node, depth).map(Value::Dict),
        "array" => node
            .children()
            .filter(Node::is_element)
            .map(|child| decode_node(child, depth + 1))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        "string" | "date" | "data" => Ok(Value::String(text_of(node))),
        "real" => {
            let text = text_of(node);
            text.trim()
                .parse()
                .map(Value::Real)
                .map_err(|_| malformed(node, format!("invalid real `{text}`")))
        }
        "integer" => {
            let text = text_of(node);
            text.trim()
                .parse()
                .map(Value::Integer)
                .map_err(|_| malformed(node, format!("invalid integer `{text}`")))
        }
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        other => Err(malformed(node, format!("unexpected element <{other}>"))),
    }
}

fn decode_dict(node: Node<'_, '_>, depth: usize) -> Result<Dict> {
    let mut dict = Dict::new();
    let mut children = node.children().filter(Node::is_element);

    while let Some(key_node) = children.next() {
        if !key_node.has_tag_name("key") {
            return Err(malformed(
                key_node,
                format!("expected <key>, found <{}>", key_node.tag_name().name()),
            ));
        }
        let key = text_of(key_node);
        let value_node = children
            .next()
            .ok_or_else(|| malformed(key_node, format!("key `{key}` has no value")))?;
        dict.insert(key, decode_node(value_node, depth + 1)?);
    }

    Ok(dict)
}

/// Concatenates the text children of an element. Entities and CDATA
/// sections may split the text into several nodes.
fn text_of(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}

fn malformed(node: Node<'_, '_>, message: String) -> ParseError {
    let pos = node.document().text_pos_at(node.range().start);
    ParseError::MalformedMarkup(format!("{message} at {}:{}", pos.row, pos.col))
}
