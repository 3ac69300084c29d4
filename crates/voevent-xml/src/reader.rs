//! Event-driven tree builder on top of `quick_xml::Reader`.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::node::Node;
use crate::ParseError;

pub(crate) fn read_document(bytes: &[u8]) -> Result<Node, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut open: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;
    let mut elements = 0usize;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            ParseError::Malformed(format!("{err} (near byte {})", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => {
                ensure_single_root(&root)?;
                open.push(start_node(&e)?);
                elements += 1;
            }
            Event::Empty(e) => {
                ensure_single_root(&root)?;
                let node = start_node(&e)?;
                elements += 1;
                close_node(node, &mut open, &mut root);
            }
            Event::End(e) => {
                let node = open.pop().ok_or_else(|| {
                    ParseError::Malformed(format!(
                        "closing tag </{}> without an opening tag",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                close_node(node, &mut open, &mut root);
            }
            Event::Text(e) => {
                let text = decode_escaped(&e)?;
                append_text(&mut open, &text)?;
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|err| ParseError::Malformed(format!("invalid UTF-8: {err}")))?;
                append_text(&mut open, &normalize_newlines(text))?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(ParseError::Malformed(format!(
            "unexpected end of document inside <{}>",
            unclosed.tag
        )));
    }
    let root = root.ok_or(ParseError::EmptyDocument)?;
    debug!(root = %root.tag, elements, "loaded xml document");
    Ok(root)
}

fn ensure_single_root(root: &Option<Node>) -> Result<(), ParseError> {
    match root {
        Some(existing) => Err(ParseError::Malformed(format!(
            "second root element after <{}>",
            existing.tag
        ))),
        None => Ok(()),
    }
}

fn start_node(event: &BytesStart<'_>) -> Result<Node, ParseError> {
    let tag = std::str::from_utf8(event.name().as_ref())
        .map_err(|err| ParseError::Malformed(format!("invalid UTF-8 in tag name: {err}")))?
        .to_string();
    let mut node = Node::element(tag);
    for attr in event.attributes() {
        let attr = attr.map_err(|err| ParseError::Malformed(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| {
                ParseError::Malformed(format!("invalid UTF-8 in attribute name: {err}"))
            })?
            .to_string();
        let value = decode_escaped(&attr.value)?;
        node.attributes.insert(key, value);
    }
    Ok(node)
}

/// Line ends are folded to `\n` before entity references are expanded, so a
/// `&#13;` reference still yields a carriage return. Only the predefined
/// entities and character references are known; DOCTYPE declarations are not
/// read.
fn decode_escaped(raw: &[u8]) -> Result<String, ParseError> {
    let raw = std::str::from_utf8(raw)
        .map_err(|err| ParseError::Malformed(format!("invalid UTF-8: {err}")))?;
    let normalized = normalize_newlines(raw);
    let text = unescape(&normalized).map_err(|err| ParseError::Malformed(err.to_string()))?;
    Ok(text.into_owned())
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn close_node(node: Node, open: &mut [Node], root: &mut Option<Node>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

/// Whitespace-only runs are layout and never become element text.
fn append_text(open: &mut [Node], text: &str) -> Result<(), ParseError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let node = open.last_mut().ok_or_else(|| {
        ParseError::Malformed(format!("text outside the root element: {:?}", text.trim()))
    })?;
    node.text.get_or_insert_with(String::new).push_str(text);
    Ok(())
}
