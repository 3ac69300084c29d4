#![cfg_attr(docsrs, feature(doc_cfg))]
//! Load VOEvent packets into an immutable element tree using quick-xml.
//!
//! The tree is deliberately generic: every element becomes a [`Node`] with a
//! tag, an attribute map, optional direct text and ordered children. Schema
//! specific helpers live in `voevent-core`.
//!
//! ```rust
//! use voevent_xml::Path;
//!
//! let packet = br#"<voe:VOEvent ivorn="ivo://example/test#1" role="test">
//!   <What><Param name="int_flux" value="45.6"/></What>
//! </voe:VOEvent>"#;
//! let root = voevent_xml::load(packet)?;
//! assert_eq!(root.attribute("role")?, "test");
//! let path: Path = ".//Param[@name='int_flux']".parse()?;
//! let param = root.find_first(&path).expect("param present");
//! assert_eq!(param.attribute("value")?, "45.6");
//! # Ok::<(), voevent_xml::XmlError>(())
//! ```

use thiserror::Error;

mod node;
mod path;
mod reader;
mod writer;

pub use node::{Descendants, Node};
pub use path::Path;

/// Failure to turn a byte buffer into a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is not well-formed XML.
    #[error("malformed xml: {0}")]
    Malformed(String),
    /// The input holds no root element.
    #[error("empty document: no root element")]
    EmptyDocument,
}

/// Failure of a single accessor on an otherwise valid tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The element carries no attribute with the requested name.
    #[error("<{element}> has no attribute '{name}'")]
    AttributeNotFound { element: String, name: String },
    /// Fewer than `index + 1` children with the requested tag exist.
    #[error("<{parent}> has no <{tag}> child at index {index}")]
    NoSuchChild {
        parent: String,
        tag: String,
        index: usize,
    },
}

/// Rejected path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path at offset {offset}: {reason}")]
pub struct PathError {
    /// Byte offset into the expression where parsing stopped.
    pub offset: usize,
    pub reason: String,
}

/// Umbrella error for callers that mix loading, access and serialization.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Path(#[from] PathError),
    /// The XML writer failed while serializing a tree.
    #[error("xml write: {0}")]
    Write(String),
}

/// Parse raw XML bytes into the root [`Node`].
///
/// Any well-formed document loads; conformance to the VOEvent schema is not
/// checked here.
pub fn load(bytes: &[u8]) -> Result<Node, ParseError> {
    reader::read_document(bytes)
}

/// Parse an XML string into the root [`Node`].
pub fn load_str(xml: &str) -> Result<Node, ParseError> {
    reader::read_document(xml.as_bytes())
}

/// Serialize a tree into UTF-8 XML bytes with an XML declaration.
///
/// The output reloads into a tree equal to `node`.
pub fn serialize(node: &Node) -> Result<Vec<u8>, XmlError> {
    writer::write_document(node)
}
