#![cfg_attr(docsrs, feature(doc_cfg))]
//! VOEvent-specific views over a loaded [`voevent_xml::Node`] tree: the
//! flattened `What` parameters and typed accessors for the common fields of a
//! packet.

use thiserror::Error;
use voevent_xml::{AccessError, ParseError, XmlError};

pub mod flatten;
pub mod packet;

pub use flatten::{flatten_what, FlattenedWhat, ParamEntry, ParamGroup};
pub use packet::{Citation, Position2D, Voevent};

/// Error type produced by packet-level operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The input could not be loaded as XML at all.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A required attribute or element is missing.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Serialization or path handling failed.
    #[error(transparent)]
    Xml(#[from] XmlError),
    /// The document root is not a `VOEvent` element.
    #[error("not a VOEvent packet: root element is <{0}>")]
    NotVoevent(String),
    /// A field expected to hold a number does not.
    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: String, value: String },
}
