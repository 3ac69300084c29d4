//! Typed accessors for the fields most packets are read for.

use std::str::FromStr;

use serde::Serialize;
use voevent_xml::Node;

use crate::flatten::{flatten_what, FlattenedWhat};
use crate::CoreError;

/// Local name of the packet root element.
pub const VOEVENT_TAG: &str = "VOEvent";

const OBSERVATION_COORDS: &[&str] = &[
    "WhereWhen",
    "ObsDataLocation",
    "ObservationLocation",
    "AstroCoords",
];

/// A loaded packet whose root is known to be a `VOEvent` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voevent {
    root: Node,
}

/// Sky position from `WhereWhen`, in the units and frame the packet declares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position2D {
    pub ra: f64,
    pub dec: f64,
    /// Error circle radius (`Error2Radius`).
    pub err: Option<f64>,
    pub unit: Option<String>,
    /// Coordinate system id, e.g. `UTC-FK5-GEO`.
    pub system: Option<String>,
}

/// A reference to an earlier packet listed under `Citations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Citation<'a> {
    pub ivorn: &'a str,
    /// Relation to the cited packet: `followup`, `supersedes` or `retraction`.
    pub cite: Option<&'a str>,
}

impl Voevent {
    /// Load a packet from raw XML bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Self::from_node(voevent_xml::load(bytes)?)
    }

    /// Wrap an already loaded tree, checking the root element name.
    pub fn from_node(root: Node) -> Result<Self, CoreError> {
        if root.local_name() != VOEVENT_TAG {
            return Err(CoreError::NotVoevent(root.tag().to_string()));
        }
        Ok(Voevent { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// The packet identifier (`ivorn` attribute).
    pub fn ivorn(&self) -> Result<&str, CoreError> {
        Ok(self.root.attribute("ivorn")?)
    }

    /// `observation`, `prediction`, `utility` or `test`.
    pub fn role(&self) -> Result<&str, CoreError> {
        Ok(self.root.attribute("role")?)
    }

    /// Schema version from the root `version` attribute, e.g. `2.0`.
    pub fn version(&self) -> Result<&str, CoreError> {
        Ok(self.root.attribute("version")?)
    }

    /// First top-level section with the given tag, such as `Who` or `How`.
    pub fn section(&self, tag: &str) -> Option<&Node> {
        self.root.first_child(tag).ok()
    }

    /// Authoring date, `Who/Date`.
    pub fn who_date(&self) -> Option<&str> {
        descend(&self.root, &["Who", "Date"]).and_then(Node::text)
    }

    /// `Who/AuthorIVORN`.
    pub fn author_ivorn(&self) -> Option<&str> {
        descend(&self.root, &["Who", "AuthorIVORN"]).and_then(Node::text)
    }

    /// Names of inferred objects, `Why/Inference/Name`, across all inferences.
    pub fn inference_names(&self) -> Vec<&str> {
        let Some(why) = self.section("Why") else {
            return Vec::new();
        };
        why.children_named("Inference")
            .flat_map(|inference| inference.children_named("Name"))
            .filter_map(Node::text)
            .collect()
    }

    /// `EventIVORN` entries under `Citations`, in document order.
    pub fn citations(&self) -> Vec<Citation<'_>> {
        let Some(citations) = self.section("Citations") else {
            return Vec::new();
        };
        citations
            .children_named("EventIVORN")
            .filter_map(|node| {
                node.text().map(|ivorn| Citation {
                    ivorn: ivorn.trim(),
                    cite: node.get_attribute("cite"),
                })
            })
            .collect()
    }

    /// Event time as the ISO-8601 string stored in the packet.
    pub fn isotime(&self) -> Option<&str> {
        let coords = descend(&self.root, OBSERVATION_COORDS)?;
        descend(coords, &["Time", "TimeInstant", "ISOTime"]).and_then(Node::text)
    }

    /// Event position, or `None` when the packet carries no `Position2D`.
    pub fn position(&self) -> Result<Option<Position2D>, CoreError> {
        let Some(coords) = descend(&self.root, OBSERVATION_COORDS) else {
            return Ok(None);
        };
        let Ok(pos) = coords.first_child("Position2D") else {
            return Ok(None);
        };
        let value2 = pos.first_child("Value2")?;
        let ra = parse_number("Position2D/Value2/C1", value2.first_child("C1")?)?;
        let dec = parse_number("Position2D/Value2/C2", value2.first_child("C2")?)?;
        let err = match pos.first_child("Error2Radius") {
            Ok(node) => Some(parse_number("Position2D/Error2Radius", node)?),
            Err(_) => None,
        };
        Ok(Some(Position2D {
            ra,
            dec,
            err,
            unit: pos.get_attribute("unit").map(str::to_string),
            system: coords.get_attribute("coord_system_id").map(str::to_string),
        }))
    }

    pub fn flatten_what(&self) -> FlattenedWhat {
        flatten_what(&self.root)
    }

    /// Serialize the packet, see [`voevent_xml::serialize`].
    pub fn to_xml(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.root.to_xml()?)
    }
}

impl FromStr for Voevent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

fn descend<'a>(node: &'a Node, tags: &[&str]) -> Option<&'a Node> {
    tags.iter()
        .try_fold(node, |current, tag| current.first_child(tag).ok())
}

fn parse_number(field: &str, node: &Node) -> Result<f64, CoreError> {
    let raw = node.text().unwrap_or_default().trim();
    raw.parse().map_err(|_| CoreError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
