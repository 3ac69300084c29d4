//! Parameter flattener for the `What` section.
//!
//! `What` holds `Param` elements either directly or inside `Group`s. The
//! flattener copies them into plain maps so callers never have to walk
//! repeated siblings themselves.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};
use voevent_xml::Node;

/// Key prefix for groups that carry no `name` attribute. Anonymous groups take
/// `group_0`, `group_1`, ... in document order, skipping any key a named group
/// already uses.
pub const ANONYMOUS_GROUP_PREFIX: &str = "group_";

const TOPLEVEL: &str = "<toplevel>";

/// One `Param` copied out of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamEntry {
    pub name: String,
    pub value: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    /// Unified Content Descriptor.
    pub ucd: Option<String>,
    /// Declared `dataType`, e.g. `float` or `string`.
    pub data_type: Option<String>,
}

impl ParamEntry {
    /// Build an entry from a `Param` element. Returns `None` when the element
    /// has no `name` attribute.
    ///
    /// `value` falls back to the text of a `Value` child and `description` to
    /// a `description` attribute when the usual form is absent.
    pub fn from_param(node: &Node) -> Option<Self> {
        let name = node.get_attribute("name")?.to_string();
        let value = node
            .get_attribute("value")
            .or_else(|| child_text(node, "Value"))
            .map(str::to_string);
        let description = child_text(node, "Description")
            .or_else(|| node.get_attribute("description"))
            .map(str::to_string);
        Some(ParamEntry {
            name,
            value,
            unit: node.get_attribute("unit").map(str::to_string),
            description,
            ucd: node.get_attribute("ucd").map(str::to_string),
            data_type: node.get_attribute("dataType").map(str::to_string),
        })
    }
}

/// Parameters keyed by name.
pub type ParamGroup = BTreeMap<String, ParamEntry>;

/// Result of [`flatten_what`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedWhat {
    /// Params placed directly under `What`.
    pub toplevel: ParamGroup,
    /// Params inside `Group` elements, keyed by group name.
    pub groups: BTreeMap<String, ParamGroup>,
}

impl FlattenedWhat {
    /// Params of one group, by name or synthetic key.
    pub fn group(&self, key: &str) -> Option<&ParamGroup> {
        self.groups.get(key)
    }

    /// Look up a grouped parameter.
    pub fn param(&self, group: &str, name: &str) -> Option<&ParamEntry> {
        self.groups.get(group)?.get(name)
    }

    /// Total number of parameters, grouped and top-level.
    pub fn param_count(&self) -> usize {
        self.toplevel.len() + self.groups.values().map(BTreeMap::len).sum::<usize>()
    }

    /// True when neither top-level params nor groups were found.
    pub fn is_empty(&self) -> bool {
        self.toplevel.is_empty() && self.groups.is_empty()
    }

    /// Every parameter with its group key; top-level params come first with
    /// `None`.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &ParamEntry)> + '_ {
        let toplevel = self.toplevel.values().map(|entry| (None, entry));
        let grouped = self.groups.iter().flat_map(|(key, group)| {
            group.values().map(move |entry| (Some(key.as_str()), entry))
        });
        toplevel.chain(grouped)
    }
}

/// Flatten the `What` section of a packet rooted at `root`.
///
/// A missing `What` gives an empty result. Children that are neither `Group`
/// nor `Param`, and `Param`s without a name, are skipped. A repeated `Param`
/// name inside one group keeps the last occurrence; named groups sharing a name
/// are merged under the same rule. Anonymous groups never merge into another
/// group.
pub fn flatten_what(root: &Node) -> FlattenedWhat {
    let mut flat = FlattenedWhat::default();
    let Ok(what) = root.first_child("What") else {
        debug!(root = root.tag(), "packet has no What section");
        return flat;
    };

    let named: BTreeSet<&str> = what
        .children_named("Group")
        .filter_map(|group| group.get_attribute("name"))
        .collect();
    let mut anonymous = 0usize;
    for child in what.children() {
        match child.tag() {
            "Param" => insert_param(&mut flat.toplevel, TOPLEVEL, child),
            "Group" => {
                let key = match child.get_attribute("name") {
                    Some(name) => name.to_string(),
                    None => next_anonymous_key(&named, &mut anonymous),
                };
                if flat.groups.contains_key(&key) {
                    warn!(group = %key, "repeated group key, merging params");
                }
                let group = flat.groups.entry(key.clone()).or_default();
                for param in child.children() {
                    if param.tag() == "Param" {
                        insert_param(group, &key, param);
                    } else {
                        debug!(
                            group = %key,
                            tag = param.tag(),
                            "skipping non-Param group child"
                        );
                    }
                }
            }
            other => debug!(tag = other, "skipping What child"),
        }
    }
    debug!(
        groups = flat.groups.len(),
        params = flat.param_count(),
        "flattened What section"
    );
    flat
}

fn next_anonymous_key(named: &BTreeSet<&str>, counter: &mut usize) -> String {
    loop {
        let key = format!("{ANONYMOUS_GROUP_PREFIX}{counter}");
        *counter += 1;
        if !named.contains(key.as_str()) {
            return key;
        }
        debug!(group = %key, "anonymous key taken by a named group");
    }
}

fn insert_param(group: &mut ParamGroup, group_key: &str, node: &Node) {
    let Some(entry) = ParamEntry::from_param(node) else {
        debug!(group = group_key, "skipping Param without a name");
        return;
    };
    if let Some(previous) = group.insert(entry.name.clone(), entry) {
        warn!(
            group = group_key,
            param = %previous.name,
            "duplicate Param name, keeping the last one"
        );
    }
}

fn child_text<'a>(node: &'a Node, tag: &str) -> Option<&'a str> {
    node.first_child(tag).ok().and_then(Node::text)
}
