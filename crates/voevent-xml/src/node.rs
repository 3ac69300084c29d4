//! Immutable element tree produced by [`crate::load`].

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::path::Path;
use crate::{writer, AccessError, ParseError, XmlError};

/// One XML element together with the subtree it owns.
///
/// Repeated children keep their document order, so the list returned by
/// [`Node::child`] and the element returned by [`Node::first_child`] always
/// agree on which sibling comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) tag: String,
    pub(crate) text: Option<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn element(tag: String) -> Self {
        Node {
            tag,
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Qualified tag name as written in the document, e.g. `voe:VOEvent`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.tag
            .rsplit_once(':')
            .map_or(self.tag.as_str(), |(_, local)| local)
    }

    /// Direct text content of this element.
    ///
    /// Text held by child elements is never reported here; an element that
    /// only wraps a child has no text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// All attributes, keyed by qualified name.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Value of the attribute `name`.
    pub fn attribute(&self, name: &str) -> Result<&str, AccessError> {
        self.get_attribute(name)
            .ok_or_else(|| AccessError::AttributeNotFound {
                element: self.tag.clone(),
                name: name.to_string(),
            })
    }

    /// Value of the attribute `name`, if present.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Every direct child in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct children tagged `tag`, in document order. Empty when none match.
    pub fn child(&self, tag: &str) -> Vec<&Node> {
        self.children_named(tag).collect()
    }

    /// Lazy form of [`Node::child`].
    pub fn children_named<'a, 't>(&'a self, tag: &'t str) -> impl Iterator<Item = &'a Node> + 't
    where
        'a: 't,
    {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// First direct child tagged `tag`.
    pub fn first_child(&self, tag: &str) -> Result<&Node, AccessError> {
        self.child_at(tag, 0)
    }

    /// The `index`-th direct child tagged `tag`.
    pub fn child_at(&self, tag: &str, index: usize) -> Result<&Node, AccessError> {
        self.children_named(tag)
            .nth(index)
            .ok_or_else(|| AccessError::NoSuchChild {
                parent: self.tag.clone(),
                tag: tag.to_string(),
                index,
            })
    }

    /// True when at least one direct child has this tag.
    pub fn has_child(&self, tag: &str) -> bool {
        self.children_named(tag).next().is_some()
    }

    /// Depth-first, document-order walk over the subtree below this node.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First node matched by `path`, in document order.
    pub fn find_first(&self, path: &Path) -> Option<&Node> {
        path.select(self).into_iter().next()
    }

    /// Every node matched by `path`, in document order without repeats.
    pub fn find_all(&self, path: &Path) -> Vec<&Node> {
        path.select(self)
    }

    /// Canonical XML bytes for this subtree, see [`crate::serialize`].
    pub fn to_xml(&self) -> Result<Vec<u8>, XmlError> {
        writer::write_document(self)
    }

    /// Indented rendering intended for people rather than machines.
    ///
    /// An element's text is written before its children, so mixed content
    /// such as `<a>x<b/>y</a>` comes out as `<a>xy<b/>` followed by the
    /// indented close tag. Reloading with [`crate::load`] gives an equal tree
    /// because whitespace-only runs are dropped; other XML readers will see
    /// the added line breaks as text. Use [`Node::to_xml`] for exact output.
    pub fn to_pretty_string(&self) -> Result<String, XmlError> {
        writer::write_pretty(self)
    }
}

impl FromStr for Node {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::load_str(s)
    }
}

/// Iterator returned by [`Node::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
