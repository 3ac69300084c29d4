//! A small ElementPath subset: tag steps, `/` and `//` axes, and at most one
//! `[@attr='value']` predicate per step.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::node::Node;
use crate::PathError;

/// Compiled path expression, evaluated relative to a context [`Node`].
///
/// ```text
/// Who/Date
/// ./What/Group[@name='source_flux']/Param
/// .//Param[@name="int_flux"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: NameTest,
    predicate: Option<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Predicate {
    attribute: String,
    value: String,
}

impl Step {
    fn matches(&self, node: &Node) -> bool {
        let name_ok = match &self.name {
            NameTest::Any => true,
            NameTest::Tag(tag) => node.tag() == tag,
        };
        name_ok
            && self.predicate.as_ref().map_or(true, |p| {
                node.get_attribute(&p.attribute) == Some(p.value.as_str())
            })
    }
}

impl Path {
    /// Nodes matched by this path below `context`, in document order.
    ///
    /// A path made of `.` alone selects the context itself.
    pub(crate) fn select<'a>(&self, context: &'a Node) -> Vec<&'a Node> {
        let mut current = vec![context];
        for step in &self.steps {
            let mut matched = Vec::new();
            for node in &current {
                match step.axis {
                    Axis::Child => {
                        matched.extend(node.children().iter().filter(|c| step.matches(c)))
                    }
                    Axis::Descendant => {
                        matched.extend(node.descendants().filter(|c| step.matches(c)))
                    }
                }
            }
            current = in_document_order(context, matched);
            trace!(step = %step, matched = current.len(), "path step");
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

/// Sorts into document order and drops repeats, which nested `//` contexts
/// can produce.
fn in_document_order<'a>(context: &'a Node, nodes: Vec<&'a Node>) -> Vec<&'a Node> {
    if nodes.len() < 2 {
        return nodes;
    }
    let wanted: HashSet<*const Node> = nodes.iter().map(|node| *node as *const Node).collect();
    context
        .descendants()
        .filter(|node| wanted.contains(&(*node as *const Node)))
        .collect()
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathParser { input: s, pos: 0 }.parse()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Axis::Child => f.write_str("/")?,
            Axis::Descendant => f.write_str("//")?,
        }
        match &self.name {
            NameTest::Any => f.write_str("*")?,
            NameTest::Tag(tag) => f.write_str(tag)?,
        }
        if let Some(p) = &self.predicate {
            let quote = if p.value.contains('\'') { '"' } else { '\'' };
            write!(f, "[@{}={quote}{}{quote}]", p.attribute, p.value)?;
        }
        Ok(())
    }
}

struct PathParser<'s> {
    input: &'s str,
    pos: usize,
}

impl<'s> PathParser<'s> {
    fn parse(mut self) -> Result<Path, PathError> {
        if self.input.is_empty() {
            return Err(self.error("empty path"));
        }
        let mut steps = Vec::new();
        let relative_prefix = self.eat(".");
        if !relative_prefix {
            if self.peek() == Some('/') {
                return Err(self.error("absolute paths are not supported"));
            }
            steps.push(self.step(Axis::Child)?);
        }
        while !self.at_end() {
            let axis = if self.eat("//") {
                Axis::Descendant
            } else if self.eat("/") {
                Axis::Child
            } else {
                return Err(self.error("expected '/' or '//'"));
            };
            steps.push(self.step(axis)?);
        }
        Ok(Path { steps })
    }

    fn step(&mut self, axis: Axis) -> Result<Step, PathError> {
        let start = self.pos;
        let name = self.take_while(|c| {
            !matches!(c, '/' | '[' | ']' | '@' | '=' | '\'' | '"') && !c.is_whitespace()
        });
        let name = match name {
            "" => return Err(self.error("expected a tag name or '*'")),
            "." | ".." => {
                return Err(PathError {
                    offset: start,
                    reason: format!("'{name}' steps are not supported"),
                })
            }
            "*" => NameTest::Any,
            tag => NameTest::Tag(tag.to_string()),
        };
        let predicate = if self.peek() == Some('[') {
            Some(self.predicate()?)
        } else {
            None
        };
        if self.peek() == Some('[') {
            return Err(self.error("only one predicate per step is supported"));
        }
        Ok(Step {
            axis,
            name,
            predicate,
        })
    }

    fn predicate(&mut self) -> Result<Predicate, PathError> {
        self.expect("[")?;
        self.expect("@")?;
        let attribute = self
            .take_while(|c| !matches!(c, '=' | ']' | '[' | '/') && !c.is_whitespace())
            .to_string();
        if attribute.is_empty() {
            return Err(self.error("expected an attribute name after '@'"));
        }
        self.skip_spaces();
        self.expect("=")?;
        self.skip_spaces();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted value")),
        };
        self.pos += quote.len_utf8();
        let value = self.take_while(|c| c != quote).to_string();
        if self.peek() != Some(quote) {
            return Err(self.error("unterminated quoted value"));
        }
        self.pos += quote.len_utf8();
        self.skip_spaces();
        self.expect("]")?;
        Ok(Predicate { attribute, value })
    }

    fn rest(&self) -> &'s str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), PathError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}'")))
        }
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'s str {
        let rest = self.rest();
        let len = rest.find(|c: char| !keep(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_spaces(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn error(&self, reason: &str) -> PathError {
        PathError {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_str;

    const PACKET: &str = r#"
        <VOEvent ivorn="ivo://example/test#1">
            <Who><Date>2014-07-04T12:05:00</Date></Who>
            <What>
                <Param name="alert_type" value="test"/>
                <Group name="source_flux">
                    <Param name="peak_flux" value="12.3"/>
                    <Param name="int_flux" value="45.6"/>
                    <Group name="nested">
                        <Param name="int_flux" value="0.1"/>
                    </Group>
                </Group>
            </What>
        </VOEvent>
    "#;

    fn path(expr: &str) -> Path {
        expr.parse().expect("valid path")
    }

    #[test]
    fn child_steps() {
        let root = load_str(PACKET).unwrap();
        let date = root.find_first(&path("Who/Date")).unwrap();
        assert_eq!(date.text(), Some("2014-07-04T12:05:00"));
        assert_eq!(root.find_first(&path("./Who/Date")), Some(date));
        assert!(root.find_first(&path("Date")).is_none());
        assert!(root.find_first(&path("Who/Nope")).is_none());
    }

    #[test]
    fn descendant_with_predicate() {
        let root = load_str(PACKET).unwrap();
        let param = root
            .find_first(&path(".//Param[@name='int_flux']"))
            .unwrap();
        assert_eq!(param.attribute("value").unwrap(), "45.6");
        let all = root.find_all(&path(r#".//Param[@name="int_flux"]"#));
        let values: Vec<&str> = all.iter().map(|p| p.attribute("value").unwrap()).collect();
        assert_eq!(values, ["45.6", "0.1"]);
    }

    #[test]
    fn nested_descendant_contexts_do_not_repeat() {
        let root = load_str(PACKET).unwrap();
        let params = root.find_all(&path(".//Group//Param"));
        let names: Vec<&str> = params
            .iter()
            .map(|p| p.attribute("name").unwrap())
            .collect();
        assert_eq!(names, ["peak_flux", "int_flux", "int_flux"]);
    }

    #[test]
    fn wildcard_and_self() {
        let root = load_str(PACKET).unwrap();
        assert_eq!(root.find_all(&path("*")).len(), 2);
        assert_eq!(root.find_first(&path(".")), Some(&root));
        let grouped = root.find_all(&path("What/*[@name='source_flux']/*"));
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn display_is_reparseable() {
        let p = path(r#"What//Param[@name="it's"]"#);
        assert_eq!(p.to_string(), r#"./What//Param[@name="it's"]"#);
        assert_eq!(path(&p.to_string()), p);
    }

    #[test]
    fn rejects_unsupported_expressions() {
        for (expr, offset) in [
            ("", 0),
            ("/VOEvent", 0),
            ("Who/", 4),
            ("Who/../What", 4),
            ("Param[@name='a'][@value='b']", 16),
            ("Param[@name='a", 14),
            ("Param[name='a']", 6),
            ("Param[@name=a]", 12),
            ("Who Date", 3),
        ] {
            let err = expr.parse::<Path>().unwrap_err();
            assert_eq!(err.offset, offset, "{expr}: {err}");
        }
    }
}
