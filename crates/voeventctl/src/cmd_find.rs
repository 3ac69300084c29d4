use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use voevent::Node;

use crate::common;

#[derive(Serialize)]
struct Match<'a> {
    tag: &'a str,
    text: Option<&'a str>,
    attributes: &'a std::collections::BTreeMap<String, String>,
}

pub fn run(file: &Path, expr: &str, all: bool, attr: Option<&str>, json: bool) -> Result<()> {
    let path: voevent::Path = expr
        .parse()
        .with_context(|| format!("parse path expression {expr:?}"))?;
    let root = common::read_tree(file)?;
    let mut matches = root.find_all(&path);
    if !all {
        matches.truncate(1);
    }
    info!(path = %path, count = matches.len(), "path query");

    if let Some(name) = attr {
        let values = attribute_values(&matches, name)?;
        if json {
            return common::print_json(&values);
        }
        for value in values {
            println!("{value}");
        }
        return Ok(());
    }

    if json {
        let payload: Vec<Match<'_>> = matches
            .iter()
            .map(|node| Match {
                tag: node.tag(),
                text: node.text(),
                attributes: node.attributes(),
            })
            .collect();
        return common::print_json(&payload);
    }
    if matches.is_empty() {
        println!("No match for {path}.");
    }
    for node in matches {
        println!("{}", node.to_pretty_string().context("serialise match")?);
    }
    Ok(())
}

/// The attribute `name` of every match; a match without it is an error.
pub fn attribute_values<'a>(matches: &[&'a Node], name: &str) -> Result<Vec<&'a str>> {
    matches
        .iter()
        .map(|node| node.attribute(name).map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_attribute_values() {
        let root = voevent::load(
            br#"<What><Param name="a" value="1"/><Param name="b" value="2"/><Param name="c"/></What>"#,
        )
        .unwrap();
        let path: voevent::Path = "Param".parse().unwrap();
        let matches = root.find_all(&path);
        assert_eq!(attribute_values(&matches[..2], "value").unwrap(), ["1", "2"]);
        let err = attribute_values(&matches, "value").unwrap_err();
        assert!(err.to_string().contains("has no attribute 'value'"));
    }
}
