use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;
use voevent::{Node, Voevent};

/// Read and parse any well-formed XML file.
pub fn read_tree(path: &Path) -> Result<Node> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read packet file");
    voevent::load(&bytes).with_context(|| format!("parse {}", path.display()))
}

/// Read a file that must hold a VOEvent packet.
pub fn read_packet(path: &Path) -> Result<Voevent> {
    let root = read_tree(path)?;
    Voevent::from_node(root).with_context(|| format!("load packet {}", path.display()))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}
