use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::common;

pub fn run(file: &Path, compact: bool) -> Result<()> {
    let root = common::read_tree(file)?;
    info!(root = root.tag(), "showing document");
    let text = if compact {
        let bytes = voevent::serialize(&root).context("serialise document")?;
        String::from_utf8(bytes).context("serialised document is not UTF-8")?
    } else {
        root.to_pretty_string().context("serialise document")?
    };
    println!("{text}");
    Ok(())
}
