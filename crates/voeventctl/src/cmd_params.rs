use std::path::Path;

use anyhow::Result;
use tracing::info;
use voevent::FlattenedWhat;

use crate::common;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let packet = common::read_packet(file)?;
    let what = packet.flatten_what();
    info!(
        groups = what.groups.len(),
        params = what.param_count(),
        "flattened What section"
    );

    if json {
        return common::print_json(&what);
    }
    if what.is_empty() {
        println!("No parameters.");
        return Ok(());
    }
    for line in table(&what) {
        println!("{line}");
    }
    Ok(())
}

/// One header line plus one line per parameter, top-level params first.
pub fn table(what: &FlattenedWhat) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<16} {:<20} {:<16} {:<10} {}",
        "GROUP", "NAME", "VALUE", "UNIT", "DESCRIPTION"
    )];
    for (group, entry) in what.iter() {
        lines.push(format!(
            "{:<16} {:<20} {:<16} {:<10} {}",
            group.unwrap_or("-"),
            entry.name,
            entry.value.as_deref().unwrap_or("-"),
            entry.unit.as_deref().unwrap_or("-"),
            entry.description.as_deref().unwrap_or("-"),
        ));
    }
    lines
}
