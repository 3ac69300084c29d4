//! Tour of the accessor layer on a packet file (or the bundled sample).
//!
//! `cargo run -p voevent --example walkthrough -- path/to/packet.xml`

use std::error::Error;

use voevent::{Path, Voevent};

const SAMPLE: &[u8] = include_bytes!("../../voevent-xml/tests/data/voevent.xml");

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bytes = match std::env::args().nth(1) {
        Some(path) => std::fs::read(path)?,
        None => SAMPLE.to_vec(),
    };
    let packet = Voevent::from_bytes(&bytes)?;
    let root = packet.root();

    // Text values and attributes.
    println!("ivorn: {}", packet.ivorn()?);
    println!("role:  {}", packet.role()?);
    if let Some(date) = packet.who_date() {
        println!("authored: {date}");
    }
    for name in packet.inference_names() {
        println!("inferred: {name} ({} chars)", name.len());
    }
    if let Ok(inference) = root.first_child("Why").and_then(|why| why.first_child("Inference")) {
        println!("inference attributes: {:?}", inference.attributes());
    }

    // Sibling elements are always a list; the first one is just index 0.
    if let Some(what) = packet.section("What") {
        for group in what.child("Group") {
            println!("{}", group.to_pretty_string()?);
            for (index, param) in group.child("Param").iter().enumerate() {
                let description = param
                    .first_child("Description")
                    .ok()
                    .and_then(|d| d.text())
                    .unwrap_or("-");
                println!("  param[{index}] {description}");
            }
        }
    }

    // Flattened parameters.
    let what = packet.flatten_what();
    for (group, entry) in what.iter() {
        println!(
            "{}/{} = {} {}",
            group.unwrap_or("-"),
            entry.name,
            entry.value.as_deref().unwrap_or("?"),
            entry.unit.as_deref().unwrap_or("")
        );
    }

    // Path queries.
    let path: Path = ".//Param[@name='int_flux']".parse()?;
    if let Some(param) = root.find_first(&path) {
        println!("int_flux = {}", param.attribute("value")?);
    }

    if let Some(pos) = packet.position()? {
        println!("position: ra={} dec={} err={:?}", pos.ra, pos.dec, pos.err);
    }
    Ok(())
}
