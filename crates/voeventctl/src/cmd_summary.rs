use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use voevent::packet::{Citation, Position2D};
use voevent::Voevent;

use crate::common;

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub ivorn: &'a str,
    pub role: &'a str,
    pub version: Option<&'a str>,
    pub authored: Option<&'a str>,
    pub event_time: Option<&'a str>,
    pub position: Option<Position2D>,
    pub inferences: Vec<&'a str>,
    pub citations: Vec<Citation<'a>>,
    pub params: usize,
}

impl<'a> Summary<'a> {
    pub fn collect(packet: &'a Voevent) -> Result<Self> {
        Ok(Summary {
            ivorn: packet.ivorn()?,
            role: packet.role()?,
            version: packet.version().ok(),
            authored: packet.who_date(),
            event_time: packet.isotime(),
            position: packet.position()?,
            inferences: packet.inference_names(),
            citations: packet.citations(),
            params: packet.flatten_what().param_count(),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("ivorn:      {}", self.ivorn),
            format!("role:       {}", self.role),
            format!("version:    {}", self.version.unwrap_or("-")),
            format!("authored:   {}", self.authored.unwrap_or("-")),
            format!("event time: {}", self.event_time.unwrap_or("-")),
        ];
        match &self.position {
            Some(pos) => lines.push(format!(
                "position:   ra={} dec={} err={} {} ({})",
                pos.ra,
                pos.dec,
                pos.err.map_or_else(|| "-".to_string(), |err| err.to_string()),
                pos.unit.as_deref().unwrap_or(""),
                pos.system.as_deref().unwrap_or("unknown frame"),
            )),
            None => lines.push("position:   -".to_string()),
        }
        for name in &self.inferences {
            lines.push(format!("inference:  {name}"));
        }
        for citation in &self.citations {
            lines.push(format!(
                "cites:      {} ({})",
                citation.ivorn,
                citation.cite.unwrap_or("-")
            ));
        }
        lines.push(format!("params:     {}", self.params));
        lines
    }
}

pub fn run(file: &Path, json: bool) -> Result<()> {
    let packet = common::read_packet(file)?;
    let summary = Summary::collect(&packet)?;
    info!(ivorn = summary.ivorn, "summarised packet");
    if json {
        return common::print_json(&summary);
    }
    for line in summary.lines() {
        println!("{line}");
    }
    Ok(())
}
