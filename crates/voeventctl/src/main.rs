use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voeventctl::cmd_find;
use voeventctl::cmd_params;
use voeventctl::cmd_show;
use voeventctl::cmd_summary;

#[derive(Parser, Debug)]
#[command(name = "voeventctl", version, about = "VOEvent packet inspector")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print a packet as indented XML
    Show {
        file: PathBuf,
        /// Canonical single-line form instead of indented output
        #[arg(long)]
        compact: bool,
    },
    /// List the flattened What parameters
    Params { file: PathBuf },
    /// Evaluate a path such as ".//Param[@name='int_flux']"
    Find {
        file: PathBuf,
        path: String,
        /// Print every match instead of the first
        #[arg(long)]
        all: bool,
        /// Print only this attribute of each match
        #[arg(long)]
        attr: Option<String>,
    },
    /// Header fields, event time and position
    Summary { file: PathBuf },
}

fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Show { file, compact } => cmd_show::run(&file, compact)?,
        Cmd::Params { file } => cmd_params::run(&file, json)?,
        Cmd::Find {
            file,
            path,
            all,
            attr,
        } => cmd_find::run(&file, &path, all, attr.as_deref(), json)?,
        Cmd::Summary { file } => cmd_summary::run(&file, json)?,
    };

    Ok(())
}
