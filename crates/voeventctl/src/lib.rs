//! Subcommand implementations for the `voeventctl` binary.

pub mod cmd_find;
pub mod cmd_params;
pub mod cmd_show;
pub mod cmd_summary;
pub mod common;
