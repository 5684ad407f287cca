//! Subcommand handlers for the conv2md binary.

pub mod completions;
pub mod config;
pub mod convert;
