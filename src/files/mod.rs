//! Output file naming.

pub mod filename;
