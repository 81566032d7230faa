//! CLI command implementations

pub mod import;
pub mod seal;
pub mod get;
pub mod size;
pub mod config;
