//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`tile`] - Assemble one tile as GeoJSON
//! - [`bbox`] - Merge every tile covering a bounding box
//! - [`read_file`] - Dump the records of a local layer file
//! - [`id`] - Compute geometry and intersection identifiers
//! - [`config`] - Configuration file helpers

pub mod bbox;
pub mod config;
pub mod id;
pub mod read_file;
pub mod tile;
