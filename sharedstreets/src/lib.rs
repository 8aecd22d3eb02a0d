//! SharedStreets - street graph tiles and cross-tile stitching
//!
//! This library fetches the four layers of a SharedStreets tile (geometry,
//! intersection, reference, metadata), decodes their length-delimited
//! protobuf records and correlates them into one graph fragment. Fragments
//! from neighbouring tiles can be merged into the graph for any bounding box.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use sharedstreets::config::SourceConfig;
//! use sharedstreets::service::StreetGraphService;
//!
//! let service = StreetGraphService::from_config(SourceConfig::default())?;
//!
//! // Everything inside a small box around downtown Oakland
//! let graph = service.union_bbox(-122.275, 37.800, -122.270, 37.805).await?;
//! ```
//!
//! Stable identifiers can be computed without any network access via the
//! [`ids`] module.

pub mod assembler;
pub mod codec;
pub mod config;
pub mod coord;
pub mod error;
pub mod ids;
pub mod layer;
pub mod limiter;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;
pub mod spatial;
pub mod union;

pub use error::GraphError;
pub use model::{Geometry, Intersection, Layer, Metadata, Reference, Tile};
pub use service::StreetGraphService;

/// Version of the SharedStreets library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
