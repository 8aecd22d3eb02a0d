//! High-level service facade for street graph retrieval.
//!
//! [`StreetGraphService`] is the entry point most callers need: it owns the
//! tile source, the codec, the concurrency budget and the request deadline.

mod facade;

pub use facade::StreetGraphService;
