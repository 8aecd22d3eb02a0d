//! Record decoding for tile layers.
//!
//! A layer file is a concatenation of varint length-delimited records, all
//! of one [`RecordKind`]. [`FramedRecords`] splits a buffer into frames and a
//! [`TileCodec`] turns each frame into a [`Record`].

mod frame;
pub mod proto;
mod protobuf;

pub use frame::FramedRecords;
pub(crate) use frame::next_frame;
pub use protobuf::ProtobufCodec;

use thiserror::Error;

use crate::model::{Record, RecordKind};

/// Errors produced while splitting or decoding layer records.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not a valid protobuf message of the requested kind
    #[error("failed to decode {kind} record: {source}")]
    Protobuf {
        kind: RecordKind,
        #[source]
        source: prost::DecodeError,
    },

    /// The message parsed but violates an entity invariant
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: RecordKind, reason: String },

    /// The length prefix announces more bytes than the buffer holds
    #[error(
        "record at byte {offset} declares {expected} bytes but only {available} remain"
    )]
    Truncated {
        offset: usize,
        expected: u64,
        available: usize,
    },

    /// The varint length prefix itself is unreadable
    #[error("unreadable length prefix at byte {offset}")]
    BadLengthPrefix { offset: usize },
}

/// Decodes one record of a known kind.
///
/// Implementations must be stateless with respect to the bytes they are
/// given; they are shared across concurrently assembled tiles.
pub trait TileCodec: Send + Sync {
    fn decode(&self, bytes: &[u8], kind: RecordKind) -> Result<Record, DecodeError>;
}

/// Decodes a frame of unknown kind by trying each kind in
/// [`RecordKind::SNIFF_ORDER`].
///
/// An intersection with node id 0 is almost always some other message that
/// happens to parse, so it is passed over.
pub fn sniff_record<C: TileCodec + ?Sized>(codec: &C, bytes: &[u8]) -> Option<Record> {
    RecordKind::SNIFF_ORDER
        .iter()
        .find_map(|kind| match codec.decode(bytes, *kind) {
            Ok(Record::Intersection(i)) if i.node_id == 0 => None,
            Ok(record) => Some(record),
            Err(_) => None,
        })
}

/// Guesses the kind of a single protobuf frame.
pub fn sniff_kind(bytes: &[u8]) -> Option<RecordKind> {
    sniff_record(&ProtobufCodec, bytes).map(|record| record.kind())
}
