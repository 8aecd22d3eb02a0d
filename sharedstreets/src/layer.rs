//! Layer reading: fetch one layer and iterate its records.
//!
//! Absence is not an error here. A 404, a transport failure or a bad status
//! all produce an empty record sequence, and a malformed record is skipped
//! rather than failing the layer. Both are counted in [`DecodeStats`] so an
//! outage can still be told apart from an empty area.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::{next_frame, DecodeError, TileCodec};
use crate::coord::TileCoord;
use crate::model::{Layer, Record, RecordKind};
use crate::source::{SourceError, TileSource};

/// Counters shared by every layer read of a service.
#[derive(Debug, Default)]
pub struct DecodeStats {
    decoded: AtomicU64,
    skipped: AtomicU64,
    missing_layers: AtomicU64,
    transport_failures: AtomicU64,
}

/// Point-in-time copy of [`DecodeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStatsSnapshot {
    pub decoded: u64,
    pub skipped: u64,
    pub missing_layers: u64,
    pub transport_failures: u64,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DecodeStatsSnapshot {
        DecodeStatsSnapshot {
            decoded: self.decoded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            missing_layers: self.missing_layers.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
        }
    }

    fn record_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_missing(&self) {
        self.missing_layers.fetch_add(1, Ordering::Relaxed);
    }

    fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fetches one layer and returns a lazy iterator over its records.
///
/// Never fails: every fetch error collapses to an empty sequence.
pub async fn read_layer<'a, S, C>(
    source: &S,
    codec: &'a C,
    coord: TileCoord,
    layer: Layer,
    stats: &'a DecodeStats,
) -> LayerRecords<'a, C>
where
    S: TileSource + ?Sized,
    C: TileCodec + ?Sized,
{
    let buf = match source.fetch(coord, layer).await {
        Ok(bytes) => {
            debug!(tile = %coord, layer = %layer, bytes = bytes.len(), "Layer fetched");
            bytes
        }
        Err(SourceError::NotFound { url }) => {
            debug!(tile = %coord, layer = %layer, url = %url, "Layer not published");
            stats.record_missing();
            Bytes::new()
        }
        Err(e) => {
            warn!(tile = %coord, layer = %layer, error = %e, "Layer fetch failed, treating as empty");
            stats.record_transport_failure();
            Bytes::new()
        }
    };

    LayerRecords::new(buf, codec, coord, layer, stats)
}

/// Forward-only iterator over the records of one fetched layer.
///
/// Owns the fetched buffer. Not restartable.
pub struct LayerRecords<'a, C: ?Sized> {
    buf: Bytes,
    pos: usize,
    kind: RecordKind,
    codec: &'a C,
    stats: &'a DecodeStats,
    coord: TileCoord,
    layer: Layer,
    skipped: usize,
}

impl<'a, C: TileCodec + ?Sized> LayerRecords<'a, C> {
    pub fn new(
        buf: Bytes,
        codec: &'a C,
        coord: TileCoord,
        layer: Layer,
        stats: &'a DecodeStats,
    ) -> Self {
        Self {
            buf,
            pos: 0,
            kind: RecordKind::from(layer),
            codec,
            stats,
            coord,
            layer,
            skipped: 0,
        }
    }

    /// Malformed records skipped so far by this iterator.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn skip(&mut self, error: &DecodeError) {
        self.skipped += 1;
        self.stats.record_skipped();
        debug!(
            tile = %self.coord,
            layer = %self.layer,
            offset = self.pos,
            error = %error,
            "Skipping malformed record"
        );
    }
}

impl<C: TileCodec + ?Sized> Iterator for LayerRecords<'_, C> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let range = match next_frame(&self.buf, &mut self.pos)? {
                Ok(range) => range,
                Err(e) => {
                    self.skip(&e);
                    return None;
                }
            };

            match self.codec.decode(&self.buf[range], self.kind) {
                Ok(record) => {
                    self.stats.record_decoded();
                    return Some(record);
                }
                Err(e) => self.skip(&e),
            }
        }
    }
}
