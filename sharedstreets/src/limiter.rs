//! Bounded tile assembly.
//!
//! A bounding-box union may cover hundreds of tiles, each costing four
//! fetches. [`ConcurrencyLimiter`] caps how many tiles are assembled at once
//! and remembers the highest number it ever saw running together.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};
use tracing::trace;

use crate::coord::TileCoord;

#[derive(Debug)]
pub struct ConcurrencyLimiter {
    slots: Semaphore,
    capacity: usize,
    active: AtomicUsize,
    peak: AtomicUsize,
    /// Tiles that had to wait for a slot
    queued: AtomicUsize,
    label: String,
}

impl ConcurrencyLimiter {
    /// Allows `capacity` tiles in flight; 0 is treated as 1.
    pub fn new(capacity: usize, label: impl Into<String>) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Semaphore::new(capacity),
            capacity,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            queued: AtomicUsize::new(0),
            label: label.into(),
        }
    }

    /// Waits until `tile` may be assembled.
    ///
    /// Errors only after [`close`](Self::close).
    pub async fn acquire(&self, tile: TileCoord) -> Result<ConcurrencyPermit<'_>, AcquireError> {
        let permit = match self.slots.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                self.queued.fetch_add(1, Ordering::Relaxed);
                trace!(tile = %tile, limiter = %self.label, "Waiting for a free slot");
                self.slots.acquire().await?
            }
        };

        let running = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak.fetch_max(running, Ordering::Relaxed);

        Ok(ConcurrencyPermit {
            _slot: permit,
            active: &self.active,
        })
    }

    /// Makes every pending and future [`acquire`](Self::acquire) fail.
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn max_concurrent(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// How many acquisitions found every slot taken.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }
}

/// One tile's slot; freed on drop.
pub struct ConcurrencyPermit<'a> {
    _slot: SemaphorePermit<'a>,
    active: &'a AtomicUsize,
}

impl Drop for ConcurrencyPermit<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}
