//! shares gathered toward the current unseal attempt

use crate::share::Share;

/// distinct shares submitted since the last reset, bounded by the threshold
#[derive(Debug)]
pub struct ShareAccumulator {
    capacity: usize,
    shares: Vec<Share>,
}

impl ShareAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            shares: Vec::with_capacity(capacity),
        }
    }

    /// add a share, returning whether it was taken and the resulting size
    ///
    /// byte-identical duplicates and submissions past capacity are no-ops,
    /// so a retried submission never corrupts progress.
    pub fn add(&mut self, share: Share) -> (bool, usize) {
        if self.shares.len() >= self.capacity || self.shares.contains(&share) {
            return (false, self.shares.len());
        }
        self.shares.push(share);
        (true, self.shares.len())
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.shares.len() >= self.capacity
    }

    /// drop every held share (each is wiped on drop)
    pub fn clear(&mut self) {
        self.shares.clear();
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }
}
