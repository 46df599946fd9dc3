//! Live handle registry
//!
//! Debug aid for the checked facade: remembers the size of every region it
//! has seen allocated so later calls can be validated instead of trusted.

use crate::handle::Handle;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;

/// What the registry knows about a live region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Size requested at allocation
    pub size: usize,
    /// Allocation sequence number, unique per registry
    pub seq: u64,
}

#[derive(Default)]
struct Table {
    regions: HashMap<Handle, Region>,
    next_seq: u64,
    live_bytes: usize,
}

/// Handle → region table
#[derive(Default)]
pub struct HandleRegistry {
    table: Mutex<Table>,
}

impl HandleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly allocated region
    pub fn insert(&self, handle: Handle, size: usize) -> Result<Region> {
        if handle.is_null() {
            return Err(Error::NullHandle);
        }

        let mut table = self.table.lock();
        if table.regions.contains_key(&handle) {
            return Err(Error::AlreadyLive(handle));
        }

        let region = Region {
            size,
            seq: table.next_seq,
        };
        table.next_seq += 1;
        table.live_bytes += size;
        table.regions.insert(handle, region);
        Ok(region)
    }

    /// Forget a region, returning what was recorded for it
    ///
    /// A second removal of the same handle fails with `UnknownHandle`.
    pub fn remove(&self, handle: Handle) -> Result<Region> {
        if handle.is_null() {
            return Err(Error::NullHandle);
        }

        let mut table = self.table.lock();
        let region = table
            .regions
            .remove(&handle)
            .ok_or(Error::UnknownHandle(handle))?;
        table.live_bytes -= region.size;
        Ok(region)
    }

    /// Look up a live region
    pub fn get(&self, handle: Handle) -> Result<Region> {
        if handle.is_null() {
            return Err(Error::NullHandle);
        }

        self.table
            .lock()
            .regions
            .get(&handle)
            .copied()
            .ok_or(Error::UnknownHandle(handle))
    }

    /// Check whether a handle is live
    pub fn contains(&self, handle: Handle) -> bool {
        self.table.lock().regions.contains_key(&handle)
    }

    /// Number of live regions
    pub fn live_count(&self) -> usize {
        self.table.lock().regions.len()
    }

    /// Sum of live region sizes
    pub fn live_bytes(&self) -> usize {
        self.table.lock().live_bytes
    }
}
