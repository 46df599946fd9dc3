//! Registry-backed facade
//!
//! Same operations as [`crate::raw`], but every handle is looked up in a
//! [`HandleRegistry`] and every span is checked against the recorded size
//! before any memory is touched. Double release, use after release, foreign
//! handles and out-of-range spans come back as [`Error`]s.

use crate::dtype::ElemType;
use crate::error::{check_span, unsigned_span};
use crate::handle::Handle;
use crate::raw;
use crate::registry::{HandleRegistry, Region};
use crate::{Error, Result, LOG_TARGET};
use std::sync::OnceLock;
use tracing::warn;

/// Process-wide instance used by the language bindings
pub fn global() -> &'static Checked {
    static GLOBAL: OnceLock<Checked> = OnceLock::new();
    GLOBAL.get_or_init(Checked::new)
}

/// Checked buffer facade
#[derive(Default)]
pub struct Checked {
    registry: HandleRegistry,
}

impl Checked {
    /// Create a facade with an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of regions allocated through this facade
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Allocate a zero-filled region and register it
    pub fn alloc(&self, bytes: i32) -> Result<Handle> {
        if bytes <= 0 {
            return Err(Error::InvalidSize(bytes as i64));
        }

        let handle = raw::alloc(bytes);
        if handle.is_null() {
            return Err(Error::AllocationFailed(bytes as usize));
        }

        if let Err(e) = self.registry.insert(handle, bytes as usize) {
            // Stale entry: the address was released without going through
            // this facade. Discard the entry and the fresh region.
            warn!(target: LOG_TARGET, %handle, "alloc: address already registered");
            let _ = self.registry.remove(handle);
            unsafe { raw::free(handle) };
            return Err(e);
        }
        Ok(handle)
    }

    /// Unregister and release a region
    pub fn free(&self, handle: Handle) -> Result<()> {
        self.registry.remove(handle)?;
        unsafe { raw::free(handle) };
        Ok(())
    }

    /// Size recorded for a live handle
    pub fn region_size(&self, handle: Handle) -> Result<usize> {
        Ok(self.registry.get(handle)?.size)
    }

    /// Bounds-checked [`raw::write`]
    pub fn write(&self, handle: Handle, offset: i32, data: &[u8]) -> Result<()> {
        self.span(handle, offset, data.len() as i64, ElemType::UInt8)?;
        unsafe { raw::write(handle, offset, data) };
        Ok(())
    }

    /// Bounds-checked [`raw::read`]
    pub fn read(&self, handle: Handle, offset: i32, len: i32) -> Result<Vec<u8>> {
        let (_, len) = self.span(handle, offset, len as i64, ElemType::UInt8)?;
        unsafe { raw::read(handle, offset, len as i32) }.ok_or(Error::AllocationFailed(len))
    }

    /// Bounds-checked [`raw::copy`]; both spans are validated
    pub fn copy(
        &self,
        src: Handle,
        src_offset: i32,
        dst: Handle,
        dst_offset: i32,
        len: i32,
    ) -> Result<()> {
        self.span(src, src_offset, len as i64, ElemType::UInt8)?;
        self.span(dst, dst_offset, len as i64, ElemType::UInt8)?;
        unsafe { raw::copy(src, src_offset, dst, dst_offset, len) };
        Ok(())
    }

    /// Bounds-checked [`raw::fill`]
    pub fn fill(&self, handle: Handle, offset: i32, len: i32, value: i32) -> Result<()> {
        self.span(handle, offset, len as i64, ElemType::UInt8)?;
        unsafe { raw::fill(handle, offset, len, value) };
        Ok(())
    }

    /// Bounds-checked [`raw::write_floats`]
    pub fn write_floats(&self, handle: Handle, offset: i32, data: &[f32]) -> Result<()> {
        self.span(handle, offset, data.len() as i64, ElemType::Float32)?;
        unsafe { raw::write_floats(handle, offset, data) };
        Ok(())
    }

    /// Bounds-checked [`raw::read_floats`]
    pub fn read_floats(&self, handle: Handle, offset: i32, count: i32) -> Result<Vec<f32>> {
        let (_, bytes) = self.span(handle, offset, count as i64, ElemType::Float32)?;
        unsafe { raw::read_floats(handle, offset, count) }.ok_or(Error::AllocationFailed(bytes))
    }

    /// Validate `count` elements of `elem` at `offset`, returning the byte span.
    fn span(
        &self,
        handle: Handle,
        offset: i32,
        count: i64,
        elem: ElemType,
    ) -> Result<(usize, usize)> {
        let Region { size, .. } = self.registry.get(handle)?;
        let (offset, count) = unsigned_span(offset, count)?;
        let len = elem.span(count).ok_or(Error::OutOfBounds {
            offset,
            len: usize::MAX,
            size,
        })?;
        check_span(offset, len, size)?;
        Ok((offset, len))
    }
}
