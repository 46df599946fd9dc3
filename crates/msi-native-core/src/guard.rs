//! RAII buffer guard

use crate::dtype::ElemType;
use crate::error::check_span;
use crate::handle::Handle;
use crate::raw;
use crate::{Error, Result};

/// Owned native region that remembers its size and releases itself on drop
///
/// All accessors are bounds-checked against the size requested at
/// construction.
pub struct NativeBuffer {
    /// Base address of the region
    handle: Handle,
    /// Size requested at allocation
    size: usize,
}

// Safety: the region is plain heap memory owned exclusively by this value;
// mutation goes through `&mut self`.
unsafe impl Send for NativeBuffer {}
unsafe impl Sync for NativeBuffer {}

impl NativeBuffer {
    /// Allocate a zero-filled buffer of `size` bytes
    pub fn new(size: usize) -> Result<Self> {
        let bytes = match i32::try_from(size) {
            Ok(n) if n > 0 => n,
            _ => return Err(Error::InvalidSize(size as i64)),
        };

        let handle = raw::alloc(bytes);
        if handle.is_null() {
            return Err(Error::AllocationFailed(size));
        }
        Ok(Self { handle, size })
    }

    /// Adopt a region previously given up with [`NativeBuffer::into_raw`]
    ///
    /// # Safety
    ///
    /// `handle` must be a live region of at least `size` bytes from
    /// [`raw::alloc`], not owned by anything else.
    pub unsafe fn from_raw(handle: Handle, size: usize) -> Result<Self> {
        if handle.is_null() {
            return Err(Error::NullHandle);
        }
        if size > i32::MAX as usize {
            return Err(Error::InvalidSize(size as i64));
        }
        Ok(Self { handle, size })
    }

    /// Give up ownership without releasing the region
    pub fn into_raw(self) -> Handle {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }

    /// Get handle
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Get size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the whole region as a slice
    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.handle.as_ptr(), self.size) }
    }

    /// Get the whole region as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.handle.as_ptr(), self.size) }
    }

    /// Write bytes at `offset`
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_span(offset, data.len(), self.size)?;
        self.as_mut_slice()[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Read `len` bytes starting at `offset`
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        check_span(offset, len, self.size)?;
        Ok(self.as_slice()[offset..offset + len].to_vec())
    }

    /// Write floats at byte `offset` in host layout
    pub fn write_floats(&mut self, offset: usize, data: &[f32]) -> Result<()> {
        self.float_span(offset, data.len())?;
        unsafe { raw::write_floats(self.handle, offset as i32, data) };
        Ok(())
    }

    /// Read `count` floats starting at byte `offset`
    pub fn read_floats(&self, offset: usize, count: usize) -> Result<Vec<f32>> {
        let len = self.float_span(offset, count)?;
        unsafe { raw::read_floats(self.handle, offset as i32, count as i32) }
            .ok_or(Error::AllocationFailed(len))
    }

    /// Set every byte to `value & 0xFF`
    pub fn fill(&mut self, value: i32) {
        self.as_mut_slice().fill((value & 0xFF) as u8);
    }

    /// Set `len` bytes starting at `offset` to `value & 0xFF`
    pub fn fill_range(&mut self, offset: usize, len: usize, value: i32) -> Result<()> {
        check_span(offset, len, self.size)?;
        self.as_mut_slice()[offset..offset + len].fill((value & 0xFF) as u8);
        Ok(())
    }

    /// Copy `len` bytes from this buffer into `dest`
    pub fn copy_to(
        &self,
        dest: &mut NativeBuffer,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
    ) -> Result<()> {
        check_span(src_offset, len, self.size)?;
        check_span(dst_offset, len, dest.size)?;
        dest.as_mut_slice()[dst_offset..dst_offset + len]
            .copy_from_slice(&self.as_slice()[src_offset..src_offset + len]);
        Ok(())
    }

    /// Copy `len` bytes within this buffer; spans may overlap
    pub fn copy_within(&mut self, src_offset: usize, dst_offset: usize, len: usize) -> Result<()> {
        check_span(src_offset, len, self.size)?;
        check_span(dst_offset, len, self.size)?;
        self.as_mut_slice()
            .copy_within(src_offset..src_offset + len, dst_offset);
        Ok(())
    }

    fn float_span(&self, offset: usize, count: usize) -> Result<usize> {
        let len = ElemType::Float32.span(count).ok_or(Error::OutOfBounds {
            offset,
            len: usize::MAX,
            size: self.size,
        })?;
        check_span(offset, len, self.size)?;
        Ok(len)
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        unsafe { raw::free(self.handle) };
    }
}
