//! Unchecked buffer facade
//!
//! Every function here is a stateless operation over a [`Handle`]. The only
//! failures recognised are the zero handle and allocator exhaustion; both log
//! a diagnostic and produce a sentinel. Offsets and lengths are never checked
//! against the region, so the memory-touching functions are `unsafe`.

use crate::dtype::ElemType;
use crate::handle::Handle;
use crate::LOG_TARGET;
use std::ptr;
use tracing::{debug, error, trace};

/// Allocate a zero-filled region of `bytes` bytes.
///
/// Returns [`Handle::NULL`] if `bytes <= 0` or the allocator has nothing left.
pub fn alloc(bytes: i32) -> Handle {
    if bytes <= 0 {
        error!(target: LOG_TARGET, bytes, "alloc: invalid size");
        return Handle::NULL;
    }

    // calloc hands back zeroed memory, which covers the zero-fill contract.
    let ptr = unsafe { libc::calloc(bytes as usize, 1) } as *mut u8;
    if ptr.is_null() {
        error!(target: LOG_TARGET, bytes, "alloc: failed to allocate");
        return Handle::NULL;
    }

    let handle = Handle::from_ptr(ptr);
    debug!(target: LOG_TARGET, bytes, %handle, "alloc");
    handle
}

/// Return a region to the system allocator.
///
/// A zero handle is logged and ignored.
///
/// # Safety
///
/// `handle` must come from [`alloc`] and must not have been released already.
pub unsafe fn free(handle: Handle) {
    if handle.is_null() {
        error!(target: LOG_TARGET, "free: null pointer");
        return;
    }

    libc::free(handle.as_ptr() as *mut libc::c_void);
    debug!(target: LOG_TARGET, %handle, "free");
}

/// Copy `data` into the region at byte `offset`.
///
/// # Safety
///
/// `handle` must be live and `offset + data.len()` must not exceed the size it
/// was allocated with.
pub unsafe fn write(handle: Handle, offset: i32, data: &[u8]) {
    if handle.is_null() {
        error!(target: LOG_TARGET, "write: null pointer");
        return;
    }

    let dst = at(handle, offset);
    ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
    trace!(target: LOG_TARGET, %handle, offset, len = data.len(), "write");
}

/// Copy `len` bytes out of the region starting at byte `offset`.
///
/// Returns `None` for the zero handle or when the output vector cannot be
/// created (negative `len` or allocation failure).
///
/// # Safety
///
/// `handle` must be live and `offset + len` must not exceed its size.
pub unsafe fn read(handle: Handle, offset: i32, len: i32) -> Option<Vec<u8>> {
    if handle.is_null() {
        error!(target: LOG_TARGET, "read: null pointer");
        return None;
    }

    let Some(mut out) = output_vec::<u8>(len) else {
        error!(target: LOG_TARGET, len, "read: failed to allocate output array");
        return None;
    };

    let count = len as usize;
    ptr::copy_nonoverlapping(at(handle, offset) as *const u8, out.as_mut_ptr(), count);
    out.set_len(count);
    trace!(target: LOG_TARGET, %handle, offset, len, "read");
    Some(out)
}

/// Copy `len` bytes from one region to another.
///
/// Source and destination may be the same region. Overlapping spans are
/// handled like `memmove`.
///
/// # Safety
///
/// Both handles must be live and both spans must lie inside their regions.
pub unsafe fn copy(src: Handle, src_offset: i32, dst: Handle, dst_offset: i32, len: i32) {
    if src.is_null() || dst.is_null() {
        error!(target: LOG_TARGET, %src, %dst, "copy: null pointer");
        return;
    }
    if len < 0 {
        error!(target: LOG_TARGET, len, "copy: negative length");
        return;
    }

    ptr::copy(
        at(src, src_offset) as *const u8,
        at(dst, dst_offset),
        len as usize,
    );
    trace!(target: LOG_TARGET, %src, src_offset, %dst, dst_offset, len, "copy");
}

/// Set `len` bytes starting at `offset` to `value & 0xFF`.
///
/// # Safety
///
/// `handle` must be live and `offset + len` must not exceed its size.
pub unsafe fn fill(handle: Handle, offset: i32, len: i32, value: i32) {
    if handle.is_null() {
        error!(target: LOG_TARGET, "fill: null pointer");
        return;
    }
    if len < 0 {
        error!(target: LOG_TARGET, len, "fill: negative length");
        return;
    }

    ptr::write_bytes(at(handle, offset), (value & 0xFF) as u8, len as usize);
    trace!(target: LOG_TARGET, %handle, offset, len, value, "fill");
}

/// Copy `data` into the region at byte `offset`, in host float layout.
///
/// # Safety
///
/// `handle` must be live and `offset + 4 * data.len()` must not exceed its size.
pub unsafe fn write_floats(handle: Handle, offset: i32, data: &[f32]) {
    if handle.is_null() {
        error!(target: LOG_TARGET, "writeFloats: null pointer");
        return;
    }

    let bytes = std::mem::size_of_val(data);
    ptr::copy_nonoverlapping(data.as_ptr() as *const u8, at(handle, offset), bytes);
    trace!(target: LOG_TARGET, %handle, offset, count = data.len(), "writeFloats");
}

/// Copy `count` floats out of the region starting at byte `offset`.
///
/// The offset need not be float-aligned.
///
/// # Safety
///
/// `handle` must be live and `offset + 4 * count` must not exceed its size.
pub unsafe fn read_floats(handle: Handle, offset: i32, count: i32) -> Option<Vec<f32>> {
    if handle.is_null() {
        error!(target: LOG_TARGET, "readFloats: null pointer");
        return None;
    }

    let Some(mut out) = output_vec::<f32>(count) else {
        error!(target: LOG_TARGET, count, "readFloats: failed to allocate output array");
        return None;
    };

    let count = count as usize;
    ptr::copy_nonoverlapping(
        at(handle, offset) as *const u8,
        out.as_mut_ptr() as *mut u8,
        count * ElemType::Float32.size(),
    );
    out.set_len(count);
    trace!(target: LOG_TARGET, %handle, offset, count, "readFloats");
    Some(out)
}

/// Width of a float element on this host
pub fn sizeof_float() -> i32 {
    ElemType::Float32.size() as i32
}

unsafe fn at(handle: Handle, offset: i32) -> *mut u8 {
    handle.as_ptr().offset(offset as isize)
}

/// Empty vector with room for exactly `count` elements.
fn output_vec<T>(count: i32) -> Option<Vec<T>> {
    let count = usize::try_from(count).ok()?;
    let mut out = Vec::new();
    out.try_reserve_exact(count).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_rejects_non_positive() {
        assert!(alloc(0).is_null());
        assert!(alloc(-1).is_null());
        assert!(alloc(i32::MIN).is_null());
    }

    #[test]
    fn test_alloc_zeroed() {
        let h = alloc(64);
        assert!(!h.is_null());
        let bytes = unsafe { read(h, 0, 64) }.unwrap();
        assert_eq!(bytes, vec![0u8; 64]);
        unsafe { free(h) };
    }

    #[test]
    fn test_scenario() {
        let h = alloc(16);
        unsafe {
            write(h, 0, &[1, 2, 3, 4]);
            assert_eq!(read(h, 0, 4).unwrap(), vec![1, 2, 3, 4]);
            assert_eq!(read(h, 4, 4).unwrap(), vec![0, 0, 0, 0]);
            free(h);
        }
    }

    #[test]
    fn test_fill_masks_value() {
        let h = alloc(8);
        unsafe {
            fill(h, 2, 4, 0x1AB);
            assert_eq!(read(h, 0, 8).unwrap(), vec![0, 0, 0xAB, 0xAB, 0xAB, 0xAB, 0, 0]);
            fill(h, 0, 8, -1);
            assert_eq!(read(h, 0, 8).unwrap(), vec![0xFF; 8]);
            free(h);
        }
    }

    #[test]
    fn test_copy_same_region_overlapping() {
        let h = alloc(8);
        unsafe {
            write(h, 0, &[1, 2, 3, 4, 5, 6, 7, 8]);
            copy(h, 0, h, 2, 4);
            assert_eq!(read(h, 0, 8).unwrap(), vec![1, 2, 1, 2, 3, 4, 7, 8]);
            free(h);
        }
    }

    #[test]
    fn test_null_handle_sentinels() {
        let other = alloc(4);
        unsafe {
            free(Handle::NULL);
            write(Handle::NULL, 0, &[1, 2, 3]);
            assert_eq!(read(Handle::NULL, 0, 3), None);
            copy(Handle::NULL, 0, other, 0, 4);
            copy(other, 0, Handle::NULL, 0, 4);
            fill(Handle::NULL, 0, 4, 7);
            write_floats(Handle::NULL, 0, &[1.0]);
            assert_eq!(read_floats(Handle::NULL, 0, 1), None);
            assert_eq!(read(other, 0, 4).unwrap(), vec![0; 4]);
            free(other);
        }
    }

    #[test]
    fn test_negative_lengths() {
        let h = alloc(4);
        unsafe {
            assert_eq!(read(h, 0, -1), None);
            assert_eq!(read_floats(h, 0, -1), None);
            fill(h, 0, -4, 9);
            copy(h, 0, h, 0, -4);
            assert_eq!(read(h, 0, 4).unwrap(), vec![0; 4]);
            assert_eq!(read(h, 0, 0).unwrap(), Vec::<u8>::new());
            free(h);
        }
    }

    #[test]
    fn test_floats_unaligned_offset() {
        let h = alloc(16);
        unsafe {
            write_floats(h, 1, &[1.5, -2.25]);
            assert_eq!(read_floats(h, 1, 2).unwrap(), vec![1.5, -2.25]);
            assert_eq!(read(h, 1, 4).unwrap(), 1.5f32.to_ne_bytes().to_vec());
            free(h);
        }
    }

    #[test]
    fn test_sizeof_float() {
        assert_eq!(sizeof_float(), 4);
    }
}
