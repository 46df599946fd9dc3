//! Facade selection for the JNI exports
//!
//! Without the `checked` feature every call goes straight to the raw facade
//! and the Java side owns handle validity. With it, calls are validated by
//! the process-wide registry; violations are logged and mapped to the same
//! sentinels the raw path produces.

pub(crate) use imp::*;

#[cfg(not(feature = "checked"))]
mod imp {
    use msi_native_core::{raw, Handle};

    pub(crate) fn alloc(bytes: i32) -> Handle {
        raw::alloc(bytes)
    }

    pub(crate) fn free(handle: Handle) {
        unsafe { raw::free(handle) }
    }

    pub(crate) fn write(handle: Handle, offset: i32, data: &[u8]) {
        unsafe { raw::write(handle, offset, data) }
    }

    pub(crate) fn read(handle: Handle, offset: i32, len: i32) -> Option<Vec<u8>> {
        unsafe { raw::read(handle, offset, len) }
    }

    pub(crate) fn copy(src: Handle, src_offset: i32, dst: Handle, dst_offset: i32, len: i32) {
        unsafe { raw::copy(src, src_offset, dst, dst_offset, len) }
    }

    pub(crate) fn fill(handle: Handle, offset: i32, len: i32, value: i32) {
        unsafe { raw::fill(handle, offset, len, value) }
    }

    pub(crate) fn write_floats(handle: Handle, offset: i32, data: &[f32]) {
        unsafe { raw::write_floats(handle, offset, data) }
    }

    pub(crate) fn read_floats(handle: Handle, offset: i32, count: i32) -> Option<Vec<f32>> {
        unsafe { raw::read_floats(handle, offset, count) }
    }
}

#[cfg(feature = "checked")]
mod imp {
    use msi_native_core::{checked, Handle, Result, LOG_TARGET};
    use tracing::error;

    fn report<T>(op: &str, result: Result<T>) -> Option<T> {
        result
            .map_err(|e| error!(target: LOG_TARGET, error = %e, "{}: rejected", op))
            .ok()
    }

    pub(crate) fn alloc(bytes: i32) -> Handle {
        report("alloc", checked::global().alloc(bytes)).unwrap_or(Handle::NULL)
    }

    pub(crate) fn free(handle: Handle) {
        report("free", checked::global().free(handle));
    }

    pub(crate) fn write(handle: Handle, offset: i32, data: &[u8]) {
        report("write", checked::global().write(handle, offset, data));
    }

    pub(crate) fn read(handle: Handle, offset: i32, len: i32) -> Option<Vec<u8>> {
        report("read", checked::global().read(handle, offset, len))
    }

    pub(crate) fn copy(src: Handle, src_offset: i32, dst: Handle, dst_offset: i32, len: i32) {
        report(
            "copy",
            checked::global().copy(src, src_offset, dst, dst_offset, len),
        );
    }

    pub(crate) fn fill(handle: Handle, offset: i32, len: i32, value: i32) {
        report("fill", checked::global().fill(handle, offset, len, value));
    }

    pub(crate) fn write_floats(handle: Handle, offset: i32, data: &[f32]) {
        report(
            "writeFloats",
            checked::global().write_floats(handle, offset, data),
        );
    }

    pub(crate) fn read_floats(handle: Handle, offset: i32, count: i32) -> Option<Vec<f32>> {
        report(
            "readFloats",
            checked::global().read_floats(handle, offset, count),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msi_native_core::Handle;

    #[test]
    fn test_round_trip() {
        let h = alloc(16);
        assert!(!h.is_null());
        write(h, 0, &[1, 2, 3, 4]);
        assert_eq!(read(h, 0, 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(read(h, 4, 4).unwrap(), vec![0, 0, 0, 0]);
        fill(h, 8, 8, 0x2FF);
        assert_eq!(read(h, 8, 8).unwrap(), vec![0xFF; 8]);
        copy(h, 0, h, 12, 4);
        assert_eq!(read(h, 12, 4).unwrap(), vec![1, 2, 3, 4]);
        write_floats(h, 0, &[f32::NAN, -0.0]);
        let floats = read_floats(h, 0, 2).unwrap();
        assert!(floats[0].is_nan());
        assert_eq!(floats[1].to_bits(), (-0.0f32).to_bits());
        free(h);
    }

    #[test]
    fn test_sentinels() {
        assert!(alloc(0).is_null());
        assert!(alloc(-16).is_null());
        assert!(read(Handle::NULL, 0, 4).is_none());
        assert!(read_floats(Handle::NULL, 0, 4).is_none());
        free(Handle::NULL);
        write(Handle::NULL, 0, &[1]);
        fill(Handle::NULL, 0, 1, 1);
        copy(Handle::NULL, 0, Handle::NULL, 0, 1);
        write_floats(Handle::NULL, 0, &[1.0]);
    }

    #[cfg(feature = "checked")]
    #[test]
    fn test_checked_violations_are_sentinels() {
        let h = alloc(8);
        assert!(read(h, 4, 8).is_none());
        // Rejected write leaves the region untouched
        write(h, 6, &[1, 2, 3]);
        assert_eq!(read(h, 0, 8).unwrap(), vec![0; 8]);
        free(h);
        // Double release is reported, not executed
        free(h);
        assert!(read(h, 0, 1).is_none());
    }
}
