//! JNI bindings for msi-native
//!
//! Exports the native methods of `com.singularis.msi.NativeState`. Handles
//! cross the boundary as `jlong`, failures come back as `0` or `null`, and a
//! panic is never allowed to unwind into the JVM.

#![allow(non_snake_case)]

use jni::objects::{JByteArray, JClass, JFloatArray, ReleaseMode};
use jni::sys::{jbyteArray, jfloatArray, jint, jlong, JNI_VERSION_1_6};
use jni::JNIEnv;
use msi_native_core::{raw, Handle, LOG_TARGET};
use std::ffi::c_void;
use std::ptr;
use tracing::{error, info};

mod ops;

/// Run an export body, turning a panic into the export's sentinel.
macro_rules! jni_guard {
    ($name:literal, $sentinel:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => {
                error!(target: LOG_TARGET, "{}: panic caught at JNI boundary", $name);
                $sentinel
            }
        }
    };
}

#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    msi_native_core::logging::init();
    info!(
        target: LOG_TARGET,
        checked = cfg!(feature = "checked"),
        "msi_native loaded"
    );
    JNI_VERSION_1_6
}

/// `external fun alloc(bytes: Int): Long`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_alloc(
    _env: JNIEnv,
    _class: JClass,
    bytes: jint,
) -> jlong {
    jni_guard!("alloc", 0, { ops::alloc(bytes).into_raw() })
}

/// `external fun free(ptr: Long)`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_free(
    _env: JNIEnv,
    _class: JClass,
    ptr: jlong,
) {
    jni_guard!("free", (), { ops::free(Handle::from_raw(ptr)) })
}

/// `external fun write(ptr: Long, offset: Int, data: ByteArray)`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_write(
    mut env: JNIEnv,
    _class: JClass,
    ptr: jlong,
    offset: jint,
    data: JByteArray,
) {
    jni_guard!("write", (), {
        let handle = Handle::from_raw(ptr);
        if handle.is_null() {
            return ops::write(handle, offset, &[]);
        }

        // Elements are only read, so nothing is copied back on release.
        let elements = match unsafe { env.get_array_elements(&data, ReleaseMode::NoCopyBack) } {
            Ok(elements) => elements,
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "write: failed to get byte array elements");
                return;
            }
        };
        let bytes =
            unsafe { std::slice::from_raw_parts(elements.as_ptr() as *const u8, elements.len()) };
        ops::write(handle, offset, bytes);
    })
}

/// `external fun read(ptr: Long, offset: Int, len: Int): ByteArray`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_read(
    env: JNIEnv,
    _class: JClass,
    ptr: jlong,
    offset: jint,
    len: jint,
) -> jbyteArray {
    jni_guard!("read", ptr::null_mut(), {
        let Some(bytes) = ops::read(Handle::from_raw(ptr), offset, len) else {
            return ptr::null_mut();
        };
        match env.byte_array_from_slice(&bytes) {
            Ok(out) => out.into_raw(),
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "read: failed to allocate output array");
                ptr::null_mut()
            }
        }
    })
}

/// `external fun copy(srcPtr: Long, srcOffset: Int, dstPtr: Long, dstOffset: Int, len: Int)`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_copy(
    _env: JNIEnv,
    _class: JClass,
    src_ptr: jlong,
    src_offset: jint,
    dst_ptr: jlong,
    dst_offset: jint,
    len: jint,
) {
    jni_guard!("copy", (), {
        ops::copy(
            Handle::from_raw(src_ptr),
            src_offset,
            Handle::from_raw(dst_ptr),
            dst_offset,
            len,
        )
    })
}

/// `external fun fill(ptr: Long, offset: Int, len: Int, value: Int)`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_fill(
    _env: JNIEnv,
    _class: JClass,
    ptr: jlong,
    offset: jint,
    len: jint,
    value: jint,
) {
    jni_guard!("fill", (), {
        ops::fill(Handle::from_raw(ptr), offset, len, value)
    })
}

/// `external fun sizeofFloat(): Int`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_sizeofFloat(
    _env: JNIEnv,
    _class: JClass,
) -> jint {
    raw::sizeof_float()
}

/// `external fun writeFloats(ptr: Long, offset: Int, data: FloatArray)`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_writeFloats(
    mut env: JNIEnv,
    _class: JClass,
    ptr: jlong,
    offset: jint,
    data: JFloatArray,
) {
    jni_guard!("writeFloats", (), {
        let handle = Handle::from_raw(ptr);
        if handle.is_null() {
            return ops::write_floats(handle, offset, &[]);
        }

        let elements = match unsafe { env.get_array_elements(&data, ReleaseMode::NoCopyBack) } {
            Ok(elements) => elements,
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "writeFloats: failed to get float array elements");
                return;
            }
        };
        ops::write_floats(handle, offset, &elements);
    })
}

/// `external fun readFloats(ptr: Long, offset: Int, count: Int): FloatArray`
#[no_mangle]
pub extern "system" fn Java_com_singularis_msi_NativeState_readFloats(
    env: JNIEnv,
    _class: JClass,
    ptr: jlong,
    offset: jint,
    count: jint,
) -> jfloatArray {
    jni_guard!("readFloats", ptr::null_mut(), {
        let Some(floats) = ops::read_floats(Handle::from_raw(ptr), offset, count) else {
            return ptr::null_mut();
        };
        let out = match env.new_float_array(count) {
            Ok(out) => out,
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "readFloats: failed to allocate output array");
                return ptr::null_mut();
            }
        };
        if let Err(e) = env.set_float_array_region(&out, 0, &floats) {
            error!(target: LOG_TARGET, error = %e, "readFloats: failed to fill output array");
            return ptr::null_mut();
        }
        out.into_raw()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_passes_value_through() {
        let v: i64 = jni_guard!("test", -1, { 42 });
        assert_eq!(v, 42);
    }

    #[test]
    fn test_guard_catches_panic() {
        let explode = true;
        let v: i64 = jni_guard!("test", -1, {
            if explode {
                panic!("boom");
            }
            7
        });
        assert_eq!(v, -1);
    }
}
