//! Python bindings for msi-native
//!
//! Module-level functions mirror the flat JNI surface but go through the
//! checked facade, so misuse raises instead of corrupting the interpreter.

use msi_native_core::{checked, raw, Handle, NativeBuffer as CoreBuffer};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Convert msi-native error to Python exception
fn to_py_err(e: msi_native_core::Error) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

/// Allocate a zero-filled native buffer, returning its handle
#[pyfunction]
fn alloc(bytes: i32) -> PyResult<i64> {
    checked::global()
        .alloc(bytes)
        .map(Handle::into_raw)
        .map_err(to_py_err)
}

/// Release a handle returned by `alloc`
#[pyfunction]
fn free(handle: i64) -> PyResult<()> {
    checked::global()
        .free(Handle::from_raw(handle))
        .map_err(to_py_err)
}

#[pyfunction]
fn write(handle: i64, offset: i32, data: &[u8]) -> PyResult<()> {
    checked::global()
        .write(Handle::from_raw(handle), offset, data)
        .map_err(to_py_err)
}

#[pyfunction]
fn read<'py>(py: Python<'py>, handle: i64, offset: i32, len: i32) -> PyResult<&'py PyBytes> {
    let bytes = checked::global()
        .read(Handle::from_raw(handle), offset, len)
        .map_err(to_py_err)?;
    Ok(PyBytes::new(py, &bytes))
}

#[pyfunction]
fn copy(src: i64, src_offset: i32, dst: i64, dst_offset: i32, len: i32) -> PyResult<()> {
    checked::global()
        .copy(
            Handle::from_raw(src),
            src_offset,
            Handle::from_raw(dst),
            dst_offset,
            len,
        )
        .map_err(to_py_err)
}

#[pyfunction]
fn fill(handle: i64, offset: i32, len: i32, value: i32) -> PyResult<()> {
    checked::global()
        .fill(Handle::from_raw(handle), offset, len, value)
        .map_err(to_py_err)
}

#[pyfunction]
fn write_floats(handle: i64, offset: i32, data: Vec<f32>) -> PyResult<()> {
    checked::global()
        .write_floats(Handle::from_raw(handle), offset, &data)
        .map_err(to_py_err)
}

#[pyfunction]
fn read_floats(handle: i64, offset: i32, count: i32) -> PyResult<Vec<f32>> {
    checked::global()
        .read_floats(Handle::from_raw(handle), offset, count)
        .map_err(to_py_err)
}

#[pyfunction]
fn sizeof_float() -> i32 {
    raw::sizeof_float()
}

/// Number of handles allocated through this module and not yet freed
#[pyfunction]
fn live_count() -> usize {
    checked::global().registry().live_count()
}

/// Python wrapper for NativeBuffer
///
/// Releases the region on `close()`, on context-manager exit, or when
/// garbage-collected, whichever comes first.
#[pyclass(unsendable)]
struct NativeBuffer {
    inner: Option<CoreBuffer>,
}

impl NativeBuffer {
    fn buf(&self) -> PyResult<&CoreBuffer> {
        self.inner
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("buffer is closed"))
    }

    fn buf_mut(&mut self) -> PyResult<&mut CoreBuffer> {
        self.inner
            .as_mut()
            .ok_or_else(|| PyValueError::new_err("buffer is closed"))
    }
}

#[pymethods]
impl NativeBuffer {
    #[new]
    fn new(size: usize) -> PyResult<Self> {
        let inner = CoreBuffer::new(size).map_err(to_py_err)?;
        Ok(Self { inner: Some(inner) })
    }

    #[getter]
    fn size(&self) -> PyResult<usize> {
        Ok(self.buf()?.size())
    }

    /// Raw handle, 0 once closed
    #[getter]
    fn handle(&self) -> i64 {
        self.inner
            .as_ref()
            .map_or(0, |buf| buf.handle().into_raw())
    }

    #[getter]
    fn closed(&self) -> bool {
        self.inner.is_none()
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> PyResult<()> {
        self.buf_mut()?.write(offset, data).map_err(to_py_err)
    }

    fn read<'py>(&self, py: Python<'py>, offset: usize, len: usize) -> PyResult<&'py PyBytes> {
        let bytes = self.buf()?.read(offset, len).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    fn write_floats(&mut self, offset: usize, data: Vec<f32>) -> PyResult<()> {
        self.buf_mut()?
            .write_floats(offset, &data)
            .map_err(to_py_err)
    }

    fn read_floats(&self, offset: usize, count: usize) -> PyResult<Vec<f32>> {
        self.buf()?.read_floats(offset, count).map_err(to_py_err)
    }

    /// Fill the whole buffer with `value & 0xFF`
    fn fill(&mut self, value: i32) -> PyResult<()> {
        self.buf_mut()?.fill(value);
        Ok(())
    }

    /// Copy into another buffer; `len` defaults to this buffer's size
    #[pyo3(signature = (dest, src_offset=0, dst_offset=0, len=None))]
    fn copy_to(
        &self,
        mut dest: PyRefMut<'_, NativeBuffer>,
        src_offset: usize,
        dst_offset: usize,
        len: Option<usize>,
    ) -> PyResult<()> {
        let src = self.buf()?;
        let len = len.unwrap_or(src.size());
        src.copy_to(dest.buf_mut()?, src_offset, dst_offset, len)
            .map_err(to_py_err)
    }

    /// Release the region; later calls are no-ops
    fn close(&mut self) {
        self.inner = None;
    }

    fn __enter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __exit__(&mut self, _exc_type: &PyAny, _exc_value: &PyAny, _traceback: &PyAny) -> bool {
        self.close();
        false
    }

    fn __len__(&self) -> usize {
        self.inner.as_ref().map_or(0, CoreBuffer::size)
    }

    fn __repr__(&self) -> String {
        match &self.inner {
            Some(buf) => format!("NativeBuffer(size={}, handle={})", buf.size(), buf.handle()),
            None => "NativeBuffer(closed)".to_string(),
        }
    }
}

#[pymodule]
fn pymsi(_py: Python, m: &PyModule) -> PyResult<()> {
    msi_native_core::logging::init();

    m.add_function(wrap_pyfunction!(alloc, m)?)?;
    m.add_function(wrap_pyfunction!(free, m)?)?;
    m.add_function(wrap_pyfunction!(write, m)?)?;
    m.add_function(wrap_pyfunction!(read, m)?)?;
    m.add_function(wrap_pyfunction!(copy, m)?)?;
    m.add_function(wrap_pyfunction!(fill, m)?)?;
    m.add_function(wrap_pyfunction!(write_floats, m)?)?;
    m.add_function(wrap_pyfunction!(read_floats, m)?)?;
    m.add_function(wrap_pyfunction!(sizeof_float, m)?)?;
    m.add_function(wrap_pyfunction!(live_count, m)?)?;
    m.add_class::<NativeBuffer>()?;
    m.add("FLOAT_SIZE", raw::sizeof_float())?;
    Ok(())
}
