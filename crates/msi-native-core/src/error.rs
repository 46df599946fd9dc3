//! Error types for msi-native
//!
//! Only the checked layers produce these. The raw path logs and returns
//! sentinels instead.

use crate::handle::Handle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid size: {0}")]
    InvalidSize(i64),

    #[error("failed to allocate {0} bytes")]
    AllocationFailed(usize),

    #[error("null handle")]
    NullHandle,

    #[error("unknown handle: {0}")]
    UnknownHandle(Handle),

    #[error("out of bounds: offset {offset} + len {len} exceeds region of {size} bytes")]
    OutOfBounds { offset: usize, len: usize, size: usize },

    #[error("negative span: offset {offset}, len {len}")]
    NegativeSpan { offset: i64, len: i64 },

    #[error("handle already live: {0}")]
    AlreadyLive(Handle),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check that `offset..offset + len` lies inside a region of `size` bytes.
pub(crate) fn check_span(offset: usize, len: usize, size: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(Error::OutOfBounds { offset, len, size }),
    }
}

/// Convert a signed offset/length pair from a binding into `usize`.
pub(crate) fn unsigned_span(offset: i32, len: i64) -> Result<(usize, usize)> {
    if offset < 0 || len < 0 {
        return Err(Error::NegativeSpan {
            offset: offset as i64,
            len,
        });
    }
    let len = usize::try_from(len).map_err(|_| Error::NegativeSpan {
        offset: offset as i64,
        len,
    })?;
    Ok((offset as usize, len))
}
