//! Buffer handle

use std::fmt;

/// Base address of a native region, encoded as a JNI-sized integer.
///
/// Zero is the "no buffer" sentinel. The handle does not know its size;
/// whoever allocated it has to remember that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Handle(i64);

impl Handle {
    /// The zero handle
    pub const NULL: Handle = Handle(0);

    /// Wrap a raw integer received from a binding
    pub const fn from_raw(raw: i64) -> Self {
        Handle(raw)
    }

    /// Integer form handed back to a binding
    pub const fn into_raw(self) -> i64 {
        self.0
    }

    /// Check for the zero sentinel
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    pub(crate) fn from_ptr(ptr: *mut u8) -> Self {
        Handle(ptr as usize as i64)
    }

    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.0 as usize as *mut u8
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null() {
        assert!(Handle::NULL.is_null());
        assert!(Handle::default().is_null());
        assert!(!Handle::from_raw(0x1000).is_null());
    }

    #[test]
    fn test_ptr_round_trip() {
        let mut byte = 0u8;
        let ptr = &mut byte as *mut u8;
        let h = Handle::from_ptr(ptr);
        assert_eq!(h.as_ptr(), ptr);
        assert_eq!(Handle::from_raw(h.into_raw()), h);
    }

    #[test]
    fn test_display() {
        assert_eq!(Handle::from_raw(0x7f00).to_string(), "0x7f00");
        assert_eq!(Handle::NULL.to_string(), "0x0");
    }
}
