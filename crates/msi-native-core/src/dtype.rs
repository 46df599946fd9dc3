//! Element type definitions

/// Element types a region can be accessed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElemType {
    UInt8 = 0,
    Float32 = 1,
}

// Float arrays are copied in host layout, so the reported width must match f32.
const _: () = assert!(ElemType::Float32.size() == std::mem::size_of::<f32>());

impl ElemType {
    /// Size in bytes
    pub const fn size(&self) -> usize {
        match self {
            ElemType::UInt8 => 1,
            ElemType::Float32 => 4,
        }
    }

    /// Convert from u8
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ElemType::UInt8),
            1 => Some(ElemType::Float32),
            _ => None,
        }
    }

    /// Byte span covered by `count` elements, `None` on overflow
    pub fn span(&self, count: usize) -> Option<usize> {
        count.checked_mul(self.size())
    }
}
