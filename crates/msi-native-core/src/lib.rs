//! msi-native - Native byte buffers outside the managed heap
//!
//! [`raw`] is the unchecked default path handed to language bindings.
//! [`checked`] and [`NativeBuffer`] layer handle tracking and bounds
//! checks on top of it.

pub mod checked;
pub mod dtype;
pub mod error;
pub mod guard;
pub mod handle;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod raw;
pub mod registry;

pub use checked::Checked;
pub use dtype::ElemType;
pub use error::{Error, Result};
pub use guard::NativeBuffer;
pub use handle::Handle;
pub use registry::{HandleRegistry, Region};

/// Log target shared by every diagnostic this crate emits
pub const LOG_TARGET: &str = "msi_native";
