//! CPU-side texture types.
//!
//! Provides [`CpuTexture`] for holding decoded pixel data and the
//! [`TextureFormat`] it is stored in.

mod types;

pub use types::{CpuTexture, TextureFormat};
