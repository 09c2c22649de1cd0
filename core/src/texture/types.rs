//! CPU texture data.

/// Pixel format of decoded texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit red channel, unsigned normalized.
    R8Unorm,
    /// 8-bit RGBA channels, unsigned normalized.
    #[default]
    Rgba8Unorm,
    /// 8-bit RGBA channels, sRGB.
    Rgba8UnormSrgb,
    /// 8-bit BGRA channels, unsigned normalized.
    Bgra8Unorm,
}

impl TextureFormat {
    /// Returns the size in bytes per pixel.
    pub fn block_size(&self) -> u32 {
        match self {
            Self::R8Unorm => 1,
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb | Self::Bgra8Unorm => 4,
        }
    }

    pub fn is_srgb(&self) -> bool {
        matches!(self, Self::Rgba8UnormSrgb)
    }
}

/// Decoded 2D texture held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct CpuTexture {
    /// Asset name (e.g. `T_brick`).
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Tightly packed rows, top row first.
    pub data: Vec<u8>,
}

impl CpuTexture {
    pub fn new(width: u32, height: u32, format: TextureFormat, data: Vec<u8>) -> Self {
        Self {
            name: None,
            width,
            height,
            format,
            data,
        }
    }

    /// Set the asset name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Number of bytes the pixel data should hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.block_size() as usize
    }

    /// Non-zero extent and a data buffer matching it.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() == self.expected_len()
    }
}

impl std::fmt::Debug for CpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuTexture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes() {
        assert_eq!(TextureFormat::R8Unorm.block_size(), 1);
        assert_eq!(TextureFormat::Rgba8UnormSrgb.block_size(), 4);
        assert!(TextureFormat::Rgba8UnormSrgb.is_srgb());
    }

    #[test]
    fn validity_checks_size() {
        let tex = CpuTexture::new(2, 2, TextureFormat::Rgba8Unorm, vec![0; 16]).with_name("T_a");
        assert!(tex.is_valid());
        assert_eq!(tex.name.as_deref(), Some("T_a"));

        let short = CpuTexture::new(2, 2, TextureFormat::Rgba8Unorm, vec![0; 15]);
        assert!(!short.is_valid());

        let empty = CpuTexture::new(0, 4, TextureFormat::R8Unorm, Vec::new());
        assert!(!empty.is_valid());
    }
}
