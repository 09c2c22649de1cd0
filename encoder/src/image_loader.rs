//! Texture decoding collaborator.

use std::path::Path;

use procbridge_core::texture::{CpuTexture, TextureFormat};

use crate::error::ImageLoadError;

/// Resolves a texture URI into decoded pixels.
///
/// Implementations are shared across builders (and threads) as
/// `Arc<dyn ImageLoader>`.
pub trait ImageLoader: Send + Sync {
    fn load(&self, uri: &str) -> Result<CpuTexture, ImageLoadError>;
}

/// Loads textures from the local filesystem with the `image` crate.
///
/// Every supported format is decoded to 8-bit sRGB RGBA.
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader;

impl FileImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Decode an in-memory image file.
    pub fn decode(uri: &str, bytes: &[u8]) -> Result<CpuTexture, ImageLoadError> {
        let format = image::guess_format(bytes)
            .map_err(|_| ImageLoadError::UnsupportedFormat(uri.to_string()))?;
        let img = image::load_from_memory_with_format(bytes, format).map_err(|e| match e {
            image::ImageError::Unsupported(_) => ImageLoadError::UnsupportedFormat(uri.to_string()),
            other => ImageLoadError::Decode {
                uri: uri.to_string(),
                message: other.to_string(),
            },
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageLoadError::InvalidDimensions {
                uri: uri.to_string(),
                width,
                height,
            });
        }

        Ok(CpuTexture::new(
            width,
            height,
            TextureFormat::Rgba8UnormSrgb,
            rgba.into_raw(),
        ))
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, uri: &str) -> Result<CpuTexture, ImageLoadError> {
        let path = Path::new(uri);
        if !path.is_file() {
            return Err(ImageLoadError::NotFound(uri.to_string()));
        }
        let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
            uri: uri.to_string(),
            source,
        })?;
        Self::decode(uri, &bytes)
    }
}
