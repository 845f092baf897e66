//! Rendering primitives: geometry, paint commands, and the raster artifact

pub mod layout;
pub mod paint;
pub mod raster;

use crate::rendering::layout::Rect;
use crate::{Error, Result};
use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};

/// Largest RGBA buffer a capture may allocate, in bytes (1 GiB)
pub const MAX_RASTER_BYTES: u64 = 1 << 30;

/// Options handed to a region when it is rasterized
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Raster pixels per logical pixel
    pub scale: u32,
    /// Backdrop composited under the content; `None` keeps it transparent
    pub background: Option<[u8; 4]>,
    /// Paint cross-origin content instead of blanking it
    pub allow_cross_origin: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            background: None,
            allow_cross_origin: true,
        }
    }
}

impl RasterOptions {
    pub fn from_config(config: &crate::PipelineConfig) -> Self {
        Self {
            scale: config.supersample,
            background: config.background,
            allow_cross_origin: config.allow_cross_origin,
        }
    }
}

/// Pixel extent of a logical length at the given scale.
///
/// `None` when the result is not finite or does not fit in a `u32`.
pub fn scaled_extent(logical: f64, scale: u32) -> Option<u32> {
    let v = (logical * scale as f64).round();
    if !v.is_finite() || v > u32::MAX as f64 {
        return None;
    }
    Some(v.max(0.0) as u32)
}

/// Raster dimensions for `bounds` at `scale`, refusing empty or oversized
/// buffers.
pub fn raster_extent(bounds: &Rect, scale: u32) -> Result<(u32, u32)> {
    if scale == 0 {
        return Err(Error::CaptureError("raster scale must be positive".into()));
    }
    let too_large = || {
        Error::CaptureError(format!(
            "raster for {}x{} at {}x exceeds {} bytes",
            bounds.width, bounds.height, scale, MAX_RASTER_BYTES
        ))
    };
    let width = scaled_extent(bounds.width, scale).ok_or_else(too_large)?;
    let height = scaled_extent(bounds.height, scale).ok_or_else(too_large)?;
    if width == 0 || height == 0 {
        return Err(Error::CaptureError(format!(
            "raster would be empty ({}x{} at {}x)",
            bounds.width, bounds.height, scale
        )));
    }

    let bytes = (width as u64)
        .checked_mul(height as u64)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(too_large)?;
    if bytes > MAX_RASTER_BYTES {
        return Err(too_large());
    }
    Ok((width, height))
}

/// A captured label bitmap, PNG-encoded
#[derive(Debug, Clone, PartialEq)]
pub struct RasterArtifact {
    /// Pixel width of the encoded image
    pub width: u32,
    /// Pixel height of the encoded image
    pub height: u32,
    /// Supersampling factor the image was rendered at
    pub scale: u32,
    pub png_data: Vec<u8>,
}

impl RasterArtifact {
    /// `data:` URL suitable for an `<img src>` with no network round-trip.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }

    /// Hex sha256 of the PNG payload.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}
