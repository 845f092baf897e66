//! Capture stage: turn a live region into a supersampled raster

use crate::fonts::FontReadiness;
use crate::region::{Presentation, PresentationGuard, VisualRegion};
use crate::rendering::{raster_extent, RasterArtifact, RasterOptions};
use crate::{Error, PipelineConfig, Result};
use std::sync::Arc;

/// Captures regions with a fixed supersampling factor.
///
/// The region's presentation is switched to [`Presentation::capture_safe`]
/// for the duration of a capture and restored on every exit path, including
/// when the returned future is dropped before completion.
#[derive(Clone)]
pub struct Capturer {
    options: RasterOptions,
    fonts: Arc<dyn FontReadiness>,
}

impl Capturer {
    pub fn new(config: &PipelineConfig, fonts: Arc<dyn FontReadiness>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            options: RasterOptions::from_config(config),
            fonts,
        })
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    pub async fn capture<R>(&self, region: &mut R) -> Result<RasterArtifact>
    where
        R: VisualRegion + ?Sized,
    {
        ensure_capturable(region)?;

        let guard = PresentationGuard::acquire(region, &Presentation::capture_safe())
            .map_err(Error::into_capture)?;

        let outcome = self.capture_prepared(&*guard).await;
        let restored = guard.restore();

        match (outcome, restored) {
            (Ok(artifact), Ok(())) => {
                log::info!(
                    "captured label {}x{} at {}x (sha256 {})",
                    artifact.width,
                    artifact.height,
                    artifact.scale,
                    artifact.digest()
                );
                Ok(artifact)
            }
            (Ok(_), Err(e)) => Err(Error::CaptureError(format!("presentation restore failed: {}", e))),
            (Err(e), restored) => {
                if let Err(re) = restored {
                    log::error!("presentation restore failed after capture error: {}", re);
                }
                Err(e.into_capture())
            }
        }
    }

    async fn capture_prepared<R>(&self, region: &R) -> Result<RasterArtifact>
    where
        R: VisualRegion + ?Sized,
    {
        match self.fonts.ready() {
            Some(ready) => {
                log::debug!("waiting for pending fonts");
                ready.await?;
            }
            None => log::debug!("no font readiness signal; measuring immediately"),
        }

        let bounds = region.bounding_box()?;
        if bounds.is_empty() {
            return Err(Error::CaptureError(format!(
                "region measured {}x{} after preparing for capture",
                bounds.width, bounds.height
            )));
        }
        log::debug!("measured region {}x{} at ({}, {})", bounds.width, bounds.height, bounds.x, bounds.y);

        let expected = raster_extent(&bounds, self.options.scale)?;
        let artifact = region.rasterize(&bounds, &self.options)?;

        if (artifact.width, artifact.height) != expected {
            log::warn!(
                "raster is {}x{}, expected {}x{} for the measured box",
                artifact.width,
                artifact.height,
                expected.0,
                expected.1
            );
        }
        Ok(artifact)
    }
}

/// Fail fast on regions that cannot be captured, before touching them.
fn ensure_capturable<R: VisualRegion + ?Sized>(region: &R) -> Result<()> {
    if !region.is_attached()? {
        return Err(Error::InvalidRegionError("region is not attached to a rendering tree".into()));
    }
    let bounds = region.bounding_box()?;
    if bounds.is_empty() {
        return Err(Error::InvalidRegionError(format!(
            "region has no area ({}x{})",
            bounds.width, bounds.height
        )));
    }
    Ok(())
}
