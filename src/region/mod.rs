//! Visual regions: the live label preview that gets captured
//!
//! A region is owned by whatever renders the preview; the capture stage only
//! borrows it, mutates a handful of inline presentation properties for the
//! duration of a capture, and always puts them back.

pub mod scene;

pub use scene::{LabelScene, SceneRegion};

use crate::rendering::layout::Rect;
use crate::rendering::{RasterArtifact, RasterOptions};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// The inline presentation properties touched by a capture.
///
/// Values are raw CSS strings; an empty string means "not set inline".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Presentation {
    pub position: String,
    pub left: String,
    pub top: String,
    pub border: String,
    pub box_shadow: String,
}

impl Presentation {
    /// Fixed at the origin with no border or shadow.
    pub fn capture_safe() -> Self {
        Self {
            position: "fixed".to_string(),
            left: "0px".to_string(),
            top: "0px".to_string(),
            border: "none".to_string(),
            box_shadow: "none".to_string(),
        }
    }
}

/// A rendered, styled area that can be measured and rasterized
pub trait VisualRegion {
    /// Whether the region is part of a visible rendering tree
    fn is_attached(&self) -> Result<bool>;

    /// Current inline presentation
    fn presentation(&self) -> Result<Presentation>;

    /// Replace the inline presentation properties
    fn apply_presentation(&mut self, presentation: &Presentation) -> Result<()>;

    /// Rendered bounding box in logical pixels
    fn bounding_box(&self) -> Result<Rect>;

    /// Rasterize the area covered by `bounds` at `options.scale`
    fn rasterize(&self, bounds: &Rect, options: &RasterOptions) -> Result<RasterArtifact>;
}

impl<R: VisualRegion + ?Sized> VisualRegion for Box<R> {
    fn is_attached(&self) -> Result<bool> {
        (**self).is_attached()
    }

    fn presentation(&self) -> Result<Presentation> {
        (**self).presentation()
    }

    fn apply_presentation(&mut self, presentation: &Presentation) -> Result<()> {
        (**self).apply_presentation(presentation)
    }

    fn bounding_box(&self) -> Result<Rect> {
        (**self).bounding_box()
    }

    fn rasterize(&self, bounds: &Rect, options: &RasterOptions) -> Result<RasterArtifact> {
        (**self).rasterize(bounds, options)
    }
}

/// Holds a region in a temporary presentation and puts the original back.
///
/// The snapshot is taken before the temporary presentation is applied, so a
/// failure while applying it is reverted too. `restore` reports restoration
/// errors; dropping the guard restores and logs them instead.
pub struct PresentationGuard<'a, R: VisualRegion + ?Sized> {
    region: &'a mut R,
    snapshot: Option<Presentation>,
}

impl<'a, R: VisualRegion + ?Sized> PresentationGuard<'a, R> {
    pub fn acquire(region: &'a mut R, temporary: &Presentation) -> Result<Self> {
        let snapshot = region.presentation()?;
        let mut guard = Self { region, snapshot: Some(snapshot) };
        guard.region.apply_presentation(temporary)?;
        Ok(guard)
    }

    /// The presentation that will be restored
    pub fn snapshot(&self) -> Option<&Presentation> {
        self.snapshot.as_ref()
    }

    pub fn restore(mut self) -> Result<()> {
        match self.snapshot.take() {
            Some(original) => self.region.apply_presentation(&original),
            None => Ok(()),
        }
    }
}

impl<R: VisualRegion + ?Sized> Deref for PresentationGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.region
    }
}

impl<R: VisualRegion + ?Sized> DerefMut for PresentationGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.region
    }
}

impl<R: VisualRegion + ?Sized> Drop for PresentationGuard<'_, R> {
    fn drop(&mut self) {
        if let Some(original) = self.snapshot.take() {
            if let Err(e) = self.region.apply_presentation(&original) {
                log::error!("failed to restore region presentation: {}", e);
            }
        }
    }
}
