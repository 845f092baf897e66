//! In-memory label region backed by a paint-command scene

use crate::region::{Presentation, VisualRegion};
use crate::rendering::layout::{border_box, parse_border, Rect};
use crate::rendering::paint::PaintCommand;
use crate::rendering::raster::Canvas;
use crate::rendering::{RasterArtifact, RasterOptions};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A laid-out label: content size, where the preview placed it, its inline
/// style, and what to paint inside the content box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScene {
    /// Content width in logical pixels
    pub width: f64,
    /// Content height in logical pixels
    pub height: f64,
    /// Where the preview laid the region out
    #[serde(default)]
    pub origin: (f64, f64),
    #[serde(default)]
    pub style: Presentation,
    #[serde(default)]
    pub commands: Vec<PaintCommand>,
}

impl LabelScene {
    pub fn blank(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin: (0.0, 0.0),
            style: Presentation::default(),
            commands: Vec::new(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("invalid scene {}: {}", path.display(), e)))
    }
}

/// A [`VisualRegion`] rendered by the built-in software rasterizer
#[derive(Debug, Clone)]
pub struct SceneRegion {
    scene: LabelScene,
    presentation: Presentation,
    attached: bool,
    mutations: usize,
}

impl SceneRegion {
    pub fn new(scene: LabelScene) -> Self {
        let presentation = scene.style.clone();
        Self {
            scene,
            presentation,
            attached: true,
            mutations: 0,
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Remove the region from its rendering tree
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn scene(&self) -> &LabelScene {
        &self.scene
    }

    /// Number of `apply_presentation` calls so far
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }
}

impl VisualRegion for SceneRegion {
    fn is_attached(&self) -> Result<bool> {
        Ok(self.attached)
    }

    fn presentation(&self) -> Result<Presentation> {
        Ok(self.presentation.clone())
    }

    fn apply_presentation(&mut self, presentation: &Presentation) -> Result<()> {
        self.presentation = presentation.clone();
        self.mutations += 1;
        Ok(())
    }

    fn bounding_box(&self) -> Result<Rect> {
        if !self.attached {
            return Ok(Rect::default());
        }
        Ok(border_box(
            self.scene.origin,
            (self.scene.width, self.scene.height),
            &self.presentation,
        ))
    }

    fn rasterize(&self, bounds: &Rect, options: &RasterOptions) -> Result<RasterArtifact> {
        let mut canvas = Canvas::new(bounds, options)?;

        let border = parse_border(&self.presentation.border);
        let inset = border.map(|b| b.width).unwrap_or(0.0);
        if let Some(b) = &border {
            canvas.stroke_border(b, bounds.width, bounds.height);
        }
        canvas.paint(&self.scene.commands, inset, inset, options);

        canvas.into_artifact()
    }
}
