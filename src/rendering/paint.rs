/// Paint command set for label scenes, in logical pixels relative to the content box

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaintCommand {
    SolidRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rgba: [u8; 4],
    },
    /// A run of barcode modules; `1` paints a bar, anything else is a gap.
    Bars {
        x: f64,
        y: f64,
        module_width: f64,
        height: f64,
        pattern: String,
        #[serde(default = "opaque_black")]
        rgba: [u8; 4],
        /// Painted from a resource on another origin (e.g. a web barcode font)
        #[serde(default)]
        cross_origin: bool,
    },
}

fn opaque_black() -> [u8; 4] {
    [0, 0, 0, 255]
}

impl PaintCommand {
    pub fn is_cross_origin(&self) -> bool {
        matches!(self, PaintCommand::Bars { cross_origin: true, .. })
    }
}
