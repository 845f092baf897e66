//! labelpress
//!
//! Capture a styled label preview as a supersampled raster and hand it to a
//! print surface that reproduces the label's physical size exactly.
//!
//! # Stages
//!
//! - **Capture** ([`Capturer`]): strip border, shadow and offsets from the
//!   region, wait for fonts, measure, rasterize at 4×, restore the original
//!   presentation on every exit path
//! - **Print surface** ([`surface::present_for_print`]): open a new window,
//!   write a document whose page and image are both sized in millimeters,
//!   print once the image has loaded
//!
//! # Example
//!
//! ```
//! use labelpress::{LabelPrinter, LabelScene, MemoryStore, PipelineConfig, SceneRegion};
//! use labelpress::fonts::FontsSettled;
//! use labelpress::surface::RecordingHost;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new().with("labelWidth", "80").with("labelHeight", "50");
//! let host = RecordingHost::new();
//! let mut printer = LabelPrinter::new(
//!     PipelineConfig::default(),
//!     Arc::new(FontsSettled),
//!     Arc::new(store),
//!     host.clone(),
//! )?;
//!
//! let mut region = SceneRegion::new(LabelScene::blank(200.0, 120.0));
//! printer.print(&mut region).await?;
//! assert!(host.windows()[0].html.contains("size: 80mm 50mm;"));
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod fonts;
pub mod pipeline;
pub mod region;
pub mod rendering;
pub mod surface;

// Live DOM capture through headless Chrome
#[cfg(feature = "cdp")]
pub mod cdp;

pub use capture::Capturer;
pub use config::{ConfigStore, JsonFileStore, MemoryStore, PhysicalLabelSize, PipelineConfig};
pub use error::{Error, Result};
pub use pipeline::{LabelPrinter, PipelineState};
pub use region::{LabelScene, Presentation, PresentationGuard, SceneRegion, VisualRegion};
pub use rendering::layout::Rect;
pub use rendering::{RasterArtifact, RasterOptions};
pub use surface::{present_for_print, PrintDocument, PrintSurfaceHost, PrintWindow};
