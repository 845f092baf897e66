//! Chrome DevTools Protocol backend: capture a live DOM element
//!
//! `CdpRegion` drives an element's inline style through page evaluation and
//! rasterizes it with a clipped, scaled screenshot. `CdpFonts` awaits
//! `document.fonts.ready` in the same tab.

use crate::fonts::FontReadiness;
use crate::region::{Presentation, VisualRegion};
use crate::rendering::layout::Rect;
use crate::rendering::{RasterArtifact, RasterOptions};
use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page, DOM};
use headless_chrome::{Browser, LaunchOptions};
use log::warn;
use std::sync::Arc;

/// Launch headless Chrome and load `url` in a fresh tab.
pub fn launch(url: &str, window: (u32, u32)) -> Result<(Browser, Arc<Tab>)> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some(window))
        .build()
        .map_err(|e| Error::Other(format!("Failed to build launch options: {}", e)))?;

    let browser = Browser::new(launch_options)
        .map_err(|e| Error::Other(format!("Failed to launch browser: {}", e)))?;

    let tab = browser
        .new_tab()
        .map_err(|e| Error::Other(format!("Failed to create tab: {}", e)))?;

    tab.navigate_to(url)
        .map_err(|e| Error::Other(format!("Navigation failed: {}", e)))?;
    tab.wait_until_navigated()
        .map_err(|e| Error::Other(format!("Wait for navigation failed: {}", e)))?;

    Ok((browser, tab))
}

/// An element of a page open in headless Chrome, addressed by CSS selector
pub struct CdpRegion {
    tab: Arc<Tab>,
    selector: String,
}

impl CdpRegion {
    pub fn new(tab: Arc<Tab>, selector: &str) -> Self {
        Self {
            tab,
            selector: selector.to_string(),
        }
    }

    /// Evaluate `body` with `el` bound to the element (or null).
    fn eval(&self, body: &str) -> Result<serde_json::Value> {
        let selector = serde_json::to_string(&self.selector)
            .map_err(|e| Error::Other(format!("Invalid selector: {}", e)))?;
        let script = format!(
            "(function() {{ const el = document.querySelector({}); {} }})()",
            selector, body
        );
        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| Error::CaptureError(format!("Evaluation failed: {}", e)))?;
        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn eval_json<T: serde::de::DeserializeOwned>(&self, body: &str) -> Result<T> {
        let value = self.eval(body)?;
        let text = value
            .as_str()
            .ok_or_else(|| Error::InvalidRegionError(format!("element '{}' not found", self.selector)))?;
        serde_json::from_str(text).map_err(|e| Error::CaptureError(format!("Unexpected page response: {}", e)))
    }

    fn set_backdrop(&self, rgba: Option<[u8; 4]>) -> Result<()> {
        let color = rgba.map(|[r, g, b, a]| DOM::RGBA {
            r: r as u32,
            g: g as u32,
            b: b as u32,
            a: Some(a as f64 / 255.0),
        });
        self.tab
            .call_method(Emulation::SetDefaultBackgroundColorOverride { color })
            .map_err(|e| Error::CaptureError(format!("Failed to set backdrop: {}", e)))?;
        Ok(())
    }
}

impl VisualRegion for CdpRegion {
    fn is_attached(&self) -> Result<bool> {
        Ok(self.eval("return !!(el && el.isConnected);")?.as_bool().unwrap_or(false))
    }

    fn presentation(&self) -> Result<Presentation> {
        self.eval_json(
            "if (!el) return null; const s = el.style; \
             return JSON.stringify({position: s.position, left: s.left, top: s.top, border: s.border, boxShadow: s.boxShadow});",
        )
    }

    fn apply_presentation(&mut self, presentation: &Presentation) -> Result<()> {
        let style = serde_json::to_string(presentation)
            .map_err(|e| Error::Other(format!("Failed to encode presentation: {}", e)))?;
        let applied = self.eval(&format!(
            "if (!el) return false; Object.assign(el.style, {}); return true;",
            style
        ))?;
        if applied.as_bool() != Some(true) {
            return Err(Error::InvalidRegionError(format!("element '{}' not found", self.selector)));
        }
        Ok(())
    }

    fn bounding_box(&self) -> Result<Rect> {
        self.eval_json(
            "if (!el) return null; const r = el.getBoundingClientRect(); \
             return JSON.stringify({x: r.x, y: r.y, width: r.width, height: r.height});",
        )
    }

    fn rasterize(&self, bounds: &Rect, options: &RasterOptions) -> Result<RasterArtifact> {
        if !options.allow_cross_origin {
            warn!("Chrome paints cross-origin content regardless of allow_cross_origin");
        }

        self.set_backdrop(Some(options.background.unwrap_or([0, 0, 0, 0])))?;
        let clip = Page::Viewport {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            scale: options.scale as f64,
        };
        let shot = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true);
        if let Err(e) = self.set_backdrop(None) {
            warn!("failed to reset backdrop override: {}", e);
        }
        let png_data = shot.map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))?;

        let decoded = image::load_from_memory_with_format(&png_data, image::ImageFormat::Png)
            .map_err(|e| Error::CaptureError(format!("Screenshot is not a PNG: {}", e)))?;

        Ok(RasterArtifact {
            width: decoded.width(),
            height: decoded.height(),
            scale: options.scale,
            png_data,
        })
    }
}

/// `document.fonts.ready` of a tab
pub struct CdpFonts {
    tab: Arc<Tab>,
}

impl CdpFonts {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }
}

impl FontReadiness for CdpFonts {
    fn ready(&self) -> Option<BoxFuture<'_, Result<()>>> {
        let tab = self.tab.clone();
        Some(
            async move {
                let script = "(async function() { \
                    if (!(document.fonts && document.fonts.ready)) return false; \
                    await document.fonts.ready; return true; })()";
                let awaited = tokio::task::spawn_blocking(move || tab.evaluate(script, true))
                    .await
                    .map_err(|e| Error::CaptureError(format!("Font wait aborted: {}", e)))?
                    .map_err(|e| Error::CaptureError(format!("Font wait failed: {}", e)))?;
                if awaited.value.and_then(|v| v.as_bool()) != Some(true) {
                    log::debug!("page exposes no font readiness signal");
                }
                Ok(())
            }
            .boxed(),
        )
    }
}
