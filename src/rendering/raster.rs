/// Software rasterizer for label scenes

use crate::rendering::layout::{Border, Rect};
use crate::rendering::paint::PaintCommand;
use crate::rendering::{raster_extent, RasterArtifact, RasterOptions};
use crate::{Error, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Supersampled drawing surface addressed in logical pixels
pub struct Canvas {
    image: RgbaImage,
    scale: f64,
}

impl Canvas {
    pub fn new(bounds: &Rect, options: &RasterOptions) -> Result<Self> {
        let (width, height) = raster_extent(bounds, options.scale)?;
        let backdrop = options.background.unwrap_or([0, 0, 0, 0]);
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, Rgba(backdrop)),
            scale: options.scale as f64,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Fill a logical rectangle, source-over.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, rgba: [u8; 4]) {
        if width <= 0.0 || height <= 0.0 || rgba[3] == 0 {
            return;
        }
        let x0 = self.to_device(x, self.image.width());
        let y0 = self.to_device(y, self.image.height());
        let x1 = self.to_device(x + width, self.image.width());
        let y1 = self.to_device(y + height, self.image.height());

        for py in y0..y1 {
            for px in x0..x1 {
                let dst = self.image.get_pixel_mut(px, py);
                *dst = Rgba(blend(rgba, dst.0));
            }
        }
    }

    /// Stroke a border frame inset from the canvas edge.
    pub fn stroke_border(&mut self, border: &Border, width: f64, height: f64) {
        let w = border.width;
        self.fill_rect(0.0, 0.0, width, w, border.rgba);
        self.fill_rect(0.0, height - w, width, w, border.rgba);
        self.fill_rect(0.0, w, w, height - 2.0 * w, border.rgba);
        self.fill_rect(width - w, w, w, height - 2.0 * w, border.rgba);
    }

    /// Paint commands offset by `(dx, dy)` logical pixels.
    pub fn paint(&mut self, commands: &[PaintCommand], dx: f64, dy: f64, options: &RasterOptions) {
        for cmd in commands {
            if cmd.is_cross_origin() && !options.allow_cross_origin {
                log::debug!("skipping cross-origin paint command");
                continue;
            }
            match cmd {
                PaintCommand::SolidRect { x, y, width, height, rgba } => {
                    self.fill_rect(x + dx, y + dy, *width, *height, *rgba);
                }
                PaintCommand::Bars { x, y, module_width, height, pattern, rgba, .. } => {
                    for (i, module) in pattern.chars().enumerate() {
                        if module == '1' {
                            let bx = x + dx + i as f64 * module_width;
                            self.fill_rect(bx, y + dy, *module_width, *height, *rgba);
                        }
                    }
                }
            }
        }
    }

    pub fn into_artifact(self) -> Result<RasterArtifact> {
        let width = self.image.width();
        let height = self.image.height();
        let scale = self.scale as u32;
        let png_data = encode_png(&self.image)?;
        Ok(RasterArtifact { width, height, scale, png_data })
    }

    fn to_device(&self, logical: f64, limit: u32) -> u32 {
        let v = (logical * self.scale).round();
        if v <= 0.0 {
            0
        } else {
            (v as u32).min(limit)
        }
    }
}

fn blend(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    out
}

/// Encode an RGBA image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::CaptureError(format!("PNG encoding failed: {}", e)))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_supersampled_and_transparent() {
        let canvas = Canvas::new(&Rect::new(0.0, 0.0, 10.0, 5.0), &RasterOptions::default()).unwrap();
        assert_eq!(canvas.width(), 40);
        assert_eq!(canvas.height(), 20);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn oversized_canvas_is_a_capture_error() {
        let huge = Rect::new(0.0, 0.0, 1.1e9, 1.1e9);
        assert!(matches!(Canvas::new(&huge, &RasterOptions::default()), Err(Error::CaptureError(_))));
        let wide = Rect::new(0.0, 0.0, 40_000.0, 40_000.0);
        assert!(matches!(Canvas::new(&wide, &RasterOptions::default()), Err(Error::CaptureError(_))));
    }

    #[test]
    fn bars_paint_only_set_modules() {
        let mut canvas = Canvas::new(&Rect::new(0.0, 0.0, 4.0, 2.0), &RasterOptions::default()).unwrap();
        let bars = PaintCommand::Bars {
            x: 0.0,
            y: 0.0,
            module_width: 1.0,
            height: 2.0,
            pattern: "1010".into(),
            rgba: [0, 0, 0, 255],
            cross_origin: false,
        };
        canvas.paint(&[bars], 0.0, 0.0, &RasterOptions::default());
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(5, 1), [0, 0, 0, 0]);
        assert_eq!(canvas.pixel(9, 7), [0, 0, 0, 255]);
    }

    #[test]
    fn cross_origin_commands_blank_without_permission() {
        let opts = RasterOptions { allow_cross_origin: false, ..Default::default() };
        let mut canvas = Canvas::new(&Rect::new(0.0, 0.0, 2.0, 2.0), &opts).unwrap();
        let bars = PaintCommand::Bars {
            x: 0.0,
            y: 0.0,
            module_width: 2.0,
            height: 2.0,
            pattern: "1".into(),
            rgba: [0, 0, 0, 255],
            cross_origin: true,
        };
        canvas.paint(&[bars], 0.0, 0.0, &opts);
        assert_eq!(canvas.pixel(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn encoded_artifact_is_png() {
        let canvas = Canvas::new(&Rect::new(0.0, 0.0, 3.0, 3.0), &RasterOptions::default()).unwrap();
        let art = canvas.into_artifact().unwrap();
        assert_eq!(&art.png_data[0..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!((art.width, art.height), (12, 12));
    }
}
