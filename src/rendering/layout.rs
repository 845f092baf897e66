/// Geometry and the small subset of CSS the scene renderer understands

use crate::region::Presentation;
use serde::{Deserialize, Serialize};

/// Bounding box in logical (CSS) pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// True unless both sides are finite and positive.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// A parsed `border` shorthand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f64,
    pub rgba: [u8; 4],
}

/// Parse a CSS pixel length (`"12px"`, `"0"`, `"-3.5px"`).
pub fn parse_px(s: &str) -> Option<f64> {
    let s = s.trim();
    let number = s.strip_suffix("px").unwrap_or(s).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a handful of named colors.
pub fn parse_color(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        return match hex.len() {
            3 => Some([
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            ]),
            6 => Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]),
            8 => Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?]),
            _ => None,
        };
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0, 255]),
        "white" => Some([255, 255, 255, 255]),
        "gray" | "grey" => Some([128, 128, 128, 255]),
        "red" => Some([255, 0, 0, 255]),
        "transparent" => Some([0, 0, 0, 0]),
        _ => None,
    }
}

/// Parse the `border` shorthand. `none`, empty and zero-width borders yield `None`.
pub fn parse_border(s: &str) -> Option<Border> {
    let mut width = None;
    let mut style_none = false;
    let mut rgba = [0, 0, 0, 255];

    for token in s.split_whitespace() {
        match token {
            "none" | "hidden" => style_none = true,
            "solid" | "dashed" | "dotted" | "double" => {}
            t => {
                if let Some(px) = parse_px(t) {
                    width = Some(px);
                } else if let Some(c) = parse_color(t) {
                    rgba = c;
                }
            }
        }
    }

    let width = width?;
    if style_none || width <= 0.0 {
        return None;
    }
    Some(Border { width, rgba })
}

/// Border box of a region laid out at `origin` with the given content size.
///
/// `fixed` and `absolute` regions are placed at their `left`/`top` offsets,
/// `relative` regions are shifted by them, anything else stays at `origin`.
pub fn border_box(origin: (f64, f64), content: (f64, f64), presentation: &Presentation) -> Rect {
    let bw = parse_border(&presentation.border).map(|b| b.width).unwrap_or(0.0);
    let left = parse_px(&presentation.left);
    let top = parse_px(&presentation.top);

    let (x, y) = match presentation.position.trim() {
        "fixed" | "absolute" => (left.unwrap_or(origin.0), top.unwrap_or(origin.1)),
        "relative" => (origin.0 + left.unwrap_or(0.0), origin.1 + top.unwrap_or(0.0)),
        _ => origin,
    };

    Rect::new(x, y, content.0 + 2.0 * bw, content.1 + 2.0 * bw)
}
