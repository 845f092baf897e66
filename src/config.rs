//! Pipeline configuration and the persisted label-size store

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Store key holding the label width in millimeters
pub const LABEL_WIDTH_KEY: &str = "labelWidth";
/// Store key holding the label height in millimeters
pub const LABEL_HEIGHT_KEY: &str = "labelHeight";

/// Width used when the store holds no usable `labelWidth`
pub const DEFAULT_LABEL_WIDTH_MM: f64 = 59.0;
/// Height used when the store holds no usable `labelHeight`
pub const DEFAULT_LABEL_HEIGHT_MM: f64 = 40.0;

/// Configuration for the capture and print stages
///
/// The defaults match what the label preview needs on common thermal
/// printers:
/// - `supersample` of 4 keeps small text and barcode bars sharp on paper
/// - the backdrop is transparent so no fill is composited under the label
/// - cross-origin content is allowed so web barcode fonts are not blanked
///
/// # Examples
///
/// ```
/// let cfg = labelpress::PipelineConfig::default();
/// assert_eq!(cfg.supersample, 4);
/// assert!(cfg.background.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Ratio of raster pixels to logical (CSS) pixels
    pub supersample: u32,
    /// Delay between the print image loading and `window.print()`
    pub settle_delay_ms: u64,
    /// Optional opaque backdrop (RGBA); `None` keeps the raster transparent
    pub background: Option<[u8; 4]>,
    /// Whether cross-origin content may be painted into the raster
    pub allow_cross_origin: bool,
    /// `<title>` of the print document
    pub document_title: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            supersample: 4,
            settle_delay_ms: 250,
            background: None,
            allow_cross_origin: true,
            document_title: "Label Print".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.supersample == 0 {
            return Err(Error::ConfigError("supersample factor must be at least 1".into()));
        }
        if self.supersample > 16 {
            return Err(Error::ConfigError(format!(
                "supersample factor {} is larger than 16",
                self.supersample
            )));
        }
        Ok(())
    }
}

/// Real-world label dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalLabelSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for PhysicalLabelSize {
    fn default() -> Self {
        Self {
            width_mm: DEFAULT_LABEL_WIDTH_MM,
            height_mm: DEFAULT_LABEL_HEIGHT_MM,
        }
    }
}

impl PhysicalLabelSize {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self { width_mm, height_mm }
    }

    /// Read `labelWidth` / `labelHeight` from the store, falling back per key
    /// to 59 × 40 when a value is missing or unusable.
    pub fn from_store(store: &dyn ConfigStore) -> Self {
        let width_mm = store
            .get(LABEL_WIDTH_KEY)
            .and_then(|v| parse_millimeters(&v))
            .unwrap_or(DEFAULT_LABEL_WIDTH_MM);
        let height_mm = store
            .get(LABEL_HEIGHT_KEY)
            .and_then(|v| parse_millimeters(&v))
            .unwrap_or(DEFAULT_LABEL_HEIGHT_MM);
        Self { width_mm, height_mm }
    }

    /// CSS length for the width, e.g. `59mm`
    pub fn css_width(&self) -> String {
        format!("{}mm", self.width_mm)
    }

    /// CSS length for the height, e.g. `40mm`
    pub fn css_height(&self) -> String {
        format!("{}mm", self.height_mm)
    }
}

/// Parse a stored millimeter value.
///
/// Accepts the longest leading decimal number (`"80"`, `" 62.5"`, `"80mm"`)
/// and rejects anything that is not a finite positive length.
pub fn parse_millimeters(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let candidate: &str = {
        let end = s
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..end]
    };

    // Longest prefix that parses, so "1e" reads as 1 and "80-" as 80
    let value = (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())?;

    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Read-only key/value settings store
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory store, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// A JSON object on disk holding persisted UI settings
///
/// String values are returned as-is; numbers are returned in their JSON
/// spelling. A missing file behaves like an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::debug!("settings file {:?} not found; using defaults", path);
            return Ok(Self { path, values: HashMap::new() });
        }

        let raw = std::fs::read_to_string(&path)?;
        let parsed: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;

        let values = parsed
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                serde_json::Value::Number(n) => Some((k, n.to_string())),
                _ => None,
            })
            .collect();

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
