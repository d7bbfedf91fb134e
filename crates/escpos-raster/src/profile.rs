//! Printer capability profiles.
//!
//! The pipeline only reads a profile: dot width, threshold default, graphics
//! support and the device buffer ceiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoder::DEFAULT_MAX_BUFFER_SIZE;
use crate::{DEFAULT_THRESHOLD, RasterError, Result};

/// Physical characteristics and capabilities of a printer model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterProfile {
    pub model: String,
    pub vendor: String,
    /// Paper width in millimetres.
    pub paper_width_mm: f64,
    pub dpi: u32,
    pub dots_per_line: u32,
    pub supports_graphics: bool,
    /// Largest raster payload the device accepts, in bytes.
    pub max_buffer_size: usize,
    pub image_threshold: u8,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::generic_58mm()
    }
}

impl PrinterProfile {
    /// Generic 58 mm printer, 384 dots at 203 dpi.
    pub fn generic_58mm() -> Self {
        Self {
            model: "Generic 58mm".into(),
            vendor: "Generic".into(),
            paper_width_mm: 58.0,
            dpi: 203,
            dots_per_line: 384,
            supports_graphics: true,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            image_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Generic 80 mm printer, 576 dots at 203 dpi.
    pub fn generic_80mm() -> Self {
        Self {
            model: "Generic 80mm".into(),
            paper_width_mm: 80.0,
            dots_per_line: 576,
            ..Self::generic_58mm()
        }
    }

    /// GOOJPRT PT-210 (58 mm).
    pub fn pt_210() -> Self {
        Self {
            model: "58mm PT-210".into(),
            vendor: "GOOJPRT".into(),
            ..Self::generic_58mm()
        }
    }

    /// EC-PM-80250 (80 mm).
    pub fn ec_pm_80250() -> Self {
        Self {
            model: "80mm EC-PM-80250".into(),
            ..Self::generic_80mm()
        }
    }

    /// Look up a built-in profile by short name.
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "58mm" | "generic-58mm" => Ok(Self::generic_58mm()),
            "80mm" | "generic-80mm" => Ok(Self::generic_80mm()),
            "pt-210" | "pt210" => Ok(Self::pt_210()),
            "ec-pm-80250" => Ok(Self::ec_pm_80250()),
            other => Err(RasterError::InvalidInput(format!(
                "unknown printer profile: {other}"
            ))),
        }
    }

    /// Load a profile from a JSON file. Missing fields take the 58 mm defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| RasterError::InvalidInput(format!("invalid profile JSON: {e}")))
    }

    pub fn model_info(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }

    /// Printable width in dots derived from paper width and resolution.
    ///
    /// Falls back to 576 dots for 80 mm paper or wider, 384 otherwise.
    pub fn max_image_width(&self) -> u32 {
        if self.paper_width_mm > 0.0 && self.dpi > 0 {
            return (self.paper_width_mm / 25.4 * f64::from(self.dpi)) as u32;
        }
        if self.paper_width_mm >= 80.0 { 576 } else { 384 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(PrinterProfile::generic_58mm().dots_per_line, 384);
        assert_eq!(PrinterProfile::preset("80mm").unwrap().dots_per_line, 576);
        assert_eq!(PrinterProfile::preset("PT-210").unwrap().vendor, "GOOJPRT");
        assert!(PrinterProfile::preset("a4").is_err());
    }

    #[test]
    fn test_max_image_width() {
        // 80 / 25.4 * 203 = 639.37
        assert_eq!(PrinterProfile::generic_80mm().max_image_width(), 639);

        let mut p = PrinterProfile::generic_80mm();
        p.dpi = 0;
        assert_eq!(p.max_image_width(), 576);
        p.paper_width_mm = 58.0;
        assert_eq!(p.max_image_width(), 384);
    }

    #[test]
    fn test_json_partial_profile() {
        let p: PrinterProfile =
            serde_json::from_str(r#"{"model": "Tiny", "max_buffer_size": 4096}"#).unwrap();
        assert_eq!(p.model, "Tiny");
        assert_eq!(p.max_buffer_size, 4096);
        assert_eq!(p.dots_per_line, 384);
        assert!(p.supports_graphics);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("printer.json");
        let profile = PrinterProfile::ec_pm_80250();
        std::fs::write(&path, serde_json::to_string(&profile).unwrap()).unwrap();

        assert_eq!(PrinterProfile::from_json_file(&path).unwrap(), profile);
    }
}
