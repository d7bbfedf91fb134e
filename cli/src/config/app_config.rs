//! Runtime configuration loaded from the environment (and `.env`).

use anyhow::{Context, bail};
use escpos_raster::{
    DitherMode, Framing, PipelineOptions, PrinterProfile, RasterEncoder, RasterScale,
};

use super::validation::validate_setting;

/// Runtime configuration for a print job.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub printer_device: String,
    pub printer_profile: String,
    pub profile_path: Option<String>,
    pub dither_mode: String,
    pub best_effort_dither: bool,
    pub threshold: Option<u8>,
    pub image_width: Option<u32>,
    pub allow_upscale: bool,
    pub auto_rotate: bool,
    pub rotate_print: bool,
    pub raster_scale: RasterScale,
    pub raster_framing: Framing,
    pub image_base_dir: String,
    pub dry_run_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            printer_device: "/dev/usb/lp0".into(),
            printer_profile: "58mm".into(),
            profile_path: None,
            dither_mode: "atkinson".into(),
            best_effort_dither: false,
            threshold: None,
            image_width: None,
            allow_upscale: false,
            auto_rotate: false,
            rotate_print: false,
            raster_scale: RasterScale::Normal,
            raster_framing: Framing::Auto,
            image_base_dir: ".".into(),
            dry_run_mode: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let g = |key: &str| -> anyhow::Result<Option<String>> {
            match lookup(key).filter(|v| !v.is_empty()) {
                Some(v) => {
                    validate_setting(key, &v)
                        .map_err(|e| anyhow::anyhow!("invalid {key}={v:?}: {e}"))?;
                    Ok(Some(v))
                }
                None => Ok(None),
            }
        };
        let flag = |key: &str| -> anyhow::Result<Option<bool>> {
            Ok(g(key)?.map(|v| v == "true"))
        };

        let mut cfg = Self::default();
        if let Some(v) = g("PRINTER_DEVICE")? {
            cfg.printer_device = v;
        }
        if let Some(v) = g("PRINTER_PROFILE")? {
            cfg.printer_profile = v;
        }
        cfg.profile_path = g("PROFILE_PATH")?;
        if let Some(v) = g("DITHER_MODE")? {
            cfg.dither_mode = v;
        }
        if let Some(v) = g("THRESHOLD")? {
            cfg.threshold = Some(v.parse()?);
        }
        if let Some(v) = g("IMAGE_WIDTH")? {
            cfg.image_width = Some(v.parse()?);
        }
        if let Some(v) = g("RASTER_SCALE")? {
            cfg.raster_scale = v.parse()?;
        }
        if let Some(v) = g("RASTER_FRAMING")? {
            cfg.raster_framing = v.parse()?;
        }
        if let Some(v) = g("IMAGE_BASE_DIR")? {
            cfg.image_base_dir = v;
        }
        cfg.best_effort_dither = flag("BEST_EFFORT_DITHER")?.unwrap_or(cfg.best_effort_dither);
        cfg.allow_upscale = flag("ALLOW_UPSCALE")?.unwrap_or(cfg.allow_upscale);
        cfg.auto_rotate = flag("AUTO_ROTATE")?.unwrap_or(cfg.auto_rotate);
        cfg.rotate_print = flag("ROTATE_PRINT")?.unwrap_or(cfg.rotate_print);
        cfg.dry_run_mode = flag("DRY_RUN_MODE")?.unwrap_or(cfg.dry_run_mode);

        Ok(cfg)
    }

    /// Resolve the printer profile: JSON file if configured, preset otherwise.
    pub fn profile(&self) -> anyhow::Result<PrinterProfile> {
        match &self.profile_path {
            Some(path) => PrinterProfile::from_json_file(path)
                .with_context(|| format!("failed to load printer profile from {path}")),
            None => Ok(PrinterProfile::preset(&self.printer_profile)?),
        }
    }

    /// Build pipeline options for `profile`.
    pub fn pipeline_options(&self, profile: &PrinterProfile) -> anyhow::Result<PipelineOptions> {
        let dither = DitherMode::resolve(&self.dither_mode, self.best_effort_dither)?;
        let width = self.image_width.unwrap_or(profile.dots_per_line);
        if width > profile.max_image_width() {
            bail!(
                "image width {width} exceeds printable width {} of {}",
                profile.max_image_width(),
                profile.model_info()
            );
        }

        Ok(PipelineOptions::for_profile(profile)
            .with_width(Some(width))
            .with_threshold(self.threshold.unwrap_or(profile.image_threshold))
            .with_dither(dither)
            .with_allow_upscale(self.allow_upscale)
            .with_auto_rotate(self.auto_rotate)
            .with_rotate_180(self.rotate_print))
    }

    /// Build the raster encoder for `profile`.
    pub fn encoder(&self, profile: &PrinterProfile) -> anyhow::Result<RasterEncoder> {
        Ok(RasterEncoder::for_profile(profile)?
            .with_framing(self.raster_framing)
            .with_scale(self.raster_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.printer_profile, "58mm");
        assert_eq!(cfg.dither_mode, "atkinson");
        assert_eq!(cfg.raster_framing, Framing::Auto);
        assert!(!cfg.rotate_print);
    }

    #[test]
    fn test_overrides() {
        let cfg = load(&[
            ("PRINTER_PROFILE", "80mm"),
            ("THRESHOLD", "90"),
            ("ROTATE_PRINT", "true"),
            ("RASTER_SCALE", "double-width"),
        ])
        .unwrap();
        assert_eq!(cfg.threshold, Some(90));
        assert!(cfg.rotate_print);
        assert_eq!(cfg.raster_scale, RasterScale::DoubleWidth);

        let profile = cfg.profile().unwrap();
        let opts = cfg.pipeline_options(&profile).unwrap();
        assert_eq!(opts.width, Some(576));
        assert_eq!(opts.threshold, 90);
        assert!(opts.rotate_180);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = load(&[("THRESHOLD", "300")]).unwrap_err();
        assert!(err.to_string().contains("THRESHOLD"));
    }

    #[test]
    fn test_unknown_dither_mode_best_effort() {
        let cfg = load(&[("DITHER_MODE", "ordered")]).unwrap();
        let profile = cfg.profile().unwrap();
        assert!(cfg.pipeline_options(&profile).is_err());

        let cfg = load(&[("DITHER_MODE", "ordered"), ("BEST_EFFORT_DITHER", "true")]).unwrap();
        let opts = cfg.pipeline_options(&profile).unwrap();
        assert_eq!(opts.dither, DitherMode::Threshold);
    }

    #[test]
    fn test_width_beyond_paper_rejected() {
        let cfg = load(&[("IMAGE_WIDTH", "1000")]).unwrap();
        let profile = cfg.profile().unwrap();
        assert!(cfg.pipeline_options(&profile).is_err());
    }
}
