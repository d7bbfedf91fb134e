//! Setting value validation.

use std::str::FromStr;

use escpos_raster::{Framing, PrinterProfile, RasterScale};

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "PRINTER_DEVICE" | "IMAGE_BASE_DIR" | "DITHER_MODE" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        "PRINTER_PROFILE" => {
            PrinterProfile::preset(value).map_err(|e| e.to_string())?;
        }
        "RASTER_SCALE" => {
            RasterScale::from_str(value).map_err(|e| e.to_string())?;
        }
        "RASTER_FRAMING" => {
            Framing::from_str(value).map_err(|e| e.to_string())?;
        }
        "THRESHOLD" => validate_int_range(value, 0, 255)?,
        "IMAGE_WIDTH" => validate_int_range(value, 1, 65_535 * 8)?,
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(
        key,
        "AUTO_ROTATE" | "ROTATE_PRINT" | "BEST_EFFORT_DITHER" | "ALLOW_UPSCALE" | "DRY_RUN_MODE"
    )
}
