//! Raster bit image command encoding.
//!
//! Standard framing (`GS v 0`):
//! `1D 76 30 m xL xH yL yH d1...dk`
//!
//! Large framing (`GS 8 0`), same layout with 32-bit fields:
//! `1D 38 30 m x1 x2 x3 x4 y1 y2 y3 y4 d1...dk`
//!
//! `x` is the row width in bytes, `y` the height in dots, both little-endian.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::{MonochromeBitmap, PrinterProfile, RasterError, Result};

/// Command tag for the 16-bit framing.
const STANDARD_TAG: [u8; 3] = [0x1d, 0x76, 0x30];

/// Command tag for the 32-bit framing.
const LARGE_TAG: [u8; 3] = [0x1d, 0x38, 0x30];

/// Largest payload the 16-bit command can carry.
pub const STANDARD_MAX_PAYLOAD: usize = u16::MAX as usize;

/// Device buffer ceiling used when no profile is supplied.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Printer-side dot scaling selected by the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RasterScale {
    #[default]
    Normal = 0,
    DoubleWidth = 1,
    DoubleHeight = 2,
    Quadruple = 3,
}

impl RasterScale {
    pub fn mode_byte(self) -> u8 {
        self as u8
    }
}

impl FromStr for RasterScale {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "0" => Ok(Self::Normal),
            "double-width" | "double_width" | "1" => Ok(Self::DoubleWidth),
            "double-height" | "double_height" | "2" => Ok(Self::DoubleHeight),
            "quadruple" | "3" => Ok(Self::Quadruple),
            _ => Err(RasterError::InvalidInput(format!("unknown raster scale: {s}"))),
        }
    }
}

/// Width of the dimension fields in the command header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// 16-bit fields.
    #[default]
    Standard,
    /// 32-bit fields.
    Large,
    /// Standard when the payload fits in 65535 bytes, Large otherwise.
    Auto,
}

impl Framing {
    /// Concrete framing for a payload of `payload_len` bytes.
    fn resolve(self, payload_len: usize) -> WireFraming {
        match self {
            Self::Standard => WireFraming::Standard,
            Self::Large => WireFraming::Large,
            Self::Auto if payload_len <= STANDARD_MAX_PAYLOAD => WireFraming::Standard,
            Self::Auto => WireFraming::Large,
        }
    }
}

/// Framing actually written to the wire, once `Auto` has been decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireFraming {
    Standard,
    Large,
}

impl WireFraming {
    /// Largest value a dimension field can hold.
    fn field_max(self) -> u64 {
        match self {
            Self::Standard => u64::from(u16::MAX),
            Self::Large => u64::from(u32::MAX),
        }
    }

    fn header_len(self) -> usize {
        match self {
            Self::Standard => 8,
            Self::Large => 12,
        }
    }
}

impl From<WireFraming> for Framing {
    fn from(wire: WireFraming) -> Self {
        match wire {
            WireFraming::Standard => Self::Standard,
            WireFraming::Large => Self::Large,
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Large => "large",
            Self::Auto => "auto",
        })
    }
}

impl FromStr for Framing {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "large" => Ok(Self::Large),
            "auto" => Ok(Self::Auto),
            _ => Err(RasterError::InvalidInput(format!("unknown framing: {s}"))),
        }
    }
}

/// Serializes bitmaps into raster commands.
#[derive(Debug, Clone)]
pub struct RasterEncoder {
    max_buffer_size: usize,
    framing: Framing,
    scale: RasterScale,
}

impl Default for RasterEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFER_SIZE)
    }
}

impl RasterEncoder {
    /// Encoder limited to payloads of at most `max_buffer_size` bytes.
    pub fn new(max_buffer_size: usize) -> Self {
        Self {
            max_buffer_size,
            framing: Framing::Standard,
            scale: RasterScale::Normal,
        }
    }

    /// Encoder using the buffer ceiling of `profile`.
    pub fn for_profile(profile: &PrinterProfile) -> Result<Self> {
        if !profile.supports_graphics {
            return Err(RasterError::GraphicsUnsupported(profile.model_info()));
        }
        Ok(Self::new(profile.max_buffer_size))
    }

    /// Builder: set framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Builder: set the printer-side scale byte.
    pub fn with_scale(mut self, scale: RasterScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    /// Validate a `width_bytes` x `height` payload and return the framing
    /// that will carry it (never `Auto`).
    pub fn plan(&self, width_bytes: usize, height: usize) -> Result<Framing> {
        self.layout(width_bytes, height).map(Framing::from)
    }

    fn layout(&self, width_bytes: usize, height: usize) -> Result<WireFraming> {
        if width_bytes == 0 || height == 0 {
            return Err(RasterError::EmptyImage);
        }

        let payload = width_bytes.saturating_mul(height);
        let wire = self.framing.resolve(payload);
        check_field("width", width_bytes, wire)?;
        check_field("height", height, wire)?;

        if payload > self.max_buffer_size {
            return Err(RasterError::BufferOverflow {
                size: payload,
                max: self.max_buffer_size,
            });
        }
        if wire == WireFraming::Standard && payload > STANDARD_MAX_PAYLOAD {
            return Err(RasterError::DimensionOutOfRange {
                field: "payload",
                value: payload as u64,
                max: STANDARD_MAX_PAYLOAD as u64,
            });
        }

        Ok(wire)
    }

    /// Build the complete raster command for `bitmap`.
    ///
    /// Nothing is returned unless every check passes.
    pub fn encode(&self, bitmap: &MonochromeBitmap) -> Result<Vec<u8>> {
        let width_bytes = bitmap.width_bytes();
        let height = bitmap.height() as usize;
        let wire = self.layout(width_bytes, height)?;
        let payload = bitmap.raster_bytes();

        debug!(
            width_bytes,
            height,
            payload_len = payload.len(),
            framing = ?wire,
            scale = ?self.scale,
            "Encoding raster image"
        );

        let mut buf = Vec::with_capacity(wire.header_len() + payload.len());
        match wire {
            WireFraming::Standard => {
                buf.extend_from_slice(&STANDARD_TAG);
                buf.push(self.scale.mode_byte());
                buf.extend_from_slice(&(width_bytes as u16).to_le_bytes());
                buf.extend_from_slice(&(height as u16).to_le_bytes());
            }
            WireFraming::Large => {
                buf.extend_from_slice(&LARGE_TAG);
                buf.push(self.scale.mode_byte());
                buf.extend_from_slice(&(width_bytes as u32).to_le_bytes());
                buf.extend_from_slice(&(height as u32).to_le_bytes());
            }
        }
        buf.extend_from_slice(payload);
        Ok(buf)
    }
}

fn check_field(field: &'static str, value: usize, wire: WireFraming) -> Result<()> {
    let max = wire.field_max();
    if value as u64 > max {
        return Err(RasterError::DimensionOutOfRange {
            field,
            value: value as u64,
            max,
        });
    }
    Ok(())
}
