use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Logical canvas size in CSS-like pixels (before pixel-ratio scaling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
}

impl Canvas {
    /// The fixed 9:16 promo canvas (1080×1920).
    pub const PROMO: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Pixel dimensions of a raster backing this canvas at `pixel_ratio`.
    pub fn device_size(self, pixel_ratio: f64) -> (u32, u32) {
        let w = (f64::from(self.width) * pixel_ratio).ceil().max(1.0) as u32;
        let h = (f64::from(self.height) * pixel_ratio).ceil().max(1.0) as u32;
        (w, h)
    }
}

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of whole frames covering `ms` milliseconds (rounded to nearest).
    pub fn frames_in_ms(self, ms: f64) -> u64 {
        (ms.max(0.0) * self.as_f64() / 1000.0).round() as u64
    }
}

/// Host clock reading in milliseconds, as delivered to frame callbacks and timers.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// The zero timestamp.
    pub const ZERO: Timestamp = Timestamp(0.0);

    /// Milliseconds since the host clock's epoch.
    pub fn ms(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `origin` (negative if `origin` is later).
    pub fn since(self, origin: Timestamp) -> f64 {
        self.0 - origin.0
    }

    /// This timestamp shifted forward by `ms`.
    pub fn offset(self, ms: f64) -> Timestamp {
        Timestamp(self.0 + ms)
    }
}

/// Straight-alpha RGBA8 color as used by the drawing palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 255,
        }
    }

    /// Same color with alpha set from a `[0, 1]` fraction.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul(self) -> [u8; 4] {
        use crate::foundation::math::mul_div255_u8;
        let a = u16::from(self.a);
        [
            mul_div255_u8(u16::from(self.r), a),
            mul_div255_u8(u16::from(self.g), a),
            mul_div255_u8(u16::from(self.b), a),
            self.a,
        ]
    }
}
