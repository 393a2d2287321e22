//! Editor configuration parsed from environment variables.

use crate::error::ConfigError;
use crate::geometry::Mask;

pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 500.0;
pub const DEFAULT_MASK_WIDTH: f32 = 400.0;
pub const DEFAULT_MASK_HEIGHT: f32 = 300.0;
pub const DEFAULT_MASK_RADIUS: f32 = 20.0;
pub const DEFAULT_ZOOM_MIN: f32 = 0.5;
pub const DEFAULT_ZOOM_MAX: f32 = 2.0;
pub const DEFAULT_ZOOM_STEP: f32 = 0.1;

/// Bounds and increment for the zoom controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_ZOOM_MIN,
            max: DEFAULT_ZOOM_MAX,
            step: DEFAULT_ZOOM_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub mask_width: f32,
    pub mask_height: f32,
    pub mask_radius: f32,
    pub zoom: ZoomLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            mask_width: DEFAULT_MASK_WIDTH,
            mask_height: DEFAULT_MASK_HEIGHT,
            mask_radius: DEFAULT_MASK_RADIUS,
            zoom: ZoomLimits::default(),
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `STENCIL_CANVAS_WIDTH` / `STENCIL_CANVAS_HEIGHT`: default 800 / 500
    /// - `STENCIL_MASK_WIDTH` / `STENCIL_MASK_HEIGHT`: default 400 / 300
    /// - `STENCIL_MASK_RADIUS`: default 20
    /// - `STENCIL_ZOOM_MIN` / `STENCIL_ZOOM_MAX` / `STENCIL_ZOOM_STEP`: default 0.5 / 2.0 / 0.1
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EditorConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: f32| parse_f32(lookup(key).as_deref(), default);

        let config = Self {
            canvas_width: get("STENCIL_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH),
            canvas_height: get("STENCIL_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT),
            mask_width: get("STENCIL_MASK_WIDTH", DEFAULT_MASK_WIDTH),
            mask_height: get("STENCIL_MASK_HEIGHT", DEFAULT_MASK_HEIGHT),
            mask_radius: get("STENCIL_MASK_RADIUS", DEFAULT_MASK_RADIUS),
            zoom: ZoomLimits {
                min: get("STENCIL_ZOOM_MIN", DEFAULT_ZOOM_MIN),
                max: get("STENCIL_ZOOM_MAX", DEFAULT_ZOOM_MAX),
                step: get("STENCIL_ZOOM_STEP", DEFAULT_ZOOM_STEP),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("canvas width", self.canvas_width),
            ("canvas height", self.canvas_height),
            ("mask width", self.mask_width),
            ("mask height", self.mask_height),
            ("zoom min", self.zoom.min),
            ("zoom step", self.zoom.step),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.mask_radius < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "mask radius",
                value: self.mask_radius,
            });
        }
        if self.mask_width > self.canvas_width || self.mask_height > self.canvas_height {
            return Err(ConfigError::MaskLargerThanCanvas {
                mask: (self.mask_width, self.mask_height),
                canvas: (self.canvas_width, self.canvas_height),
            });
        }
        if self.zoom.min > self.zoom.max {
            return Err(ConfigError::InvertedZoomLimits {
                min: self.zoom.min,
                max: self.zoom.max,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn mask(&self) -> Mask {
        Mask::centered_in(
            self.canvas_width,
            self.canvas_height,
            self.mask_width,
            self.mask_height,
            self.mask_radius,
        )
    }
}

fn parse_f32(raw: Option<&str>, default: f32) -> f32 {
    raw.and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
