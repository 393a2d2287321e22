//! Cover-fit, pan clamping and zoom arithmetic.
//!
//! Everything here is a pure function of its arguments. Callers own the
//! resulting values and are responsible for writing them to the store.

use crate::config::ZoomLimits;
use crate::geometry::{MaskRect, Point, Transformation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    fn sign(self) -> f32 {
        match self {
            ZoomDirection::In => 1.0,
            ZoomDirection::Out => -1.0,
        }
    }
}

/// Smallest scale at which the image covers the mask on both axes.
///
/// One axis may overflow the mask; the overflow is clipped when painting.
#[must_use]
pub fn compute_fit_scale(
    mask_width: f32,
    mask_height: f32,
    image_width: f32,
    image_height: f32,
) -> f32 {
    (mask_width / image_width).max(mask_height / image_height)
}

/// Clamp a candidate image center so the image keeps covering the mask.
///
/// On each axis the center may travel between `end - half` and
/// `start + half`. When the scaled image is smaller than the mask on an axis
/// those bounds invert; that axis is centered on the mask instead.
#[must_use]
pub fn clamp_offset(
    candidate: Point,
    image_width: f32,
    image_height: f32,
    scale: f32,
    mask_rect: &MaskRect,
) -> Point {
    let half_w = image_width * scale / 2.0;
    let half_h = image_height * scale / 2.0;
    Point {
        x: clamp_axis(candidate.x, mask_rect.left, mask_rect.width, half_w),
        y: clamp_axis(candidate.y, mask_rect.top, mask_rect.height, half_h),
    }
}

fn clamp_axis(value: f32, start: f32, length: f32, half_extent: f32) -> f32 {
    let lo = start + length - half_extent;
    let hi = start + half_extent;
    if lo > hi {
        start + length / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

/// Move `current_scale` one step in `direction`, staying inside the limits.
#[must_use]
pub fn apply_zoom_step(current_scale: f32, direction: ZoomDirection, limits: &ZoomLimits) -> f32 {
    (current_scale + direction.sign() * limits.step).clamp(limits.min, limits.max)
}

/// Clamp a slider value to the zoom limits.
#[must_use]
pub fn apply_zoom_absolute(requested_scale: f32, limits: &ZoomLimits) -> f32 {
    requested_scale.clamp(limits.min, limits.max)
}

/// Re-fit and re-center the image on the mask, discarding pan and zoom.
#[must_use]
pub fn reset_transformation(
    mask_rect: &MaskRect,
    image_width: f32,
    image_height: f32,
) -> Transformation {
    let center = mask_rect.center();
    Transformation {
        scale: compute_fit_scale(mask_rect.width, mask_rect.height, image_width, image_height),
        offset_x: center.x,
        offset_y: center.y,
    }
}

#[must_use]
pub fn can_zoom_in(scale: f32, limits: &ZoomLimits) -> bool {
    scale < limits.max
}

#[must_use]
pub fn can_zoom_out(scale: f32, limits: &ZoomLimits) -> bool {
    scale > limits.min
}

/// True when the cover-fit scale is above the zoom maximum.
///
/// A very elongated image can need more than `limits.max` to cover the mask.
/// This is reported, not corrected. A fit below `limits.min` is harmless:
/// every reachable scale still covers the mask.
#[must_use]
pub fn fit_exceeds_zoom_limits(fit_scale: f32, limits: &ZoomLimits) -> bool {
    fit_scale > limits.max
}
