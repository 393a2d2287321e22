//! Rendering the region under the mask into a standalone image.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::ExportError;
use crate::geometry::{Mask, Point, Transformation};

/// Pixel rectangle in source image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a region lands inside the mask-sized output, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// The part of the image visible through the mask, or `None` when the image
/// does not overlap the mask at all.
#[must_use]
pub fn source_region(
    mask: &Mask,
    transform: &Transformation,
    natural_width: u32,
    natural_height: u32,
) -> Option<PixelRegion> {
    visible_region(mask, transform, natural_width, natural_height).map(|(region, _)| region)
}

fn visible_region(
    mask: &Mask,
    transform: &Transformation,
    natural_width: u32,
    natural_height: u32,
) -> Option<(PixelRegion, Placement)> {
    let rect = mask.bounding_rect();
    let scale = transform.scale;
    if scale <= 0.0 || natural_width == 0 || natural_height == 0 {
        return None;
    }
    let (w, h) = (natural_width as f32, natural_height as f32);
    let image_left = transform.offset_x - w * scale / 2.0;
    let image_top = transform.offset_y - h * scale / 2.0;

    let x0 = ((rect.left - image_left) / scale).clamp(0.0, w).floor();
    let y0 = ((rect.top - image_top) / scale).clamp(0.0, h).floor();
    let x1 = ((rect.right() - image_left) / scale).clamp(0.0, w).ceil();
    let y1 = ((rect.bottom() - image_top) / scale).clamp(0.0, h).ceil();
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let region = PixelRegion {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    };
    let placement = Placement {
        x: image_left + x0 * scale - rect.left,
        y: image_top + y0 * scale - rect.top,
        width: (x1 - x0) * scale,
        height: (y1 - y0) * scale,
    };
    Some((region, placement))
}

/// Render what the user sees inside the mask at mask resolution.
///
/// Pixels outside the rounded corners, or not covered by the image, are
/// fully transparent.
#[must_use]
pub fn render_masked(image: &DynamicImage, mask: &Mask, transform: &Transformation) -> RgbaImage {
    let out_w = mask.width.round().max(1.0) as u32;
    let out_h = mask.height.round().max(1.0) as u32;
    let mut out = RgbaImage::from_pixel(out_w, out_h, Rgba([0, 0, 0, 0]));

    let visible = visible_region(mask, transform, image.width(), image.height());
    if let Some((region, placement)) = visible {
        let cropped = image.crop_imm(region.x, region.y, region.width, region.height);
        let dest_w = placement.width.round().max(1.0) as u32;
        let dest_h = placement.height.round().max(1.0) as u32;
        let scaled = cropped.resize_exact(dest_w, dest_h, FilterType::Triangle).to_rgba8();
        let (dest_x, dest_y) = (placement.x.round() as i64, placement.y.round() as i64);
        imageops::replace(&mut out, &scaled, dest_x, dest_y);
    }

    let rect = mask.bounding_rect();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let p = Point::new(rect.left + x as f32 + 0.5, rect.top + y as f32 + 0.5);
        if !mask.contains(p) {
            pixel.0[3] = 0;
        }
    }
    out
}

pub fn save_masked(
    image: &DynamicImage,
    mask: &Mask,
    transform: &Transformation,
    path: &Path,
) -> Result<(), ExportError> {
    let rendered = render_masked(image, mask, transform);
    rendered.save(path).map_err(|source| ExportError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        width = rendered.width(),
        height = rendered.height(),
        "saved masked image"
    );
    Ok(())
}
