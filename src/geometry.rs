//! Value types shared by the transform engine, the store and the surface.

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle of the mask, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl MaskRect {
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Edges are inclusive.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// The fixed rounded-rectangle stencil the image is positioned behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Mask {
    /// A mask centered inside a canvas of the given size.
    #[must_use]
    pub fn centered_in(
        canvas_width: f32,
        canvas_height: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
    ) -> Self {
        Self {
            width,
            height,
            corner_radius,
            center_x: canvas_width / 2.0,
            center_y: canvas_height / 2.0,
        }
    }

    #[must_use]
    pub fn bounding_rect(&self) -> MaskRect {
        MaskRect {
            left: self.center_x - self.width / 2.0,
            top: self.center_y - self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Whether a canvas point lies inside the rounded shape.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let rect = self.bounding_rect();
        if p.x < rect.left || p.x > rect.right() || p.y < rect.top || p.y > rect.bottom() {
            return false;
        }
        let r = self.corner_radius.min(self.width / 2.0).min(self.height / 2.0);
        if r <= 0.0 {
            return true;
        }
        // Distance to the nearest corner circle center, per axis
        let cx = p.x.clamp(rect.left + r, rect.right() - r);
        let cy = p.y.clamp(rect.top + r, rect.bottom() - r);
        let (dx, dy) = (p.x - cx, p.y - cy);
        dx * dx + dy * dy <= r * r
    }
}

/// Current placement of the image relative to the canvas.
///
/// `offset_x` / `offset_y` are the image center in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Transformation {
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Canvas rectangle covered by an image of the given natural size.
    #[must_use]
    pub fn image_rect(&self, image_width: f32, image_height: f32) -> MaskRect {
        let (w, h) = (image_width * self.scale, image_height * self.scale);
        MaskRect {
            left: self.offset_x - w / 2.0,
            top: self.offset_y - h / 2.0,
            width: w,
            height: h,
        }
    }
}
