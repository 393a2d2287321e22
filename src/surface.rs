//! Painting the stencil canvas.
//!
//! The editor only talks to a [`RenderSurface`]; the egui implementation
//! lives here too.

use eframe::egui;

use crate::geometry::{Mask, MaskRect, Point, Transformation};

pub trait RenderSurface {
    type Image;

    /// Paint `image` placed by `transform`, clipped to `mask`.
    fn paint(&mut self, image: Option<&Self::Image>, transform: &Transformation, mask: &Mask);

    /// Report a drag gesture that started on the image. `handler` receives
    /// the candidate image center and returns the center that was actually
    /// applied.
    fn on_drag(&mut self, handler: &mut dyn FnMut(Point) -> Point);
}

const CANVAS_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xf8, 0xf9, 0xfa);
const MASK_STROKE: egui::Color32 = egui::Color32::from_rgb(0xda, 0xda, 0xda);
const ARC_SEGMENTS: usize = 12;

/// One frame's worth of canvas inside an egui `Ui`.
pub struct EguiSurface {
    painter: egui::Painter,
    response: egui::Response,
    origin: egui::Pos2,
    center: Point,
    image_rect: Option<MaskRect>,
}

impl EguiSurface {
    /// Reserve a `width` x `height` canvas, centered in the available space.
    ///
    /// `center` is the image center currently held by the store and
    /// `image_rect` the canvas area the image covers, if any.
    pub fn allocate(
        ui: &mut egui::Ui,
        width: f32,
        height: f32,
        center: Point,
        image_rect: Option<MaskRect>,
    ) -> Self {
        let available = ui.available_size();
        let x_offset = ((available.x - width) / 2.0).max(0.0);
        let start_pos = ui.cursor().min + egui::vec2(x_offset, 0.0);
        let rect = egui::Rect::from_min_size(start_pos, egui::vec2(width, height));

        let response = ui.allocate_rect(rect, egui::Sense::drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8.0, CANVAS_BACKGROUND);

        Self {
            painter,
            response,
            origin: rect.min,
            center,
            image_rect,
        }
    }

    fn to_canvas(&self, p: egui::Pos2) -> Point {
        let v = p - self.origin;
        Point::new(v.x, v.y)
    }

    /// Whether the current drag gesture was pressed on the image.
    ///
    /// Decided once when the drag starts and kept in egui's temp data.
    fn drag_grabbed_image(&self) -> bool {
        let id = self.response.id;
        let ctx = &self.response.ctx;
        if self.response.drag_started() {
            let grabbed = match (self.response.interact_pointer_pos(), self.image_rect) {
                (Some(pos), Some(rect)) => rect.contains(self.to_canvas(pos)),
                _ => false,
            };
            ctx.data_mut(|d| d.insert_temp(id, grabbed));
            return grabbed;
        }
        ctx.data(|d| d.get_temp::<bool>(id)).unwrap_or(false)
    }

    fn to_screen(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }

    fn mask_screen_rect(&self, mask: &Mask) -> egui::Rect {
        let rect = mask.bounding_rect();
        egui::Rect::from_min_size(
            self.to_screen(Point::new(rect.left, rect.top)),
            egui::vec2(rect.width, rect.height),
        )
    }

    /// Cover the square corners of `rect` outside a `radius` arc.
    fn paint_corner_cutouts(painter: &egui::Painter, rect: egui::Rect, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let corners = [
            (rect.left_top(), -1.0, -1.0),
            (rect.right_top(), 1.0, -1.0),
            (rect.left_bottom(), -1.0, 1.0),
            (rect.right_bottom(), 1.0, 1.0),
        ];

        let mut mesh = egui::Mesh::default();
        for (corner, sx, sy) in corners {
            let arc_center = corner - egui::vec2(sx * radius, sy * radius);
            let base = mesh.vertices.len() as u32;
            mesh.colored_vertex(corner, CANVAS_BACKGROUND);
            for i in 0..=ARC_SEGMENTS {
                let phi = std::f32::consts::FRAC_PI_2 * i as f32 / ARC_SEGMENTS as f32;
                let p = arc_center + egui::vec2(sx * radius * phi.cos(), sy * radius * phi.sin());
                mesh.colored_vertex(p, CANVAS_BACKGROUND);
            }
            for i in 0..ARC_SEGMENTS as u32 {
                mesh.add_triangle(base, base + 1 + i, base + 2 + i);
            }
        }
        painter.add(egui::Shape::mesh(mesh));
    }
}

impl RenderSurface for EguiSurface {
    type Image = egui::TextureHandle;

    fn paint(&mut self, image: Option<&Self::Image>, transform: &Transformation, mask: &Mask) {
        let mask_rect = self.mask_screen_rect(mask);
        let radius = mask.corner_radius.min(mask.width / 2.0).min(mask.height / 2.0);

        if let Some(texture) = image {
            let size = texture.size_vec2() * transform.scale;
            let image_rect = egui::Rect::from_center_size(self.to_screen(transform.offset()), size);
            let clipped = self.painter.with_clip_rect(mask_rect);
            clipped.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            Self::paint_corner_cutouts(&clipped, mask_rect, radius);
        }

        self.painter.rect_stroke(
            mask_rect,
            egui::Rounding::same(radius),
            egui::Stroke::new(2.0, MASK_STROKE),
        );
    }

    fn on_drag(&mut self, handler: &mut dyn FnMut(Point) -> Point) {
        let grabbed = self.drag_grabbed_image() && self.response.dragged();
        let over_image = self
            .response
            .hover_pos()
            .zip(self.image_rect)
            .is_some_and(|(pos, rect)| rect.contains(self.to_canvas(pos)));
        if grabbed {
            self.response.ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if over_image && !self.response.dragged() {
            self.response.ctx.set_cursor_icon(egui::CursorIcon::Grab);
        }
        if !grabbed {
            return;
        }
        let delta = self.response.drag_delta();
        if delta == egui::Vec2::ZERO {
            return;
        }
        let candidate = Point::new(self.center.x + delta.x, self.center.y + delta.y);
        self.center = handler(candidate);
    }
}
