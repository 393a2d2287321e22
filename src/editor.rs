//! The editor context: config, store, upload adapter and loaded image.
//!
//! Every user action goes through an [`Editor`] method, which runs the
//! transform math and writes the result to its store.

use std::collections::VecDeque;
use std::path::Path;

use crate::config::{EditorConfig, ZoomLimits};
use crate::error::{ExportError, UploadError};
use crate::export;
use crate::geometry::{Mask, MaskRect, Point, Transformation};
use crate::store::{EditorState, EditorStore};
use crate::transform::{self, ZoomDirection};
use crate::upload::{LoadedImage, UploadAdapter, UploadFile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    mask: Mask,
    store: EditorStore,
    uploads: UploadAdapter,
    image: Option<LoadedImage>,
    notices: VecDeque<Notice>,
}

impl Editor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            mask: config.mask(),
            config,
            store: EditorStore::new(),
            uploads: UploadAdapter::new(),
            image: None,
            notices: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn zoom_limits(&self) -> &ZoomLimits {
        &self.config.zoom
    }

    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    pub fn transformation(&self) -> Transformation {
        self.store.state().transformations
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.uploads.is_busy()
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice::new(level, message));
    }

    fn natural_size(&self) -> Option<(f32, f32)> {
        self.image.as_ref().map(|img| {
            let (w, h) = img.natural_size();
            (w as f32, h as f32)
        })
    }

    // --- Upload ---

    /// Validate and start loading `file`. Rejections leave the state untouched.
    pub fn begin_upload(&mut self, file: UploadFile) -> Result<(), UploadError> {
        match self.uploads.start(file) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "upload rejected");
                self.notify(NoticeLevel::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Apply a finished upload, if any. Returns true when the state changed.
    pub fn poll_upload(&mut self) -> bool {
        match self.uploads.poll() {
            Some(result) => self.finish_upload(result),
            None => false,
        }
    }

    /// Block until the in-flight upload finishes and apply it.
    pub fn wait_upload(&mut self) -> bool {
        match self.uploads.wait() {
            Some(result) => self.finish_upload(result),
            None => false,
        }
    }

    fn finish_upload(&mut self, result: Result<LoadedImage, UploadError>) -> bool {
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "upload failed");
                self.notify(NoticeLevel::Error, e.to_string());
                return false;
            }
        };

        let (w, h) = loaded.natural_size();
        tracing::info!(name = %loaded.file.name, width = w, height = h, "image loaded");
        self.store.set_image(loaded.file.clone(), loaded.url.clone());
        self.image = Some(loaded);
        self.apply_reset();
        self.notify(NoticeLevel::Success, "Image loaded successfully");
        true
    }

    pub fn remove_image(&mut self) {
        self.image = None;
        self.store.reset_image();
        tracing::info!("image removed");
        self.notify(NoticeLevel::Info, "Image removed");
    }

    // --- Pan ---

    /// Move the image center toward `candidate`, clamped to the mask.
    /// Returns the position actually applied.
    pub fn drag_to(&mut self, candidate: Point) -> Point {
        let Some((w, h)) = self.natural_size() else {
            return self.transformation().offset();
        };
        let scale = self.transformation().scale;
        let p = transform::clamp_offset(candidate, w, h, scale, &self.mask.bounding_rect());
        tracing::trace!(x = p.x, y = p.y, "drag");
        self.store.set_offset(p.x, p.y);
        p
    }

    /// Canvas area covered by the image at the current transformation.
    #[must_use]
    pub fn image_rect(&self) -> Option<MaskRect> {
        let (w, h) = self.natural_size()?;
        Some(self.transformation().image_rect(w, h))
    }

    /// Whether a drag starting at `p` lands on the image.
    #[must_use]
    pub fn image_contains(&self, p: Point) -> bool {
        self.image_rect().is_some_and(|rect| rect.contains(p))
    }

    // --- Zoom ---

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.has_image() && transform::can_zoom_in(self.transformation().scale, &self.config.zoom)
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.has_image() && transform::can_zoom_out(self.transformation().scale, &self.config.zoom)
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.zoom_step(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.zoom_step(ZoomDirection::Out)
    }

    fn zoom_step(&mut self, direction: ZoomDirection) -> f32 {
        let current = self.transformation().scale;
        if !self.has_image() {
            return current;
        }
        let scale = transform::apply_zoom_step(current, direction, &self.config.zoom);
        self.apply_scale(scale);
        self.notify(NoticeLevel::Info, format!("Zoom: {}%", (scale * 100.0).round()));
        scale
    }

    /// Slider input: clamp `requested` to the zoom limits. No-op without an image.
    pub fn set_zoom(&mut self, requested: f32) -> f32 {
        if !self.has_image() {
            return self.transformation().scale;
        }
        let scale = transform::apply_zoom_absolute(requested, &self.config.zoom);
        self.apply_scale(scale);
        scale
    }

    /// Write `scale` together with the offset re-clamped for it, in one dispatch.
    fn apply_scale(&mut self, scale: f32) {
        let Some((w, h)) = self.natural_size() else {
            return;
        };
        let offset = transform::clamp_offset(
            self.transformation().offset(),
            w,
            h,
            scale,
            &self.mask.bounding_rect(),
        );
        self.store.set_transformation(Transformation {
            scale,
            offset_x: offset.x,
            offset_y: offset.y,
        });
    }

    // --- Reset ---

    /// Re-center and re-fit the image. No-op without an image.
    pub fn reset_position(&mut self) {
        if !self.has_image() {
            return;
        }
        self.apply_reset();
        tracing::info!("image reset");
        self.notify(NoticeLevel::Info, "Image reset to original position");
    }

    fn apply_reset(&mut self) {
        let Some((w, h)) = self.natural_size() else {
            return;
        };
        let t = transform::reset_transformation(&self.mask.bounding_rect(), w, h);
        if transform::fit_exceeds_zoom_limits(t.scale, &self.config.zoom) {
            tracing::warn!(
                fit = t.scale,
                max = self.config.zoom.max,
                "cover-fit scale is above the zoom range"
            );
            self.notify(
                NoticeLevel::Error,
                format!(
                    "This image needs {}% zoom to fill the frame, above the {}% maximum",
                    (t.scale * 100.0).round(),
                    (self.config.zoom.max * 100.0).round()
                ),
            );
        }
        self.store.set_transformation(t);
    }

    // --- Export ---

    pub fn export_to(&mut self, path: &Path) -> Result<(), ExportError> {
        let result = match &self.image {
            Some(loaded) => {
                export::save_masked(&loaded.image, &self.mask, &self.transformation(), path)
            }
            None => Err(ExportError::NoImage),
        };
        match &result {
            Ok(()) => self.notify(NoticeLevel::Success, format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.notify(NoticeLevel::Error, e.to_string());
            }
        }
        result
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(w, h));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn loaded_editor(w: u32, h: u32) -> Editor {
        let mut editor = Editor::default();
        editor
            .begin_upload(UploadFile::from_bytes("img.png", "image/png", png(w, h)))
            .unwrap();
        assert!(editor.wait_upload());
        editor.take_notices();
        editor
    }

    #[test]
    fn upload_fits_and_centers() {
        let editor = loaded_editor(800, 400);
        assert!(editor.state().image.loaded);
        assert_eq!(
            editor.transformation(),
            Transformation {
                scale: 0.75,
                offset_x: 400.0,
                offset_y: 250.0
            }
        );
    }

    #[test]
    fn invalid_upload_leaves_initial_state() {
        let mut editor = Editor::default();
        let err = editor
            .begin_upload(UploadFile::from_bytes("notes.txt", "", b"hi".to_vec()))
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidFileType { .. }));
        assert_eq!(*editor.state(), EditorState::default());
        let notices = editor.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn failed_read_leaves_state_untouched() {
        let mut editor = Editor::default();
        editor
            .begin_upload(UploadFile::from_bytes("bad.png", "image/png", b"garbage".to_vec()))
            .unwrap();
        assert!(!editor.wait_upload());
        assert_eq!(*editor.state(), EditorState::default());
        assert!(!editor.has_image());
    }

    #[test]
    fn drag_is_clamped() {
        let mut editor = loaded_editor(800, 400);
        let p = editor.drag_to(Point::new(-1000.0, 900.0));
        assert_eq!(p, Point::new(300.0, 250.0));
        assert_eq!(editor.transformation().offset(), p);
    }

    #[test]
    fn drag_without_image_is_ignored() {
        let mut editor = Editor::default();
        editor.drag_to(Point::new(5.0, 5.0));
        assert_eq!(*editor.state(), EditorState::default());
    }

    #[test]
    fn only_points_on_the_image_start_a_drag() {
        let mut editor = Editor::default();
        assert!(!editor.image_contains(Point::new(400.0, 250.0)));

        // 800x400 at fit 0.75 spans x 100..700, y 100..400
        editor = loaded_editor(800, 400);
        assert!(editor.image_contains(Point::new(400.0, 250.0)));
        assert!(editor.image_contains(Point::new(110.0, 120.0)));
        assert!(!editor.image_contains(Point::new(50.0, 250.0)));
        assert!(!editor.image_contains(Point::new(400.0, 450.0)));

        editor.set_zoom(0.5);
        assert!(!editor.image_contains(Point::new(110.0, 120.0)));
    }

    #[test]
    fn zoom_without_image_is_ignored() {
        let mut editor = Editor::default();
        assert_eq!(editor.zoom_in(), 1.0);
        assert_eq!(editor.zoom_out(), 1.0);
        assert_eq!(editor.set_zoom(1.7), 1.0);
        assert_eq!(*editor.state(), EditorState::default());
        assert!(editor.take_notices().is_empty());
    }

    #[test]
    fn zoom_is_published_as_one_consistent_update() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut editor = loaded_editor(800, 400);
        editor.drag_to(Point::new(320.0, 250.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor
            .store_mut()
            .subscribe(move |state| sink.borrow_mut().push(state.transformations));

        editor.set_zoom(0.5);

        // The un-clamped (320, 250) at scale 0.5 is never observed
        assert_eq!(
            *seen.borrow(),
            vec![Transformation {
                scale: 0.5,
                offset_x: 400.0,
                offset_y: 250.0
            }]
        );
    }

    #[test]
    fn stepper_buttons_disable_at_bounds() {
        let mut editor = loaded_editor(800, 400);
        while editor.can_zoom_out() {
            editor.zoom_out();
        }
        assert_eq!(editor.transformation().scale, 0.5);
        assert_eq!(editor.zoom_out(), 0.5);
        while editor.can_zoom_in() {
            editor.zoom_in();
        }
        assert_eq!(editor.transformation().scale, 2.0);
        assert!(!editor.can_zoom_in());
        let notices = editor.take_notices();
        assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Zoom: 200%"));
    }

    #[test]
    fn zooming_out_recenters_short_axis() {
        let mut editor = loaded_editor(800, 400);
        editor.drag_to(Point::new(320.0, 250.0));
        editor.set_zoom(0.5);
        // 400x200 no longer covers the mask vertically, and exactly fits horizontally
        assert_eq!(editor.transformation().offset(), Point::new(400.0, 250.0));
    }

    #[test]
    fn slider_value_is_clamped() {
        let mut editor = loaded_editor(800, 400);
        assert_eq!(editor.set_zoom(5.0), 2.0);
        assert_eq!(editor.set_zoom(1.37), 1.37);
    }

    #[test]
    fn reset_position_restores_fit_and_is_idempotent() {
        let mut editor = loaded_editor(800, 400);
        editor.set_zoom(1.8);
        editor.drag_to(Point::new(0.0, 0.0));
        editor.reset_position();
        let first = editor.transformation();
        editor.reset_position();
        assert_eq!(first, editor.transformation());
        assert_eq!(first.scale, 0.75);
    }

    #[test]
    fn reset_position_without_image_is_noop() {
        let mut editor = Editor::default();
        editor.reset_position();
        assert!(editor.take_notices().is_empty());
        assert_eq!(*editor.state(), EditorState::default());
    }

    #[test]
    fn elongated_image_warns_but_applies_fit() {
        let editor_notices = {
            let mut editor = Editor::default();
            editor
                .begin_upload(UploadFile::from_bytes("strip.png", "image/png", png(4000, 100)))
                .unwrap();
            editor.wait_upload();
            assert_eq!(editor.transformation().scale, 3.0);
            editor.take_notices()
        };
        assert!(editor_notices.iter().any(|n| n.level == NoticeLevel::Error));
    }

    #[test]
    fn large_photo_loads_without_error() {
        let mut editor = Editor::default();
        editor
            .begin_upload(UploadFile::from_bytes("photo.png", "image/png", png(1600, 1200)))
            .unwrap();
        assert!(editor.wait_upload());
        assert_eq!(editor.transformation().scale, 0.25);
        let notices = editor.take_notices();
        assert!(notices.iter().all(|n| n.level != NoticeLevel::Error), "{notices:?}");
    }

    #[test]
    fn remove_image_resets_everything() {
        let mut editor = loaded_editor(800, 400);
        editor.set_zoom(1.5);
        editor.remove_image();
        assert!(!editor.has_image());
        assert_eq!(*editor.state(), EditorState::default());
        assert!(!editor.can_zoom_in());
    }

    #[test]
    fn export_without_image_fails() {
        let mut editor = Editor::default();
        let err = editor.export_to(Path::new("/tmp/never-written.png")).unwrap_err();
        assert!(matches!(err, ExportError::NoImage));
    }

    #[test]
    fn two_editors_do_not_share_state() {
        let a = loaded_editor(800, 400);
        let b = Editor::default();
        assert!(a.state().image.loaded);
        assert!(!b.state().image.loaded);
    }
}
