use eframe::egui;

use crate::config::EditorConfig;
use crate::editor::{Editor, Notice, NoticeLevel};
use crate::surface::{EguiSurface, RenderSurface};
use crate::upload::UploadFile;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const TOAST_SECONDS: f64 = 3.0;

struct Toast {
    notice: Notice,
    expires_at: f64,
}

pub struct StencilEditorApp {
    editor: Editor,
    texture: Option<egui::TextureHandle>,
    toasts: Vec<Toast>,
}

impl StencilEditorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
            texture: None,
            toasts: Vec::new(),
        }
    }

    fn upload(&mut self, file: UploadFile) {
        // Rejections are already turned into notices by the editor
        let _ = self.editor.begin_upload(file);
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        self.texture = self.editor.image().map(|loaded| {
            let image = &loaded.image;
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            ctx.load_texture("stencil-image", color_image, egui::TextureOptions::LINEAR)
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped_files.into_iter().next() {
            let upload = match (file.path, file.bytes) {
                (Some(path), _) => {
                    let mut upload = UploadFile::from_path(path);
                    if !file.mime.is_empty() {
                        upload.mime = file.mime;
                    }
                    upload
                }
                (None, Some(bytes)) => UploadFile::from_bytes(file.name, file.mime, bytes),
                (None, None) => return,
            };
            self.upload(upload);
        }
    }

    fn collect_notices(&mut self, now: f64) {
        for notice in self.editor.take_notices() {
            self.toasts.push(Toast {
                notice,
                expires_at: now + TOAST_SECONDS,
            });
        }
        self.toasts.retain(|t| t.expires_at > now);
    }

    fn upload_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload Image");
        ui.add_space(8.0);
        let open = ui.add_enabled(!self.editor.is_loading(), egui::Button::new("Upload Image"));
        if open.clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Image", IMAGE_EXTENSIONS)
                .pick_file()
            {
                self.upload(UploadFile::from_path(path));
            }
        }
        if ui.button("Remove Image").clicked() {
            self.editor.remove_image();
            self.texture = None;
        }
        if self.editor.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading…");
            });
        }
        ui.small("Recommended: JPG, PNG with transparent background");
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Image Controls");
        ui.add_space(8.0);

        let limits = *self.editor.zoom_limits();
        let mut zoom = self.editor.transformation().scale;
        ui.horizontal(|ui| {
            ui.label("Zoom");
            ui.label(format!("{}%", (zoom * 100.0).round()));
        });
        ui.horizontal(|ui| {
            if ui.add_enabled(self.editor.can_zoom_out(), egui::Button::new("➖")).clicked() {
                self.editor.zoom_out();
                zoom = self.editor.transformation().scale;
            }
            let slider = egui::Slider::new(&mut zoom, limits.min..=limits.max).show_value(false);
            if ui.add(slider).changed() {
                self.editor.set_zoom(zoom);
            }
            if ui.add_enabled(self.editor.can_zoom_in(), egui::Button::new("➕")).clicked() {
                self.editor.zoom_in();
            }
        });

        ui.separator();
        if ui.add_enabled(self.editor.has_image(), egui::Button::new("Reset Position")).clicked() {
            self.editor.reset_position();
        }
        if ui.button("Save Cropped Image").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("PNG", &["png"]).save_file() {
                // Failures surface as notices
                let _ = self.editor.export_to(&path);
            }
        }

        ui.add_space(8.0);
        ui.small("Tip: Drag the image to position it within the frame.");
        ui.small("Use the slider or buttons to zoom in and out.");
    }

    fn toasts_overlay(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let color = match toast.notice.level {
                        NoticeLevel::Info => ui.visuals().text_color(),
                        NoticeLevel::Success => egui::Color32::from_rgb(0x2e, 0x9d, 0x4f),
                        NoticeLevel::Error => ui.visuals().error_fg_color,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &toast.notice.message);
                    });
                }
            });
    }
}

impl eframe::App for StencilEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            self.handle_dropped_files(ctx);
        }

        if self.editor.poll_upload() {
            self.load_texture(ctx);
        }
        if self.editor.is_loading() {
            ctx.request_repaint();
        }

        let now = ctx.input(|i| i.time);
        self.collect_notices(now);
        if !self.toasts.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        egui::SidePanel::right("controls")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| {
                self.upload_panel(ui);
                if self.editor.state().image.loaded {
                    ui.separator();
                    self.controls_panel(ui);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.heading("Canvas Stencil Editor"));
            ui.add_space(12.0);

            let config = *self.editor.config();
            let mut surface = EguiSurface::allocate(
                ui,
                config.canvas_width,
                config.canvas_height,
                self.editor.transformation().offset(),
                self.editor.image_rect(),
            );
            if self.editor.has_image() {
                let editor = &mut self.editor;
                surface.on_drag(&mut |candidate| editor.drag_to(candidate));
            }
            surface.paint(
                self.texture.as_ref(),
                &self.editor.transformation(),
                self.editor.mask(),
            );
        });

        self.toasts_overlay(ctx);
    }
}
