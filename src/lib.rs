//! Stencil editor: position and zoom an image behind a fixed rounded mask.
//!
//! The transform math and the state store are independent of egui; only
//! [`app`] and [`surface`] touch the GUI.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod store;
pub mod surface;
pub mod transform;
pub mod upload;

pub use config::{EditorConfig, ZoomLimits};
pub use editor::{Editor, Notice, NoticeLevel};
pub use error::{ConfigError, EditorError, ExportError, UploadError};
pub use geometry::{Mask, MaskRect, Point, Transformation};
pub use store::{EditorAction, EditorState, EditorStore, FileDescriptor, ImageState};
