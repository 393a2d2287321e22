//! File type checks and background image loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::DynamicImage;

use crate::error::UploadError;
use crate::store::FileDescriptor;

pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub enum UploadSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file handed to the editor by a dialog or a drop.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub source: UploadSource,
}

impl UploadFile {
    /// Describe a file on disk, inferring its MIME type from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            mime: mime_for_path(&path).to_string(),
            source: UploadSource::Path(path),
        }
    }

    /// Describe in-memory contents. An empty `mime` is inferred from `name`.
    pub fn from_bytes(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let name = name.into();
        let mut mime = mime.into();
        if mime.is_empty() {
            mime = mime_for_path(Path::new(&name)).to_string();
        }
        Self {
            name,
            mime,
            source: UploadSource::Bytes(bytes.into()),
        }
    }
}

#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

pub fn validate_mime(mime: &str) -> Result<(), UploadError> {
    if mime.starts_with("image/") {
        Ok(())
    } else {
        Err(UploadError::InvalidFileType { mime: mime.to_string() })
    }
}

/// A decoded upload, ready to be shown.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub file: FileDescriptor,
    pub url: String,
    pub image: DynamicImage,
}

impl LoadedImage {
    #[must_use]
    pub fn natural_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

type UploadResult = Result<LoadedImage, UploadError>;

/// Reads one file at a time on a worker thread.
///
/// The result is delivered exactly once through [`UploadAdapter::poll`].
#[derive(Debug, Default)]
pub struct UploadAdapter {
    pending: Option<Receiver<UploadResult>>,
}

impl UploadAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate `file` and start reading it in the background.
    pub fn start(&mut self, file: UploadFile) -> Result<(), UploadError> {
        if self.is_busy() {
            return Err(UploadError::UploadInProgress);
        }
        validate_mime(&file.mime)?;

        tracing::info!(name = %file.name, mime = %file.mime, "reading image");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the editor was dropped
            let _ = tx.send(read_upload(file));
        });
        self.pending = Some(rx);
        Ok(())
    }

    /// Non-blocking check for a finished read.
    pub fn poll(&mut self) -> Option<UploadResult> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                Some(Err(worker_gone()))
            }
        }
    }

    /// Block until the in-flight read finishes.
    pub fn wait(&mut self) -> Option<UploadResult> {
        let rx = self.pending.take()?;
        Some(rx.recv().unwrap_or_else(|_| Err(worker_gone())))
    }
}

fn worker_gone() -> UploadError {
    UploadError::FileReadFailure {
        name: String::new(),
        source: std::io::Error::other("image reader exited without a result"),
    }
}

fn read_upload(file: UploadFile) -> UploadResult {
    let (bytes, url, path): (Arc<[u8]>, String, Option<PathBuf>) = match file.source {
        UploadSource::Path(path) => {
            let bytes = std::fs::read(&path).map_err(|source| UploadError::FileReadFailure {
                name: file.name.clone(),
                source,
            })?;
            let url = format!("file://{}", path.display());
            (bytes.into(), url, Some(path))
        }
        UploadSource::Bytes(bytes) => (bytes, format!("bytes://{}", file.name), None),
    };

    let image = image::load_from_memory(&bytes).map_err(|source| UploadError::Decode {
        name: file.name.clone(),
        source,
    })?;

    Ok(LoadedImage {
        file: FileDescriptor {
            name: file.name,
            mime: file.mime,
            path,
            size: bytes.len() as u64,
        },
        url,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let pixels = RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let img = DynamicImage::ImageRgba8(pixels);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/b/photo.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes.txt")), FALLBACK_MIME);
        assert_eq!(mime_for_path(Path::new("no_extension")), FALLBACK_MIME);
    }

    #[test]
    fn non_image_mime_is_rejected() {
        assert!(validate_mime("image/webp").is_ok());
        let err = validate_mime("text/plain").unwrap_err();
        assert!(matches!(err, UploadError::InvalidFileType { ref mime } if mime == "text/plain"));
    }

    #[test]
    fn text_file_never_starts_a_read() {
        let mut adapter = UploadAdapter::new();
        let file = UploadFile::from_bytes("notes.txt", "text/plain", b"hello".to_vec());
        assert!(matches!(adapter.start(file), Err(UploadError::InvalidFileType { .. })));
        assert!(!adapter.is_busy());
        assert!(adapter.poll().is_none());
    }

    #[test]
    fn bytes_upload_decodes() {
        let mut adapter = UploadAdapter::new();
        adapter.start(UploadFile::from_bytes("tile.png", "", png_bytes(8, 4))).unwrap();
        let loaded = adapter.wait().unwrap().unwrap();
        assert_eq!(loaded.natural_size(), (8, 4));
        assert_eq!(loaded.url, "bytes://tile.png");
        assert_eq!(loaded.file.mime, "image/png");
        assert!(!adapter.is_busy());
    }

    #[test]
    fn second_upload_while_busy_is_rejected() {
        let mut adapter = UploadAdapter::new();
        adapter.start(UploadFile::from_bytes("a.png", "image/png", png_bytes(2, 2))).unwrap();
        let err = adapter
            .start(UploadFile::from_bytes("b.png", "image/png", png_bytes(2, 2)))
            .unwrap_err();
        assert!(matches!(err, UploadError::UploadInProgress));
        assert!(adapter.wait().unwrap().is_ok());
    }

    #[test]
    fn missing_file_reports_read_failure() {
        let mut adapter = UploadAdapter::new();
        adapter
            .start(UploadFile::from_path("/definitely/not/here/cat.png"))
            .unwrap();
        let err = adapter.wait().unwrap().unwrap_err();
        assert!(matches!(err, UploadError::FileReadFailure { .. }));
    }

    #[test]
    fn corrupt_image_reports_decode_failure() {
        let mut adapter = UploadAdapter::new();
        adapter
            .start(UploadFile::from_bytes("broken.png", "image/png", b"not a png".to_vec()))
            .unwrap();
        let err = adapter.wait().unwrap().unwrap_err();
        assert!(matches!(err, UploadError::Decode { .. }));
    }
}
