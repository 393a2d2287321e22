use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error(
        "mask {}x{} does not fit in canvas {}x{}",
        mask.0, mask.1, canvas.0, canvas.1
    )]
    MaskLargerThanCanvas { mask: (f32, f32), canvas: (f32, f32) },

    #[error("zoom min {min} is greater than zoom max {max}")]
    InvertedZoomLimits { min: f32, max: f32 },
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload an image file (got {mime})")]
    InvalidFileType { mime: String },

    #[error("Error reading the image file {name}: {source}")]
    FileReadFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decoding the image file {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Another image is still loading")]
    UploadInProgress,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No image loaded")]
    NoImage,

    #[error("Failed to save image to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("window error: {0}")]
    Window(#[from] eframe::Error),
}
