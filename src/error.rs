// Super Panel Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid button ID")]
    InvalidId,

    #[error("Invalid settings object")]
    InvalidSettings,

    #[error("Invalid image format: expected a base64 data URI")]
    InvalidImageFormat,

    #[error("Unsupported image type: {0}")]
    InvalidImageType(String),

    #[error("Image too large: {0} bytes exceeds the 512 KiB limit")]
    ImageTooLarge(usize),

    #[error("Icon not found: {0}")]
    NotFound(String),

    #[error("Invalid button config: {0}")]
    InvalidButton(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
