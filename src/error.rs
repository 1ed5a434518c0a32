use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthenticityError {
    #[error("Image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("No image data provided")]
    InputMissing,

    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, AuthenticityError>;
