use thiserror::Error;

pub const IMAGE_REQUIRED_MESSAGE: &str = "Please upload a character image first.";
pub const FILE_READ_MESSAGE: &str = "Failed to read the file.";
pub const NO_IMAGE_MESSAGE: &str =
    "The AI didn't return an image. Please try a different prompt or image.";
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Please upload a character image first.")]
    ImageRequired,

    #[error("A generation is already in progress")]
    Busy,

    #[error("Failed to read the file. ({0})")]
    FileRead(#[from] std::io::Error),

    #[error("Unsupported image type: {0}. Use a PNG, JPEG or WebP image.")]
    UnsupportedImage(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("The AI didn't return an image. Please try a different prompt or image.")]
    NoImageReturned,

    #[error("Service error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_MESSAGE))]
    ServiceError {
        status: u16,
        message: Option<String>,
    },

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GenerationError {
    /// Text shown to the user when a request ends in this error.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::ImageRequired => IMAGE_REQUIRED_MESSAGE.to_string(),
            GenerationError::FileRead(_) => FILE_READ_MESSAGE.to_string(),
            GenerationError::NoImageReturned => NO_IMAGE_MESSAGE.to_string(),
            GenerationError::ServiceError { message, .. } => message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(GENERIC_MESSAGE)
                .to_string(),
            GenerationError::RequestError(msg) if !msg.trim().is_empty() => msg.clone(),
            GenerationError::RequestError(_) => GENERIC_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
