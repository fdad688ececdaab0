pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;
pub mod state;
pub mod studio;

pub use config::{Config, GeminiConfig};
pub use error::{GenerationError, Result};
pub use gemini::{GeminiClient, ImageClient};
pub use generator::ImageGenerator;
pub use models::{GeneratedImage, OptionCatalog, Style, UploadedImage};
pub use orchestrator::Orchestrator;
pub use prompt::build_prompt;
pub use state::{GenerationParameters, InputState, OutfitMode, RequestState};
pub use studio::Studio;
