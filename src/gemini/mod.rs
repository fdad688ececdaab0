pub mod image_client;

use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result},
};
use std::sync::Arc;

pub use image_client::ImageClient;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: Arc<ImageClient>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GenerationError::ConfigError(
                "GEMINI_API_KEY is not set; the model service needs an API key".into(),
            )
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("chargen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerationError::ConfigError(e.to_string()))?;

        Ok(Self {
            image_client: Arc::new(ImageClient::new(http, api_key, &config)),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// Shared handle for the orchestrator.
    pub fn image_generator(&self) -> Arc<ImageClient> {
        Arc::clone(&self.image_client)
    }
}
