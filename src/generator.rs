use crate::{
    error::Result,
    models::{GenerateContentResponse, GenerationRequest},
};
use async_trait::async_trait;

/// The remote model capability: one image + prompt in, one content response out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerateContentResponse>;

    fn model(&self) -> &str;
}
