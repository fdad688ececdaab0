use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result},
    generator::ImageGenerator,
    models::{ErrorEnvelope, GenerateContentResponse, GenerationRequest},
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: config.endpoint(),
            model: config.model().to_string(),
        }
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (
                "gemini-2.5-flash-image-preview",
                "Gemini 2.5 Flash Image (preview)",
                "Google",
            ),
            ("gemini-2.5-flash-image", "Gemini 2.5 Flash Image", "Google"),
            (
                "gemini-2.0-flash-preview-image-generation",
                "Gemini 2.0 Flash Image Generation (preview)",
                "Google",
            ),
        ]
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builds the error for a non-success response, preferring the service's own message.
pub(crate) fn service_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty());

    GenerationError::ServiceError { status, message }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerateContentResponse> {
        let payload = request.to_wire();

        log::info!(
            "Generating image with model: {} [req:{}]",
            self.model,
            request.request_id
        );
        log::debug!("Prompt: {}", request.prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error details: {:?}", e);
                GenerationError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini service error {}: {}", status, body);
            return Err(service_error(status.as_u16(), &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse Gemini response: {}", e);
            GenerationError::SerializationError(e.to_string())
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_extracts_message() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = service_error(429, body);
        assert_eq!(err.user_message(), "Resource has been exhausted");
    }

    #[test]
    fn service_error_with_unstructured_body_uses_generic_message() {
        let err = service_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            err,
            GenerationError::ServiceError {
                status: 502,
                message: None
            }
        ));
        assert_eq!(err.user_message(), crate::error::GENERIC_MESSAGE);
    }

    #[test]
    fn default_model_is_listed_as_supported() {
        let models = ImageClient::supported_models();
        assert!(models
            .iter()
            .any(|(id, _, _)| *id == crate::config::DEFAULT_MODEL));
        assert!(models.iter().all(|(_, _, provider)| *provider == "Google"));
    }

    #[test]
    fn client_targets_configured_endpoint() {
        let config = GeminiConfig::new().with_base_url("http://127.0.0.1:1");
        let client = ImageClient::new(reqwest::Client::new(), "key", &config);
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:1/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
        assert_eq!(client.model(), "gemini-2.5-flash-image-preview");
    }
}
