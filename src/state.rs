use crate::models::{GeneratedImage, UploadedImage};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENVIRONMENT: &str = "a beach";
pub const DEFAULT_STYLE: &str = "photorealistic";
pub const DEFAULT_OUTFIT: &str = "casual wear";
pub const DEFAULT_POSE: &str = "sitting on a chair";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitMode {
    #[default]
    Predefined,
    Custom,
}

/// Everything the prompt is built from. Both outfit values are kept so switching modes loses nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    pub environment: String,
    pub style: String,
    pub outfit_mode: OutfitMode,
    pub predefined_outfit: String,
    pub custom_outfit: String,
    pub pose: String,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            style: DEFAULT_STYLE.to_string(),
            outfit_mode: OutfitMode::Predefined,
            predefined_outfit: DEFAULT_OUTFIT.to_string(),
            custom_outfit: String::new(),
            pose: DEFAULT_POSE.to_string(),
        }
    }
}

/// What the user has entered so far. Setters never fail and never validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputState {
    image: Option<UploadedImage>,
    parameters: GenerationParameters,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }

    pub fn set_image(&mut self, image: UploadedImage) {
        self.image = Some(image);
    }

    pub fn set_parameters(&mut self, parameters: GenerationParameters) {
        self.parameters = parameters;
    }

    pub fn set_environment(&mut self, value: impl Into<String>) {
        self.parameters.environment = value.into();
    }

    pub fn set_style(&mut self, value: impl Into<String>) {
        self.parameters.style = value.into();
    }

    pub fn set_pose(&mut self, value: impl Into<String>) {
        self.parameters.pose = value.into();
    }

    pub fn set_outfit_mode(&mut self, mode: OutfitMode) {
        self.parameters.outfit_mode = mode;
    }

    /// Writes the outfit value of the active mode.
    pub fn set_outfit_value(&mut self, value: impl Into<String>) {
        match self.parameters.outfit_mode {
            OutfitMode::Predefined => self.parameters.predefined_outfit = value.into(),
            OutfitMode::Custom => self.parameters.custom_outfit = value.into(),
        }
    }
}

/// Lifecycle of the most recent generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(GeneratedImage),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            RequestState::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
