//! Prompt assembly. The template wording is part of the contract with the model and must stay exact.

use crate::models::Style;
use crate::state::{GenerationParameters, OutfitMode};

pub const CUSTOM_OUTFIT_FALLBACK: &str = "appropriate clothing";

pub fn style_clause(style: &str) -> &'static str {
    Style::from_value(style).clause()
}

pub fn outfit_description(params: &GenerationParameters) -> &str {
    match params.outfit_mode {
        OutfitMode::Predefined => &params.predefined_outfit,
        OutfitMode::Custom => match params.custom_outfit.trim() {
            "" => CUSTOM_OUTFIT_FALLBACK,
            custom => custom,
        },
    }
}

pub fn build_prompt(params: &GenerationParameters) -> String {
    format!(
        "{} of the person from the provided photo, in the setting of {}. The person is wearing {} and is {}. Maintain the person's identity and features from the original photo.",
        style_clause(&params.style),
        params.environment,
        outfit_description(params),
        params.pose
    )
}
