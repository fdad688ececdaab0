use serde::{Deserialize, Serialize};

/// A selectable value and the label front-ends show for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

const fn entry(value: &'static str, label: &'static str) -> OptionEntry {
    OptionEntry { value, label }
}

pub const ENVIRONMENTS: &[OptionEntry] = &[
    entry("a beach", "Beach"),
    entry("a dense forest", "Forest"),
    entry("a bustling city street", "City"),
    entry("a futuristic sci-fi world", "Futuristic Sci-Fi World"),
    entry("a medieval castle", "Medieval Castle"),
    entry("a modern office", "Office"),
    entry("a tranquil Japanese garden", "Japanese Garden"),
    entry("a volcanic landscape", "Volcanic Landscape"),
    entry("an underwater scene", "Underwater Scene"),
    entry("a bustling market", "Bustling Market"),
    entry("a cozy cafe", "Cozy Cafe"),
    entry("a bustling spaceport", "Bustling Spaceport"),
    entry("a serene mountaintop", "Serene Mountaintop"),
    entry("a haunted mansion", "Haunted Mansion"),
    entry("a vibrant underwater city", "Vibrant Underwater City"),
];

pub const PREDEFINED_OUTFITS: &[OptionEntry] = &[
    entry("casual wear", "Casual"),
    entry("a formal suit", "Formal"),
    entry("sportswear", "Sportswear"),
    entry("sci-fi armor", "Sci-fi Armor"),
    entry("a medieval knight outfit", "Medieval Knight"),
    entry("royal attire", "Royal Attire"),
    entry("pirate costume", "Pirate Costume"),
    entry("futuristic uniform", "Futuristic Uniform"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[default]
    Photorealistic,
    FantasyArt,
    Cyberpunk,
    Watercolor,
    Anime,
    Cartoon,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Photorealistic,
        Style::FantasyArt,
        Style::Cyberpunk,
        Style::Watercolor,
        Style::Anime,
        Style::Cartoon,
    ];

    /// Resolves a style value; anything unrecognized is photorealistic.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == value)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Photorealistic => "photorealistic",
            Style::FantasyArt => "fantasy-art",
            Style::Cyberpunk => "cyberpunk",
            Style::Watercolor => "watercolor",
            Style::Anime => "anime",
            Style::Cartoon => "cartoon",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Style::Photorealistic => "Photorealistic",
            Style::FantasyArt => "Fantasy Art",
            Style::Cyberpunk => "Cyberpunk",
            Style::Watercolor => "Watercolor",
            Style::Anime => "Anime",
            Style::Cartoon => "Cartoon",
        }
    }

    /// Opening clause of the prompt for this style.
    pub fn clause(&self) -> &'static str {
        match self {
            Style::Photorealistic => "A photorealistic image",
            Style::FantasyArt => "A fantasy art style digital painting",
            Style::Cyberpunk => {
                "An image in a cyberpunk style with neon lighting and futuristic elements"
            }
            Style::Watercolor => "A watercolor painting",
            Style::Anime => "An anime style image",
            Style::Cartoon => "A cartoon style image",
        }
    }
}

pub fn styles() -> Vec<OptionEntry> {
    Style::ALL
        .iter()
        .map(|style| entry(style.as_str(), style.label()))
        .collect()
}

pub fn is_known_environment(value: &str) -> bool {
    ENVIRONMENTS.iter().any(|option| option.value == value)
}

pub fn is_known_outfit(value: &str) -> bool {
    PREDEFINED_OUTFITS.iter().any(|option| option.value == value)
}

/// Every option set, as served to front-ends.
#[derive(Debug, Clone, Serialize)]
pub struct OptionCatalog {
    pub environments: Vec<OptionEntry>,
    pub styles: Vec<OptionEntry>,
    pub outfits: Vec<OptionEntry>,
}

impl OptionCatalog {
    pub fn load() -> Self {
        Self {
            environments: ENVIRONMENTS.to_vec(),
            styles: styles(),
            outfits: PREDEFINED_OUTFITS.to_vec(),
        }
    }
}
