//! Model identifiers and image generation parameters

use serde::{Deserialize, Serialize};

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for chat and slide generation
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

/// Model used for image generation and editing
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Model used for grounded stock research
pub const RESEARCH_MODEL: &str = "gemini-2.5-flash";

/// Aspect ratio used for all generated images
pub const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Output resolution tier for image generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    /// Wire value for the `imageConfig.imageSize` field
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::OneK
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1K" => Ok(Self::OneK),
            "2K" => Ok(Self::TwoK),
            "4K" => Ok(Self::FourK),
            _ => Err(format!("Invalid image size tier: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_wire_values() {
        assert_eq!(ImageSize::OneK.as_str(), "1K");
        assert_eq!(ImageSize::FourK.to_string(), "4K");
        assert_eq!(
            serde_json::to_value(ImageSize::TwoK).unwrap(),
            serde_json::json!("2K")
        );
    }

    #[test]
    fn test_image_size_from_str() {
        assert_eq!("1k".parse::<ImageSize>().unwrap(), ImageSize::OneK);
        assert_eq!("4K".parse::<ImageSize>().unwrap(), ImageSize::FourK);
        assert!("8K".parse::<ImageSize>().is_err());
    }
}
