//! Conversion Configuration
//!
//! Container conventions and normalization defaults. Every field is defaulted,
//! so an empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Io(String, std::io::Error),

    #[error("Invalid config {0}: {1}")]
    Parse(String, serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertConfig {
    /// Manifest entry holding the artboards.
    pub artwork_entry: String,
    /// Manifest entry holding the resource directory.
    pub resources_entry: String,
    /// Reserved non-rendering artwork child.
    pub pasteboard_name: String,
    /// Prefix stripped from an artboard path to form its identifier.
    pub artboard_prefix: String,
    /// Fragment location relative to `<artwork path>/<artboard path>/`.
    pub fragment_suffix: String,
    pub interactions_path: String,
    pub resources_dir: String,
    pub text: TextDefaults,
    pub assets: AssetNaming,
    pub default_fit_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextDefaults {
    pub font_family: String,
    pub font_style: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetNaming {
    pub slug_max_len: usize,
    pub id_fallback_len: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            artwork_entry: "artwork".to_string(),
            resources_entry: "resources".to_string(),
            pasteboard_name: "pasteboard".to_string(),
            artboard_prefix: "artboard-".to_string(),
            fragment_suffix: "graphics/graphicContent.agc".to_string(),
            interactions_path: "interactions/interactions.json".to_string(),
            resources_dir: "resources".to_string(),
            text: TextDefaults::default(),
            assets: AssetNaming::default(),
            default_fit_mode: "cover".to_string(),
        }
    }
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_style: "Regular".to_string(),
            font_size: 16.0,
        }
    }
}

impl Default for AssetNaming {
    fn default() -> Self {
        Self {
            slug_max_len: 60,
            id_fallback_len: 12,
        }
    }
}

impl ConvertConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(path.display().to_string(), e))
    }
}
