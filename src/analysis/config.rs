//! Chart styling loaded from chart_config.json.
//!
//! Missing file or missing fields fall back to defaults. The file is read
//! each time a report is generated.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub font: FontConfig,
    pub colors: ColorConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: u32,
    pub caption_size: u32,
    pub axis_label_size: u32,
    pub legend_size: u32,
}

/// RGB triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub spare_bar: [u8; 3],
    pub strike_bar: [u8; 3],
    pub mean_line: [u8; 3],
    pub background: [u8; 3],
    pub grid_color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub chart_width: u32,
    pub chart_height: u32,
    /// Height of each panel in the stacked strike chart
    pub panel_height: u32,
    pub title_height: u32,
    pub margin: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            title_size: 28,
            caption_size: 20,
            axis_label_size: 14,
            legend_size: 14,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            spare_bar: [52, 152, 219],  // #3498DB
            strike_bar: [230, 126, 34], // #E67E22
            mean_line: [192, 57, 43],   // #C0392B
            background: [255, 255, 255],
            grid_color: [220, 220, 220],
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chart_width: 900,
            chart_height: 600,
            panel_height: 400,
            title_height: 50,
            margin: 20,
        }
    }
}

impl ChartConfig {
    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => {
                        crate::log(&format!("Loaded chart config from {}", config_path.display()));
                        return config;
                    }
                    Err(e) => {
                        crate::log(&format!("Failed to parse chart config: {}. Using defaults.", e));
                    }
                },
                Err(e) => {
                    crate::log(&format!("Failed to read chart config: {}. Using defaults.", e));
                }
            }
        }
        Self::default()
    }
}
