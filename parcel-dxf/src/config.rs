//! Caller-facing drawing configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uldk::DrawMode;

/// Drawing options for one batch run
///
/// No hidden process-wide defaults: the pipeline receives this struct
/// explicitly from the caller (CLI flags or a JSON file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Draw rings as open line work instead of closed polygons
    #[serde(default)]
    pub draw_as_lines: bool,

    /// Add the short parcel identifier as a text label at each anchor
    #[serde(default)]
    pub add_labels: bool,

    /// Rewrite coordinates from PUWG 1992 into PUWG 2000 before drawing
    #[serde(default)]
    pub convert_to_puwg2000: bool,

    /// AutoCAD color index for the polygon layer
    #[serde(default = "default_polygon_color")]
    pub polygon_color: u8,

    /// AutoCAD color index for the lines layer
    #[serde(default = "default_line_color")]
    pub line_color: u8,

    /// AutoCAD color index for the label layer
    #[serde(default = "default_label_color")]
    pub label_color: u8,

    /// Label text height in drawing units; defaults per target system
    #[serde(default)]
    pub text_height: Option<f64>,

    /// Output DXF path; the CLI flag wins when absent
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_polygon_color() -> u8 {
    2
}

fn default_line_color() -> u8 {
    1
}

fn default_label_color() -> u8 {
    3
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            draw_as_lines: false,
            add_labels: false,
            convert_to_puwg2000: false,
            polygon_color: default_polygon_color(),
            line_color: default_line_color(),
            label_color: default_label_color(),
            text_height: None,
            output: None,
        }
    }
}

impl DrawConfig {
    /// Loads a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.draw_as_lines {
            DrawMode::Lines
        } else {
            DrawMode::Polygon
        }
    }

    /// Label height: 2.5 units suits PUWG 1992 drawings, 10 the larger
    /// PUWG 2000 coordinate magnitudes
    pub fn text_height(&self) -> f64 {
        self.text_height
            .unwrap_or(if self.convert_to_puwg2000 { 10.0 } else { 2.5 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DrawConfig::default();
        assert_eq!(config.draw_mode(), DrawMode::Polygon);
        assert_eq!(config.polygon_color, 2);
        assert!((config.text_height() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_text_height_follows_target_system() {
        let config = DrawConfig {
            convert_to_puwg2000: true,
            ..Default::default()
        };
        assert!((config.text_height() - 10.0).abs() < 1e-12);

        let explicit = DrawConfig {
            convert_to_puwg2000: true,
            text_height: Some(5.0),
            ..Default::default()
        };
        assert!((explicit.text_height() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_partial_json() {
        let config: DrawConfig =
            serde_json::from_str(r#"{"draw_as_lines": true, "line_color": 4}"#).unwrap();
        assert_eq!(config.draw_mode(), DrawMode::Lines);
        assert_eq!(config.line_color, 4);
        assert_eq!(config.polygon_color, 2);
        assert!(config.output.is_none());
    }
}
