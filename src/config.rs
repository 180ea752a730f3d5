//! Chart configuration.
//!
//! Loaded from an optional JSON file; every key has a default. Command-line
//! flags are applied on top in `main`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::record::{Attribute, Axis};
use crate::error::ChartError;
use crate::render::scale::PaddingRule;
use crate::render::transition::Easing;
use crate::state::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { top: 20.0, right: 40.0, bottom: 80.0, left: 100.0 }
    }
}

/// Geometry of the drawing surface. Scene coordinates are relative to the
/// inner plot area, i.e. already translated by the left/top margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub svg_width: f64,
    pub svg_height: f64,
    pub margin: Margin,
    pub mark_radius: f64,
    pub tick_count: usize,
    /// Tooltip box offset from the hovered mark, `[dx, dy]` in pixels.
    pub tooltip_offset: [f64; 2],
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            svg_width: 1000.0,
            svg_height: 500.0,
            margin: Margin::default(),
            mark_radius: 15.0,
            tick_count: 10,
            tooltip_offset: [-60.0, 80.0],
        }
    }
}

impl ChartLayout {
    /// Inner plot width.
    pub fn width(&self) -> f64 {
        self.svg_width - self.margin.left - self.margin.right
    }

    /// Inner plot height.
    pub fn height(&self) -> f64 {
        self.svg_height - self.margin.top - self.margin.bottom
    }

    /// Pixel range for an axis; Y grows downward so its range is inverted.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (0.0, self.width()),
            Axis::Y => (self.height(), 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: 1000, easing: Easing::default() }
    }
}

impl TransitionConfig {
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data_path: PathBuf,
    /// Id of the host element when the chart is exported as HTML.
    pub container_id: String,
    pub layout: ChartLayout,
    pub x_padding: PaddingRule,
    pub y_padding: PaddingRule,
    pub transition: TransitionConfig,
    pub initial_x: Attribute,
    pub initial_y: Attribute,
    pub theme: Theme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("assets/data/data.csv"),
            container_id: "scatter".to_string(),
            layout: ChartLayout::default(),
            x_padding: PaddingRule::default(),
            y_padding: PaddingRule::default(),
            transition: TransitionConfig::default(),
            initial_x: Attribute::Income,
            initial_y: Attribute::Obesity,
            theme: Theme::default(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        let config: ChartConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn padding(&self, axis: Axis) -> PaddingRule {
        match axis {
            Axis::X => self.x_padding,
            Axis::Y => self.y_padding,
        }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        for (attribute, axis) in [(self.initial_x, Axis::X), (self.initial_y, Axis::Y)] {
            if attribute.axis() != axis {
                return Err(ChartError::WrongAxis { attribute, axis });
            }
        }
        if self.layout.width() <= 0.0 || self.layout.height() <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "margins leave no room for the plot area".to_string(),
            ));
        }
        if self.layout.mark_radius <= 0.0 {
            return Err(ChartError::InvalidConfig("mark_radius must be positive".to_string()));
        }
        if self.container_id.trim().is_empty() {
            return Err(ChartError::InvalidConfig("container_id must not be empty".to_string()));
        }
        Ok(())
    }
}
