//! Configuration types for Ladder diagram layout and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources. Every field is optional: omitted fields fall back to
//! fixed defaults and unknown fields are ignored.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutOptions`] - Direction and spacing used by the layout engines.
//! - [`StyleConfig`] - Visual options of the SVG export.
//!
//! # Example
//!
//! ```
//! # use ladder::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().vertical_spacing(), 24.0);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::str::FromStr;

use color::DynamicColor;
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutOptions,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutOptions, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout options.
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Flow direction of the layered layout.
///
/// The stage-aware layout always flows top to bottom.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ranks stacked from top to bottom (default)
    #[default]
    TopToBottom,
    /// Ranks laid out from left to right
    LeftToRight,
}

/// Visual spacing used by the layout engines.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    direction: Direction,

    /// Gap between sequential step columns, and between nodes of one rank.
    horizontal_spacing: f32,

    /// Edge-to-edge gap between stacked parallel steps, and between ranks.
    vertical_spacing: f32,

    /// Gap between a stage lane and the next stage.
    stage_spacing: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            horizontal_spacing: 60.0,
            vertical_spacing: 24.0,
            stage_spacing: 64.0,
        }
    }
}

impl LayoutOptions {
    /// Set the flow direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the horizontal gap between columns
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the vertical gap between stacked nodes
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the gap between stages
    pub fn with_stage_spacing(mut self, spacing: f32) -> Self {
        self.stage_spacing = spacing;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing.max(0.0)
    }

    /// Edge-to-edge gap between vertically adjacent nodes, clamped to zero.
    ///
    /// The gap is measured from the bottom of one box to the top of the next,
    /// so stacked steps are `STEP_HEIGHT + vertical_spacing` apart from top to
    /// top.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing.max(0.0)
    }

    pub fn stage_spacing(&self) -> f32 {
        self.stage_spacing.max(0.0)
    }
}

/// Visual styling of exported SVG diagrams.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color as a CSS color string; transparent when unset.
    background_color: Option<String>,

    font_family: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: "Arial".to_string(),
        }
    }
}

impl StyleConfig {
    /// Set the background color (builder style)
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Returns the parsed background color, or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid CSS color.
    pub fn background_color(&self) -> Result<Option<DynamicColor>, String> {
        self.background_color
            .as_deref()
            .map(DynamicColor::from_str)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}
