use crate::layout::LayoutError;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_COLOR_STOPS: [(f32, &str); 3] =
    [(0.0, "white"), (0.5, "rgb(150,200,150)"), (1.0, "green")];

/// Metric used to pick and order the top-N items of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankValueKey {
    #[default]
    Count,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStopSpec {
    pub value: f32,
    pub color: String,
}

impl ColorStopSpec {
    pub fn new(value: f32, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankFlowConfig {
    pub padding_x: f32,
    pub padding_y: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub max_box_width: f32,
    pub min_box_height: f32,
    pub inter_box_margin: f32,
    pub font_margin: f32,
    pub color_stops: Vec<ColorStopSpec>,
    pub group_labels: bool,
    pub color_legend: bool,
    pub show_values: bool,
    pub legend_width: f32,
    pub legend_height_fraction: f32,
    pub font_size: f32,
    pub legend_font_size: f32,
    pub value_decimals: u32,
    pub top_n: usize,
    pub rank_value_key: RankValueKey,
}

impl Default for RankFlowConfig {
    fn default() -> Self {
        Self {
            padding_x: 20.0,
            padding_y: 20.0,
            margin_top: 10.0,
            margin_right: -50.0,
            max_box_width: 20.0,
            min_box_height: 4.0,
            inter_box_margin: 8.0,
            font_margin: 10.0,
            color_stops: DEFAULT_COLOR_STOPS
                .iter()
                .map(|(value, color)| ColorStopSpec::new(*value, *color))
                .collect(),
            group_labels: true,
            color_legend: true,
            show_values: true,
            legend_width: 40.0,
            legend_height_fraction: 0.8,
            font_size: 10.0,
            legend_font_size: 10.0,
            value_decimals: 2,
            top_n: 10,
            rank_value_key: RankValueKey::Count,
        }
    }
}

impl RankFlowConfig {
    /// Height of one reserved text row (group labels or the info field).
    pub fn label_row_height(&self) -> f32 {
        2.0 * self.inter_box_margin + self.legend_font_size
    }

    /// Checks option ranges. Color stops are checked when the scale is built.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.top_n == 0 {
            return Err(LayoutError::InvalidInput(
                "topN must be greater than zero".to_string(),
            ));
        }
        let finite = [
            ("paddingX", self.padding_x),
            ("paddingY", self.padding_y),
            ("marginTop", self.margin_top),
            ("marginRight", self.margin_right),
            ("fontMargin", self.font_margin),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a finite number"
                )));
            }
        }
        let non_negative = [
            ("minBoxHeight", self.min_box_height),
            ("interBoxMargin", self.inter_box_margin),
            ("legendWidth", self.legend_width),
            ("fontSize", self.font_size),
            ("legendFontSize", self.legend_font_size),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.max_box_width.is_finite() || self.max_box_width <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "maxBoxWidth must be positive, got {}",
                self.max_box_width
            )));
        }
        if !(self.legend_height_fraction > 0.0 && self.legend_height_fraction <= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "legendHeightFraction must be in (0, 1], got {}",
                self.legend_height_fraction
            )));
        }
        Ok(())
    }
}

/// Canvas the layout is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(LayoutError::InvalidConfig(format!(
                "canvas dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: RankFlowConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ColorStopEntry {
    Pair(f32, String),
    Object { value: f32, color: String },
}

impl From<ColorStopEntry> for ColorStopSpec {
    fn from(entry: ColorStopEntry) -> Self {
        match entry {
            ColorStopEntry::Pair(value, color) => ColorStopSpec::new(value, color),
            ColorStopEntry::Object { value, color } => ColorStopSpec::new(value, color),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    render: Option<RenderConfigFile>,
    padding_x: Option<f32>,
    padding_y: Option<f32>,
    margin_top: Option<f32>,
    margin_right: Option<f32>,
    #[serde(alias = "maxWidth")]
    max_box_width: Option<f32>,
    #[serde(alias = "minHeight")]
    min_box_height: Option<f32>,
    #[serde(alias = "marginY")]
    inter_box_margin: Option<f32>,
    font_margin: Option<f32>,
    color_stops: Option<Vec<ColorStopEntry>>,
    value_range: Option<Vec<f32>>,
    color_range: Option<Vec<String>>,
    group_labels: Option<bool>,
    color_legend: Option<bool>,
    show_values: Option<bool>,
    #[serde(alias = "colorLegendWidth")]
    legend_width: Option<f32>,
    #[serde(alias = "colorLegendHeight")]
    legend_height_fraction: Option<f32>,
    font_size: Option<f32>,
    legend_font_size: Option<f32>,
    value_decimals: Option<u32>,
    #[serde(alias = "numTopRanks")]
    top_n: Option<usize>,
    rank_value_key: Option<RankValueKey>,
    border_color: Option<String>,
    border_width: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Parses an options document (JSON or JSON5). Keys absent from the document
/// keep their defaults; explicit `0` and `false` are honored.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme \"{theme_name}\""))?;
    }
    if let Some(v) = parsed.border_color {
        config.theme.border_color = v;
    }
    if let Some(v) = parsed.border_width {
        config.theme.border_width = v;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    let layout = &mut config.layout;
    if let Some(v) = parsed.padding_x {
        layout.padding_x = v;
    }
    if let Some(v) = parsed.padding_y {
        layout.padding_y = v;
    }
    if let Some(v) = parsed.margin_top {
        layout.margin_top = v;
    }
    if let Some(v) = parsed.margin_right {
        layout.margin_right = v;
    }
    if let Some(v) = parsed.max_box_width {
        layout.max_box_width = v;
    }
    if let Some(v) = parsed.min_box_height {
        layout.min_box_height = v;
    }
    if let Some(v) = parsed.inter_box_margin {
        layout.inter_box_margin = v;
    }
    if let Some(v) = parsed.font_margin {
        layout.font_margin = v;
    }
    if let Some(v) = parsed.group_labels {
        layout.group_labels = v;
    }
    if let Some(v) = parsed.color_legend {
        layout.color_legend = v;
    }
    if let Some(v) = parsed.show_values {
        layout.show_values = v;
    }
    if let Some(v) = parsed.legend_width {
        layout.legend_width = v;
    }
    if let Some(v) = parsed.legend_height_fraction {
        layout.legend_height_fraction = v;
    }
    if let Some(v) = parsed.font_size {
        layout.font_size = v;
    }
    if let Some(v) = parsed.legend_font_size {
        layout.legend_font_size = v;
    }
    if let Some(v) = parsed.value_decimals {
        layout.value_decimals = v;
    }
    if let Some(v) = parsed.top_n {
        layout.top_n = v;
    }
    if let Some(v) = parsed.rank_value_key {
        layout.rank_value_key = v;
    }

    match (parsed.color_stops, parsed.value_range, parsed.color_range) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(LayoutError::InvalidConfig(
                "colorStops cannot be combined with valueRange/colorRange".to_string(),
            )
            .into());
        }
        (Some(stops), None, None) => {
            layout.color_stops = stops.into_iter().map(ColorStopSpec::from).collect();
        }
        (None, Some(values), Some(colors)) => {
            if values.len() != colors.len() {
                return Err(LayoutError::InvalidConfig(format!(
                    "valueRange has {} entries but colorRange has {}",
                    values.len(),
                    colors.len()
                ))
                .into());
            }
            layout.color_stops = values
                .into_iter()
                .zip(colors)
                .map(|(value, color)| ColorStopSpec::new(value, color))
                .collect();
        }
        (None, Some(_), None) | (None, None, Some(_)) => {
            return Err(LayoutError::InvalidConfig(
                "valueRange and colorRange must be given together".to_string(),
            )
            .into());
        }
        (None, None, None) => {}
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout, RankFlowConfig::default());
        assert_eq!(config.theme, Theme::classic());
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn zero_and_false_are_honored_overrides() {
        let config = parse_config(
            r#"{ paddingX: 0, marginTop: 0, groupLabels: false, colorLegend: false, showValues: false }"#,
        )
        .unwrap();
        assert_eq!(config.layout.padding_x, 0.0);
        assert_eq!(config.layout.margin_top, 0.0);
        assert!(!config.layout.group_labels);
        assert!(!config.layout.color_legend);
        assert!(!config.layout.show_values);
    }

    #[test]
    fn legacy_option_names_are_accepted() {
        let config = parse_config(
            r#"{"numTopRanks": 3, "maxWidth": 12, "minHeight": 2, "marginY": 5,
                "valueRange": [0, 1], "colorRange": ["white", "green"], "rankValueKey": "value"}"#,
        )
        .unwrap();
        assert_eq!(config.layout.top_n, 3);
        assert_eq!(config.layout.max_box_width, 12.0);
        assert_eq!(config.layout.min_box_height, 2.0);
        assert_eq!(config.layout.inter_box_margin, 5.0);
        assert_eq!(config.layout.rank_value_key, RankValueKey::Value);
        assert_eq!(
            config.layout.color_stops,
            vec![ColorStopSpec::new(0.0, "white"), ColorStopSpec::new(1.0, "green")]
        );
    }

    #[test]
    fn color_stops_accept_pairs_and_objects() {
        let config = parse_config(
            r##"{ colorStops: [[0, "#fff"], { value: 2, color: "navy" }], theme: "modern" }"##,
        )
        .unwrap();
        assert_eq!(config.layout.color_stops[1], ColorStopSpec::new(2.0, "navy"));
        assert_eq!(config.theme, Theme::modern());
    }

    #[test]
    fn mismatched_ranges_are_rejected() {
        let err = parse_config(r#"{"valueRange": [0, 1], "colorRange": ["white"]}"#).unwrap_err();
        assert!(err.to_string().contains("valueRange"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_options() {
        let mut config = RankFlowConfig::default();
        config.top_n = 0;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidInput(_))));

        let mut config = RankFlowConfig::default();
        config.legend_height_fraction = 1.5;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut config = RankFlowConfig::default();
        config.min_box_height = -1.0;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidConfig(_))));

        assert!(RankFlowConfig::default().validate().is_ok());
    }

    #[test]
    fn render_config_rejects_non_positive_canvas() {
        let canvas = RenderConfig {
            width: 0.0,
            height: 10.0,
        };
        assert!(canvas.validate().is_err());
        assert!(RenderConfig::default().validate().is_ok());
    }
}
