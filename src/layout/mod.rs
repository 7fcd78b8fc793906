mod allocate;
mod boxes;
mod color;
mod error;
mod flow;
mod highlight;
mod legend;
mod normalize;
pub(crate) mod types;
pub use types::*;

pub use allocate::{SpaceAllocation, allocate_space};
pub use boxes::{BoxPlacement, place_boxes};
pub use color::{Color, ColorScale, ColorStop};
pub use error::LayoutError;
pub use flow::{EdgeSpan, FlowPath, PathCommand, ribbon_path};
pub use highlight::{HighlightPolicy, HighlightState};
pub use legend::compute_legend;
pub use normalize::{NormalizedGroup, NormalizedRanking, normalize_ranking};

use tracing::debug;

use crate::config::{Config, RankFlowConfig, RenderConfig};
use crate::ir::RankingDataset;
use crate::theme::Theme;

/// Validated options and the resolved color scale. Immutable; every call to
/// [`RankFlowSession::layout`] is an independent full pass.
#[derive(Debug, Clone)]
pub struct RankFlowSession {
    config: RankFlowConfig,
    theme: Theme,
    color_scale: ColorScale,
}

impl RankFlowSession {
    pub fn new(config: RankFlowConfig) -> Result<Self, LayoutError> {
        Self::with_theme(config, Theme::default())
    }

    pub fn with_theme(config: RankFlowConfig, theme: Theme) -> Result<Self, LayoutError> {
        config.validate()?;
        let color_scale = ColorScale::from_specs(&config.color_stops)?;
        Ok(Self {
            config,
            theme,
            color_scale,
        })
    }

    pub fn config(&self) -> &RankFlowConfig {
        &self.config
    }

    pub fn color_scale(&self) -> &ColorScale {
        &self.color_scale
    }

    pub fn highlight_policy(&self) -> HighlightPolicy {
        HighlightPolicy::new(self.config.show_values, self.config.value_decimals)
    }

    pub fn layout(
        &self,
        dataset: &RankingDataset,
        canvas: RenderConfig,
    ) -> Result<RankFlowLayout, LayoutError> {
        canvas.validate()?;
        let config = &self.config;
        let ranking = normalize_ranking(dataset, config.top_n, config.rank_value_key)?;
        let allocation = allocate_space(&canvas, config, &ranking)?;
        let placement = place_boxes(&ranking, &allocation, config, &canvas, &self.color_scale);

        let separator = config.group_labels.then(|| {
            let y = canvas.height
                - config.padding_y
                - config.legend_font_size
                - config.inter_box_margin / 2.0;
            LineSegment {
                x1: config.padding_x,
                y1: y,
                x2: canvas.width - config.padding_x,
                y2: y,
            }
        });
        let info_anchor = config.show_values.then(|| TextLabel {
            text: String::new(),
            x: canvas.width / 2.0,
            y: config.padding_y,
            font_size: config.legend_font_size,
            baseline: TextBaseline::Hanging,
            anchor: TextAnchor::Middle,
        });
        let legend = config
            .color_legend
            .then(|| compute_legend(&self.color_scale, config, &canvas));

        debug!(
            groups = placement.groups.len(),
            boxes = placement.boxes.len(),
            flows = placement.flows.len(),
            vertical_scale = allocation.vertical_scale,
            "computed rank-flow layout"
        );

        Ok(RankFlowLayout {
            width: canvas.width,
            height: canvas.height,
            boxes: placement.boxes,
            flows: placement.flows,
            groups: placement.groups,
            item_labels: placement.item_labels,
            separator,
            info_anchor,
            legend,
            color_scale: self.color_scale.clone(),
            allocation,
            theme: self.theme.clone(),
        })
    }
}

/// One-shot layout with a full [`Config`] bundle.
pub fn compute_layout(
    dataset: &RankingDataset,
    config: &Config,
) -> Result<RankFlowLayout, LayoutError> {
    RankFlowSession::with_theme(config.layout.clone(), config.theme.clone())?
        .layout(dataset, config.render)
}
