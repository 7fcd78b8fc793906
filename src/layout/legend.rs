use crate::config::{RankFlowConfig, RenderConfig};

use super::color::ColorScale;
use super::{
    GradientStop, LegendLayout, LegendTick, LineSegment, TextAnchor, TextBaseline, TextLabel,
};

/// Rounds half-steps towards +inf, so -0.25 labels as "-0.2".
fn format_stop(value: f32) -> String {
    let rounded = (value * 10.0 + 0.5).floor() / 10.0;
    // Avoid "-0" for small negative stops.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Color legend on the right edge of the canvas. Stops are spread by their
/// value, so uneven stops give uneven gradient offsets.
pub fn compute_legend(
    scale: &ColorScale,
    config: &RankFlowConfig,
    canvas: &RenderConfig,
) -> LegendLayout {
    let inner_height = canvas.height - 2.0 * config.padding_y;
    let height = config.legend_height_fraction * inner_height;
    let y = config.padding_y + (1.0 - config.legend_height_fraction) * inner_height / 2.0;
    let right = canvas.width - config.padding_x;
    let x = right - config.legend_width;

    let offsets = scale.gradient_offsets();
    let last = offsets.len().saturating_sub(1);
    let gradient = offsets
        .iter()
        .map(|(offset, color)| GradientStop {
            offset: *offset,
            color: *color,
        })
        .collect();
    let ticks = scale
        .stops()
        .iter()
        .zip(&offsets)
        .enumerate()
        .map(|(idx, (stop, (offset, _)))| {
            let tick_y = y + height * (1.0 - offset);
            let baseline = if idx == 0 {
                TextBaseline::Baseline
            } else if idx == last {
                TextBaseline::Hanging
            } else {
                TextBaseline::Middle
            };
            LegendTick {
                value: stop.value,
                line: LineSegment {
                    x1: right - 3.0 * config.legend_width / 4.0,
                    y1: tick_y,
                    x2: right - config.legend_width / 2.0,
                    y2: tick_y,
                },
                label: TextLabel {
                    text: format_stop(stop.value),
                    x: right - config.legend_width / 4.0,
                    y: tick_y,
                    font_size: config.legend_font_size,
                    baseline,
                    anchor: TextAnchor::Middle,
                },
            }
        })
        .collect();

    LegendLayout {
        x,
        y,
        width: config.legend_width / 4.0,
        height,
        gradient,
        ticks,
    }
}
