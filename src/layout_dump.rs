use crate::layout::{
    HighlightState, LineSegment, RankFlowLayout, TextAnchor, TextBaseline, TextLabel,
};
use crate::theme::Theme;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Flat, renderer-friendly snapshot of a layout: colors as CSS strings and
/// flow paths as SVG path data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub vertical_scale: f32,
    pub degenerate: bool,
    pub style: StyleDump,
    pub groups: Vec<GroupDump>,
    pub boxes: Vec<BoxDump>,
    pub flows: Vec<FlowDump>,
    pub separator: Option<LineSegment>,
    pub info_anchor: Option<LabelDump>,
    pub legend: Option<LegendDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightState>,
}

/// Theme values a renderer needs to draw boxes, ribbons, text and the
/// highlight opacities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDump {
    pub font_family: String,
    pub text_color: String,
    pub border_color: String,
    pub border_width: f32,
    pub flow_fill: String,
    pub background: String,
    pub flow_opacity: f32,
    pub flow_highlight_opacity: f32,
    pub dim_opacity: f32,
}

impl From<&Theme> for StyleDump {
    fn from(theme: &Theme) -> Self {
        Self {
            font_family: theme.font_family.clone(),
            text_color: theme.text_color.clone(),
            border_color: theme.border_color.clone(),
            border_width: theme.border_width,
            flow_fill: theme.flow_fill.clone(),
            background: theme.background.clone(),
            flow_opacity: theme.flow_opacity,
            flow_highlight_opacity: theme.flow_highlight_opacity,
            dim_opacity: theme.dim_opacity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub baseline: TextBaseline,
    pub anchor: TextAnchor,
}

impl From<&TextLabel> for LabelDump {
    fn from(label: &TextLabel) -> Self {
        Self {
            text: label.text.clone(),
            x: label.x,
            y: label.y,
            font_size: label.font_size,
            baseline: label.baseline,
            anchor: label.anchor,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDump {
    pub key: String,
    pub x: f32,
    pub label: Option<LabelDump>,
    pub box_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDump {
    pub id: String,
    pub group: usize,
    pub rank: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub count: f32,
    pub value: f32,
    pub fill: String,
    pub label: LabelDump,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDump {
    pub id: String,
    pub from: usize,
    pub to: usize,
    pub value0: f32,
    pub value1: f32,
    pub d: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stops: Vec<LegendStopDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendStopDump {
    pub offset: f32,
    pub color: String,
    pub tick: LineSegment,
    pub label: LabelDump,
}

impl LayoutDump {
    pub fn from_layout(layout: &RankFlowLayout, highlight: Option<HighlightState>) -> Self {
        let groups = layout
            .groups
            .iter()
            .map(|group| GroupDump {
                key: group.key.clone(),
                x: group.x,
                label: group.label.as_ref().map(LabelDump::from),
                box_count: group.boxes.len(),
            })
            .collect();

        let boxes = layout
            .boxes
            .iter()
            .zip(&layout.item_labels)
            .map(|(bx, label)| BoxDump {
                id: bx.item.id.clone(),
                group: bx.group_index,
                rank: bx.rank,
                x: bx.x,
                y: bx.y,
                width: bx.width,
                height: bx.height,
                count: bx.item.count,
                value: bx.item.value,
                fill: bx.fill.to_css(),
                label: LabelDump::from(&label.text),
            })
            .collect();

        let flows = layout
            .flows
            .iter()
            .map(|flow| FlowDump {
                id: flow.id.clone(),
                from: flow.from_box,
                to: flow.to_box,
                value0: flow.value0,
                value1: flow.value1,
                d: flow.path.to_svg_path_data(),
            })
            .collect();

        let legend = layout.legend.as_ref().map(|legend| LegendDump {
            x: legend.x,
            y: legend.y,
            width: legend.width,
            height: legend.height,
            stops: legend
                .gradient
                .iter()
                .zip(&legend.ticks)
                .map(|(stop, tick)| LegendStopDump {
                    offset: stop.offset,
                    color: stop.color.to_css(),
                    tick: tick.line,
                    label: LabelDump::from(&tick.label),
                })
                .collect(),
        });

        LayoutDump {
            width: layout.width,
            height: layout.height,
            vertical_scale: layout.allocation.vertical_scale,
            degenerate: layout.allocation.degenerate,
            style: StyleDump::from(&layout.theme),
            groups,
            boxes,
            flows,
            separator: layout.separator,
            info_anchor: layout.info_anchor.as_ref().map(LabelDump::from),
            legend,
            highlight,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &RankFlowLayout,
    highlight: Option<HighlightState>,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, highlight);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, parse_config};
    use crate::ir::{RankedItem, RankingDataset};
    use crate::layout::compute_layout;

    #[test]
    fn dump_serializes_css_colors_and_path_data() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("a", vec![RankedItem::new("x", 1.0, 0.0)]);
        dataset.push_group("b", vec![RankedItem::new("x", 1.0, 1.0)]);
        let layout = compute_layout(&dataset, &Config::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout, None);
        assert_eq!(dump.boxes[0].fill, "rgb(255, 255, 255)");
        assert_eq!(dump.boxes[1].fill, "rgb(0, 128, 0)");
        assert!(dump.flows[0].d.starts_with('M'));
        assert!(dump.flows[0].d.ends_with('Z'));

        let json = dump.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["groups"][1]["key"], "b");
        assert!(value.get("highlight").is_none());
        assert_eq!(value["legend"]["stops"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn dump_carries_style_and_chrome() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("a", vec![RankedItem::new("x", 2.0, 0.5)]);
        let config =
            parse_config(r#"{ borderColor: "red", borderWidth: 3, fontSize: 12 }"#).unwrap();
        let layout = compute_layout(&dataset, &config).unwrap();
        let json = LayoutDump::from_layout(&layout, None).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let num = |v: &serde_json::Value| v.as_f64().unwrap() as f32;

        assert_eq!(value["style"]["borderColor"], "red");
        assert_eq!(num(&value["style"]["borderWidth"]), 3.0);
        assert_eq!(num(&value["style"]["flowOpacity"]), layout.theme.flow_opacity);
        assert_eq!(value["boxes"][0]["label"]["text"], "x");
        assert_eq!(num(&value["boxes"][0]["label"]["fontSize"]), 12.0);
        assert_eq!(value["boxes"][0]["label"]["baseline"], "middle");
        assert_eq!(value["groups"][0]["label"]["text"], "a");

        let separator = layout.separator.unwrap();
        assert_eq!(num(&value["separator"]["y1"]), separator.y1);
        assert_eq!(value["infoAnchor"]["baseline"], "hanging");
        assert_eq!(value["infoAnchor"]["anchor"], "middle");

        let stops = value["legend"]["stops"].as_array().unwrap();
        assert_eq!(stops[0]["label"]["baseline"], "baseline");
        assert_eq!(stops[2]["label"]["baseline"], "hanging");
        assert_eq!(stops[2]["label"]["text"], "1");
        let tick = &layout.legend.as_ref().unwrap().ticks[1].line;
        assert_eq!(num(&stops[1]["tick"]["x1"]), tick.x1);
        assert_eq!(num(&stops[1]["tick"]["x2"]), tick.x2);
    }
}
