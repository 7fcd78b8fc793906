use serde::Serialize;
use std::ops::Range;

use crate::ir::RankedItem;
use crate::theme::Theme;

use super::allocate::SpaceAllocation;
use super::color::{Color, ColorScale};
use super::flow::FlowPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextBaseline {
    Baseline,
    Middle,
    Hanging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub baseline: TextBaseline,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedBox {
    pub item: RankedItem,
    pub group_index: usize,
    /// 1-based position in the group's top-N order.
    pub rank: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
}

impl PositionedBox {
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Continuation of one item between two adjacent groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub id: String,
    /// Index into [`RankFlowLayout::boxes`].
    pub from_box: usize,
    pub to_box: usize,
    pub value0: f32,
    pub value1: f32,
    pub color0: Color,
    pub color1: Color,
    pub path: FlowPath,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupColumn {
    pub key: String,
    pub index: usize,
    pub x: f32,
    /// Range of this group's boxes in [`RankFlowLayout::boxes`].
    pub boxes: Range<usize>,
    pub label: Option<TextLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemLabel {
    pub box_index: usize,
    pub id: String,
    pub text: TextLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendTick {
    pub value: f32,
    pub line: LineSegment,
    pub label: TextLabel,
}

/// Vertical gradient bar; the gradient runs bottom (first stop) to top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub gradient: Vec<GradientStop>,
    pub ticks: Vec<LegendTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankFlowLayout {
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<PositionedBox>,
    pub flows: Vec<FlowLink>,
    pub groups: Vec<GroupColumn>,
    pub item_labels: Vec<ItemLabel>,
    pub separator: Option<LineSegment>,
    /// Anchor of the hover info text; its content comes from the highlight
    /// state.
    pub info_anchor: Option<TextLabel>,
    pub legend: Option<LegendLayout>,
    pub color_scale: ColorScale,
    pub allocation: SpaceAllocation,
    pub theme: Theme,
}

impl RankFlowLayout {
    pub fn group_boxes(&self, group_index: usize) -> &[PositionedBox] {
        self.groups
            .get(group_index)
            .map(|group| &self.boxes[group.boxes.clone()])
            .unwrap_or(&[])
    }

    pub fn boxes_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PositionedBox> + 'a {
        self.boxes.iter().filter(move |bx| bx.id() == id)
    }

    pub fn flows_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowLink> + 'a {
        self.flows.iter().filter(move |flow| flow.id == id)
    }
}
