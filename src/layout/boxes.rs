use std::collections::HashMap;

use crate::config::{RankFlowConfig, RenderConfig};

use super::allocate::SpaceAllocation;
use super::color::ColorScale;
use super::flow::{EdgeSpan, ribbon_path};
use super::normalize::NormalizedRanking;
use super::{
    FlowLink, GroupColumn, ItemLabel, PositionedBox, TextAnchor, TextBaseline, TextLabel,
};

#[derive(Debug, Clone, Default)]
pub struct BoxPlacement {
    pub boxes: Vec<PositionedBox>,
    pub flows: Vec<FlowLink>,
    pub groups: Vec<GroupColumn>,
    pub item_labels: Vec<ItemLabel>,
}

fn link(boxes: &[PositionedBox], from_box: usize, to_box: usize, scale: &ColorScale) -> FlowLink {
    let prev = &boxes[from_box];
    let next = &boxes[to_box];
    let path = ribbon_path(
        EdgeSpan {
            x: prev.right(),
            top: prev.y,
            bottom: prev.bottom(),
        },
        EdgeSpan {
            x: next.x,
            top: next.y,
            bottom: next.bottom(),
        },
    );
    FlowLink {
        id: next.item.id.clone(),
        from_box,
        to_box,
        value0: prev.item.value,
        value1: next.item.value,
        color0: scale.evaluate(prev.item.value),
        color1: scale.evaluate(next.item.value),
        path,
    }
}

/// Stacks every group's boxes bottom-up and links items that continue into the
/// next group.
///
/// Within a group, the lowest rank sits on the baseline and rank 1 ends up on
/// top. Boxes are stored rank-first per group so each column is a contiguous
/// arena range.
pub fn place_boxes(
    ranking: &NormalizedRanking,
    allocation: &SpaceAllocation,
    config: &RankFlowConfig,
    canvas: &RenderConfig,
    scale: &ColorScale,
) -> BoxPlacement {
    let mut placement = BoxPlacement {
        boxes: Vec::with_capacity(ranking.item_count()),
        ..Default::default()
    };
    // id -> arena index, only for the group placed last.
    let mut previous: HashMap<String, usize> = HashMap::new();

    for (group_index, group) in ranking.groups.iter().enumerate() {
        let x = config.padding_x + group_index as f32 * allocation.group_spacing;
        let start = placement.boxes.len();
        let n = group.items.len();

        let mut heights = Vec::with_capacity(n);
        for item in &group.items {
            heights.push(config.min_box_height.max(item.count * allocation.vertical_scale));
        }
        let mut tops = vec![0.0f32; n];
        let mut base = allocation.baseline_y;
        for rank_idx in (0..n).rev() {
            tops[rank_idx] = base - heights[rank_idx];
            base = tops[rank_idx] - config.inter_box_margin;
        }

        let mut current: HashMap<String, usize> = HashMap::with_capacity(n);
        for (rank_idx, item) in group.items.iter().enumerate() {
            let box_index = placement.boxes.len();
            placement.boxes.push(PositionedBox {
                item: item.clone(),
                group_index,
                rank: rank_idx + 1,
                x,
                y: tops[rank_idx],
                width: allocation.box_width,
                height: heights[rank_idx],
                fill: scale.evaluate(item.value),
            });
            placement.item_labels.push(ItemLabel {
                box_index,
                id: item.id.clone(),
                text: TextLabel {
                    text: item.id.clone(),
                    x: x + allocation.box_width + config.font_margin,
                    y: tops[rank_idx] + heights[rank_idx] / 2.0,
                    font_size: config.font_size,
                    baseline: TextBaseline::Middle,
                    anchor: TextAnchor::Start,
                },
            });

            // A repeated id inside one group never re-links; the first box wins.
            if current.contains_key(&item.id) {
                continue;
            }
            if let Some(&prev_index) = previous.get(&item.id) {
                let flow = link(&placement.boxes, prev_index, box_index, scale);
                placement.flows.push(flow);
            }
            current.insert(item.id.clone(), box_index);
        }
        previous = current;

        let label = config.group_labels.then(|| TextLabel {
            text: group.key.clone(),
            x,
            y: canvas.height - config.padding_y,
            font_size: config.legend_font_size,
            baseline: TextBaseline::Baseline,
            anchor: TextAnchor::Start,
        });
        placement.groups.push(GroupColumn {
            key: group.key.clone(),
            index: group_index,
            x,
            boxes: start..placement.boxes.len(),
            label,
        });
    }

    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankValueKey;
    use crate::ir::{RankedItem, RankingDataset};
    use crate::layout::allocate::allocate_space;
    use crate::layout::normalize::normalize_ranking;

    fn place(dataset: &RankingDataset, config: &RankFlowConfig) -> BoxPlacement {
        let canvas = RenderConfig::default();
        let ranking = normalize_ranking(dataset, config.top_n, RankValueKey::Count).unwrap();
        let allocation = allocate_space(&canvas, config, &ranking).unwrap();
        let scale = ColorScale::from_specs(&config.color_stops).unwrap();
        place_boxes(&ranking, &allocation, config, &canvas, &scale)
    }

    fn group(ids: &[(&str, f32)]) -> Vec<RankedItem> {
        ids.iter()
            .map(|(id, count)| RankedItem::new(*id, *count, 0.5))
            .collect()
    }

    #[test]
    fn rank_one_is_stacked_on_top() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("g", group(&[("small", 1.0), ("big", 10.0)]));
        let config = RankFlowConfig::default();
        let placed = place(&dataset, &config);
        let big = &placed.boxes[0];
        let small = &placed.boxes[1];
        assert_eq!(big.id(), "big");
        assert_eq!(big.rank, 1);
        assert!(big.y < small.y);
        assert!((big.bottom() + config.inter_box_margin - small.y).abs() < 1e-4);
    }

    #[test]
    fn links_only_adjacent_groups() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("a", group(&[("x", 1.0), ("y", 2.0)]));
        dataset.push_group("b", group(&[("y", 2.0)]));
        dataset.push_group("c", group(&[("x", 3.0), ("y", 1.0)]));
        let placed = place(&dataset, &RankFlowConfig::default());
        let links: Vec<(&str, usize, usize)> = placed
            .flows
            .iter()
            .map(|flow| {
                (
                    flow.id.as_str(),
                    placed.boxes[flow.from_box].group_index,
                    placed.boxes[flow.to_box].group_index,
                )
            })
            .collect();
        assert_eq!(links, vec![("y", 0, 1), ("y", 1, 2)]);
    }

    #[test]
    fn duplicate_ids_link_once() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("a", group(&[("x", 5.0), ("x", 1.0)]));
        dataset.push_group("b", group(&[("x", 4.0), ("x", 3.0)]));
        let placed = place(&dataset, &RankFlowConfig::default());
        assert_eq!(placed.boxes.len(), 4);
        assert_eq!(placed.flows.len(), 1);
        assert_eq!(placed.flows[0].from_box, 0);
        assert_eq!(placed.flows[0].to_box, 2);
    }

    #[test]
    fn flow_anchors_on_box_edges() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("a", group(&[("x", 5.0)]));
        dataset.push_group("b", group(&[("x", 8.0)]));
        let placed = place(&dataset, &RankFlowConfig::default());
        let flow = &placed.flows[0];
        let from = &placed.boxes[flow.from_box];
        let to = &placed.boxes[flow.to_box];
        let points = flow.path.points();
        assert_eq!(points[0], (from.right(), from.y));
        assert_eq!(points[3], (to.x, to.y));
        assert_eq!(points[4], (to.x, to.bottom()));
        assert_eq!(points[7], (from.right(), from.bottom()));
    }

    #[test]
    fn columns_record_arena_ranges_and_labels() {
        let mut dataset = RankingDataset::new();
        dataset.push_group("2019", group(&[("a", 1.0), ("b", 1.0)]));
        dataset.push_group("2020", Vec::new());
        dataset.push_group("2021", group(&[("c", 1.0)]));
        let config = RankFlowConfig::default();
        let placed = place(&dataset, &config);
        assert_eq!(placed.groups[0].boxes, 0..2);
        assert_eq!(placed.groups[1].boxes, 2..2);
        assert_eq!(placed.groups[2].boxes, 2..3);
        let label = placed.groups[2].label.as_ref().unwrap();
        assert_eq!(label.text, "2021");
        assert_eq!(label.x, placed.groups[2].x);
        assert_eq!(placed.item_labels.len(), 3);
        let item_label = &placed.item_labels[2];
        let bx = &placed.boxes[2];
        assert_eq!(item_label.text.x, bx.right() + config.font_margin);
        assert_eq!(item_label.text.y, bx.y + bx.height / 2.0);
    }
}
