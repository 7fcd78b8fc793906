use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RankFlowConfig, RenderConfig};

use super::normalize::{NormalizedGroup, NormalizedRanking};
use super::LayoutError;

/// Horizontal slots and vertical scale shared by every column of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpaceAllocation {
    pub group_spacing: f32,
    pub box_width: f32,
    /// Pixels per count unit.
    pub vertical_scale: f32,
    /// Height available to one column: boxes plus the margins between them.
    pub vertical_budget: f32,
    /// Bottom edge of every column.
    pub baseline_y: f32,
    /// Set when no count can drive box heights (all sums zero) and every box
    /// falls back to the minimum height.
    pub degenerate: bool,
}

fn flag(enabled: bool) -> f32 {
    if enabled { 1.0 } else { 0.0 }
}

/// True when the minimum heights and margins of `group` alone exceed `budget`.
fn floors_overflow(group: &NormalizedGroup, config: &RankFlowConfig, budget: f32) -> bool {
    let n = group.items.len();
    if n == 0 {
        return false;
    }
    let needed = n as f32 * config.min_box_height + (n - 1) as f32 * config.inter_box_margin;
    needed > budget
}

/// Largest scale at which the column still fits `budget` once the minimum
/// height floor is applied. `None` when counts never constrain the scale.
///
/// With counts sorted descending, the column height is the maximum over `k` of
/// `(n - k) * floor + s * (top k sum)`, so the bound is the tightest of the
/// per-`k` solutions. Callers check [`floors_overflow`] first.
fn floor_aware_scale(
    group: &NormalizedGroup,
    config: &RankFlowConfig,
    budget: f32,
) -> Option<f32> {
    let n = group.items.len();
    if n == 0 {
        return None;
    }
    let available = budget - (n - 1) as f32 * config.inter_box_margin;
    let mut counts: Vec<f32> = group.items.iter().map(|item| item.count).collect();
    counts.sort_by(|a, b| b.total_cmp(a));

    let floor = config.min_box_height;
    let mut best: Option<f32> = None;
    let mut top_sum = 0.0f32;
    for (k, count) in counts.iter().enumerate() {
        top_sum += count;
        if top_sum <= 0.0 {
            continue;
        }
        let floored = (n - k - 1) as f32 * floor;
        let candidate = (available - floored) / top_sum;
        best = Some(best.map_or(candidate, |current: f32| current.min(candidate)));
    }
    best
}

pub fn allocate_space(
    canvas: &RenderConfig,
    config: &RankFlowConfig,
    ranking: &NormalizedRanking,
) -> Result<SpaceAllocation, LayoutError> {
    let group_count = ranking.groups.len();
    if group_count == 0 {
        return Err(LayoutError::InvalidInput(
            "ranking dataset has no groups".to_string(),
        ));
    }

    let legend_reserve = flag(config.color_legend) * (config.legend_width + 2.0 * config.padding_x);
    let usable_width =
        canvas.width - legend_reserve - config.margin_right - 2.0 * config.padding_x;
    if usable_width <= 0.0 {
        return Err(LayoutError::InvalidConfig(format!(
            "canvas width {} leaves no room for columns",
            canvas.width
        )));
    }
    let group_spacing = usable_width / group_count as f32;
    let box_width = (group_spacing / 2.0).min(config.max_box_width);

    let label_row = config.label_row_height();
    let reserved_rows = flag(config.group_labels) + flag(config.show_values);
    let vertical_budget =
        canvas.height - 2.0 * config.padding_y - config.margin_top - reserved_rows * label_row;
    if vertical_budget <= 0.0 {
        return Err(LayoutError::InvalidConfig(format!(
            "canvas height {} leaves no room for columns",
            canvas.height
        )));
    }
    let baseline_y = canvas.height - config.padding_y - flag(config.group_labels) * label_row;

    let mut overflow = false;
    for group in &ranking.groups {
        if floors_overflow(group, config, vertical_budget) {
            warn!(
                group = %group.key,
                boxes = group.items.len(),
                vertical_budget,
                "minimum box heights and margins exceed the column budget; scale is zero"
            );
            overflow = true;
        }
    }

    let degenerate = ranking.max_sum <= 0.0;
    let vertical_scale = if degenerate {
        warn!(
            groups = group_count,
            "all counts are zero; boxes use the minimum height"
        );
        0.0
    } else if overflow {
        0.0
    } else {
        let gaps = ranking.max_rank_count.saturating_sub(1) as f32 * config.inter_box_margin;
        let mut scale = (vertical_budget - gaps) / ranking.max_sum;
        for group in &ranking.groups {
            if let Some(bound) = floor_aware_scale(group, config, vertical_budget) {
                scale = scale.min(bound);
            }
        }
        scale.max(0.0)
    };

    debug!(
        group_spacing,
        box_width,
        vertical_scale,
        vertical_budget,
        degenerate,
        "allocated rank-flow space"
    );

    Ok(SpaceAllocation {
        group_spacing,
        box_width,
        vertical_scale,
        vertical_budget,
        baseline_y,
        degenerate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankValueKey;
    use crate::ir::{RankedItem, RankingDataset};
    use crate::layout::boxes::place_boxes;
    use crate::layout::color::ColorScale;
    use crate::layout::normalize::normalize_ranking;

    fn ranking(groups: &[&[f32]]) -> NormalizedRanking {
        let mut dataset = RankingDataset::new();
        for (g, counts) in groups.iter().enumerate() {
            let items = counts
                .iter()
                .enumerate()
                .map(|(i, count)| RankedItem::new(format!("i{i}"), *count, 0.0))
                .collect();
            dataset.push_group(format!("g{g}"), items);
        }
        normalize_ranking(&dataset, 10, RankValueKey::Count).unwrap()
    }

    fn canvas(width: f32, height: f32) -> RenderConfig {
        RenderConfig { width, height }
    }

    #[test]
    fn spacing_excludes_padding_legend_and_right_margin() {
        let config = RankFlowConfig::default();
        let rank = ranking(&[&[1.0], &[1.0]]);
        let alloc = allocate_space(&canvas(800.0, 600.0), &config, &rank).unwrap();
        // 800 - (40 + 40) - (-50) - 40 = 730
        assert_eq!(alloc.group_spacing, 365.0);
        assert_eq!(alloc.box_width, 20.0);
    }

    #[test]
    fn vertical_scale_subtracts_rows_and_gaps() {
        let config = RankFlowConfig::default();
        let alloc =
            allocate_space(&canvas(800.0, 600.0), &config, &ranking(&[&[100.0, 100.0]])).unwrap();
        // 600 - 40 - 10 - 2 * (16 + 10) = 498
        assert_eq!(alloc.vertical_budget, 498.0);
        assert_eq!(alloc.vertical_scale, (498.0 - 8.0) / 200.0);
        assert_eq!(alloc.baseline_y, 600.0 - 20.0 - 26.0);
        assert!(!alloc.degenerate);
    }

    #[test]
    fn disabled_rows_return_their_space() {
        let mut config = RankFlowConfig::default();
        config.group_labels = false;
        config.show_values = false;
        config.color_legend = false;
        let alloc = allocate_space(&canvas(800.0, 600.0), &config, &ranking(&[&[10.0]])).unwrap();
        assert_eq!(alloc.vertical_budget, 550.0);
        assert_eq!(alloc.baseline_y, 580.0);
        assert_eq!(alloc.group_spacing, 800.0 + 50.0 - 40.0);
    }

    #[test]
    fn zero_sum_is_degenerate_not_nan() {
        let config = RankFlowConfig::default();
        let rank = ranking(&[&[0.0, 0.0]]);
        let alloc = allocate_space(&canvas(800.0, 600.0), &config, &rank).unwrap();
        assert!(alloc.degenerate);
        assert_eq!(alloc.vertical_scale, 0.0);
        assert!(alloc.vertical_scale.is_finite());
    }

    #[test]
    fn floors_tighten_the_scale() {
        let mut config = RankFlowConfig::default();
        config.min_box_height = 50.0;
        config.inter_box_margin = 0.0;
        config.group_labels = false;
        config.show_values = false;
        config.margin_top = 0.0;
        // budget 200 - 40 = 160 with one large and two tiny counts
        let rank = ranking(&[&[100.0, 1.0, 1.0]]);
        let alloc = allocate_space(&canvas(800.0, 200.0), &config, &rank).unwrap();
        assert_eq!(alloc.vertical_budget, 160.0);
        // two floored boxes take 100, leaving 60 for the count of 100
        assert!((alloc.vertical_scale - 0.6).abs() < 1e-6);
    }

    #[test]
    fn rejects_canvas_without_room() {
        let config = RankFlowConfig::default();
        let rank = ranking(&[&[1.0]]);
        assert!(matches!(
            allocate_space(&canvas(50.0, 600.0), &config, &rank),
            Err(LayoutError::InvalidConfig(_))
        ));
        assert!(matches!(
            allocate_space(&canvas(800.0, 60.0), &config, &rank),
            Err(LayoutError::InvalidConfig(_))
        ));
    }

    fn assert_all_floored(
        rank: &NormalizedRanking,
        config: &RankFlowConfig,
        canvas: RenderConfig,
    ) {
        let alloc = allocate_space(&canvas, config, rank).unwrap();
        assert_eq!(alloc.vertical_scale, 0.0);
        assert!(alloc.vertical_scale.is_finite());
        assert!(!alloc.degenerate);
        let scale = ColorScale::from_specs(&config.color_stops).unwrap();
        let placed = place_boxes(rank, &alloc, config, &canvas, &scale);
        assert_eq!(placed.boxes.len(), rank.item_count());
        for bx in &placed.boxes {
            assert_eq!(bx.height, config.min_box_height);
            assert!(bx.y.is_finite());
        }
    }

    #[test]
    fn overflowing_floors_win_over_the_budget() {
        let mut config = RankFlowConfig::default();
        config.min_box_height = 50.0;
        config.inter_box_margin = 0.0;
        config.group_labels = false;
        config.show_values = false;
        config.margin_top = 0.0;
        // four floors need 200 of a 160 budget
        let rank = ranking(&[&[100.0, 1.0, 1.0, 1.0], &[5.0]]);
        assert_all_floored(&rank, &config, canvas(800.0, 200.0));
    }

    #[test]
    fn margins_consuming_the_budget_clamp_scale_to_zero() {
        let mut config = RankFlowConfig::default();
        config.inter_box_margin = 100.0;
        config.group_labels = false;
        config.show_values = false;
        config.margin_top = 0.0;
        // two gaps need 200 of a 160 budget
        let rank = ranking(&[&[10.0, 5.0, 1.0]]);
        assert_all_floored(&rank, &config, canvas(800.0, 200.0));
    }
}
