use std::cmp::Ordering;

use crate::config::RankValueKey;
use crate::ir::{RankedItem, RankingDataset};

use super::LayoutError;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGroup {
    pub key: String,
    /// Top-N items, highest rank first.
    pub items: Vec<RankedItem>,
    pub sum: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRanking {
    pub groups: Vec<NormalizedGroup>,
    pub max_sum: f32,
    pub max_rank_count: usize,
}

impl NormalizedRanking {
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }
}

fn validate_item(group: &str, item: &RankedItem) -> Result<(), LayoutError> {
    if !item.count.is_finite() || item.count < 0.0 {
        return Err(LayoutError::InvalidInput(format!(
            "item \"{}\" in group \"{group}\" has invalid count {}",
            item.id, item.count
        )));
    }
    if !item.value.is_finite() {
        return Err(LayoutError::InvalidInput(format!(
            "item \"{}\" in group \"{group}\" has non-finite value",
            item.id
        )));
    }
    Ok(())
}

fn rank_metric(item: &RankedItem, key: RankValueKey) -> f32 {
    match key {
        RankValueKey::Count => item.count,
        RankValueKey::Value => item.value,
    }
}

/// Keeps the `top_n` items of every group, ordered by `key` descending. Ties
/// keep their input order.
pub fn normalize_ranking(
    dataset: &RankingDataset,
    top_n: usize,
    key: RankValueKey,
) -> Result<NormalizedRanking, LayoutError> {
    if top_n == 0 {
        return Err(LayoutError::InvalidInput(
            "topN must be greater than zero".to_string(),
        ));
    }
    if dataset.is_empty() {
        return Err(LayoutError::InvalidInput(
            "ranking dataset has no groups".to_string(),
        ));
    }
    for (group, items) in dataset.groups() {
        for item in items {
            validate_item(group, item)?;
        }
    }

    let mut groups = Vec::with_capacity(dataset.len());
    let mut max_sum = 0.0f32;
    let mut max_rank_count = 0usize;
    for (group, items) in dataset.groups() {
        let mut ranked: Vec<RankedItem> = items.to_vec();
        ranked.sort_by(|a, b| {
            rank_metric(b, key)
                .partial_cmp(&rank_metric(a, key))
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(top_n);
        let sum: f32 = ranked.iter().map(|item| item.count).sum();
        max_sum = max_sum.max(sum);
        max_rank_count = max_rank_count.max(ranked.len());
        groups.push(NormalizedGroup {
            key: group.to_string(),
            items: ranked,
            sum,
        });
    }

    Ok(NormalizedRanking {
        groups,
        max_sum,
        max_rank_count,
    })
}
