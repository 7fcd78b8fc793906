use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Group identifier as it appears on a ranked item. Datasets exported from
/// spreadsheets tend to mix numeric years with text periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Number(f64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(val) => write!(f, "{}", val),
            GroupKey::Text(val) => f.write_str(val),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    #[serde(alias = "hashtag")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupKey>,
    pub count: f32,
    #[serde(default)]
    pub value: f32,
}

impl RankedItem {
    pub fn new(id: impl Into<String>, count: f32, value: f32) -> Self {
        Self {
            id: id.into(),
            group: None,
            count,
            value,
        }
    }
}

/// Ordered mapping from group label to its ranked items. Insertion order is the
/// left-to-right column order of the diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingDataset {
    groups: IndexMap<String, Vec<RankedItem>>,
}

impl RankingDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends items to `key`, creating the group at the end of the sequence if
    /// it does not exist yet.
    pub fn push_group(&mut self, key: impl Into<String>, items: Vec<RankedItem>) {
        self.groups.entry(key.into()).or_default().extend(items);
    }

    pub fn push_item(&mut self, key: &str, item: RankedItem) {
        if let Some(items) = self.groups.get_mut(key) {
            items.push(item);
        } else {
            self.groups.insert(key.to_string(), vec![item]);
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[RankedItem])> {
        self.groups
            .iter()
            .map(|(key, items)| (key.as_str(), items.as_slice()))
    }

    pub fn group(&self, key: &str) -> Option<&[RankedItem]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

impl FromIterator<(String, Vec<RankedItem>)> for RankingDataset {
    fn from_iter<T: IntoIterator<Item = (String, Vec<RankedItem>)>>(iter: T) -> Self {
        let mut dataset = Self::new();
        for (key, items) in iter {
            dataset.push_group(key, items);
        }
        dataset
    }
}

pub fn load_dataset(path: &Path) -> anyhow::Result<RankingDataset> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    RankingDataset::from_json(&contents)
        .with_context(|| format!("failed to parse ranking data in {}", path.display()))
}
