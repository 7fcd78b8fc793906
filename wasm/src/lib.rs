use rankflow_rs::config::parse_config;
use rankflow_rs::{LayoutDump, RankFlowSession, RankingDataset};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankFlowCallOptions {
    focus: Option<String>,
}

fn layout_for_container(
    ranking_json: &str,
    options_json: Option<&str>,
    width: f32,
    height: f32,
) -> anyhow::Result<String> {
    let mut config = match options_json {
        Some(raw) => parse_config(raw)?,
        None => Default::default(),
    };
    config.render.width = width;
    config.render.height = height;
    let call: RankFlowCallOptions = match options_json {
        Some(raw) => json5::from_str(raw)?,
        None => RankFlowCallOptions::default(),
    };

    let dataset = RankingDataset::from_json(ranking_json)?;
    let session = RankFlowSession::with_theme(config.layout, config.theme)?;
    let layout = session.layout(&dataset, config.render)?;
    let highlight = call
        .focus
        .as_deref()
        .map(|id| session.highlight_policy().focus(&layout, id));
    LayoutDump::from_layout(&layout, highlight).to_json()
}

/// Computes the rank-flow layout for a container of `width` x `height` pixels
/// and returns it as JSON for a JavaScript renderer.
#[wasm_bindgen]
pub fn rankflow_layout(
    ranking_json: &str,
    options_json: Option<String>,
    width: f32,
    height: f32,
) -> Result<String, JsValue> {
    layout_for_container(ranking_json, options_json.as_deref(), width, height)
        .map_err(|error| JsValue::from_str(&format!("{error:#}")))
}
