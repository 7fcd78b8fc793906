#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ColorStopSpec, Config, RankFlowConfig, RankValueKey, RenderConfig, load_config};
pub use ir::{GroupKey, RankedItem, RankingDataset};
pub use layout::{
    Color, ColorScale, FlowLink, HighlightPolicy, HighlightState, LayoutError, PositionedBox,
    RankFlowLayout, RankFlowSession, compute_layout,
};
pub use layout_dump::LayoutDump;
pub use theme::Theme;

/// Lays out a JSON ranking with a JSON/JSON5 options document and returns the
/// layout dump as JSON, with the highlight state for `focus` when given.
pub fn layout_json(
    ranking_json: &str,
    options: Option<&str>,
    focus: Option<&str>,
) -> anyhow::Result<String> {
    let config = match options {
        Some(options) => config::parse_config(options)?,
        None => Config::default(),
    };
    let dataset = RankingDataset::from_json(ranking_json)?;
    let session = RankFlowSession::with_theme(config.layout, config.theme)?;
    let layout = session.layout(&dataset, config.render)?;
    let highlight = focus.map(|id| session.highlight_policy().focus(&layout, id));
    LayoutDump::from_layout(&layout, highlight).to_json()
}
