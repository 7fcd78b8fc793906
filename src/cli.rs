use crate::config::load_config;
use crate::ir::{RankingDataset, load_dataset};
use crate::layout::RankFlowSession;
use crate::layout_dump::write_layout_dump;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rankflow", version, about = "Rank-flow diagram layout engine")]
pub struct Args {
    /// Ranking JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout JSON. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Options file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width; overrides the options file
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height; overrides the options file
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Include the highlight state for this item id in the output
    #[arg(long = "focus")]
    pub focus: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second initialisation (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let dataset = read_dataset(args.input.as_deref())?;

    let session = RankFlowSession::with_theme(config.layout, config.theme)?;
    let layout = session.layout(&dataset, config.render)?;
    let highlight = args.focus.as_deref().map(|id| {
        let mut policy = session.highlight_policy();
        policy.focus(&layout, id)
    });

    write_layout_dump(args.output.as_deref(), &layout, highlight)
}

fn read_dataset(path: Option<&Path>) -> Result<RankingDataset> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return load_dataset(path);
        }
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read ranking data from stdin")?;
    RankingDataset::from_json(&buf).context("failed to parse ranking data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_flags() {
        let args = Args::try_parse_from([
            "rankflow",
            "-i",
            "data.json",
            "--configFile",
            "opts.json5",
            "-w",
            "1024",
            "-H",
            "480",
            "--focus",
            "rust",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("data.json")));
        assert_eq!(args.config.as_deref(), Some(Path::new("opts.json5")));
        assert_eq!(args.width, Some(1024.0));
        assert_eq!(args.height, Some(480.0));
        assert_eq!(args.focus.as_deref(), Some("rust"));
        assert!(args.output.is_none());
    }

    #[test]
    fn read_dataset_reports_missing_file() {
        let err = read_dataset(Some(Path::new("definitely/missing/ranking.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
