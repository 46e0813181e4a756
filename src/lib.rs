pub mod config;
pub mod error;
pub mod layout;
pub mod noise;
pub mod output;
pub mod palette;
pub mod perf;
pub mod render;
pub mod viz;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::layout::ChartLayout;

/// Loads the performance log, lays out the chart and saves or shows it.
///
/// Returns the written image path, or `None` when the combined chart is not
/// produced because learn and adapt phases are charted separately.
pub fn run(cfg: &Config) -> Result<Option<PathBuf>> {
    if cfg.separate_learn_adapt {
        info!("learn/adapt phases are charted separately; skipping combined chart");
        return Ok(None);
    }

    let input = cfg.input_path();
    info!(path = %input.display(), "loading performance log");
    let log = perf::load(&input)?;
    log.require(&noise::required_columns(cfg.graph_style, cfg.injection_kind))
        .with_context(|| {
            format!(
                "{} cannot be charted in {:?} style for {} runs",
                input.display(),
                cfg.graph_style,
                cfg.injection_kind.as_str()
            )
        })?;
    info!(
        rows = log.len(),
        min_turn = log.min_turn(),
        kind = cfg.injection_kind.as_str(),
        style = ?cfg.graph_style,
        "performance log loaded"
    );

    let layout = ChartLayout::build(&log, &cfg.chart_options());
    info!("{}", viz::digest(&layout));

    if cfg.summary {
        let _ = viz::print_table(&log, cfg.injection_kind, cfg.injection_step);
    }

    let caption = cfg.caption_text();
    let path = output::save_or_show(&cfg.output_target(), &layout, caption.as_deref())?;
    Ok(Some(path))
}
