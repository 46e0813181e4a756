use anyhow::Result;
use tracing::debug;

use fpfn_chart::config;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = config::from_env_or_args();
    debug!(?cfg, "configuration resolved");

    fpfn_chart::run(&cfg)?;
    Ok(())
}
