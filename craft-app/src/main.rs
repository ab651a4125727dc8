use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::Printer;
use craft_common::observability::init_logging;
use craft_config::{CraftConfig, CraftConfigLoader};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over files)
    let loader = match &cli.config {
        Some(path) => CraftConfigLoader::new().with_file(path),
        None => CraftConfigLoader::new().with_default_file(),
    };
    let cfg: CraftConfig = loader.load().context("failed to load configuration")?;

    // 2) Logging from the `logging` section, `--verbose` lowers the default filter
    let mut log_config = cfg.logging.log_config("craft");
    if cli.verbose {
        log_config.default_filter = "debug".to_string();
    }
    if let Some(path) = init_logging(log_config)? {
        tracing::debug!(target: "craft", path=%path.display(), "craft.log_file");
    }

    let printer = Printer::new(cli.format.unwrap_or(cfg.output));
    commands::run(cli.command, &cfg, printer).await
}
