use std::io;

use anyhow::Result;
use clap::Parser;

use tax_cli::app::{App, load_config};
use tax_cli::cli::Cli;
use tax_cli::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = load_config(cli.config.as_deref())?;
    if cli.log_level.is_none()
        && !logging::env_filter_is_set()
        && let Some(level) = &config.log_level
    {
        logging::set_log_level(level)?;
    }
    if cli.log_file.is_none()
        && let Some(path) = &config.log_file
    {
        logging::enable_file_logging(path)?;
    }

    tracing::debug!(command = ?cli.command, "starting");
    let app = App::new(config);
    app.run(
        cli.command,
        io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
    )
}
