use altrouter::cli::run_cli;
use altrouter::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    // Command output owns stdout; diagnostics go to stderr.
    let mut log_config = LogConfig::from_env();
    log_config.stderr = true;
    let _guard = init_logging(&log_config)?;

    run_cli()
}
