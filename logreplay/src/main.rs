mod cli;
mod render;
mod run;

use clap::Parser;
use cli::Cli;
use logreplay_core::logging::{self, LogMode, init_logging};

fn main() {
    let cli = Cli::parse();

    let mode = if cli.json_logs {
        LogMode::Json
    } else if cli.pretty_logs {
        LogMode::Pretty
    } else {
        logging::default_log_mode()
    };
    init_logging(mode);

    let result = cli.load_config().and_then(|config| run::run_replay(&cli, &config));

    if let Err(e) = result {
        tracing::error!(error = %e, "replay failed");
        eprintln!("logreplay: {e:#}");
        std::process::exit(1);
    }
}
