use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use changelog_validate::{
    AsyncHttpClient, Cli, Config, ConfigManager, Output, Pipeline, ValidationInput,
    VerbosityLevel,
};

const EXIT_INVALID: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn init_tracing(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default = match verbosity {
            VerbosityLevel::Verbose | VerbosityLevel::Debug => "changelog_validate=debug",
            _ => "warn",
        };
        EnvFilter::new(default)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .init();
}

async fn prepare(cli: &Cli) -> anyhow::Result<(Config, Vec<ValidationInput>, AsyncHttpClient)> {
    let config = ConfigManager::load_config(cli)
        .await
        .context("Failed to load configuration")?;
    let inputs = ConfigManager::resolve_inputs(&config, cli)?;
    tracing::debug!(
        targets = config.targets.len(),
        inputs = inputs.len(),
        timeout_seconds = ?config.network.timeout_seconds,
        "configuration loaded"
    );
    let client = AsyncHttpClient::new(config.http_client_config())
        .context("Failed to build HTTP client")?;
    Ok((config, inputs, client))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return ExitCode::from(EXIT_USAGE);
    }

    // Log filtering follows RUST_LOG or the command line; config-file verbosity only
    // affects the transcript
    init_tracing(cli.verbosity().unwrap_or_default());

    let (config, inputs, client) = match prepare(&cli).await {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let pipeline = Pipeline::new(Arc::new(client), Output::new(config.verbosity()));
    match pipeline.run_inputs(&inputs).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(category = err.category(), "validation failed");
            pipeline.output().fatal(&err);
            ExitCode::from(EXIT_INVALID)
        }
    }
}
