use anyhow::{Context, Result};
use apimap_sync::apimap::{auth, http::ApimapHttpClient};
use apimap_sync::config::{self, Config, Inputs};
use apimap_sync::logging::{self, LogLevel};
use apimap_sync::{catalog, pipeline};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Publish API documentation to an Apimap catalog
#[derive(Parser, Debug)]
#[command(name = "apimap-sync", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    inputs: Inputs,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "debug", env = "APIMAP_LOG_LEVEL")]
    log_level: LogLevel,

    /// Also write logs to this file
    #[arg(long, env = "APIMAP_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match config::usage_failure(&err) {
            Some(message) => {
                pipeline::set_failed(&message);
                return ExitCode::FAILURE;
            }
            None => err.exit(),
        },
    };

    let _log_guard = logging::init(args.log_level, args.log_file.as_deref());

    match run(args.inputs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            pipeline::set_failed(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(inputs: Inputs) -> Result<()> {
    let config = Config::resolve(inputs)?;
    if let Some(token) = &config.api_token {
        pipeline::set_secret(token);
    }

    let id_token = pipeline::oidc::request_id_token(&config.audience).await?;
    let bearer_token = auth::exchange_identity(&id_token, &config.orchestra).await;
    match &bearer_token {
        Some(token) => pipeline::set_secret(token),
        None => tracing::warn!("Continuing without an Apimap bearer token"),
    }

    let client = ApimapHttpClient::new(&config.api, bearer_token.as_deref())
        .context("Failed to create HTTP client")?;
    let code_repository = pipeline::context::code_repository();

    let report = catalog::upload_content(
        &client,
        &config.files,
        config.api_token.clone(),
        code_repository.as_deref(),
    )
    .await?;

    tracing::info!("Apimap sync finished: {}", report.summary());
    if report.failures() > 0 {
        tracing::warn!("{} of {} resources could not be synchronized", report.failures(), report.steps.len());
    }

    Ok(())
}
