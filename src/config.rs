//! Configuration Management
//!
//! Action inputs arrive either as command line options or as the
//! `INPUT_<NAME>` environment variables set by the runner.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Args;
use std::path::PathBuf;
use url::Url;

/// Inputs of the action
#[derive(Args, Debug, Clone)]
pub struct Inputs {
    /// Audience requested for the federated identity token
    #[arg(long, env = "INPUT_AUDIENCE")]
    pub audience: String,

    /// Apimap orchestra endpoint used for the token exchange
    #[arg(long, env = "INPUT_ORCHESTRA")]
    pub orchestra: String,

    /// Apimap API endpoint
    #[arg(long, env = "INPUT_API")]
    pub api: String,

    /// Api token from a previous run, required once the API exists
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to the metadata JSON file
    #[arg(long, env = "INPUT_METADATA")]
    pub metadata: String,

    /// Path to the readme markdown file
    #[arg(long, env = "INPUT_README")]
    pub readme: String,

    /// Path to the taxonomy JSON file
    #[arg(long, env = "INPUT_TAXONOMY")]
    pub taxonomy: String,

    /// Path to the changelog markdown file
    #[arg(long, env = "INPUT_CHANGELOG")]
    pub changelog: String,
}

/// Files uploaded to an API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFiles {
    pub metadata: PathBuf,
    pub readme: PathBuf,
    pub taxonomy: PathBuf,
    pub changelog: PathBuf,
}

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub audience: String,
    pub orchestra: String,
    pub api: String,
    pub api_token: Option<String>,
    pub files: PayloadFiles,
}

fn filepath(key: &str, value: &str) -> Result<PathBuf> {
    tracing::debug!("Read filepath from key {}", key);
    let trimmed = value.trim();
    anyhow::ensure!(!trimmed.is_empty(), "Input required and not supplied: {}", key);
    Ok(PathBuf::from(trimmed))
}

fn endpoint(key: &str, value: &str) -> Result<String> {
    anyhow::ensure!(!value.trim().is_empty(), "Input required and not supplied: {}", key);
    Url::parse(value.trim()).with_context(|| format!("Input {} is not a valid URL: {}", key, value))?;
    Ok(value.trim().to_string())
}

/// Message to report for an argument parsing failure, `None` when clap only
/// displayed help or version output
pub fn usage_failure(err: &clap::Error) -> Option<String> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => Some(err.to_string().trim_end().to_string()),
    }
}

impl Config {
    pub fn resolve(inputs: Inputs) -> Result<Self> {
        anyhow::ensure!(!inputs.audience.is_empty(), "Input required and not supplied: audience");

        let orchestra = endpoint("orchestra", &inputs.orchestra)?;
        let api = endpoint("api", &inputs.api)?;
        let api_token = inputs.token.filter(|token| !token.trim().is_empty());

        let files = PayloadFiles {
            metadata: filepath("metadata", &inputs.metadata)?,
            readme: filepath("readme", &inputs.readme)?,
            taxonomy: filepath("taxonomy", &inputs.taxonomy)?,
            changelog: filepath("changelog", &inputs.changelog)?,
        };

        tracing::debug!(
            "Reading configuration [audience: {}, orchestra: {}, api: {}, apiToken: {}]",
            inputs.audience,
            orchestra,
            api,
            if api_token.is_some() { "***" } else { "" }
        );

        Ok(Self {
            audience: inputs.audience,
            orchestra,
            api,
            api_token,
            files,
        })
    }
}
