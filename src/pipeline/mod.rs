//! Host pipeline runtime
//!
//! Thin layer over the GitHub Actions runner protocol: workflow commands
//! written to stdout, the OIDC id-token endpoint, and the event payload.
//!
//! - [`context`] - Workflow event context (repository URL)
//! - [`oidc`] - Federated identity token request

pub mod context;
pub mod oidc;

use std::fmt::Display;

/// Escape a workflow command message
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render a workflow command line, e.g. `::warning::message`
pub fn command(name: &str, message: &str) -> String {
    format!("::{}::{}", name, escape_data(message))
}

/// Ask the runner to mask `secret` in all subsequent log output
pub fn set_secret(secret: &str) {
    if secret.is_empty() {
        return;
    }
    println!("{}", command("add-mask", secret));
}

/// Report the run as failed with `error` as the annotation
pub fn set_failed(error: &impl Display) {
    println!("{}", command("error", &error.to_string()));
}
