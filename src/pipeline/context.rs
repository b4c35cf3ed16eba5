//! Workflow event context

use serde_json::Value;
use std::path::Path;

pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";
pub const SERVER_URL_ENV: &str = "GITHUB_SERVER_URL";
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

/// URL of the repository that triggered the workflow, if known
pub fn code_repository() -> Option<String> {
    let event_path = std::env::var(EVENT_PATH_ENV).ok();
    let server_url = std::env::var(SERVER_URL_ENV).ok();
    let repository = std::env::var(REPOSITORY_ENV).ok();

    code_repository_from(
        event_path.as_deref().map(Path::new),
        server_url.as_deref(),
        repository.as_deref(),
    )
}

/// Resolve the repository URL from the event payload, falling back to
/// `{server_url}/{repository}`
pub fn code_repository_from(
    event_path: Option<&Path>,
    server_url: Option<&str>,
    repository: Option<&str>,
) -> Option<String> {
    if let Some(path) = event_path {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(payload) => {
                    if let Some(url) = payload.pointer("/repository/url").and_then(Value::as_str) {
                        return Some(url.to_string());
                    }
                }
                Err(e) => tracing::debug!("Ignoring unparseable event payload: {}", e),
            },
            Err(e) => tracing::debug!("Unable to read event payload {:?}: {}", path, e),
        }
    }

    match (server_url, repository) {
        (Some(server), Some(repo)) if !server.is_empty() && !repo.is_empty() => {
            Some(format!("{}/{}", server.trim_end_matches('/'), repo))
        }
        _ => None,
    }
}
