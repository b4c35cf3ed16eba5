//! Idempotent resource synchronization
//!
//! Both algorithms probe the resource with a GET and branch on the result:
//!
//! - [`get_or_create`] creates an absent resource and never touches an existing one
//! - [`create_or_update`] creates an absent resource and overwrites an existing one
//!
//! Neither returns an error. Transport faults are logged and surface as
//! [`SyncOutcome::Failed`], leaving the caller free to continue the run.

use super::http::{ApimapHttpClient, ApimapResponse, Content, TransportError};
use serde_json::Value;

/// JSON pointer of the api token issued in the API creation response body
const ISSUED_TOKEN_POINTER: &str = "/data/meta/token";

/// A catalog resource addressed as `{collection}/{identifier}`
#[derive(Debug, Clone)]
pub struct Resource {
    pub collection: String,
    pub identifier: String,
    pub content: Content,
}

impl Resource {
    pub fn new(collection: impl Into<String>, identifier: impl Into<String>, content: Content) -> Self {
        Self {
            collection: collection.into(),
            identifier: identifier.into(),
            content,
        }
    }

    pub fn json(collection: impl Into<String>, identifier: impl Into<String>, content: Value) -> Self {
        Self::new(collection, identifier, Content::Json(content))
    }

    pub fn markdown(collection: impl Into<String>, identifier: impl Into<String>, text: String) -> Self {
        Self::new(collection, identifier, Content::Markdown(text))
    }

    /// Full path of this resource
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection.trim_end_matches('/'), self.identifier)
    }
}

/// Result of synchronizing one resource
#[derive(Debug)]
pub enum SyncOutcome {
    /// Resource already present, nothing written
    Existing(ApimapResponse),
    /// Resource was absent and a POST was issued
    Created(ApimapResponse),
    /// Resource was present (or its state unknown) and a PUT was issued
    Updated(ApimapResponse),
    /// A transport fault stopped this resource; already logged
    Failed(TransportError),
}

impl SyncOutcome {
    pub fn response(&self) -> Option<&ApimapResponse> {
        match self {
            Self::Existing(r) | Self::Created(r) | Self::Updated(r) => Some(r),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Existing(_) => "existing",
            Self::Created(r) | Self::Updated(r) if r.is_not_found() => "not-found",
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Failed(_) => "failed",
        }
    }

    /// Api token handed out by the server when an API is first created
    pub fn issued_api_token(&self) -> Option<String> {
        self.response()?
            .json()?
            .pointer(ISSUED_TOKEN_POINTER)?
            .as_str()
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    }
}

/// A write answered with 404 is accepted by the transport but stored nothing
fn note_write(method: &str, target: &str, response: &ApimapResponse) {
    if response.is_not_found() {
        tracing::debug!("{} {} answered 404, nothing was stored", method, target);
    }
}

fn log_fault(action: &str, target: &str, err: &TransportError) {
    match err.hint() {
        Some(hint) => tracing::error!("Unable to {} {}, with error: {} ({})", action, target, err, hint),
        None => tracing::error!("Unable to {} {}, with error: {}", action, target, err),
    }
}

/// Get the resource, creating it with a POST to its collection if absent.
///
/// An existing resource is returned unchanged. A fault during the probe ends
/// the sync for this resource.
pub async fn get_or_create(
    client: &ApimapHttpClient,
    resource: &Resource,
    api_token: Option<&str>,
) -> SyncOutcome {
    let path = resource.path();
    tracing::debug!("Requesting resource at endpoint: {}", path);

    let probe = match client.get(&path, resource.content.content_type()).await {
        Ok(response) => response,
        Err(err) => {
            log_fault("get", &path, &err);
            return SyncOutcome::Failed(err);
        }
    };

    if !probe.is_not_found() {
        return SyncOutcome::Existing(probe);
    }

    tracing::debug!("Creating resource at endpoint: {}", resource.collection);
    match client.post(&resource.collection, &resource.content, api_token).await {
        Ok(response) => {
            note_write("POST", &resource.collection, &response);
            SyncOutcome::Created(response)
        }
        Err(err) => {
            log_fault("create", &path, &err);
            SyncOutcome::Failed(err)
        }
    }
}

/// Create the resource with a POST if absent, otherwise overwrite it with a PUT.
///
/// A fault during the probe does not stop the write: the resource is treated
/// as present and updated.
pub async fn create_or_update(
    client: &ApimapHttpClient,
    resource: &Resource,
    api_token: Option<&str>,
) -> SyncOutcome {
    let path = resource.path();
    tracing::debug!("Requesting resource at endpoint: {}", path);

    let absent = match client.get(&path, resource.content.content_type()).await {
        Ok(probe) => probe.is_not_found(),
        Err(err) => {
            log_fault("get", &path, &err);
            false
        }
    };

    if absent {
        tracing::debug!("Creating resource at endpoint: {}", path);
        match client.post(&path, &resource.content, api_token).await {
            Ok(response) => {
                note_write("POST", &path, &response);
                SyncOutcome::Created(response)
            }
            Err(err) => {
                log_fault("create", &path, &err);
                SyncOutcome::Failed(err)
            }
        }
    } else {
        tracing::debug!("Updating resource at endpoint: {}", path);
        match client.put(&path, &resource.content, api_token).await {
            Ok(response) => {
                note_write("PUT", &path, &response);
                SyncOutcome::Updated(response)
            }
            Err(err) => {
                log_fault("update", &path, &err);
                SyncOutcome::Failed(err)
            }
        }
    }
}
