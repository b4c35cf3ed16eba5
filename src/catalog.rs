//! Catalog upload
//!
//! Synchronizes one API version and its documents in dependency order:
//! API, then API version, then metadata, classification, readme and changelog.
//! The api token is threaded explicitly from one call to the next.

use crate::apimap::http::ApimapHttpClient;
use crate::apimap::rest::{self, Resource, SyncOutcome};
use crate::config::PayloadFiles;
use crate::payload;
use anyhow::Result;

pub const API_COLLECTION: &str = "api";

/// Outcome of a single synchronization step
#[derive(Debug)]
pub struct StepReport {
    pub step: &'static str,
    pub outcome: SyncOutcome,
}

/// Outcome of a whole upload
#[derive(Debug, Default)]
pub struct SyncReport {
    pub steps: Vec<StepReport>,
    /// Token used for writes under the API after the API step
    pub api_token: Option<String>,
    /// Set when the API was created in this run and the server issued a new token
    pub issued_token: Option<String>,
}

impl SyncReport {
    fn record(&mut self, step: &'static str, outcome: SyncOutcome) {
        tracing::debug!("Step {} finished: {}", step, outcome.label());
        self.steps.push(StepReport { step, outcome });
    }

    pub fn outcome(&self, step: &str) -> Option<&SyncOutcome> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.outcome)
    }

    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_failed()).count()
    }

    /// One-line summary, e.g. `api=existing version=existing metadata=updated`
    pub fn summary(&self) -> String {
        self.steps
            .iter()
            .map(|s| format!("{}={}", s.step, s.outcome.label()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Versions of an API, e.g. `api/billing-api/version`
fn version_collection(name: &str) -> String {
    format!("{}/{}/version", API_COLLECTION, urlencoding::encode(name))
}

fn version_path(name: &str, version: &str) -> String {
    format!("{}/{}", version_collection(name), urlencoding::encode(version))
}

/// Upload every payload file to the catalog.
///
/// Only payload read or parse failures are returned as errors; REST faults are
/// logged and recorded in the report.
pub async fn upload_content(
    client: &ApimapHttpClient,
    files: &PayloadFiles,
    api_token: Option<String>,
    code_repository: Option<&str>,
) -> Result<SyncReport> {
    let identity = payload::read_api_identity(&files.metadata)?;
    tracing::debug!(
        "Preparing content upload to {} using version {}",
        identity.name,
        identity.version
    );

    let mut report = SyncReport::default();

    let api = Resource::json(
        API_COLLECTION,
        urlencoding::encode(&identity.name),
        payload::api_document(&identity.name, code_repository),
    );
    tracing::debug!("Preparing api: {}", api.content.to_body());
    let outcome = rest::get_or_create(client, &api, None).await;

    report.issued_token = outcome.issued_api_token();
    let api_token = report.issued_token.clone().or(api_token);
    if let Some(token) = &report.issued_token {
        tracing::warn!(
            "Please use the following token upon any future runs of this action: {}",
            token
        );
    }
    report.record("api", outcome);

    let version = Resource::json(
        version_collection(&identity.name),
        urlencoding::encode(&identity.version),
        payload::version_document(&identity.version),
    );
    tracing::debug!("Preparing api version: {}", version.content.to_body());
    let outcome = rest::get_or_create(client, &version, api_token.as_deref()).await;
    report.record("version", outcome);

    let collection = version_path(&identity.name, &identity.version);

    let metadata = payload::read_metadata(&files.metadata)?;
    let resource = Resource::json(&collection, "metadata", payload::metadata_document(&metadata));
    tracing::debug!("Preparing metadata: {}", resource.content.to_body());
    let outcome = rest::create_or_update(client, &resource, api_token.as_deref()).await;
    report.record("metadata", outcome);

    let taxonomy = payload::read_taxonomy(&files.taxonomy)?;
    let resource = Resource::json(
        &collection,
        "classification",
        payload::classification_document(&taxonomy),
    );
    tracing::debug!("Preparing classifications: {}", resource.content.to_body());
    let outcome = rest::create_or_update(client, &resource, api_token.as_deref()).await;
    report.record("classification", outcome);

    let readme = payload::read_markdown(&files.readme, "readme")?;
    let resource = Resource::markdown(&collection, "readme", readme);
    tracing::debug!("Preparing readme ({} bytes)", resource.content.to_body().len());
    let outcome = rest::create_or_update(client, &resource, api_token.as_deref()).await;
    report.record("readme", outcome);

    let changelog = payload::read_markdown(&files.changelog, "changelog")?;
    let resource = Resource::markdown(&collection, "changelog", changelog);
    tracing::debug!("Preparing changelog ({} bytes)", resource.content.to_body().len());
    let outcome = rest::create_or_update(client, &resource, api_token.as_deref()).await;
    report.record("changelog", outcome);

    report.api_token = api_token;
    Ok(report)
}
