//! Local payload files
//!
//! Reads the metadata, taxonomy, readme and changelog files and builds the
//! documents sent to the catalog. Any read or parse failure is fatal to the run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Taxonomy version attached to every classification
pub const TAXONOMY_VERSION: &str = "1";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// API name and version from the metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiIdentity {
    pub name: String,
    pub version: String,
}

/// Descriptive metadata of an API version.
///
/// Fields missing from the file are left out of the uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Value>,
    #[serde(rename = "api version")]
    pub api_version: String,
    #[serde(rename = "release status", default, skip_serializing_if = "Option::is_none")]
    pub release_status: Option<Value>,
    #[serde(rename = "interface specification", default, skip_serializing_if = "Option::is_none")]
    pub interface_specification: Option<Value>,
    #[serde(
        rename = "interface description language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub interface_description_language: Option<Value>,
    #[serde(rename = "architecture layer", default, skip_serializing_if = "Option::is_none")]
    pub architecture_layer: Option<Value>,
    #[serde(rename = "business unit", default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<Value>,
    #[serde(rename = "system identifier", default, skip_serializing_if = "Option::is_none")]
    pub system_identifier: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Value>,
}

impl ApiMetadata {
    pub fn identity(&self) -> ApiIdentity {
        ApiIdentity {
            name: self.name.clone(),
            version: self.api_version.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Taxonomy {
    pub classifications: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ClassificationAttributes<'a> {
    urn: &'a str,
    #[serde(rename = "taxonomyVersion")]
    taxonomy_version: &'static str,
}

fn read_file(path: &Path, kind: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {} file {:?}", kind, path))
}

fn parse_envelope<T: serde::de::DeserializeOwned>(content: &str, path: &Path, kind: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse {} file {:?}", kind, path))?;
    Ok(envelope.data)
}

pub fn read_metadata(path: &Path) -> Result<ApiMetadata> {
    let content = read_file(path, "metadata")?;
    parse_envelope(&content, path, "metadata")
}

/// Resolve the API name and version from the metadata file
pub fn read_api_identity(path: &Path) -> Result<ApiIdentity> {
    let identity = read_metadata(path)?.identity();
    anyhow::ensure!(!identity.name.is_empty(), "Metadata file {:?} has an empty name", path);
    anyhow::ensure!(
        !identity.version.is_empty(),
        "Metadata file {:?} has an empty api version",
        path
    );

    tracing::debug!(
        "Reading configuration [apiName: {}, apiVersion: {}]",
        identity.name,
        identity.version
    );
    Ok(identity)
}

pub fn read_taxonomy(path: &Path) -> Result<Taxonomy> {
    let content = read_file(path, "taxonomy")?;
    parse_envelope(&content, path, "taxonomy")
}

pub fn read_markdown(path: &Path, kind: &str) -> Result<String> {
    read_file(path, kind)
}

/// Document creating the top-level API entity
pub fn api_document(name: &str, code_repository: Option<&str>) -> Value {
    let mut attributes = json!({ "name": name });
    if let Some(repository) = code_repository {
        attributes["codeRepository"] = Value::String(repository.to_string());
    }
    json!({ "data": { "attributes": attributes } })
}

pub fn version_document(version: &str) -> Value {
    json!({ "data": { "attributes": { "version": version } } })
}

pub fn metadata_document(metadata: &ApiMetadata) -> Value {
    json!({ "data": { "attributes": metadata } })
}

pub fn classification_document(taxonomy: &Taxonomy) -> Value {
    let data: Vec<Value> = taxonomy
        .classifications
        .iter()
        .map(|urn| {
            let attributes = ClassificationAttributes {
                urn: urn.as_str(),
                taxonomy_version: TAXONOMY_VERSION,
            };
            json!({ "attributes": attributes })
        })
        .collect();

    json!({ "data": data })
}
