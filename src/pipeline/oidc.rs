//! Federated identity token
//!
//! Requests a GitHub Actions OIDC token for a given audience from the
//! runner-provided id-token endpoint.

use super::set_secret;
use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

pub const REQUEST_URL_ENV: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";
pub const REQUEST_TOKEN_ENV: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";

#[derive(Debug, Deserialize)]
struct IdTokenResponse {
    value: Option<String>,
}

/// Request an id token using the runner environment
pub async fn request_id_token(audience: &str) -> Result<String> {
    let request_url = std::env::var(REQUEST_URL_ENV)
        .with_context(|| format!("Unable to get {} env variable", REQUEST_URL_ENV))?;
    let request_token = std::env::var(REQUEST_TOKEN_ENV)
        .with_context(|| format!("Unable to get {} env variable", REQUEST_TOKEN_ENV))?;

    fetch_id_token(&request_url, &request_token, audience).await
}

/// Request an id token from an explicit endpoint
pub async fn fetch_id_token(request_url: &str, request_token: &str, audience: &str) -> Result<String> {
    let mut url = Url::parse(request_url).context("Invalid id token request URL")?;
    if !audience.is_empty() {
        url.query_pairs_mut().append_pair("audience", audience);
    }
    tracing::debug!("ID token url is {}", url);

    let response = reqwest::Client::new()
        .get(url)
        .bearer_auth(request_token)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .context("Failed to send id token request")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Failed to get ID Token. Error Code : {}", status.as_u16());
    }

    let id_token = response
        .json::<IdTokenResponse>()
        .await
        .context("Failed to parse id token response")?
        .value
        .filter(|value| !value.is_empty())
        .context("Response json body do not have ID Token field")?;

    set_secret(&id_token);
    Ok(id_token)
}
