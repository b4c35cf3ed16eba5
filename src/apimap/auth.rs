//! Apimap Authentication
//!
//! Converts a federated identity token (the GitHub Actions OIDC token) into a
//! disposable Apimap bearer token via the orchestra OAuth endpoint.

use super::http::ApimapHttpClient;
use serde::Deserialize;

/// Issuer of the identity tokens accepted by the federation endpoint
pub const GITHUB_OIDC_ISSUER: &str = "https://token.actions.githubusercontent.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Path of the federated token exchange for `issuer`
pub fn federation_path(issuer: &str) -> String {
    format!("oauth2/{}/token", urlencoding::encode(issuer))
}

/// Exchange an identity token for an Apimap bearer token.
///
/// Failures are logged as warnings and yield `None`; the run then continues
/// unauthenticated.
pub async fn exchange_identity(identity_token: &str, orchestra_endpoint: &str) -> Option<String> {
    tracing::debug!("Send token request to Apimap instance");

    let client = match ApimapHttpClient::new(orchestra_endpoint, Some(identity_token)) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Unable to exchange identity token: {}", e);
            return None;
        }
    };

    let response = match client
        .get(&federation_path(GITHUB_OIDC_ISSUER), super::http::JSON_CONTENT_TYPE)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Unable to exchange identity token: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<TokenResponse>(&response.body) {
        Ok(TokenResponse { access_token: Some(token) }) if !token.is_empty() => Some(token),
        Ok(_) => {
            tracing::warn!(
                "Token exchange returned http status {} without an access token",
                response.status.as_u16()
            );
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse token exchange response: {}", e);
            None
        }
    }
}
