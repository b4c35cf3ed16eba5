//! HTTP transport for Apimap REST calls
//!
//! Every request goes through [`ApimapHttpClient`], which is bound to one base
//! endpoint and an optional bearer token. A `404 Not Found` is handed back as
//! a regular response so callers can treat it as "absent".

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Header carrying the per-API write token issued on first API creation
pub const API_TOKEN_HEADER: &str = "Apimap-Api-Token";

const USER_AGENT: &str = concat!("apimap-sync/", env!("CARGO_PKG_VERSION"));

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl TransportError {
    /// Status code of the rejected response, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus(status, _) => Some(*status),
            Self::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// Short operator-facing hint for common failure statuses
    pub fn hint(&self) -> Option<&'static str> {
        let status = self.status()?;
        match status.as_u16() {
            401 => Some("Authentication failed. Check the audience and orchestra endpoint used for the token exchange."),
            403 => Some("Permission denied. The Apimap-Api-Token may be missing or belong to another API."),
            409 => Some("Resource conflict. The resource may already exist under another owner."),
            429 => Some("Rate limit exceeded. Please try again later."),
            500..=599 => Some("Apimap service temporarily unavailable. Please try again."),
            _ => None,
        }
    }
}

/// Payload of a write request, serialized according to its content type
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Json(Value),
    Markdown(String),
}

impl Content {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => JSON_CONTENT_TYPE,
            Self::Markdown(_) => MARKDOWN_CONTENT_TYPE,
        }
    }

    pub fn to_body(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Markdown(text) => text.clone(),
        }
    }
}

/// Accepted response: any 2xx status or 404
#[derive(Debug, Clone)]
pub struct ApimapResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApimapResponse {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// Parse the body as JSON, `None` for empty or non-JSON bodies
    pub fn json(&self) -> Option<Value> {
        if self.body.is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }
}

/// HTTP client bound to one Apimap endpoint
#[derive(Debug, Clone)]
pub struct ApimapHttpClient {
    client: Client,
    base: Url,
}

impl ApimapHttpClient {
    /// Create a client for `endpoint`, attaching `Authorization: Bearer` when a token is given
    pub fn new(endpoint: &str, bearer_token: Option<&str>) -> Result<Self, TransportError> {
        tracing::debug!("Create HTTP client for {}", endpoint);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if let Some(token) = bearer_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            base: Url::parse(endpoint)?,
        })
    }

    /// Resolve a relative resource path against the base endpoint
    pub fn url(&self, path: &str) -> Result<Url, TransportError> {
        let mut full = self.base.as_str().trim_end_matches('/').to_string();
        let path = path.trim_start_matches('/');
        if !path.is_empty() {
            full.push('/');
            full.push_str(path);
        }
        Ok(Url::parse(&full)?)
    }

    /// GET a resource, overriding the default `Accept` header
    pub async fn get(&self, path: &str, accept: &str) -> Result<ApimapResponse, TransportError> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);

        let request = self.client.get(url).header(ACCEPT, accept);
        Self::send(request).await
    }

    /// POST `content` to a resource path
    pub async fn post(
        &self,
        path: &str,
        content: &Content,
        api_token: Option<&str>,
    ) -> Result<ApimapResponse, TransportError> {
        self.write(Method::POST, path, content, api_token).await
    }

    /// PUT `content` to a resource path
    pub async fn put(
        &self,
        path: &str,
        content: &Content,
        api_token: Option<&str>,
    ) -> Result<ApimapResponse, TransportError> {
        self.write(Method::PUT, path, content, api_token).await
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        content: &Content,
        api_token: Option<&str>,
    ) -> Result<ApimapResponse, TransportError> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, content.content_type())
            .body(content.to_body());

        if let Some(token) = api_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            request = request.header(API_TOKEN_HEADER, value);
        }

        Self::send(request).await
    }

    async fn send(request: RequestBuilder) -> Result<ApimapResponse, TransportError> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Received http status: {}", status.as_u16());

        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(ApimapResponse { status, body })
        } else {
            Err(TransportError::HttpStatus(status, sanitize_for_log(&body)))
        }
    }
}
