//! Integration tests for the identity token exchange and the OIDC id-token request

use apimap_sync::apimap::auth::exchange_identity;
use apimap_sync::pipeline::oidc::fetch_id_token;
use serde_json::json;
use wiremock::matchers::{bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEDERATION_PATH: &str = "/oauth2/https%3A%2F%2Ftoken.actions.githubusercontent.com/token";

mod exchange_tests {
    use super::*;

    /// The identity token is sent as bearer and the access token returned
    #[tokio::test]
    async fn test_exchange_returns_access_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FEDERATION_PATH))
            .and(bearer_token("id-token"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "bearer-1",
                "token_type": "Bearer",
                "expires_in": 300
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = exchange_identity("id-token", &format!("{}/", server.uri())).await;

        assert_eq!(token.as_deref(), Some("bearer-1"));
    }

    /// Any failure status resolves to no token instead of an error
    #[tokio::test]
    async fn test_exchange_failure_yields_no_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FEDERATION_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_token"
            })))
            .mount(&server)
            .await;

        assert!(exchange_identity("id-token", &server.uri()).await.is_none());
    }

    /// A 404 is an accepted response but carries no token
    #[tokio::test]
    async fn test_exchange_not_found_yields_no_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(exchange_identity("id-token", &server.uri()).await.is_none());
    }

    /// A success response without access_token yields no token
    #[tokio::test]
    async fn test_exchange_without_access_token_field() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FEDERATION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
            .mount(&server)
            .await;

        assert!(exchange_identity("id-token", &server.uri()).await.is_none());
    }
}

mod id_token_tests {
    use super::*;

    /// The audience is passed as query parameter and the request token as bearer
    #[tokio::test]
    async fn test_fetch_id_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/_apis/distributedtask/token"))
            .and(query_param("api-version", "2.0"))
            .and(query_param("audience", "apimap"))
            .and(bearer_token("request-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "id-token"})))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/_apis/distributedtask/token?api-version=2.0", server.uri());
        let token = fetch_id_token(&url, "request-token", "apimap").await.unwrap();

        assert_eq!(token, "id-token");
    }

    /// A rejected id-token request is an error
    #[tokio::test]
    async fn test_fetch_id_token_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = fetch_id_token(&server.uri(), "request-token", "apimap")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to get ID Token. Error Code : 403");
    }

    /// A response without a value is an error
    #[tokio::test]
    async fn test_fetch_id_token_missing_value() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1})))
            .mount(&server)
            .await;

        assert!(fetch_id_token(&server.uri(), "request-token", "apimap").await.is_err());
    }
}
