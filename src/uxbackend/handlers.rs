//! UX Backend Handlers
//!
//! Both endpoints accept `POST` only; any other method gets a 405 naming the
//! method, with `Allow: POST`.

use super::quantity::parse_quantity;
use super::token::generate_onboarding_token;
use crate::error::{Error, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json; charset=UTF-8";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct HandlerState {
    pub token_lifetime_hours: u32,
    pub private_key_path: PathBuf,
}

/// Build the UX backend router
pub fn router(state: Arc<HandlerState>) -> Router {
    Router::new()
        .route(
            "/onboarding-tokens",
            post(create_onboarding_token).fallback(unsupported_method),
        )
        .route(
            "/info/deployment",
            post(deployment_capability).fallback(unsupported_method),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Onboarding Tokens
// =============================================================================

#[derive(Debug, Deserialize)]
struct QuotaRequest {
    #[serde(default)]
    quota: String,
}

/// Read the optional quota from a request body
///
/// An empty body, a `null` body, or a body without a quota means unlimited.
/// Only the first JSON value is read; anything after it is ignored.
fn requested_quota(body: &[u8]) -> Result<Option<Quantity>> {
    let request = match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<QuotaRequest>>()
        .next()
    {
        None => return Ok(None),
        Some(parsed) => parsed?,
    };
    match request {
        Some(QuotaRequest { quota }) if !quota.is_empty() => parse_quantity(&quota).map(Some),
        _ => Ok(None),
    }
}

async fn create_onboarding_token(State(state): State<Arc<HandlerState>>, body: Bytes) -> Response {
    let quota = match requested_quota(&body) {
        Ok(quota) => quota,
        Err(e) => {
            let message = match e {
                Error::JsonParse(inner) => inner.to_string(),
                other => other.to_string(),
            };
            return text_response(StatusCode::BAD_REQUEST, message);
        }
    };

    let lifetime = state.token_lifetime_hours;
    let key_path = state.private_key_path.clone();
    let generated = tokio::task::spawn_blocking(move || {
        generate_onboarding_token(lifetime, &key_path, quota)
    })
    .await
    .map_err(|e| Error::Internal(format!("token task failed: {}", e)))
    .and_then(|result| result);

    match generated {
        Ok(token) => {
            info!("Onboarding token generated successfully");
            text_response(StatusCode::OK, token)
        }
        Err(e) => {
            error!(error = %e, "Failed to get onboarding token");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
        }
    }
}

// =============================================================================
// Deployment Capability
// =============================================================================

/// Features this deployment offers to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCapability {
    pub onboarding_token_enabled: bool,
    pub rotate_keys_enabled: bool,
}

impl DeploymentCapability {
    pub fn current() -> Self {
        Self {
            onboarding_token_enabled: true,
            rotate_keys_enabled: true,
        }
    }
}

async fn deployment_capability() -> Response {
    match serde_json::to_vec(&DeploymentCapability::current()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, APPLICATION_JSON)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get api's available");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, APPLICATION_JSON)],
                "Failed to get api's available",
            )
                .into_response()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn unsupported_method(method: Method) -> Response {
    info!(%method, "Only POST method should be used to send data to this endpoint");
    let mut response = text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Unsupported method : {}", method),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));
    response
}

fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uxbackend::token::tests::{key_file, verify};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Utc;
    use tower::ServiceExt;

    fn app(key_path: PathBuf) -> Router {
        router(Arc::new(HandlerState {
            token_lifetime_hours: 48,
            private_key_path: key_path,
        }))
    }

    async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, String, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_requested_quota() {
        assert_eq!(requested_quota(b"").unwrap(), None);
        assert_eq!(requested_quota(b" \n").unwrap(), None);
        assert_eq!(requested_quota(b"null").unwrap(), None);
        assert_eq!(
            requested_quota(br#"{"quota":"1Ti"} trailing"#).unwrap(),
            Some(Quantity("1Ti".into()))
        );
        assert_eq!(requested_quota(b"{}").unwrap(), None);
        assert_eq!(requested_quota(br#"{"quota":""}"#).unwrap(), None);
        assert_eq!(
            requested_quota(br#"{"quota":"10Gi"}"#).unwrap(),
            Some(Quantity("10Gi".into()))
        );
        assert!(matches!(requested_quota(b"{"), Err(Error::JsonParse(_))));
        assert!(matches!(
            requested_quota(br#"{"quota":"ten"}"#),
            Err(Error::InvalidQuota(_))
        ));
    }

    #[tokio::test]
    async fn test_token_without_quota() {
        let (file, key) = key_file();
        let (status, content_type, body) =
            send(app(file.path().to_path_buf()), Method::POST, "/onboarding-tokens", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/plain");
        let ticket = verify(&body, &key);
        assert_eq!(ticket.quota, None);
        assert!(!ticket.is_expired(Utc::now()));
    }

    #[tokio::test]
    async fn test_token_with_quota() {
        let (file, key) = key_file();
        let (status, _, body) = send(
            app(file.path().to_path_buf()),
            Method::POST,
            "/onboarding-tokens",
            r#"{"quota":"100Gi"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(verify(&body, &key).quota, Some(Quantity("100Gi".into())));
    }

    #[tokio::test]
    async fn test_token_null_body_is_unlimited() {
        let (file, key) = key_file();
        let (status, _, body) =
            send(app(file.path().to_path_buf()), Method::POST, "/onboarding-tokens", "null").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(verify(&body, &key).quota, None);
    }

    #[tokio::test]
    async fn test_token_invalid_quota() {
        let (file, _key) = key_file();
        let (status, _, body) = send(
            app(file.path().to_path_buf()),
            Method::POST,
            "/onboarding-tokens",
            r#"{"quota":"lots"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Invalid quota value sent in request body"));
    }

    #[tokio::test]
    async fn test_token_malformed_body() {
        let (file, _key) = key_file();
        let (status, _, body) = send(
            app(file.path().to_path_buf()),
            Method::POST,
            "/onboarding-tokens",
            "{not json",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_token_missing_key() {
        let (status, content_type, body) = send(
            app(PathBuf::from("/nonexistent/key")),
            Method::POST,
            "/onboarding-tokens",
            "",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, "Failed to generate token");
    }

    #[tokio::test]
    async fn test_deployment_capability() {
        let (status, content_type, body) = send(
            app(PathBuf::from("/nonexistent/key")),
            Method::POST,
            "/info/deployment",
            "",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json; charset=UTF-8");
        assert_eq!(body, r#"{"onboardingTokenEnabled":true,"rotateKeysEnabled":true}"#);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        for (method, uri) in [
            (Method::GET, "/onboarding-tokens"),
            (Method::PUT, "/onboarding-tokens"),
            (Method::DELETE, "/info/deployment"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = app(PathBuf::from("/nonexistent/key"))
                .oneshot(request)
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers()[header::ALLOW], "POST");
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(bytes, format!("Unsupported method : {}", method).as_bytes());
        }
    }
}
