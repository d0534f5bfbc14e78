//! HTTP front end: the import form and the JSON import endpoint.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bandport_acquire::{import_catalog, HttpFetcher, ImportOptions};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

const FORM_PAGE: &str = include_str!("form.html");

/// Shared per-server state. Holds no per-import data.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn HttpFetcher>,
    pub options: ImportOptions,
}

/// Body of `POST /api/import-bandcamp`. All three fields are required.
#[derive(Default, Deserialize)]
pub struct ImportRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub subdomain: Option<String>,
}

impl fmt::Debug for ImportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("subdomain", &self.subdomain)
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ImportRequest {
    /// `(email, password, subdomain)` when every field is present and non-empty.
    fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            present(&self.email)?,
            present(&self.password)?,
            present(&self.subdomain)?,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/api/import-bandcamp", post(import_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// Run a full catalog import and return the releases as a JSON array.
async fn import_handler(
    State(state): State<AppState>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    // A body sent without a JSON content type is read as no fields at all
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => ImportRequest::default(),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected import request body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let Some((email, password, subdomain)) = request.credentials() else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required fields.");
    };

    match import_catalog(state.fetcher.as_ref(), email, password, subdomain, &state.options).await {
        Ok(report) => Json(report.releases).into_response(),
        Err(err) => {
            tracing::error!(error = %err, subdomain = %subdomain, "Import failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!(addr = %listener.local_addr()?, "Import server listening");

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bandport_acquire::{FetchRequest, FetchResponse};
    use tower::ServiceExt;

    /// Storefront with one release and a working login.
    struct FakeStorefront {
        login_cookies: Vec<String>,
    }

    #[async_trait::async_trait]
    impl HttpFetcher for FakeStorefront {
        async fn fetch(&self, request: FetchRequest) -> anyhow::Result<FetchResponse> {
            let (set_cookies, body) = match request.url.as_str() {
                "https://label.test/login" => (self.login_cookies.clone(), String::new()),
                "https://label.test/music" => (
                    Vec::new(),
                    r#"<div class="music-grid-item"><a href="/album/songs">Songs</a></div>"#.to_string(),
                ),
                "https://label.test/album/songs" => (
                    Vec::new(),
                    r#"<meta property="og:title" content="Songs, by The Band">"#.to_string(),
                ),
                other => anyhow::bail!("unexpected url {other}"),
            };
            Ok(FetchResponse {
                status: 200,
                set_cookies,
                body,
            })
        }
    }

    fn app(login_cookies: &[&str]) -> Router {
        router(AppState {
            fetcher: Arc::new(FakeStorefront {
                login_cookies: login_cookies.iter().map(|c| c.to_string()).collect(),
            }),
            options: ImportOptions::default(),
        })
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/import-bandcamp")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let response = app(&["a=1"])
            .oneshot(post_json(r#"{"email": "me@example.com", "password": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing required fields.");
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_missing_fields() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/import-bandcamp")
            .body(Body::from("{}"))
            .unwrap();
        let response = app(&["a=1"]).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing required fields.");
    }

    #[tokio::test]
    async fn test_bad_json_bodies_get_json_errors() {
        for body in [r#"{"email": 5}"#, "not json"] {
            let response = app(&["a=1"]).oneshot(post_json(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let error = json_body(response).await;
            assert!(!error["error"].as_str().unwrap().is_empty());
        }
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = ImportRequest {
            email: Some("me@example.com".into()),
            password: Some("hunter2".into()),
            subdomain: None,
        };
        let printed = format!("{request:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_import_returns_releases() {
        let response = app(&["a=1; Path=/"])
            .oneshot(post_json(
                r#"{"email": "me@example.com", "password": "pw", "subdomain": "https://label.test"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let releases = body.as_array().unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0]["title"], "Songs");
        assert_eq!(releases[0]["artist"], "The Band");
        assert_eq!(releases[0]["coverArt"], "");
        assert_eq!(releases[0]["price"], "N/A");
    }

    #[tokio::test]
    async fn test_failed_login_reports_error() {
        let response = app(&[])
            .oneshot(post_json(
                r#"{"email": "me@example.com", "password": "pw", "subdomain": "label.test"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_form_page_served() {
        let response = app(&[])
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/import-bandcamp"));
    }
}
