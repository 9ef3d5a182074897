//! HTTP client for the pet-stat backend.
//!
//! One POST per stat increment:
//! `POST {base}/pets/increase_{param}/{pet_id}/` with the CSRF token header.
//! Stats are server-authoritative; the client returns the backend's updated
//! value and never caches it. There is no retry policy: a failed call is
//! surfaced to the caller, and the settlement batch it belongs to stops.

use futures::future::BoxFuture;
use petarcade_engine::{BackendError, StatBackend};
use petarcade_types::{DecodeError, Stat, StatUpdate};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the anti-forgery credential.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] DecodeError),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid URL scheme: {0} (expected http or https)")]
    InvalidScheme(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Client for the pet backend's stat endpoints.
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
    csrf_token: String,
}

impl Client {
    /// Create a client for `base_url`, authorizing writes with `csrf_token`.
    pub fn new(base_url: &str, csrf_token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            csrf_token: csrf_token.into(),
        })
    }

    /// Issue one increment for `stat` on `pet_id` and decode the update.
    pub async fn increase_stat(&self, stat: Stat, pet_id: u64) -> Result<StatUpdate> {
        let url = self
            .base_url
            .join(&format!("pets/increase_{}/{}/", stat.param(), pet_id))?;
        debug!(stat = stat.param(), pet_id, url = %url, "issuing stat increment");

        let response = self
            .client
            .post(url.clone())
            .header(CSRF_HEADER, &self.csrf_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, "stat increment rejected");
            return Err(Error::FailedWithBody { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        let update = StatUpdate::from_json(stat, &body)?;
        debug!(
            stat = stat.param(),
            value = update.value,
            "stat increment acknowledged"
        );
        Ok(update)
    }

    /// Proxy URL for an externally hosted pet image.
    pub fn image_proxy_url(&self, image_url: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("pets/image-proxy/{image_url}"))?)
    }
}

impl StatBackend for Client {
    fn increase_stat(
        &self,
        stat: Stat,
        pet_id: u64,
    ) -> BoxFuture<'_, std::result::Result<StatUpdate, BackendError>> {
        Box::pin(async move {
            Client::increase_stat(self, stat, pet_id)
                .await
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State as AxumState},
        http::{HeaderMap, StatusCode as AxumStatusCode},
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };
    use petarcade_engine::{evaluate, Scene, SpinConfig, SpinEvent};
    use petarcade_types::{PetSession, SpinResult};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use tokio::time::{sleep, Duration};

    const TEST_TOKEN: &str = "test-token";

    #[derive(Default)]
    struct Backend {
        calls: Mutex<Vec<(String, u64)>>,
    }

    impl Backend {
        fn calls(&self) -> Vec<(String, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn increase(
        AxumState(state): AxumState<Arc<Backend>>,
        Path((action, pet_id)): Path<(String, u64)>,
        headers: HeaderMap,
    ) -> Response {
        if headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok()) != Some(TEST_TOKEN) {
            return (AxumStatusCode::FORBIDDEN, "missing or invalid CSRF token").into_response();
        }

        let stat = match action.strip_prefix("increase_") {
            Some(stat) => stat.to_string(),
            None => return (AxumStatusCode::NOT_FOUND, "unknown action").into_response(),
        };
        state.calls.lock().unwrap().push((stat.clone(), pet_id));

        let mut body = serde_json::Map::new();
        body.insert(stat, json!(42));
        body.insert("message".to_string(), Value::Null);
        Json(Value::Object(body)).into_response()
    }

    async fn serve_router(router: Router) -> (String, tokio::task::JoinHandle<()>) {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let actual_addr = listener.local_addr().unwrap();
        let base_url = format!("http://{actual_addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });

        sleep(Duration::from_millis(50)).await;
        (base_url, handle)
    }

    async fn serve_backend(state: Arc<Backend>) -> (String, tokio::task::JoinHandle<()>) {
        let router = Router::new()
            .route("/pets/:action/:pet_id/", post(increase))
            .with_state(state);
        serve_router(router).await
    }

    #[tokio::test]
    async fn test_increase_stat_success() {
        let state = Arc::new(Backend::default());
        let (base_url, handle) = serve_backend(state.clone()).await;

        let client = Client::new(&base_url, TEST_TOKEN).unwrap();
        let update = client.increase_stat(Stat::Energy, 7).await.unwrap();

        assert_eq!(update.stat, Stat::Energy);
        assert_eq!(update.value, 42);
        assert_eq!(update.message, None);
        assert_eq!(state.calls(), vec![("energy".to_string(), 7)]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_increase_stat_requires_csrf_token() {
        let state = Arc::new(Backend::default());
        let (base_url, handle) = serve_backend(state.clone()).await;

        let client = Client::new(&base_url, "wrong-token").unwrap();
        let err = client.increase_stat(Stat::Hunger, 7).await.unwrap_err();

        let Error::FailedWithBody { status, .. } = err else {
            panic!("expected FailedWithBody, got {err:?}");
        };
        assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
        assert!(state.calls().is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_increase_stat_surfaces_server_error() {
        let router = Router::new().route(
            "/pets/:action/:pet_id/",
            post(|| async { (AxumStatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url, TEST_TOKEN).unwrap();
        let err = client.increase_stat(Stat::Energy, 1).await.unwrap_err();

        let Error::FailedWithBody { status, body } = err else {
            panic!("expected FailedWithBody, got {err:?}");
        };
        assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("maintenance"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_increase_stat_rejects_malformed_response() {
        // Well-formed JSON, but the stat value is under the wrong key.
        let router = Router::new().route(
            "/pets/:action/:pet_id/",
            post(|| async { Json(json!({"points": 1})) }),
        );
        let (base_url, handle) = serve_router(router).await;

        let client = Client::new(&base_url, TEST_TOKEN).unwrap();
        let err = client.increase_stat(Stat::Energy, 1).await.unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidResponse(DecodeError::MissingValue { key: "energy" })
        ));

        handle.abort();
    }

    #[test]
    fn test_client_invalid_scheme() {
        let result = Client::new("ftp://example.com", TEST_TOKEN);
        assert!(result.is_err());
        if let Err(err) = result {
            assert!(matches!(err, Error::InvalidScheme(_)));
            assert_eq!(
                err.to_string(),
                "invalid URL scheme: ftp (expected http or https)"
            );
        }

        assert!(Client::new("http://localhost:8000", TEST_TOKEN).is_ok());
        assert!(Client::new("https://localhost:8000", TEST_TOKEN).is_ok());
    }

    #[test]
    fn test_image_proxy_url() {
        let client = Client::new("http://localhost:8000", TEST_TOKEN).unwrap();
        let url = client.image_proxy_url("sprites/mew.png").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/pets/image-proxy/sprites/mew.png"
        );
    }

    #[tokio::test]
    async fn test_scene_settles_against_live_backend() {
        let state = Arc::new(Backend::default());
        let (base_url, handle) = serve_backend(state.clone()).await;

        let client = Arc::new(Client::new(&base_url, TEST_TOKEN).unwrap());
        let session = PetSession {
            pet_id: 7,
            pet_image_url: String::new(),
            csrf_token: TEST_TOKEN.to_string(),
        };
        let config = SpinConfig {
            tick_ms: 5,
            base_spin_ms: 20,
            stagger_ms: 5,
            settle_ms: 5,
            flip_ms: 5,
            message_ms: 5,
        };

        let mut scene = Scene::new(session, client, config).unwrap();
        let mut events = scene.spin().unwrap();

        let mut completed = None;
        while let Some(event) = events.next().await {
            if let SpinEvent::Completed { symbols } = event {
                completed = Some(symbols);
            }
        }

        // HTTP call count matches the plan of whatever triple (if any) came up.
        let completed = completed.expect("spin never completed");
        let expected: Vec<(String, u64)> = match evaluate(&SpinResult::from(completed)) {
            Some(bonus) => bonus
                .increment_plan()
                .iter()
                .map(|stat| (stat.param().to_string(), 7))
                .collect(),
            None => Vec::new(),
        };
        assert_eq!(state.calls(), expected);

        handle.abort();
    }
}
