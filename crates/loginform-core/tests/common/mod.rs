#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use loginform_core::{ApiClient, MemoryStorage, Navigator, Notifier, Storage, SubmitHandler};

/// One request received by the mock `/login` endpoint
#[derive(Debug, Clone)]
pub struct Captured {
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

pub type Requests = Arc<Mutex<Vec<Captured>>>;

/// Serve `/login` on an ephemeral port. `respond` gets the 1-based request
/// number. Returns the origin and the requests received so far.
pub async fn spawn_login_endpoint<F>(respond: F) -> (String, Requests)
where
    F: Fn(usize) -> Response + Clone + Send + Sync + 'static,
{
    spawn_login_endpoint_with_delay(Duration::ZERO, respond).await
}

pub async fn spawn_login_endpoint_with_delay<F>(delay: Duration, respond: F) -> (String, Requests)
where
    F: Fn(usize) -> Response + Clone + Send + Sync + 'static,
{
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().route(
        "/login",
        post(move |headers: HeaderMap, body: Bytes| {
            let recorded = recorded.clone();
            let respond = respond.clone();
            async move {
                let number = {
                    let mut requests = recorded.lock().unwrap();
                    requests.push(Captured {
                        content_type: headers
                            .get(header::CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        accept: headers
                            .get(header::ACCEPT)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    });
                    requests.len()
                };
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                respond(number)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), requests)
}

/// An origin nothing is listening on
pub async fn closed_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn token_reply(token: &str) -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response()
}

pub fn status_reply(status: StatusCode) -> Response {
    (status, "{\"error\":\"invalid credentials\"}").into_response()
}

/// Records alerts and navigations instead of showing them
#[derive(Default)]
pub struct RecordingWindow {
    alerts: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingWindow {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Notifier for RecordingWindow {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

impl Navigator for RecordingWindow {
    fn navigate(&self, href: &str) {
        self.navigations.lock().unwrap().push(href.to_string());
    }
}

/// Storage whose writes always fail
pub struct ReadOnlyStorage;

impl Storage for ReadOnlyStorage {
    fn get_item(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("storage is read-only")
    }

    fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct Fixture {
    pub handler: SubmitHandler,
    pub storage: Arc<MemoryStorage>,
    pub window: Arc<RecordingWindow>,
}

pub fn fixture(origin: &str) -> Fixture {
    let storage = Arc::new(MemoryStorage::new());
    let window = Arc::new(RecordingWindow::default());
    let client = ApiClient::new(origin, Duration::from_secs(5)).unwrap();
    let handler = SubmitHandler::new(client, storage.clone(), window.clone(), window.clone());
    Fixture {
        handler,
        storage,
        window,
    }
}
