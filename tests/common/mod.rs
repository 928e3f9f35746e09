use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::header::HeaderValue;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use slambook::config::{Config, StorageBackend};
use slambook::state::SharedState;
use slambook::storage::LocalObjectStore;

pub const ADMIN_KEY: &str = "test-admin-key";

/// A running test server backed by a temporary data directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub data_dir: TempDir,
}

/// A photo part for multipart submissions.
pub struct Photo<'a> {
    pub data: Vec<u8>,
    pub file_name: &'a str,
    pub mime: &'a str,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Post a multipart submission. `payload` of `None` omits the field.
    pub async fn submit(&self, payload: Option<&str>, photo: Option<Photo<'_>>) -> (Value, StatusCode) {
        let mut form = Form::new();
        if let Some(p) = payload {
            form = form.text("payload", p.to_string());
        }
        if let Some(photo) = photo {
            let part = Part::bytes(photo.data)
                .file_name(photo.file_name.to_string())
                .mime_str(photo.mime)
                .expect("valid mime");
            form = form.part("photo", part);
        }

        let resp = self
            .client
            .post(self.url("/api/submit"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a JSON payload and return the new id.
    pub async fn submit_ok(&self, payload: &Value) -> String {
        let (body, status) = self.submit(Some(&payload.to_string()), None).await;
        assert_eq!(status, StatusCode::OK, "submit failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// GET the submissions list with the admin key header.
    pub async fn responses(&self) -> (Value, StatusCode) {
        self.get_with_header("/api/admin/responses", "x-admin-key", ADMIN_KEY)
            .await
    }

    pub async fn get_with_header(&self, path: &str, name: &str, value: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .header(name, value)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get_with_raw_header(
        &self,
        path: &str,
        name: &str,
        value: &[u8],
    ) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .header(name, HeaderValue::from_bytes(value).expect("valid header bytes"))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Spawn a test app with the default admin key.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_key(Some(ADMIN_KEY)).await
}

/// Spawn a test app on a random port with a fresh data directory.
pub async fn spawn_app_with_key(admin_key: Option<&str>) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        admin_key: admin_key.map(str::to_string),
        storage: StorageBackend::Local {
            data_dir: data_dir.path().to_path_buf(),
        },
        max_body_size: 12 * 1024 * 1024,
        log_level: "warn".to_string(),
    };

    let objects = LocalObjectStore::open(data_dir.path().to_path_buf())
        .await
        .expect("Failed to open local store");
    let (app, state) = slambook::build_app_with_store(Arc::new(objects), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder().build().unwrap();

    TestApp {
        addr,
        client,
        state,
        data_dir,
    }
}
