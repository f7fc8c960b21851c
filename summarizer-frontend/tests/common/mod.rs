#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Mutex;
use summarizer_frontend::config::{Settings, SummarizerSettings, UiSettings};
use summarizer_frontend::models::FormVariant;
use summarizer_frontend::startup::build_router;
use summarizer_frontend::AppState;
use tower::ServiceExt;
use wiremock::MockServer;

const BOUNDARY: &str = "X-SUMMARIZER-TEST-BOUNDARY";

/// Router wired to a wiremock backend, plus the cookie of one browser.
pub struct TestApp {
    pub router: Router,
    pub backend: MockServer,
    cookie: Mutex<Option<String>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn submit_disabled(&self) -> bool {
        self.body.contains("disabled>")
    }

    pub fn has_error(&self) -> bool {
        self.body.contains("class=\"error\"")
    }

    pub fn has_result(&self) -> bool {
        self.body.contains("class=\"result\"")
    }
}

impl TestApp {
    pub async fn spawn(variant: FormVariant) -> Self {
        let backend = MockServer::start().await;
        let settings = Settings {
            summarizer: SummarizerSettings {
                base_url: backend.uri(),
                timeout_secs: 5,
            },
            ui: UiSettings {
                variant,
                ..Default::default()
            },
            ..Default::default()
        };

        let state = AppState::new(settings).expect("Failed to build application state");

        TestApp {
            router: build_router(state),
            backend,
            cookie: Mutex::new(None),
        }
    }

    /// Send a request as this test's browser, keeping the session cookie.
    pub async fn send(&self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            *self.cookie.lock().unwrap() = Some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Choose a file, as the file input's change event does.
    pub async fn select(&self, file_name: &str, content: &str) -> TestResponse {
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
            name = file_name,
            content = content,
        );

        self.send(
            Request::builder()
                .method("POST")
                .uri("/select")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn summarize(&self) -> TestResponse {
        self.post("/summarize").await
    }

    pub async fn reset(&self) -> TestResponse {
        self.post("/reset").await
    }
}
