mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use summarizer_frontend::models::FormVariant;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn stub_summary(app: &TestApp, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(&app.backend)
        .await;
}

#[tokio::test]
async fn index_starts_empty_with_submit_disabled() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Document Summarizer"));
    assert!(response.body.contains("data-dropzone"));
    assert!(response.body.contains("Max 10MB"));
    assert!(response.submit_disabled());
    assert!(!response.has_error());
    assert!(!response.has_result());
}

#[tokio::test]
async fn classic_submit_without_file_asks_for_one() {
    let app = TestApp::spawn(FormVariant::Classic).await;
    stub_summary(&app, json!({ "summary": "unused" }), 0).await;

    let response = app.summarize().await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Please select a file"));
    assert!(response.body.contains("accept=\".pdf,.txt\""));
    assert!(!response.has_result());
    assert!(response.submit_disabled());
}

#[tokio::test]
async fn dropzone_submit_without_file_is_inert() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(&app, json!({ "summary": "unused" }), 0).await;

    let response = app.summarize().await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.has_error());
    assert!(!response.has_result());
    assert!(response.submit_disabled());
}

#[tokio::test]
async fn selecting_a_file_enables_submit() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;

    let response = app.select("notes.txt", "hello there").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("notes.txt"));
    assert!(response.body.contains("11 B"));
    assert!(!response.submit_disabled());
}

#[tokio::test]
async fn successful_summary_is_displayed() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(
        &app,
        json!({
            "summary": "A compact overview.",
            "filename": "notes.txt",
            "word_count": 2,
            "key_points": ["first point", "second point"]
        }),
        1,
    )
    .await;

    app.select("notes.txt", "hello there").await;
    let response = app.summarize().await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.has_result());
    assert!(!response.has_error());
    assert!(response.body.contains("A compact overview."));
    assert!(response.body.contains("first point"));
    assert!(response.body.contains("second point"));
    assert!(response.body.contains("2 words"));
    assert!(response.body.contains("Copy Summary"));
    assert!(!response.submit_disabled());

    // Full page render shows the same state
    let page = app.get("/").await;
    assert!(page.body.contains("A compact overview."));
}

#[tokio::test]
async fn missing_filename_falls_back_to_uploaded_name() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(&app, json!({ "summary": "X" }), 1).await;

    app.select("report.txt", "content").await;
    let response = app.summarize().await;

    assert!(response.body.contains("class=\"result-file\">report.txt"));
}

#[tokio::test]
async fn null_optional_fields_still_show_summary() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(
        &app,
        json!({
            "summary": "X",
            "key_points": null,
            "filename": null,
            "word_count": 120.0
        }),
        1,
    )
    .await;

    app.select("report.txt", "content").await;
    let response = app.summarize().await;

    assert!(response.has_result());
    assert!(!response.has_error());
    assert!(response.body.contains("class=\"result-file\">report.txt"));
    assert!(response.body.contains("120 words"));
}

#[tokio::test]
async fn backend_detail_is_shown_on_failure() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "detail": "bad file" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    app.select("notes.txt", "hello").await;
    let response = app.summarize().await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("bad file"));
    assert!(response.has_error());
    assert!(!response.has_result());
    assert!(!response.submit_disabled());
}

#[tokio::test]
async fn failure_without_detail_shows_generic_message() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&app.backend)
        .await;

    app.select("notes.txt", "hello").await;
    let response = app.summarize().await;

    assert!(response.body.contains("Error summarizing file"));
    assert!(!response.has_result());
}

#[tokio::test]
async fn selecting_new_file_clears_previous_result() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(&app, json!({ "summary": "First summary" }), 1).await;

    app.select("a.txt", "aaa").await;
    let summarized = app.summarize().await;
    assert!(summarized.has_result());

    let response = app.select("b.txt", "bbb").await;

    assert!(!response.has_result());
    assert!(!response.has_error());
    assert!(!response.body.contains("First summary"));
    assert!(response.body.contains("b.txt"));
}

#[tokio::test]
async fn selecting_new_file_clears_previous_error() {
    let app = TestApp::spawn(FormVariant::Classic).await;

    let failed = app.summarize().await;
    assert!(failed.has_error());

    let response = app.select("a.txt", "aaa").await;

    assert!(!response.has_error());
    assert!(!response.submit_disabled());
}

#[tokio::test]
async fn reset_returns_to_empty_form() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(&app, json!({ "summary": "Soon gone" }), 1).await;

    app.select("a.txt", "aaa").await;
    app.summarize().await;
    let response = app.reset().await;

    assert!(!response.has_result());
    assert!(!response.has_error());
    assert!(!response.body.contains("a.txt"));
    assert!(response.submit_disabled());
}

#[tokio::test]
async fn summary_text_is_html_escaped() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    stub_summary(&app, json!({ "summary": "<script>alert(1)</script>" }), 1).await;

    app.select("a.txt", "aaa").await;
    let response = app.summarize().await;

    assert!(!response.body.contains("<script>alert(1)</script>"));
    assert!(response.body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let app = TestApp::spawn(FormVariant::Dropzone).await;
    app.select("mine.txt", "aaa").await;

    // A second browser sharing the same router
    let response = get_as_new_browser(app.router.clone(), "/").await;

    assert!(!response.contains("mine.txt"));
}

#[tokio::test]
async fn duplicate_submit_while_pending_makes_one_call() {
    let app = Arc::new(TestApp::spawn(FormVariant::Dropzone).await);
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "summary": "Slow summary" }))
                .set_delay(Duration::from_millis(600)),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    app.select("a.txt", "aaa").await;

    let first = {
        let app = app.clone();
        tokio::spawn(async move { app.summarize().await })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;

    let pending = app.summarize().await;
    assert!(pending.body.contains("Summarizing..."));
    assert!(pending.submit_disabled());

    let done = first.await.unwrap();
    assert!(done.body.contains("Slow summary"));
    assert!(!done.submit_disabled());
}

/// GET without any cookie, as a fresh browser would.
async fn get_as_new_browser(router: axum::Router, uri: &str) -> String {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
