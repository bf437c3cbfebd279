//! Relay endpoint tests against a fake Nano Banana Pro API.

mod common;

use common::spawn_app;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1/image/generate";

async fn provider_returning(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(template)
        .expect(1)
        .mount(&server)
        .await;
    server
}

async fn provider_never_called() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn missing_prompt_is_rejected_without_outbound_call() {
    let provider = provider_never_called().await;
    let app = spawn_app(&provider.uri()).await;

    for body in [
        json!({}),
        json!({"prompt": 42}),
        json!({"prompt": ""}),
        json!({"prompt": null}),
        json!(null),
        json!(["un gato"]),
    ] {
        let response = app.post_generate(body.to_string()).await;
        assert_eq!(response.status(), 400, "body {}", body);

        let payload: Value = response.json().await.unwrap();
        assert_eq!(payload, json!({"error": "Prompt is required"}));
    }
}

#[tokio::test]
async fn malformed_json_is_an_internal_error() {
    let provider = provider_never_called().await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate("{\"prompt\": ").await;
    assert_eq!(response.status(), 500);

    let payload: Value = response.json().await.unwrap();
    assert!(!payload["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn forwards_prompt_with_fixed_parameters() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "prompt": "Un gato astronauta en el espacio",
            "width": 1024,
            "height": 1024,
            "steps": 4,
            "guidance": 2
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"image_url": "https://cdn.nanobanana.pro/x.png"})),
        )
        .expect(1)
        .mount(&provider)
        .await;
    let app = spawn_app(&provider.uri()).await;

    let response = app
        .post_generate(json!({"prompt": "Un gato astronauta en el espacio"}).to_string())
        .await;
    assert_eq!(response.status(), 200);

    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"imageUrl": "https://cdn.nanobanana.pro/x.png"}));
}

#[tokio::test]
async fn prefers_image_url_alias_order() {
    let provider = provider_returning(ResponseTemplate::new(200).set_body_json(json!({
        "url": "https://cdn.nanobanana.pro/plain.png",
        "imageUrl": "https://cdn.nanobanana.pro/camel.png"
    })))
    .await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 200);

    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload["imageUrl"], "https://cdn.nanobanana.pro/camel.png");
}

#[tokio::test]
async fn upstream_error_forwards_status_and_message() {
    let provider = provider_returning(
        ResponseTemplate::new(429).set_body_json(json!({"message": "Rate limit exceeded"})),
    )
    .await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 429);

    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"error": "Rate limit exceeded"}));
}

#[tokio::test]
async fn upstream_error_without_json_uses_generic_message() {
    let provider =
        provider_returning(ResponseTemplate::new(503).set_body_string("upstream exploded")).await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 503);

    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"error": "Failed to generate image"}));
}

#[tokio::test]
async fn success_without_image_url_is_missing_result() {
    let provider =
        provider_returning(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
            .await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 500);

    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload, json!({"error": "No image URL returned from API"}));
}

#[tokio::test]
async fn undecodable_success_body_is_an_internal_error() {
    let provider =
        provider_returning(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;
    let app = spawn_app(&provider.uri()).await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 500);

    let payload: Value = response.json().await.unwrap();
    assert!(!payload["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_provider_is_an_internal_error() {
    // Nothing listens on loopback port 1.
    let app = spawn_app("http://127.0.0.1:1").await;

    let response = app.post_generate(json!({"prompt": "x"}).to_string()).await;
    assert_eq!(response.status(), 500);

    let payload: Value = response.json().await.unwrap();
    assert!(!payload["error"].as_str().unwrap().is_empty());
}
