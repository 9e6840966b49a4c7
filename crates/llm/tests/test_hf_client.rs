use common::CiConfig;
use llm::{GenOverrides, HfClient, LlmError, TextGenerator};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> HfClient {
    let config = CiConfig::new("test-token").with_model("google/flan-t5-large");
    HfClient::with_endpoint_base(&config, &server.url()).unwrap()
}

#[tokio::test]
async fn test_query_sends_wire_body_and_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/google/flan-t5-large")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "inputs": "hello",
            "parameters": {
                "max_length": 500,
                "temperature": 0.7,
                "top_p": 0.9,
                "do_sample": true,
                "return_full_text": false
            },
            "options": {
                "wait_for_model": true,
                "use_cache": true
            }
        })))
        .with_status(200)
        .with_body(r#"[{"generated_text": "ok"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .generate("hello", &GenOverrides::default())
        .await
        .unwrap();

    assert_eq!(text, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_overrides_reach_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/google/flan-t5-large")
        .match_body(Matcher::PartialJson(json!({
            "parameters": { "max_length": 1500 }
        })))
        .with_status(200)
        .with_body(r#"[{"generated_text": "long review"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .generate("review this", &GenOverrides::max_length(1500))
        .await
        .unwrap();

    assert_eq!(text, "long review");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_single_object_response_shape() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/google/flan-t5-large")
        .with_status(200)
        .with_body(r#"{"generated_text": "single"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .generate("prompt", &GenOverrides::default())
        .await
        .unwrap();
    assert_eq!(text, "single");
}

#[tokio::test]
async fn test_unknown_shape_falls_back_to_raw_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/google/flan-t5-large")
        .with_status(200)
        .with_body(r#"{"estimated_time": 20.0}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .generate("prompt", &GenOverrides::default())
        .await
        .unwrap();
    assert!(text.contains("estimated_time"));
}

#[tokio::test]
async fn test_http_failure_is_a_structured_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/google/flan-t5-large")
        .with_status(503)
        .with_body(r#"{"error": "model loading"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .generate("prompt", &GenOverrides::default())
        .await
        .unwrap_err();

    match err {
        LlmError::Http { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("model loading"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_explain_concept_wrapper() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/google/flan-t5-large")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("basic wind pressure".to_string()),
            Matcher::Regex("structural loads".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"[{"generated_text": "explained"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .explain_concept("basic wind pressure", "structural loads")
        .await
        .unwrap();

    assert_eq!(text, "explained");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wrappers_differ_only_in_prompt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/google/flan-t5-large")
        .match_body(Matcher::Regex("terrain category".to_string()))
        .with_status(200)
        .with_body(r#"[{"generated_text": "answered"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .answer_technical_question("How is the terrain category chosen?", "")
        .await
        .unwrap();

    assert_eq!(text, "answered");
    mock.assert_async().await;
}
