use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tirtha_estimator::{
    AiProvider, EstimateSource, Estimator, EstimatorConfig, TravelMode, TripRequest,
};

const ESTIMATE_TEXT: &str = r#"Here is the estimate you asked for:
{"breakdown":{"transportation":7000,"accommodation":9000,"food":4500,"templeEntry":600,"localTransport":2000,"miscellaneous":2100},"total":25200,"tips":["Book the Tirumala darshan slot online"]}"#;

fn request() -> TripRequest {
    TripRequest::new("Chennai", "Tirupati Balaji")
        .with_travel_mode(TravelMode::Train)
        .with_duration_days(3)
        .with_traveler_count(2)
}

fn config(provider: AiProvider, server: &Server) -> EstimatorConfig {
    EstimatorConfig::new(provider)
        .with_api_key("sk-test")
        .with_base_url(server.url())
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(0)
}

#[tokio::test]
async fn test_openai_chat_completion() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.3,
            "max_tokens": 1000
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "choices": [{ "message": { "role": "assistant", "content": ESTIMATE_TEXT } }] })
                .to_string(),
        )
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::OpenAI, &server)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome.source,
        EstimateSource::Remote {
            provider: "openai".to_string()
        }
    );
    assert_eq!(outcome.result.breakdown().transportation, 7000.0);
    assert_eq!(outcome.result.total(), 25200.0);
    assert_eq!(
        outcome.result.tips(),
        ["Book the Tirumala darshan slot online".to_string()]
    );
}

#[tokio::test]
async fn test_anthropic_messages() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/messages")
        .match_header("x-api-key", "sk-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-sonnet-20240229",
            "max_tokens": 1000
        })))
        .with_status(200)
        .with_body(json!({ "content": [{ "type": "text", "text": ESTIMATE_TEXT }] }).to_string())
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::Anthropic, &server)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    mock.assert_async().await;
    assert!(outcome.source.is_remote());
    assert_eq!(outcome.result.breakdown().accommodation, 9000.0);
}

#[tokio::test]
async fn test_cohere_generate() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({ "model": "command" })))
        .with_status(200)
        .with_body(json!({ "generations": [{ "text": ESTIMATE_TEXT }] }).to_string())
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::Cohere, &server)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    mock.assert_async().await;
    assert!(outcome.source.is_remote());
    assert_eq!(outcome.result.breakdown().food, 4500.0);
}

#[tokio::test]
async fn test_mistral_with_model_override() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({ "model": "mistral-large-latest" })))
        .with_status(200)
        .with_body(
            json!({ "choices": [{ "message": { "content": ESTIMATE_TEXT } }] }).to_string(),
        )
        .create_async()
        .await;

    let estimator = Estimator::new(
        config(AiProvider::Mistral, &server).with_model("mistral-large-latest"),
    )
    .unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome.source,
        EstimateSource::Remote {
            provider: "mistral".to_string()
        }
    );
}

#[tokio::test]
async fn test_http_error_falls_back_to_formula() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::OpenAI, &server)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    mock.assert_async().await;
    match &outcome.source {
        EstimateSource::Fallback { reason } => {
            assert!(reason.contains("401"));
            assert!(reason.contains("Incorrect API key provided"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(
        outcome.result,
        Estimator::deterministic().estimate(&request()).await
    );
}

#[tokio::test]
async fn test_unparseable_completion_falls_back() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({ "choices": [{ "message": { "content": "I cannot estimate that trip." } }] })
                .to_string(),
        )
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::OpenAI, &server)).unwrap();
    let result = estimator.estimate(&request()).await;

    assert_eq!(result, Estimator::deterministic().estimate(&request()).await);
}

#[tokio::test]
async fn test_non_numeric_amounts_fall_back() {
    let mut server = Server::new_async().await;
    let content = r#"{"breakdown":{"transportation":"about 7000","accommodation":9000,"food":4500,"templeEntry":600,"localTransport":2000,"miscellaneous":2100},"total":25200,"tips":[]}"#;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(json!({ "choices": [{ "message": { "content": content } }] }).to_string())
        .create_async()
        .await;

    let estimator = Estimator::new(config(AiProvider::OpenAI, &server)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    assert!(matches!(outcome.source, EstimateSource::Fallback { .. }));
    assert_eq!(outcome.result.total(), 23160.0);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let estimator =
        Estimator::new(config(AiProvider::OpenAI, &server).with_max_retries(1)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    failing.assert_async().await;
    assert!(matches!(outcome.source, EstimateSource::Fallback { .. }));
}

#[tokio::test]
async fn test_long_retry_after_falls_back_without_waiting() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("retry-after", "30")
        .expect(1)
        .create_async()
        .await;

    let estimator = Estimator::new(
        config(AiProvider::OpenAI, &server)
            .with_timeout(Duration::from_secs(1))
            .with_max_retries(1),
    )
    .unwrap();
    let started = std::time::Instant::now();
    let outcome = estimator.estimate_with_source(&request()).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    limited.assert_async().await;
    match outcome.source {
        EstimateSource::Fallback { reason } => {
            assert_eq!(reason, "Rate limit exceeded: retry after 30s")
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert_eq!(outcome.result.total(), 23160.0);
}

#[tokio::test]
async fn test_short_retry_after_is_honoured() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("retry-after", "1")
        .expect(2)
        .create_async()
        .await;

    let estimator =
        Estimator::new(config(AiProvider::OpenAI, &server).with_max_retries(1)).unwrap();
    let outcome = estimator.estimate_with_source(&request()).await;

    limited.assert_async().await;
    assert!(matches!(outcome.source, EstimateSource::Fallback { .. }));
}
