/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use common::setup_mock_server;
use stock_fetch_adapter::{ClientConfig, FetchClient, FetchError, QueryRequest, TaskId};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let client = assert_ok!(FetchClient::new());
    assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8000/");
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let _client = assert_ok!(FetchClient::with_config("http://10.0.0.2:9000", config));
}

#[test]
fn test_invalid_base_url() {
    let err = FetchClient::with_config("not a url", ClientConfig::default()).unwrap_err();
    assert!(matches!(err, FetchError::UrlParse(_)));
}

#[tokio::test]
async fn test_token_roundtrip() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_json(serde_json::json!({"token": "abcd1234efgh5678"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "masked": "abcd********5678",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "configured": true,
            "masked": "abcd********5678",
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(FetchClient::with_config(&server.uri(), ClientConfig::default()));
    let saved = assert_ok!(client.set_token("  abcd1234efgh5678 ").await);
    assert!(saved.ok);

    let status = assert_ok!(client.token_status().await);
    assert!(status.configured);
    assert_eq!(status.masked, "abcd********5678");
}

#[tokio::test]
async fn test_submit_then_progress_url() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": "9b1e77aa",
            "message": "查询已启动",
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(FetchClient::with_config(&server.uri(), ClientConfig::default()));
    let request = QueryRequest {
        codes: "600519.SH".to_string(),
        start_date: None,
        end_date: None,
        years: 3,
    };
    let accepted = assert_ok!(client.start_query(&request).await);
    assert_eq!(accepted.task_id, TaskId::from("9b1e77aa"));

    let url = assert_ok!(client.progress_url(&accepted.task_id));
    assert_eq!(url.scheme(), "ws");
    assert_eq!(url.path(), "/ws/progress/9b1e77aa");
}

#[tokio::test]
async fn test_missing_token_is_api_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "请先配置 Tushare Token",
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(FetchClient::with_config(&server.uri(), ClientConfig::default()));
    let request = QueryRequest {
        codes: "600519.SH".to_string(),
        start_date: None,
        end_date: None,
        years: 3,
    };
    let err = client.start_query(&request).await.unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(err.to_string(), "请先配置 Tushare Token");
}
