use reqwest::StatusCode;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use voi_round_analyzer::client::{block_url, interpret_response, transactions_url, IndexerApi, IndexerClient};
use voi_round_analyzer::{AnalyzerError, Config, RoundRange};

// Serves exactly one canned HTTP response and returns the base URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}

fn client_for(base: &str) -> IndexerClient {
    let config = Config {
        indexer_url: base.to_string(),
        ..Config::default()
    };
    IndexerClient::new(&config).unwrap()
}

#[test]
fn test_endpoint_urls() {
    assert_eq!(block_url("https://idx.test/", 42), "https://idx.test/v2/blocks/42");

    let range = RoundRange::new(5, 9).unwrap();
    let first = transactions_url("https://idx.test", &range, 1000, None).unwrap();
    assert_eq!(
        first,
        "https://idx.test/v2/transactions?min-round=5&max-round=9&limit=1000"
    );

    let next = transactions_url("https://idx.test", &range, 1000, Some("a+b/c=")).unwrap();
    assert!(next.ends_with("&next=a%2Bb%2Fc%3D"));
}

#[test]
fn test_interpret_success_bodies() {
    let value = interpret_response(StatusCode::OK, r#"{"round": 7}"#).unwrap();
    assert_eq!(value, json!({ "round": 7 }));

    assert_eq!(interpret_response(StatusCode::OK, "null").unwrap(), json!({}));
    assert_eq!(interpret_response(StatusCode::NO_CONTENT, "").unwrap(), json!({}));
}

#[test]
fn test_falsy_json_bodies_read_as_empty() {
    for body in ["[]", "false", "0", "0.0", r#""""#, r#""0""#, " null "] {
        assert_eq!(interpret_response(StatusCode::OK, body).unwrap(), json!({}), "body {:?}", body);
    }

    assert_eq!(interpret_response(StatusCode::OK, "[1]").unwrap(), json!([1]));
    assert_eq!(interpret_response(StatusCode::OK, "true").unwrap(), json!(true));
}

#[test]
fn test_whitespace_body_is_decode_error() {
    assert!(matches!(
        interpret_response(StatusCode::OK, "   "),
        Err(AnalyzerError::Decode(_))
    ));
    assert!(matches!(
        interpret_response(StatusCode::OK, "\n"),
        Err(AnalyzerError::Decode(_))
    ));
}

#[test]
fn test_interpret_failures() {
    assert_eq!(
        interpret_response(StatusCode::OK, ""),
        Err(AnalyzerError::EmptyResponse(200))
    );
    assert!(matches!(
        interpret_response(StatusCode::OK, "<html>"),
        Err(AnalyzerError::Decode(_))
    ));
    assert_eq!(
        interpret_response(StatusCode::NOT_FOUND, r#"{"message": "Block Not Found"}"#),
        Err(AnalyzerError::NotFound)
    );
    assert_eq!(
        interpret_response(StatusCode::NOT_FOUND, r#"{"message": "no such account"}"#),
        Err(AnalyzerError::Server {
            status: 404,
            message: "no such account".to_string(),
        })
    );
    assert_eq!(
        interpret_response(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message": "boom"}"#),
        Err(AnalyzerError::Server {
            status: 500,
            message: "boom".to_string(),
        })
    );
}

#[test]
fn test_raw_error_body_is_truncated() {
    let body = "x".repeat(1000);
    match interpret_response(StatusCode::BAD_GATEWAY, &body) {
        Err(AnalyzerError::Server { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message.len(), 250);
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_decodes_json() {
    let base = serve_once("200 OK", r#"{"round": 100, "timestamp": 1700000000}"#).await;
    let client = client_for(&base);

    let block = client.fetch(&block_url(client.base_url(), 100)).await.unwrap();
    assert_eq!(block["timestamp"], json!(1_700_000_000));
}

#[tokio::test]
async fn test_fetch_maps_missing_block() {
    let base = serve_once("404 Not Found", r#"{"message": "error getting block: block not found"}"#).await;
    let client = client_for(&base);

    let err = client.fetch(&block_url(client.base_url(), 1)).await.unwrap_err();
    assert_eq!(err, AnalyzerError::NotFound);
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}", addr));
    let err = client.fetch(&block_url(client.base_url(), 1)).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Network(_)));
}
