//! Integration tests for the download helper.
//!
//! These tests verify streaming, the full-resolution suffix, and the
//! partial-file cleanup invariant.

use photopull::download::{DownloadError, fetch_to_file};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_preserves_content() {
    let server = MockServer::start().await;
    let content = b"full resolution image bytes\x00\x01\x02";

    // The helper appends `=d` to the capability URL, so the mock expects it.
    Mock::given(method("GET"))
        .and(path("/item1=d"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let dest = dir.path().join("2020-01-01T12:00:00Z.jpg");
    let client = reqwest::Client::new();

    let base_url = format!("{}/item1", server.uri());
    fetch_to_file(&client, &base_url, &dest)
        .await
        .expect("download should succeed");

    let written = std::fs::read(&dest).expect("file should exist");
    assert_eq!(written, content);
}

#[tokio::test]
async fn test_fetch_http_error_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone=d"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let dest = dir.path().join("out.jpg");
    let client = reqwest::Client::new();

    let base_url = format!("{}/gone", server.uri());
    let result = fetch_to_file(&client, &base_url, &dest).await;

    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
    assert!(!dest.exists(), "no file should be created on HTTP error");
}

/// Serves one request with a Content-Length larger than the body it sends,
/// then drops the connection, simulating a transport failure mid-stream.
async fn spawn_truncating_server() -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture");
    let addr = listener.local_addr().expect("fixture addr");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        // Drain the request head so the early close below is a clean FIN
        // rather than a reset that races the response bytes.
        let mut request = [0u8; 1024];
        let _ = tokio::io::AsyncReadExt::read(&mut stream, &mut request)
            .await
            .expect("read request");
        // Claim 1000 bytes, deliver 10, then hang up.
        let head =
            b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 1000\r\n\r\n";
        stream.write_all(head).await.expect("write head");
        stream.write_all(b"0123456789").await.expect("write partial");
        stream.flush().await.expect("flush");
        stream.shutdown().await.expect("shutdown");
    });

    addr
}

#[tokio::test]
async fn test_fetch_mid_stream_failure_removes_partial_file() {
    let addr = spawn_truncating_server().await;

    let dir = TempDir::new().expect("temp dir");
    let dest = dir.path().join("partial.jpg");
    let client = reqwest::Client::new();

    let base_url = format!("http://{addr}/item");
    let result = fetch_to_file(&client, &base_url, &dest).await;

    assert!(
        matches!(result, Err(DownloadError::Network { .. })),
        "truncated body should surface as a network error: {result:?}"
    );
    assert!(
        !dest.exists(),
        "partial file must be cleaned up after a mid-stream failure"
    );
}
