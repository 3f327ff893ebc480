//! Unit tests for the transport layer.

use super::*;
use crate::config::ZnstorConfig;
use rstest::rstest;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[rstest]
#[case("", Value::Null)]
#[case("  \n", Value::Null)]
#[case("null", Value::Null)]
#[case("[1,2]", json!([1, 2]))]
#[case(r#"{"project":"p1"}"#, json!({"project": "p1"}))]
fn response_json_decodes_body(#[case] text: &str, #[case] expected: Value) {
    let response = HttpResponse::new(200, text);
    assert_eq!(response.json().expect("valid json"), expected);
}

#[test]
fn response_json_rejects_non_json() {
    let response = HttpResponse::new(200, "<html>oops</html>");
    assert!(response.json().is_err());
}

#[rstest]
#[case(200, true)]
#[case(201, false)]
#[case(204, false)]
#[case(404, false)]
#[case(500, false)]
fn only_200_counts_as_ok(#[case] status: u16, #[case] expected: bool) {
    assert_eq!(HttpResponse::new(status, "").is_ok(), expected);
}

fn header_value(raw: &str, name: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_owned())
    })
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let headers = text.get(..header_end).unwrap_or_default();
    let content_length = header_value(headers, "content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

/// Accepts one connection, answers with `status_line` and `body`, and yields
/// the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0_u8; 4096];
        loop {
            let read = socket.read(&mut buf).await.expect("read");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(buf.get(..read).expect("read within buffer"));
            if request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });
    (addr.to_string(), handle)
}

#[tokio::test]
async fn http_transport_sends_auth_headers_and_json_body() {
    let (addr, server) = serve_once("200 OK", r#"{"vol":{"options":{"volsize":5}}}"#).await;
    let config = ZnstorConfig::new(addr.as_str());
    let transport = HttpTransport::new(&config).expect("transport");
    let request = HttpRequest::new(
        Method::PUT,
        format!("http://{addr}/api/v1/storage/domains/default/pools/tank/projects/p1/volumes/v1/resize"),
        json!({"volsize": 5}),
    );

    let response = transport.send(&request).await.expect("round trip");
    assert_eq!(response.status, 200);
    assert_eq!(
        response.json().expect("json"),
        json!({"vol": {"options": {"volsize": 5}}})
    );

    let raw = server.await.expect("server task");
    assert!(
        raw.starts_with(
            "PUT /api/v1/storage/domains/default/pools/tank/projects/p1/volumes/v1/resize HTTP/1.1"
        ),
        "unexpected request line: {raw}"
    );
    assert_eq!(
        header_value(&raw, "authorization").as_deref(),
        Some("Basic em5zdG9yOm5ldmFkYQ==")
    );
    assert_eq!(
        header_value(&raw, "content-type").as_deref(),
        Some("application/json")
    );
    assert_eq!(header_value(&raw, "user-agent").as_deref(), Some(USER_AGENT));
    assert!(raw.ends_with(r#"{"volsize":5}"#), "unexpected body: {raw}");
}

#[tokio::test]
async fn http_transport_passes_error_status_through() {
    let (addr, server) = serve_once("409 Conflict", "hostgroup already exists").await;
    let config = ZnstorConfig::new(addr.as_str()).credentials("admin", "secret");
    let transport = HttpTransport::new(&config).expect("transport");
    let request = HttpRequest::new(
        Method::POST,
        format!("http://{addr}/api/v1/storage/hosts/hg1"),
        Value::String(String::new()),
    );

    let response = transport.send(&request).await.expect("status is not an error");
    assert_eq!(response, HttpResponse::new(409, "hostgroup already exists"));

    let raw = server.await.expect("server task");
    assert_eq!(
        header_value(&raw, "authorization").as_deref(),
        Some("Basic YWRtaW46c2VjcmV0")
    );
    assert!(raw.ends_with("\r\n\r\n\"\""), "empty-string body expected: {raw}");
}

#[tokio::test]
async fn http_transport_reports_connection_failures() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let transport = HttpTransport::new(&ZnstorConfig::new(addr.to_string())).expect("transport");
    let request = HttpRequest::new(
        Method::GET,
        format!("http://{addr}/api/v1/storage/hosts"),
        Value::Null,
    );
    let err = transport.send(&request).await.expect_err("nothing listens");
    assert!(!err.message.is_empty());
}
