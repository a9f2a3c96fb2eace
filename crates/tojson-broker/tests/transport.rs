// crates/tojson-broker/tests/transport.rs
// ============================================================================
// Module: Reqwest Transport Tests
// Description: Blocking reqwest transport against local tiny_http servers.
// Purpose: Verify headers, bodies, redirect rejection, and size limits.
// Dependencies: tojson-broker, tiny_http
// ============================================================================
//! ## Overview
//! Each test starts a one-shot local server on an ephemeral port.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::thread;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use tojson_broker::ApiRequest;
use tojson_broker::HttpTransport;
use tojson_broker::ReqwestTransport;
use tojson_broker::ReqwestTransportConfig;
use tojson_broker::TransportError;

/// Captured request details from the server thread.
struct Seen {
    method: String,
    url: String,
    authorization: Option<String>,
    user_agent: Option<String>,
    body: String,
}

fn header_value(request: &tiny_http::Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}

#[test]
fn reqwest_transport_sends_headers_and_body() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request");
        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).expect("body");
        let seen = Seen {
            method: request.method().to_string(),
            url: request.url().to_string(),
            authorization: header_value(&request, "Authorization"),
            user_agent: header_value(&request, "User-Agent"),
            body,
        };
        let response = Response::from_string("{\"ok\":true}")
            .with_status_code(201)
            .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
        request.respond(response).expect("respond");
        seen
    });

    let transport = ReqwestTransport::new(&ReqwestTransportConfig::default()).unwrap();
    let request = ApiRequest::post(format!("http://{addr}/repos/a/b/dispatches"), b"{\"x\":1}".to_vec())
        .with_header("Authorization", "Bearer 12345");
    let response = transport.send(&request).unwrap();
    let seen = handle.join().expect("server thread");

    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.body, b"{\"ok\":true}");
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/repos/a/b/dispatches");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer 12345"));
    assert_eq!(seen.user_agent.as_deref(), Some("tojson-action/0.1"));
    assert_eq!(seen.body, "{\"x\":1}");
}

#[test]
fn reqwest_transport_returns_error_statuses() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request");
        request.respond(Response::from_string("nope").with_status_code(404)).expect("respond");
    });
    let transport = ReqwestTransport::new(&ReqwestTransportConfig::default()).unwrap();
    let response = transport.send(&ApiRequest::get(format!("http://{addr}/missing"))).unwrap();
    handle.join().expect("server thread");
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.body, b"nope");
}

#[test]
fn reqwest_transport_rejects_redirects() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request");
        let response = Response::empty(302)
            .with_header(Header::from_bytes("Location", "http://example.com/elsewhere").unwrap());
        request.respond(response).expect("respond");
    });
    let transport = ReqwestTransport::new(&ReqwestTransportConfig::default()).unwrap();
    let err = transport.send(&ApiRequest::get(format!("http://{addr}/moved"))).unwrap_err();
    handle.join().expect("server thread");
    match err {
        TransportError::Redirected {
            to, ..
        } => assert_eq!(to, "http://example.com/elsewhere"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn reqwest_transport_enforces_response_limit() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = thread::spawn(move || {
        let request = server.recv().expect("request");
        request.respond(Response::from_data(vec![b'a'; 64])).expect("respond");
    });
    let config = ReqwestTransportConfig {
        max_response_bytes: 16,
        ..ReqwestTransportConfig::default()
    };
    let transport = ReqwestTransport::new(&config).unwrap();
    let err = transport.send(&ApiRequest::get(format!("http://{addr}/big"))).unwrap_err();
    handle.join().expect("server thread");
    assert!(matches!(err, TransportError::TooLarge { max_bytes: 16, .. }));
}

#[test]
fn reqwest_transport_rejects_invalid_urls() {
    let transport = ReqwestTransport::new(&ReqwestTransportConfig::default()).unwrap();
    let err = transport.send(&ApiRequest::get("not a url")).unwrap_err();
    assert!(matches!(err, TransportError::InvalidRequest(_)));
}

#[test]
fn request_debug_redacts_authorization() {
    let request = ApiRequest::get("https://api.github.com").with_header("Authorization", "Bearer 12345");
    let rendered = format!("{request:?}");
    assert!(!rendered.contains("12345"));
    assert!(rendered.contains("***"));
}
