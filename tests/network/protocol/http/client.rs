use crate::{MockConnection, Wire};
use dotenvy::dotenv;
use librest::network::application::http::{Client, Get, Headers, Method, Post, Request};
use librest::network::error::Error;
use librest::serialization::Format;
use serde::{Deserialize, Serialize};
use std::env;

#[test]
fn test_client_reads_split_response() {
    let wire = Wire::default();
    let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nX-Trace: abc\r\n\r\nhello";
    let mut client = Client::new(MockConnection::new(reply, 3, wire.clone()));

    let request = Request::new(Method::Get, "http://sensor.local/v1/temp", Headers::new(), None);
    let response = client.request(&request).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("x-trace"), Some("abc"));
    assert_eq!(response.body, b"hello");
    assert!(wire.request().starts_with("GET /v1/temp HTTP/1.1\r\nHost: sensor.local\r\n"));
    assert!(client.into_inner().is_open);
}

#[test]
fn test_client_body_until_close() {
    let reply = b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nstreamed until eof";
    let mut client = Client::new(MockConnection::new(reply, 5, Wire::default()));
    let request = Request::new(Method::Get, "http://sensor.local/", Headers::new(), None);
    let response = client.request(&request).unwrap();
    assert_eq!(response.body, b"streamed until eof");
}

#[test]
fn test_client_rejects_chunked() {
    let reply = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n";
    let mut client = Client::new(MockConnection::new(reply, 64, Wire::default()));
    let request = Request::new(Method::Get, "http://sensor.local/", Headers::new(), None);
    assert_eq!(client.request(&request), Err(Error::ProtocolError));
}

#[test]
fn test_client_short_body() {
    let reply = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc";
    let mut client = Client::new(MockConnection::new(reply, 64, Wire::default()));
    let request = Request::new(Method::Get, "http://sensor.local/", Headers::new(), None);
    assert_eq!(client.request(&request), Err(Error::ConnectionClosed));
}

#[test]
fn test_client_no_response() {
    let mut client = Client::new(MockConnection::new(b"", 64, Wire::default()));
    let request = Request::new(Method::Delete, "http://sensor.local/x", Headers::new(), None);
    assert_eq!(client.request(&request), Err(Error::ConnectionClosed));
}

#[test]
fn test_client_invalid_url() {
    let mut client = Client::new(MockConnection::new(b"", 64, Wire::default()));
    let request = Request::new(Method::Get, "ftp://sensor.local/", Headers::new(), None);
    assert_eq!(client.request(&request), Err(Error::InvalidAddress));
}

#[test]
fn test_client_reads_many_headers() {
    let mut reply = String::from("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n");
    for i in 0..48 {
        reply.push_str(&format!("X-Hop-{i}: {}\r\n", "h".repeat(40)));
    }
    reply.push_str(&format!("Content-Security-Policy: {}\r\n\r\nok", "script-src 'self' ".repeat(90)));

    let mut client = Client::new(MockConnection::new(reply.as_bytes(), 256, Wire::default()));
    let request = Request::new(Method::Get, "http://sensor.local/", Headers::new(), None);
    let response = client.request(&request).unwrap();

    assert_eq!(response.headers.len(), 50);
    assert_eq!(response.header("x-hop-47").map(str::len), Some(40));
    assert!(response.header("content-security-policy").unwrap().len() > 1500);
    assert_eq!(response.body, b"ok");
}

fn address() -> String {
    dotenv().ok();
    env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org:80".to_string())
}

#[derive(Serialize)]
struct Greeting {
    hello: String,
}

#[derive(Deserialize)]
struct Echo {
    json: serde_json::Value,
}

#[test]
#[ignore = "needs network access to TEST_HTTP_ADDRESS"]
fn test_http_get() {
    let body = Get::new(format!("http://{}/get", address())).send().unwrap();
    assert!(body.contains("\"url\""));
}

#[test]
#[ignore = "needs network access to TEST_HTTP_ADDRESS"]
fn test_http_post() {
    let echo: Echo = Post::new(format!("http://{}/post", address()))
        .format(Format::Json)
        .fetch_payload(&Greeting {
            hello: "world".into(),
        })
        .unwrap();
    assert_eq!(echo.json["hello"], "world");
}
