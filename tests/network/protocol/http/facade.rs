use crate::{MockNetwork, reply};
use librest::Error;
use librest::network::application::http::{
    Delete, Get, Method, NetworkExecutor, Options, Payload, Post, Put, UrlBuilder,
};
use librest::network::error::Error as TransportError;
use librest::serialization::{Codec, Encoding, Format, SerializerKind};
use serde::{Deserialize, Serialize};
use tracing_test::traced_test;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Parameter {
    key: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "result")]
struct ApiResult<T> {
    code: String,
    successful: bool,
    message: String,
    #[serde(rename = "detailedmessage")]
    detailed_message: String,
    #[serde(rename = "parameter", default)]
    parameters: Vec<Parameter>,
    value: T,
}

fn sample() -> ApiResult<i32> {
    ApiResult {
        code: "OK".into(),
        successful: true,
        message: "done".into(),
        detailed_message: "none".into(),
        parameters: vec![Parameter {
            key: "a".into(),
            value: "1".into(),
        }],
        value: 42,
    }
}

const SAMPLE_JSON: &str = r#"{"code":"OK","successful":true,"message":"done","detailedmessage":"none","parameter":[{"key":"a","value":"1"}],"value":42}"#;

fn executor(network: &MockNetwork) -> NetworkExecutor<MockNetwork> {
    NetworkExecutor::new(network.clone())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn test_get_send_passes_body_through() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "  hello <world> "));
    let mut get = Get::with_executor("http://device.local:8080/status?verbose=1", executor(&network));

    let body = get.send().unwrap();
    assert_eq!(body, "  hello <world> ");

    let request = network.wire.request();
    assert!(request.starts_with("GET /status?verbose=1 HTTP/1.1\r\nHost: device.local:8080\r\n"));
    assert!(request.contains("User-Agent: librest/"));
    assert!(request.contains("Connection: close\r\n"));
    assert!(!request.contains("Content-Length"));
    assert!(!request.contains("Accept"));
    assert_eq!(*network.wire.remotes.borrow(), vec!["device.local:8080".to_string()]);
    assert_eq!(network.wire.closed.get(), 1);
}

#[test]
fn test_get_fetch_xml_contract() {
    let xml = Codec::new(Format::Xml, SerializerKind::ContractBased)
        .serialize_to_string(&sample())
        .unwrap();
    let network = MockNetwork::replying(&reply("200 OK", "application/xml; charset=utf-8", &xml));
    let mut get = Get::with_executor("http://device.local/result", executor(&network));

    let result: ApiResult<i32> = get.fetch().unwrap();
    assert_eq!(result, sample());
    assert!(network.wire.request().contains("Accept: application/xml\r\n"));
}

#[test]
fn test_put_typed_xml_payload() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "stored"));
    let mut put = Put::with_executor("http://device.local/result/7", executor(&network));

    assert_eq!(put.send_payload(&sample()).unwrap(), "stored");

    let expected = Codec::new(Format::Xml, SerializerKind::ContractBased)
        .serialize_to_string(&sample())
        .unwrap();
    let request = network.wire.request();
    assert!(request.starts_with("PUT /result/7 HTTP/1.1\r\n"));
    assert!(request.contains("Content-Type: application/xml; charset=utf-8\r\n"));
    assert!(request.contains(&format!("Content-Length: {}\r\n", expected.len())));
    assert_eq!(network.wire.body(), expected);
    assert!(!expected.contains("xmlns"));
}

#[test]
fn test_post_fetch_json() {
    let network = MockNetwork::replying(&reply("201 Created", "application/json", SAMPLE_JSON));
    let mut post = Post::with_executor("http://device.local/results", executor(&network)).format(Format::Json);

    let created: ApiResult<i32> = post.fetch_payload(&sample()).unwrap();
    assert_eq!(created, sample());

    let request = network.wire.request();
    assert!(request.starts_with("POST /results HTTP/1.1\r\n"));
    assert!(request.contains("Content-Type: application/json; charset=utf-8\r\n"));
    assert!(request.contains("Accept: application/json\r\n"));
    assert_eq!(network.wire.body(), SAMPLE_JSON);
}

#[test]
fn test_payload_and_response_formats_differ() {
    let network = MockNetwork::replying(&reply("200 OK", "application/json", SAMPLE_JSON));
    let mut post = Post::with_executor("http://device.local/results", executor(&network))
        .payload_format(Format::Xml)
        .format(Format::Json);

    let answer: ApiResult<i32> = post.fetch_payload(&sample()).unwrap();
    assert_eq!(answer.value, 42);

    let request = network.wire.request();
    assert!(request.contains("Content-Type: application/xml; charset=utf-8\r\n"));
    assert!(request.contains("Accept: application/json\r\n"));
    assert!(network.wire.body().starts_with("<?xml"));
}

#[test]
fn test_text_payload_is_verbatim() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "ok"));
    let mut put = Put::with_executor("http://device.local/raw", executor(&network)).format(Format::Json);

    // The declared format decides the content type, not the text.
    put.send_text("<not-json/>").unwrap();
    let request = network.wire.request();
    assert!(request.contains("Content-Type: application/json; charset=utf-8\r\n"));
    assert!(request.contains("Content-Length: 11\r\n"));
    assert_eq!(network.wire.body(), "<not-json/>");
}

#[test]
fn test_fetch_text_decodes_response() {
    let network = MockNetwork::replying(&reply("200 OK", "application/json", SAMPLE_JSON));
    let mut post = Post::with_executor("http://device.local/query", executor(&network)).format(Format::Json);
    let answer: ApiResult<i32> = post.fetch_text(r#"{"id":1}"#).unwrap();
    assert_eq!(answer, sample());
    assert_eq!(network.wire.body(), r#"{"id":1}"#);
}

#[test]
fn test_last_payload_wins() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "ok"));
    let mut post = Post::with_executor("http://device.local/queue", executor(&network));

    post.set_payload(&sample()).unwrap();
    post.set_payload_text("second");
    assert!(post.http().pending().is_some());
    post.send().unwrap();

    assert_eq!(network.wire.body(), "second");
    assert!(post.http().pending().is_none());
}

#[test]
fn test_empty_put_announces_zero_length() {
    let network = MockNetwork::replying(&reply("204 No Content", "text/plain", ""));
    let mut put = Put::with_executor("http://device.local/touch", executor(&network));
    assert_eq!(put.send().unwrap(), "");
    assert!(network.wire.request().contains("Content-Length: 0\r\n"));
}

#[test]
fn test_payload_encoding() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "ok"));
    let mut put = Put::with_executor("http://device.local/result", executor(&network))
        .format(Format::Json)
        .payload_encoding(Encoding::Latin1);

    let mut value = sample();
    value.message = "caf\u{e9}".into();
    put.send_payload(&value).unwrap();

    let written = network.wire.written.borrow();
    assert!(contains(&written, b"Content-Type: application/json; charset=iso-8859-1\r\n"));
    assert!(contains(&written, b"\"message\":\"caf\xe9\""));
}

#[test]
fn test_delete_fetch_reflection() {
    let xml = Codec::new(Format::Xml, SerializerKind::ReflectionBased)
        .serialize_to_string(&sample())
        .unwrap();
    assert!(xml.contains("<ApiResultOfI32>"));
    let network = MockNetwork::replying(&reply("200 OK", "application/xml", &xml));
    let mut delete = Delete::with_executor("http://device.local/result/7", executor(&network))
        .serializer(SerializerKind::ReflectionBased);

    let removed: ApiResult<i32> = delete.fetch().unwrap();
    assert_eq!(removed, sample());
    assert!(network.wire.request().starts_with("DELETE /result/7 HTTP/1.1\r\n"));
}

#[test]
fn test_call_overrides_win() {
    let network = MockNetwork::replying(&reply("200 OK", "application/json", SAMPLE_JSON));
    let mut put = Put::with_executor("http://device.local/result", executor(&network)).format(Format::Xml);

    let answer: ApiResult<i32> = put
        .http_mut()
        .call(Payload::Typed(&sample()), Options::new().format(Format::Json))
        .unwrap();
    assert_eq!(answer, sample());
    assert_eq!(network.wire.body(), SAMPLE_JSON);
    assert_eq!(put.http().method(), Method::Put);
}

#[test]
fn test_custom_headers() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "ok"));
    let mut get = Get::with_executor("http://device.local/", executor(&network))
        .header("User-Agent", "gateway/1.0")
        .header("X-Device", "42");
    get.send().unwrap();

    let request = network.wire.request();
    assert!(request.contains("User-Agent: gateway/1.0\r\n"));
    assert!(!request.contains("librest/"));
    assert!(request.contains("X-Device: 42\r\n"));
}

#[test]
fn test_error_status() {
    let network = MockNetwork::replying(&reply("500 Internal Server Error", "application/json", SAMPLE_JSON));
    let mut get = Get::with_executor("http://device.local/result", executor(&network)).format(Format::Json);

    let err = get.fetch::<ApiResult<i32>>().unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::UnexpectedStatus(500))));
    assert_eq!(network.wire.closed.get(), 1);
}

#[test]
fn test_json_response_read_as_xml_fails() {
    let network = MockNetwork::replying(&reply("200 OK", "application/json", SAMPLE_JSON));
    let mut get = Get::with_executor("http://device.local/result", executor(&network));
    let err = get.fetch::<ApiResult<i32>>().unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_connection_refused() {
    let network = MockNetwork::refusing();
    let mut get = Get::with_executor("http://device.local/", executor(&network));
    let err = get.send().unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::ConnectionRefused)));
}

#[test]
fn test_connection_closed_after_protocol_error() {
    let network = MockNetwork::replying("garbage\r\n\r\n");
    let mut get = Get::with_executor("http://device.local/", executor(&network));
    let err = get.send().unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::ProtocolError)));
    assert_eq!(network.wire.closed.get(), 1);
}

#[test]
fn test_builder_constructor() {
    let get = Get::with_builder(|b| b.host("device.local").port(8080).path("api/items").query("tag", "a b"));
    assert_eq!(get.http().url(), "http://device.local:8080/api/items?tag=a%20b");

    let url = UrlBuilder::new().host("device.local").segment("items").build();
    assert_eq!(url, "http://device.local/items");
}

#[traced_test]
#[test]
fn test_dispatch_is_logged() {
    let network = MockNetwork::replying(&reply("200 OK", "text/plain", "ok"));
    let mut get = Get::with_executor("http://device.local/logged", executor(&network));
    get.send().unwrap();
    assert!(logs_contain("dispatching request"));
    assert!(logs_contain("response received"));
}
