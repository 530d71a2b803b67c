//! Mock server helpers for registry and tarball endpoints

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `document` at `GET /{name}`
pub async fn mock_package_metadata(server: &MockServer, name: &str, document: &Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(server)
        .await;
}

/// Serve `document` at `GET /{name}` exactly `times` times
pub async fn mock_package_metadata_expecting(
    server: &MockServer,
    name: &str,
    document: &Value,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .expect(times)
        .mount(server)
        .await;
}

/// Answer `GET /{name}` with `status` and an empty body
pub async fn mock_package_status(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answer `GET /{name}` with a raw body
pub async fn mock_package_raw(server: &MockServer, name: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve a tarball at `GET /tarballs/{file}` and return its URL
pub async fn mock_tarball(server: &MockServer, file: &str, content: &[u8]) -> String {
    Mock::given(method("GET"))
        .and(path(format!("/tarballs/{}", file)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
    format!("{}/tarballs/{}", server.uri(), file)
}

/// URL of a registry that refuses connections
pub fn unreachable_registry() -> String {
    "http://127.0.0.1:9".to_string()
}
