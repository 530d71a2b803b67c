//! Registry client tests against a mock registry
//!
//! Tests cover:
//! - Latest version and version list extraction
//! - Null, missing, and malformed metadata
//! - Transport and HTTP status failures
//! - Version manifest resolution by tag and literal

mod common;

use almost_package::{Error, RegistryClient};
use common::*;
use serde_json::json;
use wiremock::MockServer;

fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::with_client(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn test_get_latest_version() {
    let server = MockServer::start().await;
    let document = MetadataBuilder::new(SCOPED_PACKAGE)
        .latest(VERSION_1_2_0)
        .bare_version(VERSION_1_0_0)
        .bare_version(VERSION_1_2_0)
        .build();
    mock_package_metadata(&server, SCOPED_PACKAGE, &document).await;

    let latest = client_for(&server)
        .get_latest_version(SCOPED_PACKAGE)
        .await
        .unwrap();
    assert_eq!(latest.as_deref(), Some(VERSION_1_2_0));
}

#[tokio::test]
async fn test_get_all_versions_preserves_registry_order() {
    let server = MockServer::start().await;
    let document = MetadataBuilder::new(UNSCOPED_PACKAGE)
        .bare_version(VERSION_2_0_0)
        .bare_version(VERSION_1_0_0)
        .bare_version(VERSION_1_2_0)
        .build();
    mock_package_metadata(&server, UNSCOPED_PACKAGE, &document).await;

    let versions = client_for(&server)
        .get_all_versions(UNSCOPED_PACKAGE)
        .await
        .unwrap();
    assert_eq!(versions, vec![VERSION_2_0_0, VERSION_1_0_0, VERSION_1_2_0]);
}

#[tokio::test]
async fn test_missing_latest_tag() {
    let server = MockServer::start().await;
    let document = MetadataBuilder::new(SCOPED_PACKAGE)
        .bare_version(VERSION_1_0_0)
        .build();
    mock_package_metadata(&server, SCOPED_PACKAGE, &document).await;

    let latest = client_for(&server)
        .get_latest_version(SCOPED_PACKAGE)
        .await
        .unwrap();
    assert!(latest.is_none());
}

#[tokio::test]
async fn test_null_metadata() {
    let server = MockServer::start().await;
    mock_package_raw(&server, SCOPED_PACKAGE, "null").await;

    let client = client_for(&server);
    assert!(client.get_package_info(SCOPED_PACKAGE).await.unwrap().is_none());
    assert!(client.get_all_versions(SCOPED_PACKAGE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_versions_not_an_object() {
    let server = MockServer::start().await;
    mock_package_metadata(
        &server,
        SCOPED_PACKAGE,
        &json!({ "name": SCOPED_PACKAGE, "versions": "1.0.0" }),
    )
    .await;

    let versions = client_for(&server)
        .get_all_versions(SCOPED_PACKAGE)
        .await
        .unwrap();
    assert!(versions.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    mock_package_raw(&server, SCOPED_PACKAGE, "<html>gateway</html>").await;

    let result = client_for(&server).get_package_info(SCOPED_PACKAGE).await;
    assert!(matches!(result, Err(Error::MalformedMetadata { .. })));
}

#[tokio::test]
async fn test_not_found_status() {
    let server = MockServer::start().await;
    mock_package_status(&server, MISSING_PACKAGE, 404).await;

    let result = client_for(&server).get_latest_version(MISSING_PACKAGE).await;
    match result {
        Err(Error::RegistryError { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected RegistryError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_registry() {
    let client = RegistryClient::with_client(unreachable_registry(), reqwest::Client::new());

    let result = client.get_latest_version(SCOPED_PACKAGE).await;
    let err = result.unwrap_err();
    assert!(matches!(err, Error::RegistryUnavailable { .. }));
    assert!(err.is_registry_failure());
}

#[tokio::test]
async fn test_get_version_manifest_by_tag() {
    let server = MockServer::start().await;
    let document = MetadataBuilder::new(SCOPED_PACKAGE)
        .latest(VERSION_1_2_0)
        .version(VERSION_1_2_0, "http://r/tpl-a-1.2.0.tgz", Some("sha512-abc"))
        .build();
    mock_package_metadata(&server, SCOPED_PACKAGE, &document).await;

    let manifest = client_for(&server)
        .get_version_manifest(SCOPED_PACKAGE, "latest")
        .await
        .unwrap();
    assert_eq!(manifest.version, VERSION_1_2_0);
    assert_eq!(manifest.dist.tarball, "http://r/tpl-a-1.2.0.tgz");
    assert_eq!(manifest.dist.integrity.as_deref(), Some("sha512-abc"));
}

#[tokio::test]
async fn test_get_version_manifest_unknown_version() {
    let server = MockServer::start().await;
    let document = MetadataBuilder::new(SCOPED_PACKAGE)
        .latest(VERSION_1_2_0)
        .bare_version(VERSION_1_2_0)
        .build();
    mock_package_metadata(&server, SCOPED_PACKAGE, &document).await;

    let result = client_for(&server)
        .get_version_manifest(SCOPED_PACKAGE, VERSION_2_0_0)
        .await;
    assert!(matches!(result, Err(Error::VersionNotFound { .. })));
}
