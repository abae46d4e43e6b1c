mod common;

use common::FakeGateway;
use crlite_status::audit::{AuditArtifact, LocalAuditCache};
use crlite_status::models::{ArtifactData, AuditLog, EnrollmentRecord, RunIdentifier};
use std::fs;
use tempfile::TempDir;

const AUDIT: &str = r#"{"Entries": [{"IssuerSubject": "CN=A", "Issuer": "a", "Url": "http://a/1.crl", "Kind": "Valid, Processed"}]}"#;

fn run_id() -> RunIdentifier {
    "20230101-1".parse().unwrap()
}

#[tokio::test]
async fn test_ensure_cached_fetches_once() {
    let dir = TempDir::new().unwrap();
    let cache = LocalAuditCache::open(dir.path()).await.unwrap();
    let gateway = FakeGateway::new().with_object("20230101-1/crl-audit.json", AUDIT);

    let first = cache.ensure_cached(&gateway, &run_id(), AuditArtifact::CrlAudit).await.unwrap();
    let first_bytes = fs::read(&first).unwrap();
    let second = cache.ensure_cached(&gateway, &run_id(), AuditArtifact::CrlAudit).await.unwrap();
    let second_bytes = fs::read(&second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(gateway.fetch_count("20230101-1/crl-audit.json"), 1);
    assert_eq!(first, dir.path().join("20230101-1-crl-audit.json"));
}

#[tokio::test]
async fn test_cache_creates_nested_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let cache = LocalAuditCache::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    LocalAuditCache::open(&nested).await.unwrap();
    assert_eq!(cache.dir(), nested.as_path());
}

#[tokio::test]
async fn test_not_found_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let cache = LocalAuditCache::open(dir.path()).await.unwrap();
    let gateway = FakeGateway::new();

    let path = cache.ensure_cached(&gateway, &run_id(), AuditArtifact::Enrollment).await.unwrap();
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let loaded: ArtifactData<Vec<EnrollmentRecord>> =
        cache.load(&gateway, &run_id(), AuditArtifact::Enrollment).await;
    assert!(matches!(loaded, ArtifactData::Missing));
}

#[tokio::test]
async fn test_transport_failure_propagates_and_leaves_no_partial_file() {
    let dir = TempDir::new().unwrap();
    let cache = LocalAuditCache::open(dir.path()).await.unwrap();
    let gateway = FakeGateway::new().with_failure("20230101-1/crl-audit.json", 503);

    let err = cache.ensure_cached(&gateway, &run_id(), AuditArtifact::CrlAudit).await.unwrap_err();
    assert!(!err.is_not_found());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let loaded: ArtifactData<AuditLog> = cache.load(&gateway, &run_id(), AuditArtifact::CrlAudit).await;
    assert!(matches!(loaded, ArtifactData::Unreadable(_)));
}

#[tokio::test]
async fn test_existing_file_is_never_refetched() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("20230101-1-enrolled.json"), r#"[{"pubKeyHash": "a", "enrolled": true}]"#).unwrap();
    let cache = LocalAuditCache::open(dir.path()).await.unwrap();
    let gateway = FakeGateway::new().with_object("20230101-1/enrolled.json", "[]");

    let loaded: ArtifactData<Vec<EnrollmentRecord>> =
        cache.load(&gateway, &run_id(), AuditArtifact::Enrollment).await;
    assert_eq!(loaded.loaded().unwrap().len(), 1);
    assert_eq!(gateway.fetch_count("20230101-1/enrolled.json"), 0);
}

#[tokio::test]
async fn test_malformed_json_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let cache = LocalAuditCache::open(dir.path()).await.unwrap();
    let gateway = FakeGateway::new().with_object("20230101-1/crl-audit.json", "{not json");

    let loaded: ArtifactData<AuditLog> = cache.load(&gateway, &run_id(), AuditArtifact::CrlAudit).await;
    match loaded {
        ArtifactData::Unreadable(reason) => assert!(reason.contains("20230101-1-crl-audit.json")),
        other => panic!("expected unreadable, got {:?}", other),
    }
}
