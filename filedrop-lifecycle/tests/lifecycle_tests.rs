use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{TimeDelta, Utc};

use filedrop_blob::{BlobStore, FsBlobStore};
use filedrop_core::{FileRecord, RetentionPeriod};
use filedrop_lifecycle::{IngestLimits, LifecycleError, LifecycleManager};
use filedrop_registry::{MemoryRegistry, MetadataRegistry};

// -- Helpers --------------------------------------------------------------

struct Harness {
    manager: LifecycleManager,
    registry: Arc<MemoryRegistry>,
    blobs: Arc<FsBlobStore>,
}

fn harness() -> Harness {
    harness_with_limits(IngestLimits::default())
}

fn harness_with_limits(limits: IngestLimits) -> Harness {
    let dir = std::env::temp_dir().join(format!("filedrop-lifecycle-{}", uuid::Uuid::new_v4()));
    let registry = Arc::new(MemoryRegistry::new());
    let blobs = Arc::new(FsBlobStore::new(dir));
    let manager = LifecycleManager::new(
        Arc::clone(&registry) as Arc<dyn MetadataRegistry>,
        Arc::clone(&blobs) as Arc<dyn BlobStore>,
        limits,
    );
    Harness {
        manager,
        registry,
        blobs,
    }
}

/// Plant a record directly, bypassing ingest, so tests can control
/// `created_at` and `expires_at`.
async fn plant_record(
    h: &Harness,
    id: &str,
    expires_at: Option<chrono::DateTime<Utc>>,
    created_at: chrono::DateTime<Utc>,
) -> FileRecord {
    let storage_name = format!("{id}_planted.txt");
    let storage_path = h
        .blobs
        .put(Bytes::from_static(b"planted"), &storage_name)
        .await
        .unwrap();
    let record = FileRecord {
        id: id.to_owned(),
        original_name: "planted.txt".into(),
        storage_name,
        size_bytes: 7,
        mime_type: "text/plain".into(),
        extension: ".txt".into(),
        created_at,
        expires_at,
        storage_path,
    };
    h.registry.insert(record.clone()).await.unwrap();
    record
}

// -- Ingest & retrieve ----------------------------------------------------

#[tokio::test]
async fn ingest_then_retrieve_round_trips() {
    let h = harness();
    let record = h
        .manager
        .ingest(
            Bytes::from_static(b"some report body"),
            "Q3 report (final).pdf",
            Some("application/pdf".into()),
            RetentionPeriod::SevenDays,
        )
        .await
        .unwrap();

    assert_eq!(record.original_name, "Q3 report (final).pdf");
    assert_eq!(record.storage_name, format!("{}_Q3_report_final_.pdf", record.id));
    assert_eq!(record.extension, ".pdf");
    assert!(record.expires_at.is_some());

    let (fetched, data) = h.manager.retrieve(&record.id).await.unwrap();
    assert_eq!(&data[..], b"some report body");
    assert_eq!(fetched.original_name, record.original_name);
}

#[tokio::test]
async fn missing_mime_defaults_to_octet_stream() {
    let h = harness();
    let record = h
        .manager
        .ingest(
            Bytes::from_static(b"x"),
            "blob.zip",
            None,
            RetentionPeriod::OneDay,
        )
        .await
        .unwrap();
    assert_eq!(record.mime_type, "application/octet-stream");
}

#[tokio::test]
async fn ingest_rejects_empty_file() {
    let h = harness();
    let err = h
        .manager
        .ingest(Bytes::new(), "empty.txt", None, RetentionPeriod::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::EmptyFile));
}

#[tokio::test]
async fn ingest_rejects_oversized_file() {
    let h = harness_with_limits(IngestLimits {
        max_size_bytes: 4,
        ..IngestLimits::default()
    });
    let err = h
        .manager
        .ingest(
            Bytes::from_static(b"way too big"),
            "big.txt",
            None,
            RetentionPeriod::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::FileTooLarge { size: 11, limit: 4 }
    ));
}

#[tokio::test]
async fn ingest_rejects_disallowed_extension() {
    let h = harness();
    let err = h
        .manager
        .ingest(
            Bytes::from_static(b"#!/bin/sh"),
            "script.sh",
            None,
            RetentionPeriod::default(),
        )
        .await
        .unwrap_err();
    match err {
        LifecycleError::UnsupportedType(ext) => assert_eq!(ext, ".sh"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let h = harness();
    let err = h.manager.retrieve("no-such-id").await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}

// -- Expiry ---------------------------------------------------------------

#[tokio::test]
async fn unlimited_retention_never_expires() {
    let h = harness();
    let record = h
        .manager
        .ingest(
            Bytes::from_static(b"keep me"),
            "keep.txt",
            None,
            RetentionPeriod::Unlimited,
        )
        .await
        .unwrap();
    assert!(record.expires_at.is_none());
    assert!(h.manager.retrieve(&record.id).await.is_ok());
}

#[tokio::test]
async fn expired_record_is_reaped_on_access() {
    let h = harness();
    let past = Utc::now() - TimeDelta::minutes(5);
    let record = plant_record(&h, "expired01", Some(past), past).await;

    let err = h.manager.retrieve(&record.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Expired(_)));

    // The reap removed both metadata and bytes; a second attempt sees
    // nothing at all.
    let err = h.manager.retrieve(&record.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
    assert!(!h.blobs.exists(&record.storage_path).await);
    assert_eq!(h.manager.metrics().snapshot().reaped_on_access, 1);
}

#[tokio::test]
async fn describe_applies_the_same_expiry_checks() {
    let h = harness();
    let past = Utc::now() - TimeDelta::seconds(1);
    let record = plant_record(&h, "expired02", Some(past), past).await;

    let err = h.manager.describe(&record.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Expired(_)));
    let err = h.manager.describe(&record.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_retrieves_of_expired_record_purge_once() {
    let h = harness();
    let past = Utc::now() - TimeDelta::minutes(1);
    let record = plant_record(&h, "expired03", Some(past), past).await;

    let (a, b) = tokio::join!(
        h.manager.retrieve(&record.id),
        h.manager.retrieve(&record.id)
    );
    for outcome in [a, b] {
        assert!(matches!(
            outcome.unwrap_err(),
            LifecycleError::Expired(_) | LifecycleError::NotFound(_)
        ));
    }
    assert!(!h.blobs.exists(&record.storage_path).await);
    assert_eq!(h.manager.metrics().snapshot().reaped_on_access, 1);
}

// -- Self-healing ---------------------------------------------------------

#[tokio::test]
async fn missing_bytes_purge_stale_metadata() {
    let h = harness();
    let record = h
        .manager
        .ingest(
            Bytes::from_static(b"fragile"),
            "fragile.txt",
            None,
            RetentionPeriod::Unlimited,
        )
        .await
        .unwrap();

    // Tamper with the blob out-of-band.
    std::fs::remove_file(&record.storage_path).unwrap();

    let err = h.manager.retrieve(&record.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
    assert!(h.registry.get(&record.id).await.unwrap().is_none());
}

// -- Listing --------------------------------------------------------------

#[tokio::test]
async fn list_paginates_newest_first() {
    let h = harness();
    let now = Utc::now();
    for i in 0..25 {
        plant_record(&h, &format!("rec{i:02}"), None, now - TimeDelta::minutes(i)).await;
    }

    let (records, pagination) = h.manager.list(2, 10).await.unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(pagination.total, 25);
    assert_eq!(pagination.total_pages, 3);
    // Newest first: page 2 holds the 11th through 20th most recent.
    assert_eq!(records.first().unwrap().id, "rec10");
    assert_eq!(records.last().unwrap().id, "rec19");

    let (records, _) = h.manager.list(3, 10).await.unwrap();
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn list_excludes_expired_records() {
    let h = harness();
    let now = Utc::now();
    plant_record(&h, "live0001", None, now).await;
    plant_record(&h, "dead0001", Some(now - TimeDelta::seconds(1)), now).await;

    let (records, pagination) = h.manager.list(1, 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "live0001");
    assert_eq!(pagination.total, 1);
}

#[tokio::test]
async fn list_treats_zero_page_or_limit_as_empty() {
    let h = harness();
    plant_record(&h, "solo0001", None, Utc::now()).await;

    let (records, pagination) = h.manager.list(0, 10).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(pagination.total, 1);

    let (records, pagination) = h.manager.list(1, 0).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(pagination.total_pages, 0);
}

// -- Reconciliation -------------------------------------------------------

#[tokio::test]
async fn reconcile_purges_expired_and_is_idempotent() {
    let h = harness();
    let now = Utc::now();
    let dead_a = plant_record(&h, "dead000a", Some(now - TimeDelta::hours(1)), now).await;
    let dead_b = plant_record(&h, "dead000b", Some(now - TimeDelta::hours(2)), now).await;
    let live = plant_record(&h, "live000a", None, now).await;

    let report = h.manager.reconcile().await.unwrap();
    assert_eq!(report.purged, 2);
    assert_eq!(report.leaked_blobs, 0);
    assert!(!h.blobs.exists(&dead_a.storage_path).await);
    assert!(!h.blobs.exists(&dead_b.storage_path).await);
    assert!(h.blobs.exists(&live.storage_path).await);
    assert!(h.registry.get(&live.id).await.unwrap().is_some());

    let report = h.manager.reconcile().await.unwrap();
    assert_eq!(report.purged, 0);
    assert_eq!(h.manager.metrics().snapshot().swept, 2);
}

// -- Scheduler ------------------------------------------------------------

#[tokio::test]
async fn scheduler_sweeps_periodically_and_shuts_down() {
    let h = harness();
    let past = Utc::now() - TimeDelta::minutes(1);
    let record = plant_record(&h, "swept001", Some(past), past).await;

    let manager = Arc::new(h.manager);
    let handle = filedrop_lifecycle::CleanupScheduler::spawn(
        Arc::clone(&manager),
        std::time::Duration::from_millis(10),
    );

    // Give the scheduler a couple of ticks to run the sweep.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(matches!(
        manager.retrieve(&record.id).await.unwrap_err(),
        LifecycleError::NotFound(_)
    ));
    assert_eq!(manager.metrics().snapshot().swept, 1);

    handle.shutdown().await;

    let _ = std::fs::remove_dir_all(h.blobs.root());
}
