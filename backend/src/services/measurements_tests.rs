use std::collections::HashSet;

use chrono::Utc;

use super::measurements::*;
use crate::db::repositories::LocalRepository;
use crate::db::repository::{MeasurementRepository, RepositoryError};
use crate::models::{ListOptions, NewMeasurement};

#[tokio::test]
async fn test_record_returns_same_values_with_fresh_id() {
    let repo = LocalRepository::new();
    let started = Utc::now();

    let first = record_measurement(&repo, NewMeasurement::new(21.5, "sensor-1"))
        .await
        .unwrap();
    let second = record_measurement(&repo, NewMeasurement::new(21.5, "sensor-1"))
        .await
        .unwrap();

    assert_eq!(first.temperature, 21.5);
    assert_eq!(first.device_id, "sensor-1");
    assert!(first.created_at >= started);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_listing_returns_every_recorded_measurement() {
    let repo = LocalRepository::new();
    let mut recorded = HashSet::new();
    for i in 0..7 {
        let response = record_measurement(&repo, NewMeasurement::new(i as f64, format!("dev-{i}")))
            .await
            .unwrap();
        recorded.insert(response.id);
    }

    let listed = get_recent_measurements(&repo, &ListOptions::unbounded())
        .await
        .unwrap();
    assert_eq!(listed.len(), 7);
    let listed_ids: HashSet<_> = listed.iter().map(|m| m.id).collect();
    assert_eq!(listed_ids, recorded);
}

#[tokio::test]
async fn test_repeated_reads_are_stable() {
    let repo = LocalRepository::new();
    for t in [10.0, 11.0, 12.0] {
        record_measurement(&repo, NewMeasurement::new(t, "dev"))
            .await
            .unwrap();
    }

    let a = get_recent_measurements(&repo, &ListOptions::unbounded())
        .await
        .unwrap();
    let b = get_recent_measurements(&repo, &ListOptions::unbounded())
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_limit_is_applied() {
    let repo = LocalRepository::new();
    for t in 0..4 {
        record_measurement(&repo, NewMeasurement::new(t as f64, "dev"))
            .await
            .unwrap();
    }

    let listed = get_recent_measurements(&repo, &ListOptions::with_limit(3))
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn test_storage_errors_propagate_unchanged() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let err = record_measurement(&repo, NewMeasurement::new(20.0, "dev"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));

    let err = get_recent_measurements(&repo, &ListOptions::unbounded())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));
}

#[tokio::test]
async fn test_works_through_trait_object() {
    let repo: std::sync::Arc<dyn MeasurementRepository> = std::sync::Arc::new(LocalRepository::new());
    record_measurement(repo.as_ref(), NewMeasurement::new(-12.5, "garage"))
        .await
        .unwrap();
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[test]
fn test_to_response_is_a_plain_projection() {
    let measurement = crate::models::Measurement {
        id: crate::models::MeasurementId::generate(),
        temperature: 55.5,
        device_id: "boiler".to_string(),
        created_at: Utc::now(),
    };
    let response = to_response(&measurement);
    assert_eq!(response.id, measurement.id);
    assert_eq!(response.temperature, measurement.temperature);
    assert_eq!(response.device_id, measurement.device_id);
    assert_eq!(response.created_at, measurement.created_at);
}
