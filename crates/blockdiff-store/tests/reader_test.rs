// Integration tests for the file-backed DatasetReader

#![allow(clippy::unwrap_used, clippy::expect_used)]

use blockdiff_core::diff::{DiffEngine, DiffStatus};
use blockdiff_core::{DatasetReader, DiffConfig, ExErrorKind, ReportMode};
use blockdiff_store::snapshot::{write_snapshot_file, SnapshotReader, SnapshotV1};
use ndarray::IxDyn;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_reader_labels_dataset_with_path() {
    let path = fixture("snapshot_two_blocks.yaml");

    let ds = SnapshotReader::new().open(&path).unwrap();

    assert_eq!(ds.label, path.display().to_string());
    assert_eq!(ds.time, 0.25);
}

#[test]
fn test_write_then_read_preserves_dataset() {
    let temp = TempDir::new().unwrap();
    let original = SnapshotReader::new()
        .open(&fixture("snapshot_two_blocks.yaml"))
        .unwrap();

    for name in ["copy.yaml", "copy.json"] {
        let path = temp.path().join(name);
        write_snapshot_file(&path, &SnapshotV1::from(&original)).unwrap();

        let reread = SnapshotReader::new().open(&path).unwrap();
        assert_eq!(reread.fields, original.fields, "fields changed via {}", name);
        assert_eq!(reread.params, original.params);
        assert_eq!(reread.topology, original.topology);
        assert_eq!(reread.coordinates, original.coordinates);
    }
}

#[test]
fn test_nan_survives_yaml() {
    let temp = TempDir::new().unwrap();
    let mut ds = SnapshotReader::new()
        .open(&fixture("snapshot_two_blocks.yaml"))
        .unwrap();
    if let Some(density) = ds.fields.get_mut("density") {
        density[IxDyn(&[0, 0, 0, 0])] = f64::NAN;
    }
    let path = temp.path().join("nan.yaml");
    write_snapshot_file(&path, &SnapshotV1::from(&ds)).unwrap();

    let reread = SnapshotReader::new().open(&path).unwrap();
    assert!(reread.fields["density"][IxDyn(&[0, 0, 0, 0])].is_nan());
}

#[test]
fn test_engine_over_permuted_files_is_equivalent() {
    // Given: The same state stored with blocks in a different order
    let engine = DiffEngine::new(SnapshotReader::new(), DiffConfig::default()).unwrap();
    let mut out = Vec::new();

    // When: We compare the two files
    let outcome = engine
        .run(
            &fixture("snapshot_two_blocks.yaml"),
            &fixture("snapshot_two_blocks_permuted.json"),
            &mut out,
        )
        .unwrap();

    // Then: They are equivalent and the correspondence is the swap
    assert_eq!(outcome.status, DiffStatus::Equivalent);
    assert_eq!(outcome.correspondence, Some(vec![1, 0]));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Checking metadata"));
    assert!(text.contains("are equivalent"));
}

#[test]
fn test_engine_reports_unreadable_second_file() {
    let engine = DiffEngine::new(
        SnapshotReader::new(),
        DiffConfig::default().with_report(ReportMode::Quiet),
    )
    .unwrap();
    let mut out = Vec::new();

    let outcome = engine
        .run(
            &fixture("snapshot_two_blocks.yaml"),
            &fixture("snapshot_invalid_schema_version.yaml"),
            &mut out,
        )
        .unwrap();

    assert_eq!(outcome.status, DiffStatus::SecondUnreadable);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("*** ERROR: Unable to open"));
}

#[test]
fn test_invalid_snapshot_error_kind() {
    let err = SnapshotReader::new()
        .open(&fixture("snapshot_bad_field_length.yaml"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidSnapshot);
}
