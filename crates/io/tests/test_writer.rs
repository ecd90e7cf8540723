//! Integration test: round-trip tensors and write selection reports.

use aepsel_events::{DurationClass, EventCatalog, EventId, ResultTensor};
use aepsel_io::{read_tensor, write_report, write_tensor};
use aepsel_select::{AepTier, CancelToken, SelectConfig, TargetTable, run_selection};
use ndarray::array;

fn fixture() -> ResultTensor {
    let catalog =
        EventCatalog::new(vec![DurationClass::new(24), DurationClass::new(48)], 3).expect("catalog");
    let data = vec![
        1.0, 2.0, // 024_0001
        f64::NAN, 2.5, // 024_0002
        1.5, 2.2, // 024_0003
        3.0, 4.0, // 048_0001
        2.0, f64::NAN, // 048_0002
        0.5, 1.0, // 048_0003
    ];
    ResultTensor::from_vec(catalog, 2, data).expect("fixture is valid")
}

#[test]
fn round_trip_tensor_keeps_missing_values() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("levels.json");

    let t = fixture();
    write_tensor(&path, &t).expect("write succeeds");
    let back = read_tensor(&path).expect("read succeeds");

    assert_eq!(back.catalog(), t.catalog());
    assert_eq!(back.n_sites(), 2);
    assert!(back.value(EventId::new(2), 0).unwrap().is_nan());
    assert!(back.value(EventId::new(5), 1).unwrap().is_nan());
    assert_eq!(back.value(EventId::new(4), 1).unwrap(), 4.0);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("null"));
}

#[test]
fn report_written_as_json() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("report.json");

    let targets = TargetTable::new(
        vec![AepTier::new(2).unwrap(), AepTier::new(100).unwrap()],
        array![[1.0, 2.0], [3.0, 4.0]],
        array![[0.0, 0.0], [0.0, 0.0]],
    )
    .unwrap();
    let report = run_selection(
        &fixture(),
        &targets,
        None,
        &SelectConfig::new(),
        &CancelToken::new(),
    )
    .unwrap();
    write_report(&path, &report).expect("write succeeds");

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["envelope"].as_array().unwrap().len(), 4);
    assert_eq!(v["envelope"][2]["label"], "048_0001");
    assert!(v["failures"].as_array().unwrap().is_empty());
}
