use kira_tsnrqc::io::json_writer::{read_json, write_json};
use kira_tsnrqc::metrics::AnalysisResult;
use kira_tsnrqc::schema::v1::{InputMeta, NoiseSource, Results, TsnrQcV1};
use serde_json::Value;
use tempfile::TempDir;

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        roi_size: 3,
        roi_std: vec![1.0, 0.5, 0.34],
        radius_decorrelation: 1.0 / 0.34,
        rdc_degenerate: false,
        roi_signal_mean: vec![100.0, 101.0, 99.5, 100.5],
        roi_signal_mean_fitted: vec![100.1, 100.3, 100.3, 100.1],
        center_of_mass: vec![[4.5, 4.0, 1.5], [4.6, 4.0, 1.4]],
        center_of_mass_drift: vec![[0.0, 0.0, 0.0], [0.3, 0.0, -0.3]],
        reference_centroid: [4, 4, 1],
        sfnr_center: 120.0,
        sfnr_edge: 180.0,
    }
}

fn sample_report() -> TsnrQcV1 {
    let meta = InputMeta {
        series: "scan.nii.gz".to_string(),
        noise: None,
        mask: "mask.nii.gz".to_string(),
        shape: Some([10, 10, 4, 4]),
        voxel_size_mm: Some([3.0, 3.0, 3.0]),
        tr_s: Some(2.0),
        discard_vol: 3,
        noise_source: NoiseSource::QuadraticDetrend,
        tissue_voxels: Some(400),
    };
    let mut report = TsnrQcV1::empty("0.1.0", meta);
    report.results = Some(Results::from(&sample_result()));
    report.outputs.maps.push("scan_sfnr.nii.gz".to_string());
    report
}

#[test]
fn centroid_components_are_split_per_axis() {
    let results = Results::from(&sample_result());
    assert_eq!(results.center_of_mass_x, vec![4.5, 4.6]);
    assert_eq!(results.center_of_mass_z, vec![1.5, 1.4]);
    assert_eq!(results.center_of_mass_drift_x, vec![0.0, 0.3]);
    assert_eq!(results.center_of_mass_drift_z, vec![0.0, -0.3]);
}

#[test]
fn report_has_expected_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan_results.json");
    write_json(&path, &sample_report()).unwrap();

    let value: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(value["tool"], "kira-tsnrqc");
    assert_eq!(value["schema_version"], "v1");
    assert_eq!(value["input_meta"]["noise_source"], "quadratic_detrend");
    assert!(value["input_meta"]["noise"].is_null());

    let results = &value["results"];
    for key in [
        "roi_size",
        "roi_std",
        "radius_decorrelation",
        "rdc_degenerate",
        "roi_signal_mean",
        "roi_signal_mean_fitted",
        "center_of_mass_x",
        "center_of_mass_y",
        "center_of_mass_z",
        "center_of_mass_drift_x",
        "center_of_mass_drift_y",
        "center_of_mass_drift_z",
        "reference_centroid",
        "sfnr_center",
        "sfnr_edge",
    ] {
        assert!(results.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(results["roi_std"].as_array().unwrap().len(), 3);
}

#[test]
fn written_report_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan_results.json");
    write_json(&path, &sample_report()).unwrap();
    let back = read_json(&path).unwrap();
    assert_eq!(back.tool, "kira-tsnrqc");
    assert_eq!(back.input_meta.noise_source, NoiseSource::QuadraticDetrend);
    let results = back.results.unwrap();
    assert_eq!(results.reference_centroid, [4, 4, 1]);
    assert_eq!(results.sfnr_edge, 180.0);
}
