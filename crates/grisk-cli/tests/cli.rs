use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn grisk() -> Command {
    let mut cmd = Command::cargo_bin("grisk").unwrap();
    cmd.env_remove("GRISK_DATASET_DIR");
    cmd
}

/// Every file under `dir`, relative to it.
fn files_in(dir: &Path) -> Vec<String> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(dir).unwrap();
                found.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    found.sort();
    found
}

#[test]
fn grisk_simulate_writes_table_report_and_plots_only() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out/results.csv");
    let report = dir.path().join("out/report.json");
    let plots = dir.path().join("plots");

    grisk()
        .args([
            "simulate",
            "-n",
            "40",
            "--seed",
            "7",
            "--out",
            out.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
            "--plots",
            plots.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Appended 40 scenario rows"))
        .stdout(predicate::str::contains("SEGMENT"))
        .stdout(predicate::str::contains("Scenarios analyzed: 40"));

    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table.lines().count(), 41);
    assert!(table.starts_with("num_units_seg1_seg2,num_units_seg3,weather12"));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["scenarios"], 40);
    assert_eq!(report["segments"].as_array().unwrap().len(), 3);

    for segment in 1..=3 {
        assert!(plots
            .join(format!("Segment_{segment}_Failure_Probabilities.png"))
            .exists());
    }

    assert_eq!(
        files_in(dir.path()),
        vec![
            "out/report.json",
            "out/results.csv",
            "plots/Segment_1_Failure_Probabilities.png",
            "plots/Segment_2_Failure_Probabilities.png",
            "plots/Segment_3_Failure_Probabilities.png",
        ]
    );
}

#[test]
fn grisk_simulate_appends_under_one_header() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("results.csv");
    for seed in ["1", "2"] {
        grisk()
            .args([
                "simulate",
                "-n",
                "20",
                "--seed",
                seed,
                "--skip-analysis",
                "--out",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("SEGMENT").not());
    }
    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table.lines().count(), 41);
    assert_eq!(table.matches("num_units_seg1_seg2").count(), 1);

    grisk()
        .args(["analyze", "--input", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scenarios analyzed: 40"));
}

#[test]
fn grisk_simulate_same_seed_same_rows() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a/results.csv");
    let second = dir.path().join("b/results.csv");
    for out in [&first, &second] {
        grisk()
            .args([
                "simulate",
                "-n",
                "25",
                "--seed",
                "99",
                "--skip-analysis",
                "--out",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();
    }
    assert_eq!(
        fs::read_to_string(&first).unwrap(),
        fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn grisk_simulate_parallel_independent_of_threads() {
    let dir = tempdir().unwrap();
    let one = dir.path().join("one/results.csv");
    let many = dir.path().join("many/results.csv");
    for (out, threads) in [(&one, "1"), (&many, "3")] {
        grisk()
            .args([
                "simulate",
                "-n",
                "30",
                "--seed",
                "5",
                "--parallel",
                "--threads",
                threads,
                "--skip-analysis",
                "--out",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();
    }
    let table = fs::read_to_string(&one).unwrap();
    assert_eq!(table.lines().count(), 31);
    assert_eq!(table, fs::read_to_string(&many).unwrap());
}

#[test]
fn grisk_simulate_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("params.toml");
    fs::write(&config, "units_min = 35\nunits_max = 25\n").unwrap();
    let out = dir.path().join("results.csv");
    grisk()
        .args([
            "simulate",
            "-n",
            "10",
            "--config",
            config.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("units_min"));
    assert_eq!(files_in(dir.path()), vec!["params.toml"]);
}

#[test]
fn grisk_simulate_uses_config_overrides() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("params.json");
    fs::write(&config, r#"{"units_min": 22, "units_max": 22}"#).unwrap();
    let out = dir.path().join("results.csv");
    grisk()
        .args([
            "simulate",
            "-n",
            "5",
            "--seed",
            "3",
            "--skip-analysis",
            "--config",
            config.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    let table = fs::read_to_string(&out).unwrap();
    for row in table.lines().skip(1) {
        assert!(row.starts_with("22,22,"), "{row}");
    }
}

#[test]
fn grisk_analyze_missing_table_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.csv");
    grisk()
        .args(["analyze", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn grisk_dataset_list_and_describe() {
    grisk()
        .args(["dataset", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nws-winds"))
        .stdout(predicate::str::contains("ca-transmission-lines"));

    grisk()
        .args(["dataset", "list", "--tag", "wildfire"])
        .assert()
        .success()
        .stdout(predicate::str::contains("landfire-fuel"))
        .stdout(predicate::str::contains("nws-winds").not());

    let output = grisk()
        .args(["dataset", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 3);

    grisk()
        .args(["dataset", "describe", "nws-winds"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetch mode: forecast-zone"))
        .stdout(predicate::str::contains("winds.geojson"));

    grisk()
        .args(["dataset", "describe", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Available ids"));
}

#[test]
fn grisk_dataset_fetch_keeps_existing_file() {
    let dir = tempdir().unwrap();
    let existing = dir.path().join("winds.geojson");
    fs::write(&existing, "cached").unwrap();
    grisk()
        .args([
            "dataset",
            "fetch",
            "nws-winds",
            "--out",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("already downloaded"));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "cached");
}

#[test]
fn grisk_dataset_url_failure_exits_nonzero() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.json");
    grisk()
        .args([
            "dataset",
            "url",
            "http://127.0.0.1:9/unreachable",
            "--out",
            out.to_str().unwrap(),
            "--timeout-secs",
            "2",
        ])
        .assert()
        .failure();
    assert!(!out.exists());

    grisk()
        .args([
            "dataset",
            "url",
            "http://127.0.0.1:9/x",
            "--out",
            out.to_str().unwrap(),
            "--header",
            "no-separator",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME:VALUE"));
}

#[test]
fn grisk_dataset_to_geojson_converts_layer() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("webmap.json");
    let out = dir.path().join("geo/lines.geojson");
    let web_map = json!({
        "operationalLayers": [{
            "layerDefinition": {"name": "TransmissionLine_CEC"},
            "featureSet": {"features": [
                {"geometry": {"paths": [[[0.0, 0.0], [1000.0, 1000.0]]]}, "attributes": {"Name": "A"}},
                {"geometry": null, "attributes": {"Name": "B"}}
            ]}
        }]
    });
    fs::write(&input, web_map.to_string()).unwrap();

    grisk()
        .args([
            "dataset",
            "to-geojson",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 feature(s)"))
        .stdout(predicate::str::contains("1 skipped"));

    let collection: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(collection["features"][0]["properties"]["Name"], "A");

    grisk()
        .args([
            "dataset",
            "to-geojson",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--layer",
            "Substations",
        ])
        .assert()
        .failure();
}

#[test]
fn grisk_completions_bash() {
    grisk()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grisk"));
}

#[test]
fn grisk_completions_written_to_dir() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("completions");
    grisk()
        .args(["completions", "zsh", "--dir", target.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("_grisk"));
    let script = fs::read_to_string(target.join("_grisk")).unwrap();
    assert!(script.contains("#compdef grisk"));

    grisk().args(["runs", "list"]).assert().failure();
}
