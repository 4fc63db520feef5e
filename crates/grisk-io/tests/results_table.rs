use std::fs;

use grisk_algo::MonteCarlo;
use grisk_io::results::{append_records, load_records, COLUMNS};

#[test]
fn test_two_runs_share_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simulation_results.csv");
    let mc = MonteCarlo::with_defaults(25).unwrap();

    let first = mc.run_seeded(Some(1));
    let second = mc.run_seeded(Some(2));
    let summary_a = append_records(&path, &first.records).unwrap();
    let summary_b = append_records(&path, &second.records).unwrap();
    assert!(summary_a.header_written);
    assert!(!summary_b.header_written);
    assert_eq!(summary_b.rows_written, 25);

    let text = fs::read_to_string(&path).unwrap();
    let header = COLUMNS.join(",");
    assert_eq!(text.lines().filter(|line| *line == header).count(), 1);

    let loaded = load_records(&path).unwrap();
    assert_eq!(loaded.len(), 50);
}

#[test]
fn test_reload_matches_written_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let mc = MonteCarlo::with_defaults(10).unwrap();
    let result = mc.run_seeded(Some(314));
    append_records(&path, &result.records).unwrap();

    let loaded = load_records(&path).unwrap();
    for (written, read) in result.records.iter().zip(&loaded) {
        assert_eq!(written.output, read.output);
        assert_eq!(written.rain_month, read.rain_month);
        assert_eq!(written.shared.weather, read.shared.weather);
        assert_eq!(written.independent.events_after_rain, read.independent.events_after_rain);
        for (a, b) in written.shared.gamma.iter().zip(&read.shared.gamma) {
            assert!((a - b).abs() <= 5e-6);
        }
    }
}

#[test]
fn test_empty_append_leaves_table_usable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let summary = append_records(&path, &[]).unwrap();
    assert_eq!(summary.rows_written, 0);
    assert!(!summary.header_written);

    let mc = MonteCarlo::with_defaults(3).unwrap();
    let summary = append_records(&path, &mc.run_seeded(Some(4)).records).unwrap();
    assert!(summary.header_written);
    assert_eq!(load_records(&path).unwrap().len(), 3);
}
