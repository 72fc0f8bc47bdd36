use std::fs::File;
use std::io::Write;

use cruise_config::{ScenarioRow, load_scenario_csv};
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    (dir, path)
}

#[rstest]
fn loads_rows_with_optional_target() {
    let (_dir, path) = write_csv("tick,disturbance,target\n1,0,80\n200,200,\n400, 0 , 60\n");
    let rows = load_scenario_csv(&path).expect("valid scenario");
    assert_eq!(
        rows,
        vec![
            ScenarioRow {
                tick: 1,
                disturbance: 0.0,
                target: Some(80.0)
            },
            ScenarioRow {
                tick: 200,
                disturbance: 200.0,
                target: None
            },
            ScenarioRow {
                tick: 400,
                disturbance: 0.0,
                target: Some(60.0)
            },
        ]
    );
}

#[rstest]
fn rejects_wrong_headers() {
    let (_dir, path) = write_csv("step,dist,setpoint\n1,0,80\n");
    let err = load_scenario_csv(&path).expect_err("header mismatch");
    assert!(format!("{err}").contains("tick,disturbance,target"));
}

#[rstest]
#[case("tick,disturbance,target\n5,0,\n3,0,\n", "strictly increasing")]
#[case("tick,disturbance,target\n0,0,\n", "tick must be >= 1")]
#[case("tick,disturbance,target\n1,abc,\n", "invalid CSV row 2")]
#[case("tick,disturbance,target\n", "no rows")]
fn rejects_bad_rows(#[case] body: &str, #[case] needle: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_scenario_csv(&path).expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[rstest]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let err = load_scenario_csv(&dir.path().join("nope.csv")).expect_err("missing file");
    assert!(format!("{err}").contains("open scenario CSV"));
}
