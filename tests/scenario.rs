use std::path::PathBuf;

use canopy::{
    scenario::ScenarioLoader,
    snapshot::SnapshotWriter,
    tipping::default_tipping_groups,
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/tropical_belt.yaml")
}

#[test]
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader().load(scenario_path()).expect("scenario parses");
    assert_eq!(scenario.name, "tropical_belt");
    assert_eq!(scenario.countries.len(), 10);
    assert_eq!(scenario.parameters.co2_growth_rate, 1.5);
    assert_eq!(scenario.parameters.reforestation_rate, 5_000_000.0);
    assert_eq!(scenario.parameters.year, 2050);
    assert_eq!(scenario.initial.co2, 3_241_150_000_000.0);
    assert_eq!(scenario.tipping_groups(), default_tipping_groups());

    let tables = scenario.build_tables().unwrap();
    assert_eq!(tables.total_potential_ha(), 540_000_000.0);
    assert_eq!(tables.forestation()[0].0, "BRA");
    assert_eq!(tables.forestation()[9].0, "PHL");
}

#[test]
fn missing_scenario_reports_the_path() {
    let err = scenario_loader()
        .load("scenarios/does_not_exist.yaml")
        .unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.yaml"));
}

#[test]
fn tipping_years_rise_with_the_threshold() {
    let simulation = scenario_loader()
        .load(scenario_path())
        .unwrap()
        .build_simulation()
        .unwrap();
    let crossings = simulation.tipping_points();
    assert_eq!(crossings.len(), 4);
    assert!(crossings[0].year.is_some(), "1.5 °C should be crossed this century");
    for pair in crossings.windows(2) {
        match (pair[0].year, pair[1].year) {
            (Some(lower), Some(higher)) => assert!(lower <= higher),
            (None, Some(_)) => panic!("higher threshold crossed before lower one"),
            _ => {}
        }
    }
}

#[test]
fn run_emits_snapshot() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let simulation = scenario.build_simulation().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let snapshot_dir = temp_dir.path().join("snaps");

    let writer = SnapshotWriter::new(&snapshot_dir);
    let path = writer.write(&simulation, &scenario.name).unwrap();

    let expected = snapshot_dir.join("tropical_belt").join("trajectory_2050.json");
    assert_eq!(path, expected);
    let data = std::fs::read_to_string(expected).unwrap();
    assert!(
        data.contains("\"scenario\": \"tropical_belt\""),
        "snapshot should contain scenario metadata"
    );
    assert!(data.contains("\"2125\""), "snapshot should contain the full trajectory");
}
