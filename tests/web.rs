use axum::{extract::State, http::StatusCode, Json};

use canopy::{
    scenario::ScenarioLoader,
    web::{latest_state, tipping_points, trajectory, update_parameters, AppState, ParameterUpdate},
};

fn app_state() -> std::sync::Arc<AppState> {
    let scenario = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("scenarios/tropical_belt.yaml")
        .expect("scenario parses");
    let simulation = scenario.build_simulation().expect("simulation builds");
    AppState::new(scenario.name, simulation)
}

#[tokio::test]
async fn state_reports_the_viewed_year() {
    let state = app_state();
    let Json(envelope) = latest_state(State(state)).await;
    assert_eq!(envelope.scenario, "tropical_belt");
    assert_eq!(envelope.view.parameters.year, 2050);
    assert_eq!(envelope.view.temperatures.len(), 10);
}

#[tokio::test]
async fn trajectory_and_tipping_points_are_exposed() {
    let state = app_state();
    let Json(full) = trajectory(State(state.clone())).await;
    assert_eq!(full.len(), 101);
    let Json(crossings) = tipping_points(State(state)).await;
    assert_eq!(crossings.len(), 4);
}

#[tokio::test]
async fn valid_update_recomputes_and_broadcasts() {
    let state = app_state();
    let mut events = state.subscribe();

    let update = ParameterUpdate {
        reforestation_rate: Some(0.0),
        year: Some(2100),
        ..ParameterUpdate::default()
    };
    let response = update_parameters(State(state.clone()), Json(update)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = events.try_recv().expect("update broadcast");
    assert!(payload.contains("\"year\":2100"));

    let Json(envelope) = latest_state(State(state)).await;
    assert_eq!(envelope.view.parameters.year, 2100);
    assert_eq!(envelope.view.parameters.co2_growth_rate, 1.5);
    assert_eq!(envelope.view.state.total_reforested_area, 0.0);
}

#[tokio::test]
async fn invalid_update_is_rejected_without_side_effects() {
    let state = app_state();
    let mut events = state.subscribe();

    let update = ParameterUpdate {
        reforestation_rate: Some(-10.0),
        ..ParameterUpdate::default()
    };
    let response = update_parameters(State(state.clone()), Json(update)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(events.try_recv().is_err());

    let Json(envelope) = latest_state(State(state)).await;
    assert_eq!(envelope.view.parameters.reforestation_rate, 5_000_000.0);
}
