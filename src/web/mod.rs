use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    config::SimulationParameters,
    simulation::{Simulation, SimulationView},
    tipping::TippingPointCrossing,
    trajectory::Trajectory,
};

pub struct WebServerConfig {
    pub scenario_name: String,
    pub simulation: Simulation,
    pub host: String,
    pub port: u16,
}

pub struct AppState {
    scenario_name: String,
    simulation: Mutex<Simulation>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(scenario_name: impl Into<String>, simulation: Simulation) -> Arc<Self> {
        let (broadcaster, _) = broadcast::channel::<String>(64);
        Arc::new(Self {
            scenario_name: scenario_name.into(),
            simulation: Mutex::new(simulation),
            broadcaster,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcaster.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Simulation> {
        // Outputs are swapped in whole, so a poisoned guard still holds a complete session.
        self.simulation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub scenario: String,
    pub view: SimulationView,
}

/// Partial parameter update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterUpdate {
    pub co2_growth_rate: Option<f64>,
    pub reforestation_rate: Option<f64>,
    pub year: Option<u32>,
}

impl ParameterUpdate {
    pub fn apply_to(&self, current: SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            co2_growth_rate: self.co2_growth_rate.unwrap_or(current.co2_growth_rate),
            reforestation_rate: self
                .reforestation_rate
                .unwrap_or(current.reforestation_rate),
            year: self.year.unwrap_or(current.year),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/state", get(latest_state))
        .route("/api/trajectory", get(trajectory))
        .route("/api/tipping-points", get(tipping_points))
        .route("/api/parameters", post(update_parameters))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario_name,
        simulation,
        host,
        port,
    } = config;

    let state = AppState::new(scenario_name.clone(), simulation);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(scenario = %scenario_name, %addr, "serving simulation (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web server");
}

pub async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let view = state.lock().view();
    Json(StateEnvelope {
        scenario: state.scenario_name.clone(),
        view,
    })
}

pub async fn trajectory(State(state): State<Arc<AppState>>) -> Json<Trajectory> {
    let trajectory = state.lock().trajectory();
    Json(trajectory.as_ref().clone())
}

pub async fn tipping_points(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<TippingPointCrossing>> {
    Json(state.lock().tipping_points().to_vec())
}

pub async fn update_parameters(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ParameterUpdate>,
) -> Response {
    let result = {
        let mut simulation = state.lock();
        let params = update.apply_to(simulation.parameters());
        simulation.set_parameters(params).map(|_| simulation.view())
    };

    match result {
        Ok(view) => {
            let envelope = StateEnvelope {
                scenario: state.scenario_name.clone(),
                view,
            };
            if let Ok(payload) = serde_json::to_string(&envelope) {
                // No subscribers is not an error.
                let _ = state.broadcaster.send(payload);
            }
            Json(envelope).into_response()
        }
        Err(err) => {
            warn!(error = %err, "rejected parameter update");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
