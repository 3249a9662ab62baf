//! JSON export of a computed session

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    allocation::TreeAllocation,
    config::SimulationParameters,
    simulation::Simulation,
    tipping::TippingPointCrossing,
    trajectory::Trajectory,
    world::InitialState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub scenario: String,
    pub generated_at: String,
    pub parameters: SimulationParameters,
    pub initial: InitialState,
}

/// Everything a consumer needs to render the viewed year without rerunning the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub metadata: SnapshotMetadata,
    pub trajectory: Trajectory,
    pub temperatures: BTreeMap<String, f64>,
    pub emissions_per_capita: BTreeMap<String, f64>,
    pub tipping_points: Vec<TippingPointCrossing>,
    pub tree_allocation: TreeAllocation,
}

impl SnapshotDocument {
    pub fn from_simulation(simulation: &Simulation, scenario_name: &str) -> Self {
        Self {
            metadata: SnapshotMetadata {
                scenario: scenario_name.to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                parameters: simulation.parameters(),
                initial: simulation.initial_state(),
            },
            trajectory: simulation.trajectory().as_ref().clone(),
            temperatures: simulation.temperatures().clone(),
            emissions_per_capita: simulation.emissions_per_capita().clone(),
            tipping_points: simulation.tipping_points().to_vec(),
            tree_allocation: simulation.tree_allocation().clone(),
        }
    }
}

pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Writes `<dir>/<scenario>/trajectory_<viewed year>.json`.
    pub fn write(&self, simulation: &Simulation, scenario_name: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let file_path = dir.join(format!("trajectory_{}.json", simulation.parameters().year));
        let document = SnapshotDocument::from_simulation(simulation, scenario_name);
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&file_path, json)
            .with_context(|| format!("Failed to write snapshot {}", file_path.display()))?;
        Ok(file_path)
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<SnapshotDocument> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let document = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(document)
    }

    /// Snapshot files under `<dir>/<scenario>`, sorted by name.
    pub fn list(&self, scenario_name: &str) -> Result<Vec<PathBuf>> {
        let dir = self.output_dir.join(scenario_name);
        let mut snapshots = Vec::new();
        if !dir.exists() {
            return Ok(snapshots);
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_snapshot = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("trajectory_") && name.ends_with(".json"));
            if is_snapshot {
                snapshots.push(path);
            }
        }
        snapshots.sort();
        Ok(snapshots)
    }
}
