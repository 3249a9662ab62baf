//! Climate tipping points and the year the trajectory first crosses each of them.

use serde::{Deserialize, Serialize};

use crate::{
    error::{SimulationError, SimulationResult},
    trajectory::Trajectory,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TippingPoint {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl TippingPoint {
    pub fn new(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Events that share one temperature threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TippingPointGroup {
    /// Degrees C above pre-industrial.
    pub threshold: f64,
    pub tipping_points: Vec<TippingPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TippingPointCrossing {
    pub threshold: f64,
    /// First year at or above the threshold; `None` if it is never reached.
    pub year: Option<u32>,
    pub tipping_points: Vec<TippingPoint>,
}

impl TippingPointGroup {
    /// A NaN threshold would compare false against every year and never be crossed.
    pub fn validate(&self) -> SimulationResult<()> {
        if self.threshold.is_finite() {
            Ok(())
        } else {
            Err(SimulationError::InvalidParameter {
                name: "tipping_points.threshold",
                value: self.threshold,
                reason: "must be a finite temperature",
            })
        }
    }
}

impl TippingPointCrossing {
    /// Crossed at or before `viewed_year`.
    pub fn is_active(&self, viewed_year: u32) -> bool {
        self.year.is_some_and(|year| year <= viewed_year)
    }
}

pub fn default_tipping_groups() -> Vec<TippingPointGroup> {
    vec![
        TippingPointGroup {
            threshold: 1.5,
            tipping_points: vec![
                TippingPoint::new("coral", "Warm-water coral reef collapse", "🪸"),
                TippingPoint::new("greenland", "Greenland Ice Sheet instability", "🧊"),
                TippingPoint::new("west_antarctica", "West Antarctic Ice Sheet collapse", "❄️"),
            ],
        },
        TippingPointGroup {
            threshold: 1.8,
            tipping_points: vec![TippingPoint::new(
                "labrador_sea",
                "SPG Convection collapse",
                "🌊",
            )],
        },
        TippingPointGroup {
            threshold: 3.5,
            tipping_points: vec![TippingPoint::new(
                "amazon",
                "Amazon rainforest dieback",
                "🌳",
            )],
        },
        TippingPointGroup {
            threshold: 4.0,
            tipping_points: vec![
                TippingPoint::new("amoc", "AMOC (Atlantic circulation) collapse", "🌍"),
                TippingPoint::new("permafrost", "Boreal Permafrost collapse", "🥶"),
            ],
        },
    ]
}

pub fn first_crossing_year(trajectory: &Trajectory, threshold: f64) -> Option<u32> {
    trajectory
        .iter()
        .find(|(_, state)| state.temperature_increase >= threshold)
        .map(|(year, _)| year)
}

pub fn detect_tipping_points(
    trajectory: &Trajectory,
    groups: &[TippingPointGroup],
) -> Vec<TippingPointCrossing> {
    groups
        .iter()
        .map(|group| TippingPointCrossing {
            threshold: group.threshold,
            year: first_crossing_year(trajectory, group.threshold),
            tipping_points: group.tipping_points.clone(),
        })
        .collect()
}
