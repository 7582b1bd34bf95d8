//! Orbital state model
//!
//! Per-satellite SGP4 state, geodetic propagation, orbit traces and the
//! simulation clock that drives them.

use bevy::prelude::*;

use crate::config::AppConfig;

pub mod error;
pub mod propagation;
pub mod record;
pub mod time;

pub use record::SatelliteRecord;
pub use time::{SimulationTime, advance_simulation_clock};

/// Plugin for the simulation clock
pub struct OrbitalPlugin;

impl Plugin for OrbitalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationTime>()
            .add_systems(Startup, apply_configured_time_scale)
            .add_systems(Update, advance_simulation_clock);
    }
}

fn apply_configured_time_scale(
    config: Option<Res<AppConfig>>,
    mut sim_time: ResMut<SimulationTime>,
) {
    if let Some(config) = config {
        sim_time.time_scale = config.time_scale;
        info!("[INIT] simulation clock at {}x", sim_time.time_scale);
    }
}
