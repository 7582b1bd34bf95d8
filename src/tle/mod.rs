//! TLE (Two-Line Element) data management module
//!
//! Fetches constellation groups from text feeds on a background worker and
//! turns them into satellite records for the registry.

use bevy::prelude::*;

pub mod fetcher;
#[cfg(test)]
pub(crate) mod mock_data;
pub mod parser;
pub mod systems;
pub mod types;

pub use fetcher::start_tle_worker;
pub use systems::process_fetch_results_system;
pub use types::{FetchChannels, FetchCommand};

/// Plugin for TLE fetching and processing
pub struct TlePlugin;

impl Plugin for TlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_tle_worker)
            .add_systems(Update, process_fetch_results_system);
    }
}

/// Setup system to start the TLE worker
fn setup_tle_worker(mut commands: Commands) {
    let channels = start_tle_worker();
    info!("[INIT] TLE worker started");
    commands.insert_resource(channels);
}
