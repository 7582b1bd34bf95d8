//! Constellation module
//!
//! Owns the registry of tracked satellites for the selected group, the
//! landing station tables and the systems that render both.

use bevy::prelude::*;

pub mod landing;
pub mod registry;
pub mod systems;

pub use landing::LandingStations;
pub use registry::ConstellationRegistry;
pub use systems::request_group_load;

use crate::orbital::advance_simulation_clock;
use crate::tle::process_fetch_results_system;
use systems::*;

/// Plugin for constellation state and rendering
pub struct ConstellationPlugin;

impl Plugin for ConstellationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConstellationRegistry>()
            .init_resource::<LandingStations>()
            .init_resource::<HighlightInfo>()
            .add_systems(Startup, setup_constellation_assets)
            .add_systems(
                Update,
                (
                    propagate_constellation_system
                        .after(advance_simulation_clock)
                        .after(process_fetch_results_system),
                    satellite_click_system,
                    sync_satellite_markers_system.after(propagate_constellation_system),
                    update_satellite_markers_system
                        .after(sync_satellite_markers_system)
                        .after(satellite_click_system),
                    refresh_highlight_info_system
                        .after(propagate_constellation_system)
                        .after(satellite_click_system),
                    update_satellite_labels_system
                        .after(sync_satellite_markers_system)
                        .after(refresh_highlight_info_system),
                    follow_tracked_satellite_system.after(propagate_constellation_system),
                    draw_highlighted_trace_system.after(satellite_click_system),
                    sync_landing_markers_system.after(process_fetch_results_system),
                ),
            );
    }
}
