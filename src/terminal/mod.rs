//! User terminal module
//!
//! Simulated airborne and maritime terminals, optionally seeded from live
//! track feeds, moving a little every frame while shown.

use bevy::prelude::*;

pub mod feed;
pub mod simulator;
pub mod systems;

pub use simulator::TerminalSimulator;

use systems::*;

/// Plugin for user terminal simulation and rendering
pub struct TerminalPlugin;

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerminalSimulator>()
            .add_systems(Startup, (setup_terminals, setup_live_feeds))
            .add_systems(
                Update,
                (
                    process_feed_results_system,
                    tick_terminals_system.after(process_feed_results_system),
                    terminal_click_system,
                    sync_terminal_markers_system
                        .after(tick_terminals_system)
                        .after(terminal_click_system),
                ),
            );
    }
}
