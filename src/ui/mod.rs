//! User interface module
//!
//! Text panels and keyboard bindings for the globe.

use bevy::prelude::*;

pub mod input;
pub mod panels;
pub mod state;

use crate::constellation::systems::refresh_highlight_info_system;
use crate::terminal::systems::tick_terminals_system;
use input::keyboard_input_system;
use panels::{setup_panels, update_panels_system};
use state::UIState;

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UIState>()
            .add_systems(Startup, setup_panels)
            .add_systems(
                Update,
                (
                    keyboard_input_system,
                    update_panels_system
                        .after(keyboard_input_system)
                        .after(refresh_highlight_info_system)
                        .after(tick_terminals_system),
                ),
            );
    }
}
