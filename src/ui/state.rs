//! UI state management

use bevy::prelude::*;

/// Main UI state resource
#[derive(Resource)]
pub struct UIState {
    pub show_help: bool,
}

impl Default for UIState {
    fn default() -> Self {
        Self { show_help: true }
    }
}

/// Text panels on screen
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Status,
    SatelliteInfo,
    TerminalInfo,
    TerminalCounter,
    KeyHelp,
}
