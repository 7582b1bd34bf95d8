//! Keyboard bindings

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constellation::{ConstellationRegistry, LandingStations, request_group_load};
use crate::orbital::SimulationTime;
use crate::terminal::TerminalSimulator;
use crate::tle::FetchChannels;
use crate::ui::state::UIState;

const GROUP_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Group that landing-station and load actions refer to
fn current_group<'a>(registry: &'a ConstellationRegistry, config: &'a AppConfig) -> Option<&'a str> {
    registry
        .group()
        .or_else(|| config.groups.first().map(|g| g.name.as_str()))
}

pub fn keyboard_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<AppConfig>,
    sim_time: Res<SimulationTime>,
    fetch: Option<Res<FetchChannels>>,
    mut registry: ResMut<ConstellationRegistry>,
    mut simulator: ResMut<TerminalSimulator>,
    mut landing: ResMut<LandingStations>,
    mut ui_state: ResMut<UIState>,
) {
    for (key, group) in GROUP_KEYS.iter().zip(config.groups.iter()) {
        if !keys.just_pressed(*key) {
            continue;
        }
        match fetch.as_deref() {
            Some(fetch) => request_group_load(
                &mut registry,
                fetch,
                group,
                &config.trace,
                sim_time.current_utc,
            ),
            None => warn!("[INPUT] TLE worker not ready, ignoring load of {}", group.name),
        }
    }

    if keys.just_pressed(KeyCode::KeyU) {
        let visible = simulator.toggle_visibility();
        info!("[INPUT] UTs {}", if visible { "shown" } else { "hidden" });
    }

    if keys.just_pressed(KeyCode::KeyL) {
        if let Some(group) = current_group(&registry, &config).map(str::to_string) {
            let visible = landing.toggle(&group);
            info!(
                "[INPUT] landing stations for {} {}",
                group,
                if visible { "shown" } else { "hidden" }
            );
        }
    }

    if keys.just_pressed(KeyCode::KeyC) {
        registry.clear();
        landing.clear();
        info!("[INPUT] constellation cleared");
    }

    if keys.just_pressed(KeyCode::Escape) {
        registry.deselect();
    }

    if keys.just_pressed(KeyCode::KeyH) {
        ui_state.show_help = !ui_state.show_help;
    }
}
