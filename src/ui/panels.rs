//! On-screen text panels

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constellation::ConstellationRegistry;
use crate::constellation::systems::HighlightInfo;
use crate::orbital::SimulationTime;
use crate::terminal::TerminalSimulator;
use crate::ui::state::{Panel, UIState};

const PANEL_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);
const SAT_INFO_COLOR: Color = Color::srgb(0.0, 1.0, 1.0);
const TEXT_COLOR: Color = Color::srgb(0.85, 0.9, 0.9);
const STATUS_HINT: &str = "Press a number key to load a constellation";

/// Key help listing the configured groups in load order.
pub fn key_help_text(config: &AppConfig) -> String {
    let mut lines: Vec<String> = config
        .groups
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, g)| format!("[{}] Load {}", i + 1, g.name))
        .collect();
    lines.push("[U] Show/Hide UTs".to_string());
    lines.push("[L] Show/Hide Landing Stations".to_string());
    lines.push("[C] Clear constellation".to_string());
    lines.push("[Esc] Clear highlight".to_string());
    lines.push("[H] Hide this help".to_string());
    lines.join("\n")
}

fn panel_bundle(panel: Panel, text: String, color: Color) -> impl Bundle {
    (
        Node {
            padding: UiRect::all(Val::Px(6.0)),
            margin: UiRect::bottom(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(PANEL_BG),
        children![(
            Text(text),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(color),
            panel,
        )],
    )
}

pub fn setup_panels(mut commands: Commands, config: Res<AppConfig>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            max_width: Val::Px(360.0),
            ..default()
        },
        children![
            panel_bundle(Panel::Status, STATUS_HINT.to_string(), TEXT_COLOR),
            panel_bundle(
                Panel::SatelliteInfo,
                "Click a satellite for info".to_string(),
                SAT_INFO_COLOR
            ),
            panel_bundle(Panel::TerminalCounter, String::new(), TEXT_COLOR),
            panel_bundle(Panel::TerminalInfo, "UTs hidden".to_string(), TEXT_COLOR),
        ],
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        children![panel_bundle(
            Panel::KeyHelp,
            key_help_text(&config),
            TEXT_COLOR
        )],
    ));
}

/// Refresh every panel from the current simulation state
pub fn update_panels_system(
    registry: Res<ConstellationRegistry>,
    highlight: Res<HighlightInfo>,
    simulator: Res<TerminalSimulator>,
    sim_time: Res<SimulationTime>,
    ui_state: Res<UIState>,
    mut panels: Query<(&Panel, &mut Text, &ChildOf)>,
    mut containers: Query<&mut Node>,
) {
    let t = sim_time.current_utc;
    let sat_info = highlight
        .0
        .clone()
        .unwrap_or_else(|| "Click a satellite for info".to_string());

    for (panel, mut text, parent) in &mut panels {
        let value = match panel {
            Panel::Status if registry.status().is_empty() => STATUS_HINT.to_string(),
            Panel::Status => registry.status().to_string(),
            Panel::SatelliteInfo => sat_info.clone(),
            Panel::TerminalInfo => simulator.info_text(&registry, t),
            Panel::TerminalCounter => simulator.counter_text(),
            Panel::KeyHelp => {
                if let Ok(mut node) = containers.get_mut(parent.parent()) {
                    let display = if ui_state.show_help {
                        Display::Flex
                    } else {
                        Display::None
                    };
                    if node.display != display {
                        node.display = display;
                    }
                }
                continue;
            }
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}
