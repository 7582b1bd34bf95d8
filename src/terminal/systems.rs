//! Terminal systems: seeding, motion, markers and picking

use bevy::picking::events::{Click, Pointer};
use bevy::prelude::*;

use crate::config::AppConfig;
use crate::geodesy::geodetic_to_bevy_km;
use crate::terminal::feed::{FeedChannels, FeedCommand, FeedResult, start_feed_worker};
use crate::terminal::simulator::{TerminalCategory, TerminalId, TerminalSimulator};

#[derive(Component, Copy, Clone, Debug)]
pub struct TerminalMarker(pub TerminalId);

#[derive(Resource)]
pub struct TerminalAssets {
    mesh: Handle<Mesh>,
    airborne_material: Handle<StandardMaterial>,
    maritime_material: Handle<StandardMaterial>,
}

impl TerminalAssets {
    fn material(&self, category: TerminalCategory) -> Handle<StandardMaterial> {
        match category {
            TerminalCategory::Airborne => self.airborne_material.clone(),
            TerminalCategory::Maritime => self.maritime_material.clone(),
        }
    }
}

pub fn setup_terminals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<AppConfig>,
    mut simulator: ResMut<TerminalSimulator>,
) {
    let orange = Color::srgb(1.0, 0.55, 0.0);
    let cyan = Color::srgb(0.0, 0.9, 0.9);
    commands.insert_resource(TerminalAssets {
        mesh: meshes.add(Sphere::new(40.0)),
        airborne_material: materials.add(StandardMaterial {
            base_color: orange,
            emissive: orange.to_linear() * 10.0,
            ..default()
        }),
        maritime_material: materials.add(StandardMaterial {
            base_color: cyan,
            emissive: cyan.to_linear() * 10.0,
            ..default()
        }),
    });

    simulator.spawn(TerminalCategory::Airborne, config.terminals.airborne_count);
    simulator.spawn(TerminalCategory::Maritime, config.terminals.maritime_count);
    info!("[INIT] {}", simulator.counter_text());
}

/// Start the feed worker if any live track endpoint is configured
pub fn setup_live_feeds(mut commands: Commands, config: Res<AppConfig>) {
    let endpoints: Vec<(TerminalCategory, String)> = [
        (TerminalCategory::Airborne, &config.live_tracks.airborne),
        (TerminalCategory::Maritime, &config.live_tracks.maritime),
    ]
    .into_iter()
    .filter_map(|(category, url)| url.clone().map(|url| (category, url)))
    .collect();

    if endpoints.is_empty() {
        return;
    }

    let channels = start_feed_worker();
    for (category, url) in endpoints {
        info!("[UT FEED] requesting {} tracks from {}", category.label(), url);
        if let Err(e) = channels.cmd_tx.send(FeedCommand::Fetch { category, url }) {
            warn!("[UT FEED] worker unavailable: {}", e);
        }
    }
    commands.insert_resource(channels);
}

/// Ingest finished feed fetches into the simulator
pub fn process_feed_results_system(
    feed: Option<Res<FeedChannels>>,
    mut simulator: ResMut<TerminalSimulator>,
) {
    let Some(feed) = feed else { return };
    let Ok(guard) = feed.res_rx.lock() else {
        return;
    };
    while let Ok(msg) = guard.try_recv() {
        match msg {
            FeedResult::Tracks {
                category,
                url,
                tracks,
            } => {
                let seeded = simulator.ingest(&tracks, category);
                info!(
                    "[UT FEED] {} of {} {} tracks seeded from {}",
                    seeded.len(),
                    tracks.len(),
                    category.label(),
                    url
                );
            }
            FeedResult::Error {
                category,
                url,
                error,
            } => {
                warn!(
                    "[UT FEED] unable to hydrate {} terminals from {}: {}",
                    category.label(),
                    url,
                    error
                );
            }
        }
    }
}

pub fn tick_terminals_system(mut simulator: ResMut<TerminalSimulator>) {
    if simulator.is_visible() {
        simulator.tick();
    }
}

/// Spawn markers for new terminals and keep all markers in sync
pub fn sync_terminal_markers_system(
    mut commands: Commands,
    simulator: Res<TerminalSimulator>,
    assets: Res<TerminalAssets>,
    mut markers: Query<(&TerminalMarker, &mut Transform, &mut Visibility)>,
    mut spawned: Local<usize>,
) {
    let terminals = simulator.terminals();
    for terminal in terminals.iter().skip(*spawned) {
        commands.spawn((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material(terminal.category)),
            Transform::from_translation(geodetic_to_bevy_km(&terminal.position)),
            if terminal.visible {
                Visibility::Visible
            } else {
                Visibility::Hidden
            },
            TerminalMarker(terminal.id),
            Name::new(terminal.name.clone()),
        ));
    }
    *spawned = terminals.len();

    for (marker, mut transform, mut visibility) in &mut markers {
        let Some(terminal) = simulator.get(marker.0) else {
            continue;
        };
        transform.translation = geodetic_to_bevy_km(&terminal.position);
        visibility.set_if_neq(if terminal.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
    }
}

pub fn terminal_click_system(
    mut clicks: MessageReader<Pointer<Click>>,
    markers: Query<&TerminalMarker>,
    mut simulator: ResMut<TerminalSimulator>,
) {
    for click in clicks.read() {
        if let Ok(marker) = markers.get(click.entity)
            && simulator.select(marker.0)
        {
            info!("[PICK] terminal {}", marker.0);
        }
    }
}
