//! Constellation systems: propagation, markers, labels, picking, camera
//! follow and the trace gizmo

use bevy::picking::Pickable;
use bevy::picking::events::{Click, Pointer};
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use chrono::{DateTime, Utc};

use crate::config::{GroupConfig, TraceConfig};
use crate::constellation::landing::LandingStations;
use crate::constellation::registry::{ConstellationRegistry, SatelliteId};
use crate::geodesy::geodetic_to_bevy_km;
use crate::orbital::SimulationTime;
use crate::tle::{FetchChannels, FetchCommand};
use crate::{HOME_CAMERA_DISTANCE_KM, MainCamera};

/// Marker for a rendered satellite, pointing back into the registry
#[derive(Component, Copy, Clone, Debug)]
pub struct SatelliteMarker(pub SatelliteId);

/// Screen-space name tag following a satellite marker
#[derive(Component, Copy, Clone, Debug)]
pub struct SatelliteLabel(pub SatelliteId);

/// Info text of the highlighted satellite, computed once per frame
#[derive(Resource, Default, Debug)]
pub struct HighlightInfo(pub Option<String>);

/// Marker for a rendered landing station
#[derive(Component)]
pub struct LandingMarker;

/// Shared meshes and materials for constellation entities
#[derive(Resource)]
pub struct ConstellationAssets {
    satellite_mesh: Handle<Mesh>,
    satellite_material: Handle<StandardMaterial>,
    highlight_material: Handle<StandardMaterial>,
    landing_mesh: Handle<Mesh>,
    landing_material: Handle<StandardMaterial>,
}

const TRACE_COLOR: Color = Color::srgb(0.0, 1.0, 1.0);
const NAME_COLOR: Color = Color::srgb(0.2, 1.0, 0.2);
const LABEL_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
/// Name tags only show for satellites this close to the camera
const LABEL_RANGE_KM: f32 = 2_000.0;
const LABEL_OFFSET_PX: f32 = 8.0;
/// Camera distance from a followed satellite
const FOLLOW_RADIUS_KM: f32 = 6_000.0;

pub fn setup_constellation_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let red = Color::srgb(1.0, 0.1, 0.1);
    let green = Color::srgb(0.1, 0.9, 0.2);
    commands.insert_resource(ConstellationAssets {
        satellite_mesh: meshes.add(Sphere::new(60.0)),
        satellite_material: materials.add(StandardMaterial {
            base_color: red,
            emissive: red.to_linear() * 20.0,
            ..default()
        }),
        highlight_material: materials.add(StandardMaterial {
            base_color: TRACE_COLOR,
            emissive: TRACE_COLOR.to_linear() * 30.0,
            ..default()
        }),
        landing_mesh: meshes.add(Cuboid::new(80.0, 80.0, 80.0)),
        landing_material: materials.add(StandardMaterial {
            base_color: green,
            emissive: green.to_linear() * 10.0,
            ..default()
        }),
    });
}

/// Ask the worker for `group`. The registry keeps its satellites until the
/// result arrives.
pub fn request_group_load(
    registry: &mut ConstellationRegistry,
    fetch: &FetchChannels,
    group: &GroupConfig,
    trace: &TraceConfig,
    now: DateTime<Utc>,
) {
    let token = registry.begin_load(&group.name);
    let cmd = FetchCommand::FetchGroup {
        token: token.clone(),
        group: group.name.clone(),
        url: group.url.clone(),
        epoch_anchored: group.epoch_anchored,
        trace: trace.clone(),
        requested_at: now,
    };
    if let Err(e) = fetch.cmd_tx.send(cmd) {
        error!("[TLE REQUEST] worker unavailable: {}", e);
        registry.fail_load(&token, &group.name, "fetch worker unavailable");
    }
}

/// System to propagate every tracked satellite to the simulation time
pub fn propagate_constellation_system(
    mut registry: ResMut<ConstellationRegistry>,
    sim_time: Res<SimulationTime>,
) {
    if registry.is_empty() {
        return;
    }
    let failures = registry.update_all(sim_time.current_utc);
    if failures > 0 {
        debug!("[SGP4] {} satellites kept their last fix", failures);
    }
}

/// Recompute the highlighted satellite's info (and speed) for this frame
pub fn refresh_highlight_info_system(
    mut registry: ResMut<ConstellationRegistry>,
    sim_time: Res<SimulationTime>,
    mut info: ResMut<HighlightInfo>,
) {
    let text = registry.highlight_info(sim_time.current_utc);
    if info.0 != text {
        info.0 = text;
    }
}

/// Respawn satellite markers and labels whenever the registry contents are
/// replaced
pub fn sync_satellite_markers_system(
    mut commands: Commands,
    registry: Res<ConstellationRegistry>,
    assets: Res<ConstellationAssets>,
    markers: Query<Entity, Or<(With<SatelliteMarker>, With<SatelliteLabel>)>>,
    mut seen_revision: Local<u64>,
) {
    if registry.revision() == *seen_revision {
        return;
    }
    *seen_revision = registry.revision();

    for entity in &markers {
        commands.entity(entity).despawn();
    }
    for (id, sat) in registry.satellites().iter().enumerate() {
        let translation = sat
            .position()
            .map(|p| geodetic_to_bevy_km(&p))
            .unwrap_or(Vec3::ZERO);
        commands.spawn((
            Mesh3d(assets.satellite_mesh.clone()),
            MeshMaterial3d(assets.satellite_material.clone()),
            Transform::from_translation(translation),
            Visibility::Visible,
            SatelliteMarker(id),
            Name::new(sat.name.clone()),
        ));
        commands.spawn((
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(LABEL_BG),
            Text::new(sat.name.clone()),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(NAME_COLOR),
            Visibility::Hidden,
            Pickable::IGNORE,
            SatelliteLabel(id),
        ));
    }
    debug!(
        "[CONSTELLATION] spawned {} satellite markers",
        registry.len()
    );
}

/// Move markers to their latest fix and tint the highlighted one
pub fn update_satellite_markers_system(
    registry: Res<ConstellationRegistry>,
    assets: Res<ConstellationAssets>,
    mut markers: Query<(
        &SatelliteMarker,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let highlighted = registry.highlighted();
    for (marker, mut transform, mut material) in &mut markers {
        let Some(sat) = registry.get(marker.0) else {
            continue;
        };
        if let Some(position) = sat.position() {
            transform.translation = geodetic_to_bevy_km(&position);
        }
        let wanted = if highlighted == Some(marker.0) {
            &assets.highlight_material
        } else {
            &assets.satellite_material
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

/// Place name tags next to nearby markers. The highlighted satellite shows its
/// info text in cyan at any range and goes back to its name once released.
pub fn update_satellite_labels_system(
    registry: Res<ConstellationRegistry>,
    info: Res<HighlightInfo>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut labels: Query<(
        &SatelliteLabel,
        &mut Node,
        &mut Text,
        &mut TextColor,
        &mut Visibility,
    )>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let eye = camera_transform.translation();

    for (label, mut node, mut text, mut color, mut visibility) in &mut labels {
        let highlighted = registry.highlighted() == Some(label.0) && info.0.is_some();
        let screen = registry
            .get(label.0)
            .and_then(|sat| sat.position())
            .map(|p| geodetic_to_bevy_km(&p))
            .filter(|world| highlighted || world.distance(eye) <= LABEL_RANGE_KM)
            .and_then(|world| camera.world_to_viewport(camera_transform, world).ok());
        let (Some(screen), Some(content)) =
            (screen, registry.label_for(label.0, info.0.as_deref()))
        else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };

        visibility.set_if_neq(Visibility::Visible);
        let left = Val::Px(screen.x + LABEL_OFFSET_PX);
        let top = Val::Px(screen.y + LABEL_OFFSET_PX);
        if node.left != left || node.top != top {
            node.left = left;
            node.top = top;
        }
        if text.0 != content {
            text.0 = content;
        }
        let wanted = if highlighted { TRACE_COLOR } else { NAME_COLOR };
        if color.0 != wanted {
            color.0 = wanted;
        }
    }
}

/// Keep the camera focused on the satellite picked after a load; return
/// home when the registry stops tracking one.
pub fn follow_tracked_satellite_system(
    registry: Res<ConstellationRegistry>,
    mut cameras: Query<&mut PanOrbitCamera, With<MainCamera>>,
    mut following: Local<Option<(u64, SatelliteId)>>,
) {
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let target = registry.tracked().map(|id| (registry.revision(), id));
    let position = registry
        .tracked()
        .and_then(|id| registry.get(id))
        .and_then(|sat| sat.position());

    match (target, position) {
        (Some(target), Some(position)) => {
            if *following != Some(target) {
                if let Some(sat) = registry.get(target.1) {
                    info!("[CAMERA] following {}", sat.name);
                }
                camera.target_radius = FOLLOW_RADIUS_KM;
                *following = Some(target);
            }
            camera.target_focus = geodetic_to_bevy_km(&position);
        }
        (None, _) => {
            if following.take().is_some() {
                camera.target_focus = Vec3::ZERO;
                camera.target_radius = HOME_CAMERA_DISTANCE_KM;
            }
        }
        // Tracked satellite has no fix yet
        (Some(_), None) => {}
    }
}

/// Draw the precomputed trace of the highlighted satellite
pub fn draw_highlighted_trace_system(registry: Res<ConstellationRegistry>, mut gizmos: Gizmos) {
    let Some(sat) = registry.highlighted_record() else {
        return;
    };
    if sat.trace.len() < 2 {
        return;
    }
    gizmos.linestrip(
        sat.trace.iter().map(|s| geodetic_to_bevy_km(&s.position)),
        TRACE_COLOR,
    );
}

/// Clicking a satellite highlights it; clicking anything else clears it
pub fn satellite_click_system(
    mut clicks: MessageReader<Pointer<Click>>,
    markers: Query<&SatelliteMarker>,
    mut registry: ResMut<ConstellationRegistry>,
) {
    for click in clicks.read() {
        match markers.get(click.entity) {
            Ok(marker) => {
                if let Some(sat) = registry.get(marker.0) {
                    info!("[PICK] satellite {} (NORAD {})", sat.name, sat.norad);
                }
                registry.select(marker.0);
            }
            Err(_) => {
                if registry.deselect().is_some() {
                    debug!("[PICK] highlight cleared");
                }
            }
        }
    }
}

/// Spawn or despawn landing station markers when their resource changes
pub fn sync_landing_markers_system(
    mut commands: Commands,
    landing: Res<LandingStations>,
    assets: Res<ConstellationAssets>,
    markers: Query<Entity, With<LandingMarker>>,
) {
    if !landing.is_changed() {
        return;
    }
    for entity in &markers {
        commands.entity(entity).despawn();
    }
    for site in landing.sites() {
        commands.spawn((
            Mesh3d(assets.landing_mesh.clone()),
            MeshMaterial3d(assets.landing_material.clone()),
            Transform::from_translation(geodetic_to_bevy_km(&site.position())),
            LandingMarker,
            Name::new(format!("Landing Station - {}", site.name)),
        ));
    }
}
