use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::GlobalAmbientLight;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod config;
mod constellation;
mod earth;
mod geodesy;
mod orbital;
mod proximity;
mod terminal;
mod tle;
mod ui;

use config::AppConfig;
use constellation::ConstellationPlugin;
use earth::EarthPlugin;
use orbital::OrbitalPlugin;
use terminal::TerminalPlugin;
use tle::TlePlugin;
use ui::UiPlugin;

/// Marker for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Earth radius is 6371 km; start a little over 4 radii out
pub const HOME_CAMERA_DISTANCE_KM: f32 = 28_000.0;

pub fn setup(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: 300.0,
        ..default()
    });

    let initial_distance = HOME_CAMERA_DISTANCE_KM;

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            // World units are kilometers; the default far plane would clip GPS orbits
            near: 1.0,
            far: 250_000.0,
            ..default()
        }),
        Camera {
            order: 0,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(initial_distance),
            yaw: Some(0.0),
            pitch: Some(0.3),
            force_update: true,
            ..default()
        },
        MainCamera,
        Tonemapping::TonyMcMapface,
        Transform::from_xyz(0.0, 0.0, initial_distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(100_000.0, 40_000.0, 100_000.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Constellation Globe".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    app.insert_resource(AppConfig::load());

    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(MeshPickingPlugin);

    app.add_plugins(EarthPlugin);
    app.add_plugins(OrbitalPlugin);
    app.add_plugins(TlePlugin);
    app.add_plugins(ConstellationPlugin);
    app.add_plugins(TerminalPlugin);
    app.add_plugins(UiPlugin);
    app.add_systems(Startup, setup);

    app.run();
}
