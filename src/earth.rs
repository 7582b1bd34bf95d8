use bevy::prelude::*;

use crate::geodesy::EARTH_RADIUS_KM;

/// Marker for the globe entity
#[derive(Component)]
pub struct Earth;

/// Plugin for the Earth globe
pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_earth)
            .add_systems(Update, draw_graticule);
    }
}

fn spawn_earth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(EARTH_RADIUS_KM).mesh().uv(96, 48))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.05, 0.18, 0.4),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
        Earth,
        Name::new("Earth"),
    ));
}

/// Latitude/longitude grid every 30 degrees, just above the surface
fn draw_graticule(mut gizmos: Gizmos) {
    let radius = EARTH_RADIUS_KM * 1.002;
    let color = Color::srgba(0.6, 0.8, 1.0, 0.25);

    for lat in (-60..=60).step_by(30) {
        let lat = (lat as f32).to_radians();
        let ring = (0..=72).map(|i| {
            let lon = (i as f32 * 5.0).to_radians();
            // Bevy y is the polar axis
            Vec3::new(
                radius * lat.cos() * lon.sin(),
                radius * lat.sin(),
                radius * lat.cos() * lon.cos(),
            )
        });
        gizmos.linestrip(ring, color);
    }

    for lon in (0..360).step_by(30) {
        let lon = (lon as f32).to_radians();
        let meridian = (0..=36).map(|i| {
            let lat = (-90.0 + i as f32 * 5.0).to_radians();
            Vec3::new(
                radius * lat.cos() * lon.sin(),
                radius * lat.sin(),
                radius * lat.cos() * lon.cos(),
            )
        });
        gizmos.linestrip(meridian, color);
    }
}
