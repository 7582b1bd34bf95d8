//! Mapping between the ECEF frame and Bevy render space.

use bevy::math::{DVec3, Vec3};

use crate::geodesy::coordinates::GeodeticPosition;

/// Convert standard ECEF km (f64) to Bevy render km (f32).
/// Mapping: Bevy (x,y,z) = (ECEF.y, ECEF.z, ECEF.x)
pub fn ecef_to_bevy_km(ecef_km: DVec3) -> Vec3 {
    Vec3::new(ecef_km.y as f32, ecef_km.z as f32, ecef_km.x as f32)
}

/// Render-space translation for a geodetic position.
pub fn geodetic_to_bevy_km(position: &GeodeticPosition) -> Vec3 {
    ecef_to_bevy_km(position.to_ecef_km())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mapping() {
        let bevy = ecef_to_bevy_km(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(bevy, Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_north_pole_is_bevy_up() {
        let bevy = geodetic_to_bevy_km(&GeodeticPosition::new(90.0, 0.0, 0.0));
        assert!(bevy.x.abs() < 1e-3);
        assert!(bevy.y > 6300.0);
        assert!(bevy.z.abs() < 1e-3);
    }
}
