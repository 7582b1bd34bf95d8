//! Geodesy module
//!
//! WGS84 conversions, sidereal time and the ECEF <-> render-space mapping.

pub mod coordinates;
pub mod space;

pub use coordinates::{
    EARTH_RADIUS_KM, GeodeticPosition, chord_distance_km, eci_to_ecef_km, gmst_rad,
    normalize_longitude_deg,
};
pub use space::{ecef_to_bevy_km, geodetic_to_bevy_km};
