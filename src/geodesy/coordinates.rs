//! Earth-frame coordinate utilities
//!
//! Covers the pieces the orbital model and the terminal simulator share:
//! - Sidereal time and the TEME -> ECEF rotation used after SGP4 propagation
//! - WGS84 geodetic <-> ECEF conversion (kilometres)
//! - Straight-line (chord) distance between two geodetic points

use bevy::math::DVec3;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// WGS84 equatorial radius (km)
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257223563;
/// Square of the first eccentricity
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Mean radius used for the rendered globe (km)
pub const EARTH_RADIUS_KM: f32 = 6371.0;

/// Latitude/longitude in degrees, altitude in kilometres above the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl GeodeticPosition {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_km,
        }
    }

    /// Convert to Earth-centred Earth-fixed kilometres.
    pub fn to_ecef_km(&self) -> DVec3 {
        let lat = self.latitude_deg.to_radians();
        let lon = self.longitude_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        // Prime vertical radius of curvature
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let h = self.altitude_km;

        DVec3::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_E2) + h) * sin_lat,
        )
    }

    /// Convert an ECEF point (km) back to geodetic coordinates.
    pub fn from_ecef_km(ecef: DVec3) -> Self {
        let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
        let lon = ecef.y.atan2(ecef.x);

        let mut lat = ecef.z.atan2(p * (1.0 - WGS84_E2));
        for _ in 0..10 {
            let sin_lat = lat.sin();
            let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
            let next = (ecef.z + WGS84_E2 * n * sin_lat).atan2(p);
            if (next - lat).abs() < 1e-12 {
                lat = next;
                break;
            }
            lat = next;
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        // Valid at the poles, unlike p / cos(lat) - N
        let altitude_km = p * cos_lat + ecef.z * sin_lat
            - WGS84_A_KM * (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

        Self {
            latitude_deg: lat.to_degrees(),
            longitude_deg: normalize_longitude_deg(lon.to_degrees()),
            altitude_km,
        }
    }
}

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Straight-line distance through the Earth between two points (km).
pub fn chord_distance_km(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    a.to_ecef_km().distance(b.to_ecef_km())
}

/// Compute the Julian Date (UTC) for a given timestamp.
pub fn julian_date_utc(t: DateTime<Utc>) -> f64 {
    let mut y = t.year();
    let mut m = t.month() as i32;
    let d = t.day() as i32;

    let hour = t.hour() as f64;
    let minute = t.minute() as f64;
    let sec = t.second() as f64 + (t.nanosecond() as f64) * 1e-9_f64;
    let day_fraction = (hour + (minute + sec / 60.0) / 60.0) / 24.0;

    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let jd0 = (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * ((m + 1) as f64)).floor()
        + d as f64
        + b
        - 1524.5;

    jd0 + day_fraction
}

/// Greenwich Mean Sidereal Time (radians) using the IAU 1982 polynomial.
/// Assumes UT1 ~= UTC.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let jd = julian_date_utc(t);
    let t_cent = (jd - 2451545.0) / 36525.0;

    let gmst_sec =
        67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t_cent + 0.093104 * t_cent * t_cent
            - 6.2e-6 * t_cent * t_cent * t_cent;

    let sec_in_day = 86400.0_f64;
    gmst_sec.rem_euclid(sec_in_day) * (std::f64::consts::TAU / sec_in_day)
}

/// Rotate TEME -> ECEF by -GMST about Z
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}
