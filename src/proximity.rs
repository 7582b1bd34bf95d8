//! Nearest tracked satellite to a user terminal

use chrono::{DateTime, Utc};

use crate::constellation::ConstellationRegistry;
use crate::geodesy::chord_distance_km;
use crate::terminal::simulator::TerminalRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct NearestSatellite {
    pub name: String,
    pub distance_km: f64,
}

/// Straight-line (chord) nearest satellite at `t`.
///
/// Linear scan over the registry; the first of equally distant satellites
/// wins. Satellites without any known position are skipped.
pub fn nearest(
    terminal: &TerminalRecord,
    registry: &ConstellationRegistry,
    t: DateTime<Utc>,
) -> Option<NearestSatellite> {
    let mut best: Option<NearestSatellite> = None;
    for sat in registry.satellites() {
        let Some(position) = sat.position_at(t) else {
            continue;
        };
        let distance_km = chord_distance_km(&terminal.position, &position);
        if best.as_ref().is_none_or(|b| distance_km < b.distance_km) {
            best = Some(NearestSatellite {
                name: sat.name.clone(),
                distance_km,
            });
        }
    }
    best
}
