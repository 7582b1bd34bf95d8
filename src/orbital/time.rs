//! Simulation clock driving every per-tick update

use bevy::prelude::*;
use chrono::{DateTime, Duration, Utc};

/// Simulation time resource
#[derive(Resource)]
pub struct SimulationTime {
    pub current_utc: DateTime<Utc>,
    pub time_scale: f64,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self {
            current_utc: Utc::now(),
            time_scale: 1.0,
        }
    }
}

impl SimulationTime {
    /// Advance by `real_secs` of wall time, scaled. Negative input is ignored.
    pub fn advance(&mut self, real_secs: f64) {
        let scaled = (real_secs * self.time_scale).max(0.0);
        let nanos = (scaled * 1_000_000_000.0).round() as i64;
        if nanos != 0 {
            self.current_utc += Duration::nanoseconds(nanos);
        }
    }
}

/// System to advance simulation UTC by scale
pub fn advance_simulation_clock(time: Res<Time>, mut sim_time: ResMut<SimulationTime>) {
    sim_time.advance(time.delta_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_simulation_time_default() {
        let sim_time = SimulationTime::default();
        assert_eq!(sim_time.time_scale, 1.0);
        assert!(sim_time.current_utc.timestamp() > 0);
    }

    #[test]
    fn test_advance_scaled() {
        let start = Utc.with_ymd_and_hms(2024, 8, 13, 12, 0, 0).unwrap();
        let mut sim_time = SimulationTime {
            current_utc: start,
            time_scale: 60.0,
        };
        sim_time.advance(0.5);
        assert_eq!(sim_time.current_utc - start, Duration::seconds(30));
    }

    #[test]
    fn test_advance_never_goes_backwards() {
        let start = Utc.with_ymd_and_hms(2024, 8, 13, 12, 0, 0).unwrap();
        let mut sim_time = SimulationTime {
            current_utc: start,
            time_scale: 1.0,
        };
        sim_time.advance(-2.0);
        assert_eq!(sim_time.current_utc, start);
    }
}
