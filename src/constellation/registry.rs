//! Tracked satellites of the active constellation group

use bevy::math::DVec3;
use bevy::prelude::*;
use chrono::{DateTime, Utc};

use crate::orbital::SatelliteRecord;
use crate::orbital::propagation::minutes_since_epoch;
use crate::tle::types::{LoadToken, LoadTracker};

/// Index of a satellite in the current collection
pub type SatelliteId = usize;

/// Previous sample of the highlighted satellite, used for speed estimation
#[derive(Debug, Default, Clone, Copy)]
struct MotionTracker {
    previous: Option<(DVec3, DateTime<Utc>)>,
    last_speed_kmh: Option<f64>,
}

#[derive(Resource, Default)]
pub struct ConstellationRegistry {
    group: Option<String>,
    satellites: Vec<SatelliteRecord>,
    highlighted: Option<SatelliteId>,
    /// Satellite the camera follows after a load
    tracked: Option<SatelliteId>,
    motion: MotionTracker,
    /// Bumped on every replace or clear so render state can resync
    revision: u64,
    loads: LoadTracker,
    status: String,
}

impl ConstellationRegistry {
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn satellites(&self) -> &[SatelliteRecord] {
        &self.satellites
    }

    pub fn get(&self, id: SatelliteId) -> Option<&SatelliteRecord> {
        self.satellites.get(id)
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn highlighted(&self) -> Option<SatelliteId> {
        self.highlighted
    }

    pub fn highlighted_record(&self) -> Option<&SatelliteRecord> {
        self.highlighted.and_then(|id| self.satellites.get(id))
    }

    pub fn tracked(&self) -> Option<SatelliteId> {
        self.tracked
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Start loading `group`. Any load still in flight becomes stale.
    pub fn begin_load(&mut self, group: &str) -> LoadToken {
        let token = self.loads.begin();
        self.status = format!("Loading {}...", group);
        info!(
            "[CONSTELLATION] loading group={} generation={}",
            group,
            token.generation()
        );
        token
    }

    /// Apply the outcome of a load if it is still the newest one.
    ///
    /// Returns false and leaves the registry untouched for a superseded load.
    pub fn finish_load(
        &mut self,
        token: &LoadToken,
        group: &str,
        records: Vec<SatelliteRecord>,
        rejected: usize,
    ) -> bool {
        if !token.is_current() {
            debug!(
                "[CONSTELLATION] discarding stale load group={} generation={}",
                group,
                token.generation()
            );
            return false;
        }
        let count = records.len();
        self.load_group(group, records);
        self.tracked = (count > 0).then_some(0);
        self.status = if rejected > 0 {
            format!(
                "{} loaded - {} satellites ({} rejected)",
                group, count, rejected
            )
        } else {
            format!("{} loaded - {} satellites", group, count)
        };
        info!(
            "[CONSTELLATION] group={} loaded satellites={} rejected={}",
            group, count, rejected
        );
        true
    }

    /// Report a failed load if it is still the newest one. Prior state is kept.
    pub fn fail_load(&mut self, token: &LoadToken, group: &str, error: &str) -> bool {
        if !token.is_current() {
            return false;
        }
        self.status = format!("Failed to load {}: {}", group, error);
        true
    }

    /// Swap in a new collection in one step.
    pub fn load_group(&mut self, group: &str, records: Vec<SatelliteRecord>) {
        self.group = Some(group.to_string());
        self.satellites = records;
        self.highlighted = None;
        self.tracked = None;
        self.motion = MotionTracker::default();
        self.revision += 1;
    }

    /// Empty the registry. A load still in flight will not land afterwards.
    pub fn clear(&mut self) {
        self.loads.cancel();
        self.status.clear();
        self.group = None;
        self.satellites.clear();
        self.highlighted = None;
        self.tracked = None;
        self.motion = MotionTracker::default();
        self.revision += 1;
    }

    /// Propagate every satellite to `t`. Satellites that fail keep their last
    /// fix; the number of failures is returned.
    pub fn update_all(&mut self, t: DateTime<Utc>) -> usize {
        self.satellites
            .iter_mut()
            .map(|sat| sat.update(t))
            .filter(Result::is_err)
            .count()
    }

    /// Highlight a satellite. Unknown ids are ignored.
    pub fn select(&mut self, id: SatelliteId) {
        if id >= self.satellites.len() {
            return;
        }
        self.highlighted = Some(id);
        self.motion = MotionTracker::default();
    }

    /// Clear the highlight, returning what was highlighted.
    pub fn deselect(&mut self) -> Option<SatelliteId> {
        self.motion = MotionTracker::default();
        self.highlighted.take()
    }

    /// Speed of the highlighted satellite in km/h from the distance covered
    /// since the previous call.
    pub fn compute_instantaneous_speed(&mut self, t: DateTime<Utc>) -> Option<f64> {
        let position = self.highlighted_record()?.position_at(t)?;
        let ecef = position.to_ecef_km();

        let Some((previous, previous_t)) = self.motion.previous else {
            self.motion.previous = Some((ecef, t));
            return None;
        };

        let dt_hours = minutes_since_epoch(t, previous_t) / 60.0;
        if dt_hours <= 0.0 {
            return self.motion.last_speed_kmh;
        }

        let speed = ecef.distance(previous) / dt_hours;
        self.motion.previous = Some((ecef, t));
        self.motion.last_speed_kmh = Some(speed);
        Some(speed)
    }

    /// Label for a satellite marker: `info` while it is highlighted, its name
    /// otherwise.
    pub fn label_for(&self, id: SatelliteId, info: Option<&str>) -> Option<String> {
        let sat = self.satellites.get(id)?;
        Some(match info {
            Some(info) if self.highlighted == Some(id) => info.to_string(),
            _ => sat.name.clone(),
        })
    }

    /// Info text for the highlighted satellite.
    pub fn highlight_info(&mut self, t: DateTime<Utc>) -> Option<String> {
        let speed = self.compute_instantaneous_speed(t).unwrap_or(0.0);
        let sat = self.highlighted_record()?;
        let pos = sat.position_at(t)?;
        Some(format!(
            "ID: {}\nLon: {:.2} deg\nLat: {:.2} deg\nAlt: {:.2} km\nSpeed: {:.2} km/h",
            sat.name, pos.longitude_deg, pos.latitude_deg, pos.altitude_km, speed
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::GeodeticPosition;
    use crate::tle::mock_data::{GPS_TLE, ISS_TLE, STARLINK_TLE, mock_lines};
    use chrono::{Duration, TimeZone};

    fn record(block: &str) -> SatelliteRecord {
        let (name, l1, l2) = mock_lines(block);
        SatelliteRecord::parse(name, l1, l2, false).expect("valid TLE")
    }

    fn names(registry: &ConstellationRegistry) -> Vec<&str> {
        registry
            .satellites()
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    #[test]
    fn test_load_group_replaces_collection() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Mixed", vec![record(ISS_TLE), record(STARLINK_TLE)]);
        registry.select(1);

        registry.load_group("GPS", vec![record(GPS_TLE)]);
        assert_eq!(names(&registry), vec!["GPS BIIR-11 (PRN 19)"]);
        assert_eq!(registry.group(), Some("GPS"));
        assert!(registry.highlighted().is_none());
        assert_eq!(registry.revision(), 2);
    }

    #[test]
    fn test_overlapping_loads_last_caller_wins() {
        let mut registry = ConstellationRegistry::default();
        let first = registry.begin_load("Starlink");
        let second = registry.begin_load("GPS");
        assert_eq!(registry.status(), "Loading GPS...");

        // Newer load lands first, older one arrives late
        assert!(registry.finish_load(&second, "GPS", vec![record(GPS_TLE)], 0));
        assert!(!registry.finish_load(
            &first,
            "Starlink",
            vec![record(STARLINK_TLE), record(ISS_TLE)],
            0
        ));

        assert_eq!(names(&registry), vec!["GPS BIIR-11 (PRN 19)"]);
        assert_eq!(registry.status(), "GPS loaded - 1 satellites");
    }

    #[test]
    fn test_status_reports_rejected_records() {
        let mut registry = ConstellationRegistry::default();
        let token = registry.begin_load("Starlink");
        registry.finish_load(&token, "Starlink", vec![record(STARLINK_TLE)], 2);
        assert_eq!(
            registry.status(),
            "Starlink loaded - 1 satellites (2 rejected)"
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("GPS", vec![record(GPS_TLE)]);

        let token = registry.begin_load("Kuiper");
        assert!(registry.fail_load(&token, "Kuiper", "HTTP 503"));
        assert_eq!(registry.status(), "Failed to load Kuiper: HTTP 503");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.group(), Some("GPS"));

        let stale = registry.begin_load("Galileo");
        registry.begin_load("GLONASS");
        assert!(!registry.fail_load(&stale, "Galileo", "timeout"));
        assert_eq!(registry.status(), "Loading GLONASS...");
    }

    #[test]
    fn test_clear() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Mixed", vec![record(ISS_TLE), record(GPS_TLE)]);
        registry.select(0);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.highlighted().is_none());
        assert!(registry.highlight_info(Utc::now()).is_none());
        assert_eq!(registry.group(), None);
    }

    #[test]
    fn test_clear_cancels_pending_load() {
        let mut registry = ConstellationRegistry::default();
        let token = registry.begin_load("GPS");
        registry.clear();
        assert_eq!(registry.status(), "");
        assert!(!registry.finish_load(&token, "GPS", vec![record(GPS_TLE)], 0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("ISS", vec![record(ISS_TLE)]);
        registry.select(5);
        assert!(registry.highlighted().is_none());
        registry.select(0);
        assert_eq!(registry.highlighted(), Some(0));
        assert_eq!(registry.deselect(), Some(0));
        assert_eq!(registry.deselect(), None);
    }

    #[test]
    fn test_update_all_records_fixes() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Mixed", vec![record(STARLINK_TLE), record(GPS_TLE)]);
        let t = registry.satellites()[0].epoch_utc + Duration::minutes(5);

        let failures = registry.update_all(t);
        assert_eq!(failures, 0);
        for sat in registry.satellites() {
            assert_eq!(sat.last_fix().map(|f| f.time), Some(t));
        }
    }

    #[test]
    fn test_update_all_keeps_last_fix_on_failure() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("ISS", vec![record(ISS_TLE)]);
        let epoch = registry.satellites()[0].epoch_utc;
        assert_eq!(registry.update_all(epoch), 0);
        let fix = registry.satellites()[0].last_fix().expect("fix at epoch");

        // 2008 elements cannot reach 2024
        let late = Utc.with_ymd_and_hms(2024, 8, 14, 0, 0, 0).unwrap();
        assert_eq!(registry.update_all(late), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.satellites()[0].last_fix(), Some(fix));
    }

    #[test]
    fn test_camera_tracks_first_satellite_after_load() {
        let mut registry = ConstellationRegistry::default();
        assert_eq!(registry.tracked(), None);

        let token = registry.begin_load("Mixed");
        registry.finish_load(&token, "Mixed", vec![record(STARLINK_TLE), record(GPS_TLE)], 0);
        assert_eq!(registry.tracked(), Some(0));

        let token = registry.begin_load("Empty");
        registry.finish_load(&token, "Empty", Vec::new(), 3);
        assert_eq!(registry.tracked(), None);

        let token = registry.begin_load("GPS");
        registry.finish_load(&token, "GPS", vec![record(GPS_TLE)], 0);
        registry.clear();
        assert_eq!(registry.tracked(), None);
    }

    #[test]
    fn test_marker_label_restored_after_deselect_and_reload() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Mixed", vec![record(STARLINK_TLE), record(GPS_TLE)]);
        let info = "ID: STARLINK-1007\nSpeed: 0.00 km/h";

        assert_eq!(registry.label_for(0, Some(info)).as_deref(), Some("STARLINK-1007"));
        registry.select(0);
        assert_eq!(registry.label_for(0, Some(info)).as_deref(), Some(info));
        assert_eq!(
            registry.label_for(1, Some(info)).as_deref(),
            Some("GPS BIIR-11 (PRN 19)")
        );

        registry.deselect();
        assert_eq!(registry.label_for(0, Some(info)).as_deref(), Some("STARLINK-1007"));

        registry.select(0);
        registry.load_group("GPS", vec![record(GPS_TLE)]);
        assert_eq!(
            registry.label_for(0, Some(info)).as_deref(),
            Some("GPS BIIR-11 (PRN 19)")
        );
        assert_eq!(registry.label_for(1, Some(info)), None);
    }

    #[test]
    fn test_speed_needs_two_samples() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Starlink", vec![record(STARLINK_TLE)]);
        let t0 = registry.satellites()[0].epoch_utc;

        assert!(registry.compute_instantaneous_speed(t0).is_none());
        registry.select(0);
        assert!(registry.compute_instantaneous_speed(t0).is_none());

        let speed = registry
            .compute_instantaneous_speed(t0 + Duration::seconds(10))
            .expect("second sample yields a speed");
        // Low Earth orbit ground-relative chord speed, roughly 26 000 to 28 000 km/h
        assert!(
            (24_000.0..30_000.0).contains(&speed),
            "unexpected LEO speed {} km/h",
            speed
        );

        // Same instant again: previous value, no update
        let again = registry.compute_instantaneous_speed(t0 + Duration::seconds(10));
        assert_eq!(again, Some(speed));
    }

    #[test]
    fn test_select_resets_speed_tracking() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("Mixed", vec![record(STARLINK_TLE), record(GPS_TLE)]);
        let t0 = registry.satellites()[0].epoch_utc;

        registry.select(0);
        registry.compute_instantaneous_speed(t0);
        assert!(
            registry
                .compute_instantaneous_speed(t0 + Duration::seconds(1))
                .is_some()
        );

        registry.select(1);
        assert!(
            registry
                .compute_instantaneous_speed(t0 + Duration::seconds(2))
                .is_none()
        );
    }

    #[test]
    fn test_highlight_info_format() {
        let mut registry = ConstellationRegistry::default();
        registry.load_group("ISS", vec![record(ISS_TLE)]);
        registry.select(0);
        let t = registry.satellites()[0].epoch_utc;
        registry.satellites[0].set_fix(t, GeodeticPosition::new(12.346, -45.678, 420.0));

        let info = registry.highlight_info(t).expect("highlighted");
        assert_eq!(
            info,
            "ID: ISS (ZARYA)\nLon: -45.68 deg\nLat: 12.35 deg\nAlt: 420.00 km\nSpeed: 0.00 km/h"
        );
    }
}
