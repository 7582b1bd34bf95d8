//! Per-satellite orbital state
//!
//! A [`SatelliteRecord`] owns the SGP4 constants built once from its two
//! element lines. Propagation never touches them; only the last position fix
//! and the precomputed trace change over the record's life.

use bevy::math::DVec3;
use chrono::{DateTime, Duration, Utc};

use crate::geodesy::{GeodeticPosition, eci_to_ecef_km, gmst_rad};
use crate::orbital::error::OrbitError;
use crate::orbital::propagation::minutes_since_epoch;
use crate::tle::parser::parse_tle_epoch_to_utc;
use crate::tle::types::ElementSet;

/// One sample of a satellite's path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub time: DateTime<Utc>,
    pub position: GeodeticPosition,
}

/// Last successfully propagated position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub time: DateTime<Utc>,
    pub position: GeodeticPosition,
}

pub struct SatelliteRecord {
    pub name: String,
    pub norad: u64,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
    /// Traces start at the element epoch instead of the wall clock by default
    pub epoch_anchored: bool,
    pub trace: Vec<TraceSample>,
    constants: sgp4::Constants,
    last_fix: Option<PositionFix>,
}

impl SatelliteRecord {
    /// Build a record from a name and two element lines.
    pub fn parse(
        name: &str,
        line1: &str,
        line2: &str,
        epoch_anchored: bool,
    ) -> Result<Self, OrbitError> {
        let name = name.trim();
        let line1 = line1.trim();
        let line2 = line2.trim();

        let elements =
            sgp4::Elements::from_tle(Some(name.to_string()), line1.as_bytes(), line2.as_bytes())
                .map_err(|e| OrbitError::parse(name, e))?;
        let constants =
            sgp4::Constants::from_elements(&elements).map_err(|e| OrbitError::parse(name, e))?;
        let epoch_utc = parse_tle_epoch_to_utc(line1)
            .ok_or_else(|| OrbitError::parse(name, "unreadable epoch field"))?;

        Ok(Self {
            name: name.to_string(),
            norad: elements.norad_id,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch_utc,
            epoch_anchored,
            trace: Vec::new(),
            constants,
            last_fix: None,
        })
    }

    pub fn from_element_set(set: &ElementSet, epoch_anchored: bool) -> Result<Self, OrbitError> {
        Self::parse(&set.name, &set.line1, &set.line2, epoch_anchored)
    }

    /// TEME position (km) at `t`.
    pub fn propagate_teme_km(&self, t: DateTime<Utc>) -> Result<DVec3, OrbitError> {
        let mins = minutes_since_epoch(t, self.epoch_utc);
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(mins))
            .map_err(|e| OrbitError::propagation(&self.name, e))?;
        let teme = DVec3::from_array(prediction.position);
        if !teme.is_finite() {
            return Err(OrbitError::propagation(&self.name, "non-finite position"));
        }
        Ok(teme)
    }

    /// Geodetic position at `t`.
    pub fn propagate(&self, t: DateTime<Utc>) -> Result<GeodeticPosition, OrbitError> {
        let teme = self.propagate_teme_km(t)?;
        let ecef = eci_to_ecef_km(teme, gmst_rad(t));
        Ok(GeodeticPosition::from_ecef_km(ecef))
    }

    /// Start instant for a trace when the caller may not supply one.
    pub fn trace_start(&self, requested: Option<DateTime<Utc>>) -> DateTime<Utc> {
        match requested {
            Some(start) => start,
            None if self.epoch_anchored => self.epoch_utc,
            None => Utc::now(),
        }
    }

    /// Sample the path every `step_minutes` from the start through
    /// `start + duration_minutes`, both ends inclusive. Steps that fail to
    /// propagate are left out.
    pub fn compute_trace(
        &self,
        duration_minutes: u32,
        step_minutes: u32,
        start: Option<DateTime<Utc>>,
    ) -> Vec<TraceSample> {
        let start = self.trace_start(start);
        let step = step_minutes.max(1);

        (0..=duration_minutes)
            .step_by(step as usize)
            .filter_map(|m| {
                let time = start + Duration::minutes(m as i64);
                self.propagate(time)
                    .ok()
                    .map(|position| TraceSample { time, position })
            })
            .collect()
    }

    /// Recompute and store the trace.
    pub fn refresh_trace(
        &mut self,
        duration_minutes: u32,
        step_minutes: u32,
        start: Option<DateTime<Utc>>,
    ) {
        self.trace = self.compute_trace(duration_minutes, step_minutes, start);
    }

    pub fn last_fix(&self) -> Option<PositionFix> {
        self.last_fix
    }

    /// Position the record was last seen at, if it ever propagated.
    pub fn position(&self) -> Option<GeodeticPosition> {
        self.last_fix.map(|fix| fix.position)
    }

    pub(crate) fn set_fix(&mut self, time: DateTime<Utc>, position: GeodeticPosition) {
        self.last_fix = Some(PositionFix { time, position });
    }

    /// Propagate to `t` and keep the result. On failure the previous fix stays.
    pub fn update(&mut self, t: DateTime<Utc>) -> Result<GeodeticPosition, OrbitError> {
        let position = self.propagate(t)?;
        self.set_fix(t, position);
        Ok(position)
    }

    /// Best known position for `t`: the stored fix if it was taken at `t`,
    /// otherwise a fresh propagation, otherwise the stale fix.
    pub fn position_at(&self, t: DateTime<Utc>) -> Option<GeodeticPosition> {
        match self.last_fix {
            Some(fix) if fix.time == t => Some(fix.position),
            _ => self.propagate(t).ok().or_else(|| self.position()),
        }
    }
}
