//! Simulated airborne and maritime user terminals

use std::fmt;

use bevy::math::DVec3;
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::constellation::ConstellationRegistry;
use crate::geodesy::{GeodeticPosition, normalize_longitude_deg};
use crate::proximity::nearest;
use crate::terminal::feed::TrackRecord;

/// Index of a terminal in the simulator; terminals are never removed
pub type TerminalId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalCategory {
    Airborne,
    Maritime,
}

impl TerminalCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Airborne => "airborne",
            Self::Maritime => "maritime",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Airborne => "Airborne",
            Self::Maritime => "Maritime",
        }
    }

    /// Cruise altitude in metres
    pub fn altitude_m(self) -> f64 {
        match self {
            Self::Airborne => 11_000.0,
            Self::Maritime => 20.0,
        }
    }

    fn longitude_step_deg(self) -> f64 {
        match self {
            Self::Airborne => 0.0025,
            Self::Maritime => 0.0006,
        }
    }

    fn latitude_jitter_deg(self) -> f64 {
        match self {
            Self::Airborne => 0.0015,
            Self::Maritime => 0.0004,
        }
    }

    // Ships stay away from the poles
    fn spawn_latitude_limit_deg(self) -> f64 {
        match self {
            Self::Airborne => 90.0,
            Self::Maritime => 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    Simulated,
    Feed(String),
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Feed(label) => write!(f, "{}", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminalRecord {
    pub id: TerminalId,
    pub name: String,
    pub category: TerminalCategory,
    pub position: GeodeticPosition,
    /// ECEF displacement of the last tick, in metres
    pub velocity_m: DVec3,
    pub visible: bool,
    pub source: TrackSource,
}

impl TerminalRecord {
    /// Speed in km/h, reading the per-tick displacement as metres per second.
    pub fn speed_kmh(&self) -> f64 {
        self.velocity_m.length() * 3.6
    }
}

#[derive(Resource)]
pub struct TerminalSimulator {
    terminals: Vec<TerminalRecord>,
    visible: bool,
    selected: Option<TerminalId>,
    rng: StdRng,
}

impl Default for TerminalSimulator {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl TerminalSimulator {
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            terminals: Vec::new(),
            visible: false,
            selected: None,
            rng,
        }
    }

    pub fn terminals(&self) -> &[TerminalRecord] {
        &self.terminals
    }

    pub fn get(&self, id: TerminalId) -> Option<&TerminalRecord> {
        self.terminals.get(id)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Add `count` terminals of `category` at random positions.
    pub fn spawn(&mut self, category: TerminalCategory, count: usize) -> Vec<TerminalId> {
        let limit = category.spawn_latitude_limit_deg();
        let already = self
            .terminals
            .iter()
            .filter(|t| t.category == category && t.source == TrackSource::Simulated)
            .count();

        (0..count)
            .map(|i| {
                let latitude = self.rng.gen_range(-limit..limit);
                let longitude = self.rng.gen_range(-180.0..180.0);
                self.push(
                    format!("{} UT {}", category.title(), already + i + 1),
                    category,
                    GeodeticPosition::new(latitude, longitude, category.altitude_m() / 1000.0),
                    TrackSource::Simulated,
                )
            })
            .collect()
    }

    /// Add terminals from feed tracks. Malformed tracks are skipped.
    pub fn ingest(&mut self, tracks: &[Value], category: TerminalCategory) -> Vec<TerminalRecord> {
        let mut seeded = Vec::new();
        for (index, value) in tracks.iter().enumerate() {
            let track = match TrackRecord::from_value(value, index) {
                Ok(track) => track,
                Err(e) => {
                    debug!("[UT FEED] {} track skipped: {}", category.label(), e);
                    continue;
                }
            };
            let label = track
                .id
                .unwrap_or_else(|| format!("{}-track-{}", category.label(), index + 1));
            let altitude_m = track.altitude_m.unwrap_or(category.altitude_m());
            let id = self.push(
                format!("{} UT {}", category.title(), label),
                category,
                GeodeticPosition::new(
                    track.latitude_deg,
                    track.longitude_deg,
                    altitude_m / 1000.0,
                ),
                TrackSource::Feed(track.source.unwrap_or_else(|| "feed".to_string())),
            );
            seeded.push(self.terminals[id].clone());
        }
        seeded
    }

    fn push(
        &mut self,
        name: String,
        category: TerminalCategory,
        position: GeodeticPosition,
        source: TrackSource,
    ) -> TerminalId {
        let id = self.terminals.len();
        self.terminals.push(TerminalRecord {
            id,
            name,
            category,
            position,
            velocity_m: DVec3::ZERO,
            visible: self.visible,
            source,
        });
        id
    }

    /// Advance every visible terminal by one step.
    pub fn tick(&mut self) {
        for terminal in self.terminals.iter_mut().filter(|t| t.visible) {
            let category = terminal.category;
            let before = terminal.position.to_ecef_km();

            let jitter = (self.rng.gen_range(0.0..1.0) - 0.5) * category.latitude_jitter_deg();
            terminal.position = GeodeticPosition::new(
                (terminal.position.latitude_deg + jitter).clamp(-90.0, 90.0),
                normalize_longitude_deg(
                    terminal.position.longitude_deg + category.longitude_step_deg(),
                ),
                category.altitude_m() / 1000.0,
            );

            let after = terminal.position.to_ecef_km();
            terminal.velocity_m = (after - before) * 1000.0;
        }
    }

    /// Show or hide every terminal. Hiding drops the selection.
    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
        for terminal in &mut self.terminals {
            terminal.visible = visible;
        }
        if !visible {
            self.selected = None;
        }
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.set_visibility(!self.visible);
        self.visible
    }

    /// Select a visible terminal. Unknown or hidden ids are ignored.
    pub fn select(&mut self, id: TerminalId) -> bool {
        match self.terminals.get(id) {
            Some(terminal) if terminal.visible => {
                self.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn selected(&self) -> Option<&TerminalRecord> {
        self.selected.and_then(|id| self.terminals.get(id))
    }

    /// (airborne, maritime)
    pub fn counts(&self) -> (usize, usize) {
        self.terminals
            .iter()
            .fold((0, 0), |(air, sea), t| match t.category {
                TerminalCategory::Airborne => (air + 1, sea),
                TerminalCategory::Maritime => (air, sea + 1),
            })
    }

    pub fn counter_text(&self) -> String {
        let (air, sea) = self.counts();
        format!("Airborne: {} | Maritime: {}", air, sea)
    }

    /// Multi-line description of a terminal, with its nearest satellite.
    pub fn describe(
        &self,
        id: TerminalId,
        registry: &ConstellationRegistry,
        t: DateTime<Utc>,
    ) -> String {
        let Some(terminal) = self.terminals.get(id) else {
            return "UT unavailable".to_string();
        };
        let mut text = format!(
            "{} ({})\nStatus: {}\nLat: {:.2} deg\nLon: {:.2} deg\nAlt: {:.2} km\nSpeed: {:.1} km/h\nSource: {}",
            terminal.name,
            terminal.category.label(),
            if terminal.visible { "visible" } else { "hidden" },
            terminal.position.latitude_deg,
            terminal.position.longitude_deg,
            terminal.position.altitude_km,
            terminal.speed_kmh(),
            terminal.source,
        );
        if let Some(near) = nearest(terminal, registry, t) {
            text.push_str(&format!(
                "\nNearest sat: {} ({:.1} km)",
                near.name, near.distance_km
            ));
        }
        text
    }

    /// Text for the terminal info panel.
    pub fn info_text(&self, registry: &ConstellationRegistry, t: DateTime<Utc>) -> String {
        if !self.visible {
            return "UTs hidden".to_string();
        }
        match self.selected {
            Some(id) => self.describe(id, registry, t),
            None => "Click a UT to display info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn simulator() -> TerminalSimulator {
        TerminalSimulator::with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_spawn_latitude_bands() {
        let mut sim = simulator();
        let maritime = sim.spawn(TerminalCategory::Maritime, 8);
        let airborne = sim.spawn(TerminalCategory::Airborne, 12);
        assert_eq!(maritime.len(), 8);
        assert_eq!(airborne.len(), 12);

        for id in maritime {
            let t = sim.get(id).unwrap();
            assert!((-60.0..=60.0).contains(&t.position.latitude_deg));
            assert!((t.position.altitude_km - 0.02).abs() < 1e-12);
        }
        for id in airborne {
            let t = sim.get(id).unwrap();
            assert!((-90.0..=90.0).contains(&t.position.latitude_deg));
            assert!((-180.0..180.0).contains(&t.position.longitude_deg));
            assert!((t.position.altitude_km - 11.0).abs() < 1e-12);
            assert_eq!(t.source, TrackSource::Simulated);
        }
        assert_eq!(sim.counts(), (12, 8));
        assert_eq!(sim.counter_text(), "Airborne: 12 | Maritime: 8");
    }

    #[test]
    fn test_spawn_names_continue_numbering() {
        let mut sim = simulator();
        sim.spawn(TerminalCategory::Airborne, 2);
        sim.spawn(TerminalCategory::Airborne, 1);
        let names: Vec<&str> = sim.terminals().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Airborne UT 1", "Airborne UT 2", "Airborne UT 3"]);
    }

    #[test]
    fn test_spawn_follows_global_visibility() {
        let mut sim = simulator();
        let hidden = sim.spawn(TerminalCategory::Maritime, 1)[0];
        sim.set_visibility(true);
        let shown = sim.spawn(TerminalCategory::Maritime, 1)[0];
        assert!(sim.get(hidden).unwrap().visible);
        assert!(sim.get(shown).unwrap().visible);

        sim.set_visibility(false);
        let late = sim.spawn(TerminalCategory::Maritime, 1)[0];
        assert!(!sim.get(late).unwrap().visible);
    }

    #[test]
    fn test_ingest_skips_tracks_without_coordinates() {
        let mut sim = simulator();
        let seeded = sim.ingest(
            &[json!({ "lat": 10, "lon": 20 }), json!({ "lon": 30 })],
            TerminalCategory::Airborne,
        );
        assert_eq!(seeded.len(), 1);
        let t = &seeded[0];
        assert_eq!(t.name, "Airborne UT airborne-track-1");
        assert_eq!(t.position.latitude_deg, 10.0);
        assert_eq!(t.position.longitude_deg, 20.0);
        assert!((t.position.altitude_km - 11.0).abs() < 1e-12);
        assert_eq!(t.source, TrackSource::Feed("feed".to_string()));
        assert_eq!(sim.terminals().len(), 1);
    }

    #[test]
    fn test_ingest_uses_feed_fields() {
        let mut sim = simulator();
        let seeded = sim.ingest(
            &[json!({ "latitude": 1.5, "longitude": -2.5, "altitude": 5, "id": "MV-7", "source": "ais" })],
            TerminalCategory::Maritime,
        );
        let t = &seeded[0];
        assert_eq!(t.name, "Maritime UT MV-7");
        assert!((t.position.altitude_km - 0.005).abs() < 1e-12);
        assert_eq!(t.source, TrackSource::Feed("ais".to_string()));
        assert_eq!(sim.counts(), (0, 1));
    }

    #[test]
    fn test_tick_moves_only_visible_terminals() {
        let mut sim = simulator();
        sim.ingest(&[json!({ "lat": 0, "lon": 0 })], TerminalCategory::Airborne);
        let start = sim.get(0).unwrap().position;

        sim.tick();
        assert_eq!(sim.get(0).unwrap().position, start);
        assert_eq!(sim.get(0).unwrap().velocity_m, DVec3::ZERO);

        sim.set_visibility(true);
        sim.tick();
        let t = sim.get(0).unwrap();
        assert!((t.position.longitude_deg - 0.0025).abs() < 1e-12);
        assert!(t.position.latitude_deg.abs() <= 0.00075);

        // 0.0025 deg of longitude at 11 km altitude on the equator is ~279 m
        let moved = t.velocity_m.length();
        assert!((270.0..300.0).contains(&moved), "moved {} m", moved);
        assert!((t.speed_kmh() - moved * 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_tick_wraps_longitude() {
        let mut sim = simulator();
        sim.set_visibility(true);
        sim.ingest(&[json!({ "lat": 10, "lon": 179.9999 })], TerminalCategory::Maritime);
        sim.tick();
        let lon = sim.get(0).unwrap().position.longitude_deg;
        assert!((-180.0..-179.99).contains(&lon), "lon {}", lon);
        // Wrap does not show up as a jump in velocity
        assert!(sim.get(0).unwrap().velocity_m.length() < 100.0);
    }

    #[test]
    fn test_visibility_toggle_preserves_positions_and_clears_selection() {
        let mut sim = simulator();
        sim.spawn(TerminalCategory::Airborne, 3);
        assert!(sim.toggle_visibility());
        assert!(sim.select(1));

        let before: Vec<GeodeticPosition> = sim.terminals().iter().map(|t| t.position).collect();
        assert!(!sim.toggle_visibility());
        assert!(sim.selected().is_none());
        assert!(sim.toggle_visibility());
        let after: Vec<GeodeticPosition> = sim.terminals().iter().map(|t| t.position).collect();

        assert_eq!(before, after);
        assert!(sim.selected().is_none());
    }

    #[test]
    fn test_select_ignores_hidden_and_unknown() {
        let mut sim = simulator();
        sim.spawn(TerminalCategory::Maritime, 1);
        assert!(!sim.select(0));
        sim.set_visibility(true);
        assert!(!sim.select(9));
        assert!(sim.select(0));
        assert_eq!(sim.selected().map(|t| t.id), Some(0));
    }

    #[test]
    fn test_info_text_states() {
        let registry = ConstellationRegistry::default();
        let now = Utc::now();
        let mut sim = simulator();
        sim.ingest(
            &[json!({ "lat": 12.5, "lon": -40.25, "id": 7 })],
            TerminalCategory::Maritime,
        );

        assert_eq!(sim.info_text(&registry, now), "UTs hidden");
        sim.set_visibility(true);
        assert_eq!(sim.info_text(&registry, now), "Click a UT to display info");

        sim.select(0);
        assert_eq!(
            sim.info_text(&registry, now),
            "Maritime UT 7 (maritime)\nStatus: visible\nLat: 12.50 deg\nLon: -40.25 deg\nAlt: 0.02 km\nSpeed: 0.0 km/h\nSource: feed"
        );
        assert_eq!(sim.describe(5, &registry, now), "UT unavailable");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(TrackSource::Simulated.to_string(), "simulated");
        assert_eq!(TrackSource::Feed("ais".to_string()).to_string(), "ais");
    }
}
