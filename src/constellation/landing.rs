//! Ground landing stations per constellation

use bevy::prelude::*;

use crate::geodesy::GeodeticPosition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingSite {
    pub name: &'static str,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl LandingSite {
    const fn new(name: &'static str, latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            name,
            latitude_deg,
            longitude_deg,
        }
    }

    pub fn position(&self) -> GeodeticPosition {
        GeodeticPosition::new(self.latitude_deg, self.longitude_deg, 0.0)
    }
}

const STARLINK: &[LandingSite] = &[
    LandingSite::new("Hawthorne, USA", 33.9207, -118.3278),
    LandingSite::new("Redmond, USA", 47.6740, -122.1215),
    LandingSite::new("Seattle, USA", 47.6062, -122.3321),
    LandingSite::new("Boca Chica, USA", 25.9972, -97.1566),
    LandingSite::new("Kourou, FRA", 5.2360, -52.7680),
];

const KUIPER: &[LandingSite] = &[
    LandingSite::new("Redmond, USA", 47.6740, -122.1215),
    LandingSite::new("Cape Canaveral, USA", 28.3968, -80.6057),
    LandingSite::new("Bangalore, IND", 12.9716, 77.5946),
    LandingSite::new("Paris, FRA", 48.8566, 2.3522),
];

const GALILEO: &[LandingSite] = &[
    LandingSite::new("Oberpfaffenhofen, DEU", 48.0810, 11.2779),
    LandingSite::new("Fucino, ITA", 41.9656, 13.5600),
    LandingSite::new("Kourou, FRA", 5.2360, -52.7680),
];

const GPS: &[LandingSite] = &[
    LandingSite::new("Colorado Springs, USA", 38.8339, -104.8214),
    LandingSite::new("Ascension Island", -7.9467, -14.3559),
    LandingSite::new("Kwajalein, MHL", 9.1890, 167.4200),
];

const GLONASS: &[LandingSite] = &[
    LandingSite::new("St. Petersburg, RUS", 59.9311, 30.3609),
    LandingSite::new("Moscow, RUS", 55.7558, 37.6173),
    LandingSite::new("Khabarovsk, RUS", 48.4808, 135.0928),
];

/// Known sites for a constellation; empty for groups without a table.
pub fn landing_sites(group: &str) -> &'static [LandingSite] {
    match group {
        "Starlink" => STARLINK,
        "Kuiper" => KUIPER,
        "Galileo" => GALILEO,
        "GPS" => GPS,
        "GLONASS" => GLONASS,
        _ => &[],
    }
}

/// Which landing stations are on the globe
#[derive(Resource, Debug, Default)]
pub struct LandingStations {
    visible: bool,
    group: Option<String>,
}

impl LandingStations {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility for `group`. Returns the new visibility.
    pub fn toggle(&mut self, group: &str) -> bool {
        self.visible = !self.visible;
        self.group = Some(group.to_string());
        self.visible
    }

    /// Point at `group`, keeping the current visibility.
    pub fn refresh(&mut self, group: &str) -> bool {
        self.group = Some(group.to_string());
        self.visible
    }

    /// Hide everything and forget the group.
    pub fn clear(&mut self) {
        self.visible = false;
        self.group = None;
    }

    /// Sites that should currently be drawn.
    pub fn sites(&self) -> &'static [LandingSite] {
        match (&self.group, self.visible) {
            (Some(group), true) => landing_sites(group),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(landing_sites("Starlink").len(), 5);
        assert_eq!(landing_sites("Kuiper").len(), 4);
        assert_eq!(landing_sites("GPS")[1].name, "Ascension Island");
        assert!(landing_sites("Iridium").is_empty());

        for group in ["Starlink", "Kuiper", "Galileo", "GPS", "GLONASS"] {
            for site in landing_sites(group) {
                assert!((-90.0..=90.0).contains(&site.latitude_deg), "{}", site.name);
                assert!((-180.0..=180.0).contains(&site.longitude_deg), "{}", site.name);
            }
        }
    }

    #[test]
    fn test_hidden_by_default() {
        let stations = LandingStations::default();
        assert!(!stations.is_visible());
        assert!(stations.sites().is_empty());
    }

    #[test]
    fn test_toggle_and_refresh() {
        let mut stations = LandingStations::default();
        assert!(stations.toggle("GPS"));
        assert_eq!(stations.sites().len(), 3);

        // Switching group keeps stations shown
        assert!(stations.refresh("Starlink"));
        assert_eq!(stations.sites()[0].name, "Hawthorne, USA");

        assert!(!stations.toggle("Starlink"));
        assert!(stations.sites().is_empty());

        // Refresh while hidden stays hidden
        assert!(!stations.refresh("GLONASS"));
        assert!(stations.sites().is_empty());
        assert!(stations.toggle("GLONASS"));
        assert_eq!(stations.sites()[0].name, landing_sites("GLONASS")[0].name);
    }

    #[test]
    fn test_clear_hides_stations() {
        let mut stations = LandingStations::default();
        stations.toggle("Starlink");
        stations.clear();
        assert!(!stations.is_visible());
        assert!(stations.sites().is_empty());
        // A later refresh does not bring the old group back
        assert!(!stations.refresh("GPS"));
        assert!(stations.sites().is_empty());
    }
}
