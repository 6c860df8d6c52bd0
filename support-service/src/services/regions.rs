//! Coordinate-to-region lookup.
//!
//! Fabricates a plausible city/state pair from coordinate ranges. No real
//! geocoding happens: the tables below are a placeholder for a genuine
//! location directory, and the names they produce are not authoritative.
//! Everything downstream reaches this through [`RegionResolver`] so a real
//! service can be swapped in without touching the classifier or the
//! resource synthesizer.

use crate::models::Location;

/// City used when no bounding box matches.
pub const FALLBACK_CITY: &str = "Metro City";

/// State abbreviation used when coordinates resolve nowhere.
pub const FALLBACK_STATE: &str = "US";

/// A fabricated locality. Deterministic for identical coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    pub city: String,
    pub state: String,
}

/// Maps coordinates to a display locality.
pub trait RegionResolver: Send + Sync {
    /// Resolve coordinates to a locality. Implementations must return the
    /// same locality for identical inputs.
    fn locate(&self, location: &Location) -> Locality;
}

struct RegionBox {
    lat_min: f64,
    lat_max: f64,
    lng_min: f64,
    lng_max: f64,
    cities: [&'static str; 6],
}

impl RegionBox {
    fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lng >= self.lng_min && lng <= self.lng_max
    }

    /// Deterministic pick: floor((lat+lng)*1000) mod list length, with a
    /// Euclidean remainder so negative coordinate sums still index the list.
    fn pick_city(&self, lat: f64, lng: f64) -> &'static str {
        let index = (((lat + lng) * 1000.0).floor() as i64).rem_euclid(self.cities.len() as i64);
        self.cities[index as usize]
    }
}

/// Ordered bounding boxes; the first match wins.
const REGIONS: &[RegionBox] = &[
    // Northeast
    RegionBox {
        lat_min: 40.0,
        lat_max: 42.0,
        lng_min: -75.0,
        lng_max: -73.0,
        cities: [
            "Newark",
            "Jersey City",
            "Bridgeport",
            "Stamford",
            "New Haven",
            "Trenton",
        ],
    },
    // New York City metro
    RegionBox {
        lat_min: 40.4,
        lat_max: 41.0,
        lng_min: -74.5,
        lng_max: -73.5,
        cities: [
            "Brooklyn",
            "Queens",
            "Manhattan",
            "Bronx",
            "Staten Island",
            "Yonkers",
        ],
    },
    // California
    RegionBox {
        lat_min: 32.0,
        lat_max: 42.0,
        lng_min: -125.0,
        lng_max: -114.0,
        cities: [
            "Los Angeles",
            "San Francisco",
            "San Diego",
            "Oakland",
            "Sacramento",
            "Fresno",
        ],
    },
    // Texas
    RegionBox {
        lat_min: 25.0,
        lat_max: 37.0,
        lng_min: -107.0,
        lng_max: -93.0,
        cities: [
            "Houston",
            "Dallas",
            "Austin",
            "San Antonio",
            "Fort Worth",
            "El Paso",
        ],
    },
    // Florida
    RegionBox {
        lat_min: 24.0,
        lat_max: 31.0,
        lng_min: -87.0,
        lng_max: -79.0,
        cities: [
            "Miami",
            "Tampa",
            "Orlando",
            "Jacksonville",
            "Tallahassee",
            "Fort Lauderdale",
        ],
    },
    // Midwest
    RegionBox {
        lat_min: 38.0,
        lat_max: 49.0,
        lng_min: -105.0,
        lng_max: -80.0,
        cities: [
            "Chicago",
            "Detroit",
            "Milwaukee",
            "Minneapolis",
            "Cleveland",
            "Indianapolis",
        ],
    },
    // Southeast
    RegionBox {
        lat_min: 30.0,
        lat_max: 40.0,
        lng_min: -90.0,
        lng_max: -75.0,
        cities: [
            "Atlanta",
            "Charlotte",
            "Nashville",
            "Memphis",
            "Birmingham",
            "Richmond",
        ],
    },
    // Pacific Northwest
    RegionBox {
        lat_min: 42.0,
        lat_max: 49.0,
        lng_min: -125.0,
        lng_max: -110.0,
        cities: [
            "Seattle", "Portland", "Spokane", "Eugene", "Tacoma", "Boise",
        ],
    },
];

/// Coarse state guess from threshold rules. Same placeholder status as the
/// city tables.
fn state_for(lat: f64, lng: f64) -> &'static str {
    if lat > 40.0 && lng < -100.0 {
        "MN"
    } else if lat > 35.0 && lng < -95.0 {
        "TX"
    } else if lat > 30.0 && lng < -90.0 {
        "LA"
    } else if lat < 35.0 && lng > -85.0 {
        "FL"
    } else {
        "OH"
    }
}

/// The shipped table-backed resolver.
pub struct StaticRegionTable;

impl RegionResolver for StaticRegionTable {
    fn locate(&self, location: &Location) -> Locality {
        let (lat, lng) = (location.latitude, location.longitude);

        let city = REGIONS
            .iter()
            .find(|b| b.contains(lat, lng))
            .map(|b| b.pick_city(lat, lng))
            .unwrap_or(FALLBACK_CITY);

        let state = if city == FALLBACK_CITY {
            FALLBACK_STATE
        } else {
            state_for(lat, lng)
        };

        Locality {
            city: city.to_string(),
            state: state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(lat: f64, lng: f64) -> Locality {
        StaticRegionTable.locate(&Location {
            latitude: lat,
            longitude: lng,
        })
    }

    #[test]
    fn northeast_lookup_is_deterministic() {
        let first = locate(40.72, -74.04);
        for _ in 0..10 {
            assert_eq!(locate(40.72, -74.04), first);
        }
        let northeast = [
            "Newark",
            "Jersey City",
            "Bridgeport",
            "Stamford",
            "New Haven",
            "Trenton",
        ];
        assert!(northeast.contains(&first.city.as_str()));
    }

    #[test]
    fn northeast_shadows_nyc_metro() {
        // Both boxes contain this point; the Northeast box is checked first.
        let loc = locate(40.7, -74.0);
        assert_ne!(loc.city, "Brooklyn");
        assert_ne!(loc.city, "Manhattan");
    }

    #[test]
    fn california_coordinates_pick_a_california_city() {
        let loc = locate(34.05, -118.24);
        let california = [
            "Los Angeles",
            "San Francisco",
            "San Diego",
            "Oakland",
            "Sacramento",
            "Fresno",
        ];
        assert!(california.contains(&loc.city.as_str()));
    }

    #[test]
    fn unmatched_coordinates_fall_back() {
        let loc = locate(10.0, 10.0);
        assert_eq!(loc.city, FALLBACK_CITY);
        assert_eq!(loc.state, FALLBACK_STATE);
    }

    #[test]
    fn state_thresholds() {
        assert_eq!(state_for(45.0, -105.0), "MN");
        assert_eq!(state_for(36.0, -97.0), "TX");
        assert_eq!(state_for(31.0, -91.0), "LA");
        assert_eq!(state_for(28.0, -82.0), "FL");
        assert_eq!(state_for(40.0, -80.0), "OH");
    }
}
