//! Travel modes and their static waypoint tables.
//!
//! A [`TripMode`] keys every per-mode resource in the system: the waypoint
//! route served to the client and the generated trip image in the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How a trip is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMode {
    Foot,
    Bike,
    Car,
}

impl TripMode {
    /// The full fixed set, in generation order.
    pub const ALL: [TripMode; 3] = [TripMode::Foot, TripMode::Bike, TripMode::Car];

    /// Returns the string representation used in URLs, prompts and the
    /// database key column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripMode::Foot => "foot",
            TripMode::Bike => "bike",
            TripMode::Car => "car",
        }
    }
}

impl fmt::Display for TripMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`TripMode`].
#[derive(Debug, Error)]
#[error("unknown trip mode: {0}")]
pub struct UnknownTripMode(pub String);

impl FromStr for TripMode {
    type Err = UnknownTripMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot" => Ok(TripMode::Foot),
            "bike" => Ok(TripMode::Bike),
            "car" => Ok(TripMode::Car),
            other => Err(UnknownTripMode(other.to_string())),
        }
    }
}

/// A point of interest on a trip route.
#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub info: &'static str,
}

const FOOT_WAYPOINTS: [Waypoint; 4] = [
    Waypoint {
        name: "Trinity College Dublin",
        lat: 53.343270,
        lng: -6.254400,
        info: "Trinity College Dublin is Ireland's oldest university.",
    },
    Waypoint {
        name: "Dublin Castle",
        lat: 53.343600,
        lng: -6.266700,
        info: "Dublin Castle is a historic landmark and government complex.",
    },
    Waypoint {
        name: "Grafton Street",
        lat: 53.343700,
        lng: -6.259600,
        info: "Grafton Street is one of Dublin's premier shopping streets.",
    },
    Waypoint {
        name: "St. Stephen's Green",
        lat: 53.337200,
        lng: -6.259100,
        info: "St. Stephen's Green is a large public park in Dublin city center.",
    },
];

const BIKE_WAYPOINTS: [Waypoint; 4] = [
    Waypoint {
        name: "Cliffs of Moher",
        lat: 52.9719,
        lng: -9.4245,
        info: "The Cliffs of Moher are sea cliffs located in County Clare.",
    },
    Waypoint {
        name: "Gap of Dunloe",
        lat: 52.0170,
        lng: -9.5842,
        info: "The Gap of Dunloe is a scenic mountain pass in County Kerry.",
    },
    Waypoint {
        name: "Connemara National Park",
        lat: 53.5537,
        lng: -9.9036,
        info: "Connemara National Park is located in County Galway.",
    },
    Waypoint {
        name: "Ring of Kerry",
        lat: 51.9995,
        lng: -9.7428,
        info: "The Ring of Kerry is a scenic drive around the Iveragh Peninsula in County Kerry.",
    },
];

const CAR_WAYPOINTS: [Waypoint; 4] = [
    Waypoint {
        name: "The Giant's Causeway",
        lat: 55.2406,
        lng: -6.5111,
        info: "The Giant's Causeway is an area of about 40,000 interlocking basalt columns located in County Antrim.",
    },
    Waypoint {
        name: "Blarney Castle",
        lat: 51.9291,
        lng: -8.5705,
        info: "Blarney Castle is a medieval stronghold in Blarney, near Cork.",
    },
    Waypoint {
        name: "Rock of Cashel",
        lat: 52.5219,
        lng: -7.8909,
        info: "The Rock of Cashel is a historic site located at Cashel, County Tipperary.",
    },
    Waypoint {
        name: "Kylemore Abbey",
        lat: 53.5606,
        lng: -9.8892,
        info: "Kylemore Abbey is a Benedictine monastery founded in 1920 on the grounds of Kylemore Castle, in Connemara, County Galway.",
    },
];

/// The waypoint route for one travel mode.
pub fn waypoints(mode: TripMode) -> &'static [Waypoint] {
    match mode {
        TripMode::Foot => &FOOT_WAYPOINTS,
        TripMode::Bike => &BIKE_WAYPOINTS,
        TripMode::Car => &CAR_WAYPOINTS,
    }
}
