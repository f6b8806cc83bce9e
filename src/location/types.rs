//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
///
/// No range check is applied: values travel to the provider exactly as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A forward-geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinate: Coordinate,
    /// Full display name from the provider (e.g. "New York, United States")
    pub display_name: String,
}

/// A reverse-geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub address: String,
}

/// Outcome of `search_place`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResult {
    Found {
        place: String,
        latitude: f64,
        longitude: f64,
    },
    Failed {
        error: String,
    },
}

impl LookupResult {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Found { latitude, longitude, .. } => Some(Coordinate::new(*latitude, *longitude)),
            Self::Failed { .. } => None,
        }
    }
}

/// Outcome of `get_location_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressResult {
    Found {
        address: String,
        latitude: f64,
        longitude: f64,
    },
    Failed {
        error: String,
    },
}

impl AddressResult {
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Failures talking to a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Provider returned HTTP {0}")]
    Status(u16),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    /// The provider answered with an error body of its own.
    #[error("{0}")]
    Provider(String),
}

/// Why a lookup task produced no result.
///
/// `NotFound` and `NoAddress` render the exact messages callers see.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Could not find location: {0}")]
    NotFound(String),
    #[error("Could not retrieve location details")]
    NoAddress,
    #[error(transparent)]
    Provider(#[from] GeocodeError),
}
