//! The three callable tasks: place search, reverse lookup and map generation.
//!
//! Every task swallows collaborator failures and returns them as values.
//! The lookups answer `{error}` objects; the map answers a prefixed string.

use crate::location::{AddressResult, Coordinate, Geocoder, LookupError, LookupResult};
use crate::map::{MapError, MapRenderer, MapView, STREET_ZOOM};
use serde::Serialize;

pub const MARKER_LABEL: &str = "Location";
pub const MAP_ERROR_PREFIX: &str = "Error generating map: ";

/// Name and one-line description of a callable task.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub const TASKS: &[TaskInfo] = &[
    TaskInfo {
        name: "search_place",
        description: "Search for a place and return its coordinates.",
    },
    TaskInfo {
        name: "get_location_info",
        description: "Get location details from coordinates.",
    },
    TaskInfo {
        name: "generate_map",
        description: "Generate an interactive map with a marker at the specified location.",
    },
];

// ─── search_place ────────────────────────────────────────────────

pub fn try_search_place(geocoder: &dyn Geocoder, place: &str) -> Result<LookupResult, LookupError> {
    let found = geocoder
        .geocode(place)?
        .ok_or_else(|| LookupError::NotFound(place.to_string()))?;
    tracing::debug!(place, matched = %found.display_name, "search_place matched");
    Ok(LookupResult::Found {
        place: place.to_string(),
        latitude: found.coordinate.latitude,
        longitude: found.coordinate.longitude,
    })
}

pub fn search_place(geocoder: &dyn Geocoder, place: &str) -> LookupResult {
    try_search_place(geocoder, place).unwrap_or_else(|e| {
        tracing::warn!(place, error = %e, "search_place failed");
        LookupResult::Failed { error: e.to_string() }
    })
}

// ─── get_location_info ───────────────────────────────────────────

pub fn try_get_location_info(
    geocoder: &dyn Geocoder,
    latitude: f64,
    longitude: f64,
) -> Result<AddressResult, LookupError> {
    let found = geocoder
        .reverse(Coordinate::new(latitude, longitude))?
        .ok_or(LookupError::NoAddress)?;
    // Echo the caller's coordinate, not where the provider put the match.
    Ok(AddressResult::Found {
        address: found.address,
        latitude,
        longitude,
    })
}

pub fn get_location_info(geocoder: &dyn Geocoder, latitude: f64, longitude: f64) -> AddressResult {
    try_get_location_info(geocoder, latitude, longitude).unwrap_or_else(|e| {
        tracing::warn!(latitude, longitude, error = %e, "get_location_info failed");
        AddressResult::Failed { error: e.to_string() }
    })
}

// ─── generate_map ────────────────────────────────────────────────

pub fn try_generate_map(renderer: &MapRenderer, latitude: f64, longitude: f64) -> Result<String, MapError> {
    let at = Coordinate::new(latitude, longitude);
    let mut view = MapView::new(at, STREET_ZOOM)?;
    view.add_marker(at, MARKER_LABEL)?;
    renderer.to_markup(&view)
}

/// Markup on success, `"Error generating map: ..."` plain text on failure.
pub fn generate_map(renderer: &MapRenderer, latitude: f64, longitude: f64) -> String {
    try_generate_map(renderer, latitude, longitude).unwrap_or_else(|e| {
        tracing::warn!(latitude, longitude, error = %e, "generate_map failed");
        format!("{}{}", MAP_ERROR_PREFIX, e)
    })
}

// ─── Application handle ──────────────────────────────────────────

/// Long-lived collaborators, built once at startup and shared read-only.
pub struct LocationApp {
    geocoder: Box<dyn Geocoder>,
    renderer: MapRenderer,
}

impl LocationApp {
    pub fn new(geocoder: Box<dyn Geocoder>, renderer: MapRenderer) -> Self {
        Self { geocoder, renderer }
    }

    pub fn search_place(&self, place: &str) -> LookupResult {
        search_place(self.geocoder.as_ref(), place)
    }

    pub fn get_location_info(&self, latitude: f64, longitude: f64) -> AddressResult {
        get_location_info(self.geocoder.as_ref(), latitude, longitude)
    }

    pub fn generate_map(&self, latitude: f64, longitude: f64) -> String {
        generate_map(&self.renderer, latitude, longitude)
    }
}
