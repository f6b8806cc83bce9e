//! Geocoding subsystem.
//!
//! Forward lookup (place name to coordinates) and reverse lookup (coordinates
//! to address) behind the `Geocoder` trait, with an OpenStreetMap Nominatim
//! implementation.

pub mod providers;
pub mod types;

pub use providers::{Geocoder, NominatimConfig, NominatimGeocoder};
pub use types::{
    Address, AddressResult, Coordinate, GeocodeError, LookupError, LookupResult, Place,
};
