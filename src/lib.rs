//! Place search, reverse geocoding and single-marker map rendering,
//! exposed as callable tasks.

pub mod location;
pub mod map;
pub mod server;
pub mod tasks;
