//! Geocoding providers: the `Geocoder` seam and the OpenStreetMap Nominatim client.

use super::types::{Address, Coordinate, GeocodeError, Place};
use serde::Deserialize;
use std::time::Duration;

/// Forward and reverse geocoding against some provider.
///
/// `Ok(None)` means the provider answered but had no match.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Option<Place>, GeocodeError>;

    fn reverse(&self, at: Coordinate) -> Result<Option<Address>, GeocodeError>;
}

// ─── Configuration ──────────────────────────────────────────────

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "LocationApp";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ─── Nominatim provider ─────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Deserialize, Debug, Clone)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
    /// Present instead of a match: a string such as `"Unable to geocode"`,
    /// or an object `{"code": .., "message": ..}`.
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Blocking Nominatim client. Build once, share by reference.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &NominatimConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        tracing::debug!(query, "nominatim search");
        let response = self
            .agent
            .get(&self.endpoint("search"))
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .call()
            .map_err(transport_error)?;

        let hits: Vec<SearchHit> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        place_from_hits(hits)
    }

    fn reverse(&self, at: Coordinate) -> Result<Option<Address>, GeocodeError> {
        tracing::debug!(lat = at.latitude, lon = at.longitude, "nominatim reverse");
        let response = self
            .agent
            .get(&self.endpoint("reverse"))
            .query("lat", &at.latitude.to_string())
            .query("lon", &at.longitude.to_string())
            .query("format", "json")
            .call()
            .map_err(transport_error)?;

        let hit: ReverseHit = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        address_from_hit(hit)
    }
}

fn transport_error(e: ureq::Error) -> GeocodeError {
    match e {
        ureq::Error::Status(code, _) => GeocodeError::Status(code),
        ureq::Error::Transport(t) => GeocodeError::Network(t.to_string()),
    }
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse(format!("invalid {}: {}", field, e)))
}

fn place_from_hits(hits: Vec<SearchHit>) -> Result<Option<Place>, GeocodeError> {
    let Some(top) = hits.into_iter().next() else {
        return Ok(None);
    };
    let latitude = parse_degrees(&top.lat, "lat")?;
    let longitude = parse_degrees(&top.lon, "lon")?;
    Ok(Some(Place {
        coordinate: Coordinate::new(latitude, longitude),
        display_name: top.display_name,
    }))
}

/// Nominatim's reverse answer when nothing is near the coordinate.
const NO_MATCH: &str = "Unable to geocode";

fn provider_message(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(msg) => msg.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

fn address_from_hit(hit: ReverseHit) -> Result<Option<Address>, GeocodeError> {
    if let Some(error) = &hit.error {
        let msg = provider_message(error);
        if msg == NO_MATCH {
            return Ok(None);
        }
        return Err(GeocodeError::Provider(msg));
    }
    Ok(hit
        .display_name
        .filter(|a| !a.is_empty())
        .map(|address| Address { address }))
}

/// In-memory provider for tests.
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct StaticGeocoder {
        pub places: HashMap<String, Coordinate>,
        pub addresses: Vec<(Coordinate, Address)>,
        /// When set, every call fails with `GeocodeError::Network(msg)`.
        pub outage: Option<String>,
    }

    impl StaticGeocoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_place(mut self, name: &str, lat: f64, lon: f64) -> Self {
            self.places.insert(name.to_lowercase(), Coordinate::new(lat, lon));
            self
        }

        pub fn with_address(mut self, lat: f64, lon: f64, address: &str) -> Self {
            self.addresses.push((
                Coordinate::new(lat, lon),
                Address { address: address.to_string() },
            ));
            self
        }

        pub fn down(msg: &str) -> Self {
            Self { outage: Some(msg.to_string()), ..Self::default() }
        }
    }

    impl Geocoder for StaticGeocoder {
        fn geocode(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
            if let Some(msg) = &self.outage {
                return Err(GeocodeError::Network(msg.clone()));
            }
            Ok(self.places.get(&query.to_lowercase()).map(|c| Place {
                coordinate: *c,
                display_name: query.to_string(),
            }))
        }

        fn reverse(&self, at: Coordinate) -> Result<Option<Address>, GeocodeError> {
            if let Some(msg) = &self.outage {
                return Err(GeocodeError::Network(msg.clone()));
            }
            Ok(self
                .addresses
                .iter()
                .find(|(c, _)| (c.latitude - at.latitude).abs() < 1e-3 && (c.longitude - at.longitude).abs() < 1e-3)
                .map(|(_, a)| a.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_search_hit_parsing() {
        let body = r#"[{"place_id":1,"lat":"40.7127281","lon":"-74.0060152",
            "display_name":"City of New York, New York, United States","importance":0.9}]"#;
        let hits: Vec<SearchHit> = serde_json::from_str(body).unwrap();
        let place = place_from_hits(hits).unwrap().unwrap();
        assert_relative_eq!(place.coordinate.latitude, 40.7127281);
        assert_relative_eq!(place.coordinate.longitude, -74.0060152);
        assert!(place.display_name.starts_with("City of New York"));
    }

    #[test]
    fn test_search_empty_is_no_match() {
        let hits: Vec<SearchHit> = serde_json::from_str("[]").unwrap();
        assert!(place_from_hits(hits).unwrap().is_none());
    }

    #[test]
    fn test_search_bad_latitude() {
        let hits = vec![SearchHit {
            lat: "north".into(),
            lon: "0".into(),
            display_name: "x".into(),
        }];
        let err = place_from_hits(hits).unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }

    #[test]
    fn test_reverse_hit_parsing() {
        let body = r#"{"place_id":7,"lat":"40.7127753","lon":"-74.0059728",
            "display_name":"New York City Hall, Manhattan, New York, United States"}"#;
        let hit: ReverseHit = serde_json::from_str(body).unwrap();
        let addr = address_from_hit(hit).unwrap().unwrap();
        assert_eq!(addr.address, "New York City Hall, Manhattan, New York, United States");
    }

    #[test]
    fn test_reverse_unable_to_geocode() {
        let hit: ReverseHit = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(address_from_hit(hit).unwrap().is_none());
    }

    #[test]
    fn test_reverse_provider_error_string() {
        let hit: ReverseHit = serde_json::from_str(r#"{"error":"Rate limit exceeded"}"#).unwrap();
        let err = address_from_hit(hit).unwrap_err();
        assert!(matches!(err, GeocodeError::Provider(ref m) if m == "Rate limit exceeded"));
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_reverse_provider_error_object() {
        let body = r#"{"error":{"code":400,"message":"Parameter 'lat' must be a number."}}"#;
        let hit: ReverseHit = serde_json::from_str(body).unwrap();
        let err = address_from_hit(hit).unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'lat' must be a number.");
    }

    #[test]
    fn test_non_2xx_status_is_status_error() {
        let response = ureq::Response::new(503, "Service Unavailable", "").unwrap();
        let err = transport_error(ureq::Error::Status(503, response));
        assert!(matches!(err, GeocodeError::Status(503)));
        assert_eq!(err.to_string(), "Provider returned HTTP 503");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let geocoder = NominatimGeocoder::new(&NominatimConfig {
            base_url: "http://localhost:8080/".into(),
            ..NominatimConfig::default()
        });
        assert_eq!(geocoder.endpoint("search"), "http://localhost:8080/search");
    }

    #[test]
    fn test_default_config() {
        let config = NominatimConfig::default();
        assert_eq!(config.user_agent, "LocationApp");
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_unreachable_provider_is_network_error() {
        // Port 9 (discard) on loopback is not expected to speak HTTP.
        let geocoder = NominatimGeocoder::new(&NominatimConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..NominatimConfig::default()
        });
        let err = geocoder.geocode("anywhere").unwrap_err();
        assert!(matches!(err, GeocodeError::Network(_)));
    }
}
