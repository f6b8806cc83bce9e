//! Static map rendering.
//!
//! A `MapView` holds a center, a zoom level and markers; a `MapRenderer`
//! turns it into self-contained Leaflet markup. Templates are compiled once.

mod templates;

use crate::location::Coordinate;
use serde::Serialize;
use tera::{Context, Tera};

/// Street-level zoom.
pub const STREET_ZOOM: u8 = 15;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Location values must be finite numbers, got [{latitude}, {longitude}]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

fn checked(at: Coordinate) -> Result<Coordinate, MapError> {
    if at.is_finite() {
        Ok(at)
    } else {
        Err(MapError::InvalidCoordinate {
            latitude: at.latitude,
            longitude: at.longitude,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            max_zoom: 19,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub popup: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    center: Coordinate,
    zoom: u8,
    tiles: TileLayer,
    markers: Vec<Marker>,
}

impl MapView {
    pub fn new(center: Coordinate, zoom: u8) -> Result<Self, MapError> {
        Ok(Self {
            center: checked(center)?,
            zoom,
            tiles: TileLayer::default(),
            markers: Vec::new(),
        })
    }

    pub fn add_marker(&mut self, at: Coordinate, popup: impl Into<String>) -> Result<(), MapError> {
        self.markers.push(Marker {
            coordinate: checked(at)?,
            popup: popup.into(),
        });
        Ok(())
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    map_id: String,
    #[serde(flatten)]
    view: &'a MapView,
}

pub struct MapRenderer {
    tera: Tera,
}

impl MapRenderer {
    pub fn new() -> Result<Self, MapError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (templates::DOCUMENT_NAME, templates::DOCUMENT_HTML),
            (templates::EMBED_NAME, templates::EMBED_HTML),
        ])?;
        Ok(Self { tera })
    }

    /// Full standalone HTML document for the view.
    pub fn to_document(&self, view: &MapView) -> Result<String, MapError> {
        let ctx = DocumentContext {
            map_id: format!("map_{}", uuid::Uuid::new_v4().simple()),
            view,
        };
        let context = Context::from_serialize(&ctx)?;
        Ok(self.tera.render(templates::DOCUMENT_NAME, &context)?)
    }

    /// The document escaped into an `<iframe srcdoc>`, ready to embed in any page.
    pub fn to_markup(&self, view: &MapView) -> Result<String, MapError> {
        let document = self.to_document(view)?;
        let mut context = Context::new();
        context.insert("document", &document);
        Ok(self.tera.render(templates::EMBED_NAME, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nyc() -> Coordinate {
        Coordinate::new(40.7128, -74.006)
    }

    #[test]
    fn test_document_has_center_zoom_and_marker() {
        let renderer = MapRenderer::new().unwrap();
        let mut view = MapView::new(nyc(), STREET_ZOOM).unwrap();
        view.add_marker(nyc(), "Location").unwrap();

        let html = renderer.to_document(&view).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("center: [40.7128, -74.006]"));
        assert!(html.contains("zoom: 15"));
        assert_eq!(html.matches("L.marker(").count(), 1);
        assert!(html.contains(r#".bindPopup("Location")"#));
        assert!(html.contains("leaflet@1.9.3"));
    }

    #[test]
    fn test_markup_escapes_document_into_iframe() {
        let renderer = MapRenderer::new().unwrap();
        let mut view = MapView::new(nyc(), STREET_ZOOM).unwrap();
        view.add_marker(nyc(), "Location").unwrap();

        let markup = renderer.to_markup(&view).unwrap();
        assert!(markup.starts_with("<div"));
        assert!(markup.contains("<iframe srcdoc=\"&lt;!DOCTYPE html&gt;"));
        assert!(!markup.contains("<script"));
        assert_eq!(markup.matches("L.marker(").count(), 1);
        assert!(markup.contains("40.7128"));
        assert!(markup.contains("-74.006"));
    }

    #[test]
    fn test_map_ids_are_fresh_per_render() {
        let renderer = MapRenderer::new().unwrap();
        let view = MapView::new(nyc(), STREET_ZOOM).unwrap();
        let a = renderer.to_document(&view).unwrap();
        let b = renderer.to_document(&view).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_popup_text_is_json_quoted() {
        let renderer = MapRenderer::new().unwrap();
        let mut view = MapView::new(nyc(), STREET_ZOOM).unwrap();
        view.add_marker(nyc(), "Joe's \"Diner\"").unwrap();
        let html = renderer.to_document(&view).unwrap();
        assert!(html.contains(r#".bindPopup("Joe's \"Diner\"")"#));
    }

    #[test]
    fn test_non_finite_center_rejected() {
        let err = MapView::new(Coordinate::new(f64::NAN, 0.0), STREET_ZOOM).unwrap_err();
        assert!(matches!(err, MapError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_non_finite_marker_rejected() {
        let mut view = MapView::new(nyc(), STREET_ZOOM).unwrap();
        assert!(view.add_marker(Coordinate::new(0.0, f64::INFINITY), "x").is_err());
        assert!(view.markers().is_empty());
    }
}
