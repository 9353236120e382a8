//! Map renderer.
//!
//! [`MapRenderer`] keeps a retained model of every layer and forwards each
//! change to a [`MapSurface`]. In the browser the surface is Leaflet. Off the
//! browser, [`HeadlessSurface`] discards the calls and the model alone answers
//! questions about what is on the map.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::commands::string_or_number;
use crate::models::{LatLng, MapActions, Marker, Place, Route};

/// Kathmandu Durbar Square area.
pub const DEFAULT_CENTER: LatLng = LatLng(27.7172, 85.3240);
pub const DEFAULT_ZOOM: f64 = 13.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM }
    }
}

/// A server-placed pin, addressed by id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Pin {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Pin {
    pub fn position(&self) -> LatLng {
        LatLng(self.lat, self.lng)
    }

    pub fn color(&self) -> &str {
        match (self.color.as_deref(), self.kind.as_deref()) {
            (Some(c), _) if !c.is_empty() => c,
            (_, Some("hotel")) => "#d9480f",
            _ => "#2f9e44",
        }
    }
}

/// Drawing primitives the renderer needs from a map library.
pub trait MapSurface {
    fn set_view(&mut self, center: LatLng, zoom: f64);

    fn clear_routes(&mut self);
    fn draw_route(&mut self, route: &Route);

    fn clear_markers(&mut self);
    fn draw_marker(&mut self, marker: &Marker);

    fn draw_pin(&mut self, pin: &Pin);
    fn erase_pin(&mut self, id: &str);
    fn clear_pins(&mut self);

    fn clear_catalog(&mut self);
    fn draw_catalog_place(&mut self, place: &Place);
}

/// Surface that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessSurface;

impl MapSurface for HeadlessSurface {
    fn set_view(&mut self, _: LatLng, _: f64) {}
    fn clear_routes(&mut self) {}
    fn draw_route(&mut self, _: &Route) {}
    fn clear_markers(&mut self) {}
    fn draw_marker(&mut self, _: &Marker) {}
    fn draw_pin(&mut self, _: &Pin) {}
    fn erase_pin(&mut self, _: &str) {}
    fn clear_pins(&mut self) {}
    fn clear_catalog(&mut self) {}
    fn draw_catalog_place(&mut self, _: &Place) {}
}

pub struct MapRenderer<M> {
    surface: M,
    viewport: Viewport,
    routes: Vec<Route>,
    markers: Vec<Marker>,
    pins: BTreeMap<String, Pin>,
    catalog: Vec<Place>,
}

impl<M: MapSurface> MapRenderer<M> {
    pub fn new(mut surface: M) -> Self {
        let viewport = Viewport::default();
        surface.set_view(viewport.center, viewport.zoom);
        Self {
            surface,
            viewport,
            routes: Vec::new(),
            markers: Vec::new(),
            pins: BTreeMap::new(),
            catalog: Vec::new(),
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn pins(&self) -> &BTreeMap<String, Pin> {
        &self.pins
    }

    pub fn catalog(&self) -> &[Place] {
        &self.catalog
    }

    /// Applies one response's map actions. Routes are always cleared first;
    /// `None` stops there.
    pub fn apply_map_actions(&mut self, actions: Option<&MapActions>) {
        self.routes.clear();
        self.surface.clear_routes();

        let Some(actions) = actions else {
            return;
        };

        if let Some(markers) = &actions.markers {
            self.surface.clear_markers();
            for marker in markers {
                self.surface.draw_marker(marker);
            }
            self.markers = markers.clone();
        }

        if let Some(center) = actions.center {
            self.zoom_to(center, actions.zoom);
        }

        for route in actions.routes.iter().filter(|r| r.polyline.len() >= 2) {
            self.surface.draw_route(route);
            self.routes.push(route.clone());
        }
    }

    /// Moves the viewport. Without a zoom the current one is kept.
    pub fn zoom_to(&mut self, center: LatLng, zoom: Option<f64>) {
        let zoom = zoom.unwrap_or(self.viewport.zoom);
        self.viewport = Viewport { center, zoom };
        self.surface.set_view(center, zoom);
    }

    /// Adds a pin, replacing any earlier pin with the same id.
    pub fn add_pin(&mut self, pin: Pin) {
        if self.pins.remove(&pin.id).is_some() {
            self.surface.erase_pin(&pin.id);
        }
        self.surface.draw_pin(&pin);
        self.pins.insert(pin.id.clone(), pin);
    }

    pub fn remove_pin(&mut self, id: &str) -> bool {
        let removed = self.pins.remove(id).is_some();
        if removed {
            self.surface.erase_pin(id);
        }
        removed
    }

    /// Replaces the clickable catalog layer.
    pub fn show_catalog(&mut self, places: Vec<Place>) {
        self.surface.clear_catalog();
        for place in &places {
            self.surface.draw_catalog_place(place);
        }
        self.catalog = places;
    }

    /// Empties every layer and returns to the default viewport.
    pub fn reset(&mut self) {
        self.routes.clear();
        self.markers.clear();
        self.pins.clear();
        self.catalog.clear();
        self.surface.clear_routes();
        self.surface.clear_markers();
        self.surface.clear_pins();
        self.surface.clear_catalog();

        let viewport = Viewport::default();
        self.viewport = viewport;
        self.surface.set_view(viewport.center, viewport.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Counts what is currently drawn on the surface.
    #[derive(Default)]
    struct CountingSurface {
        routes: usize,
        markers: usize,
        pins: BTreeMap<String, usize>,
        views: Vec<(LatLng, f64)>,
    }

    impl MapSurface for CountingSurface {
        fn set_view(&mut self, center: LatLng, zoom: f64) {
            self.views.push((center, zoom));
        }
        fn clear_routes(&mut self) {
            self.routes = 0;
        }
        fn draw_route(&mut self, _: &Route) {
            self.routes += 1;
        }
        fn clear_markers(&mut self) {
            self.markers = 0;
        }
        fn draw_marker(&mut self, _: &Marker) {
            self.markers += 1;
        }
        fn draw_pin(&mut self, pin: &Pin) {
            *self.pins.entry(pin.id.clone()).or_default() += 1;
        }
        fn erase_pin(&mut self, id: &str) {
            if let Some(n) = self.pins.get_mut(id) {
                *n -= 1;
            }
        }
        fn clear_pins(&mut self) {
            self.pins.clear();
        }
        fn clear_catalog(&mut self) {}
        fn draw_catalog_place(&mut self, _: &Place) {}
    }

    fn pin(id: &str, lat: f64) -> Pin {
        Pin { id: id.into(), lat, lng: 85.3, color: None, label: None, kind: None }
    }

    fn actions(value: serde_json::Value) -> MapActions {
        MapActions::from_value(&value).unwrap()
    }

    #[test]
    fn none_only_clears_routes() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.apply_map_actions(Some(&actions(json!({
            "markers": [{ "type": "hotel", "name": "Thamel", "coordinates": [27.715, 85.31] }],
            "routes": [{ "polyline": [[27.71, 85.32], [27.72, 85.33]] }]
        }))));
        let views_before = map.surface().views.len();

        map.apply_map_actions(None);

        assert!(map.routes().is_empty());
        assert_eq!(map.surface().routes, 0);
        assert_eq!(map.markers().len(), 1);
        assert_eq!(map.surface().markers, 1);
        assert_eq!(map.surface().views.len(), views_before);
    }

    #[test]
    fn two_point_route_draws_one_polyline() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.apply_map_actions(Some(&actions(json!({
            "routes": [
                { "polyline": [[27.71, 85.32], [27.72, 85.33]] },
                { "polyline": [[27.71, 85.32]] }
            ]
        }))));

        assert_eq!(map.routes().len(), 1);
        assert_eq!(map.routes()[0].polyline, vec![LatLng(27.71, 85.32), LatLng(27.72, 85.33)]);
        assert_eq!(map.surface().routes, 1);
    }

    #[test]
    fn routes_do_not_accumulate_across_responses() {
        let mut map = MapRenderer::new(CountingSurface::default());
        let payload = actions(json!({ "routes": [{ "polyline": [[27.71, 85.32], [27.72, 85.33]] }] }));
        map.apply_map_actions(Some(&payload));
        map.apply_map_actions(Some(&payload));
        assert_eq!(map.routes().len(), 1);
        assert_eq!(map.surface().routes, 1);
    }

    #[test]
    fn center_without_zoom_keeps_current_zoom() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.zoom_to(LatLng(27.67, 85.32), Some(16.0));
        map.apply_map_actions(Some(&actions(json!({ "center": [27.7, 85.3] }))));
        assert_eq!(map.viewport(), Viewport { center: LatLng(27.7, 85.3), zoom: 16.0 });
    }

    #[test]
    fn markers_absent_leave_marker_layer_alone() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.apply_map_actions(Some(&actions(json!({
            "markers": [{ "type": "place", "name": "Patan", "coordinates": [27.67, 85.32] }]
        }))));
        map.apply_map_actions(Some(&actions(json!({ "center": [27.7, 85.3], "zoom": 13 }))));
        assert_eq!(map.markers().len(), 1);

        map.apply_map_actions(Some(&actions(json!({ "markers": [] }))));
        assert!(map.markers().is_empty());
        assert_eq!(map.surface().markers, 0);
    }

    #[test]
    fn re_adding_a_pin_replaces_it() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.add_pin(pin("p1", 27.70));
        map.add_pin(pin("p1", 27.71));

        assert_eq!(map.pins().len(), 1);
        assert_eq!(map.pins()["p1"].lat, 27.71);
        assert_eq!(map.surface().pins["p1"], 1);
    }

    #[test]
    fn removing_unknown_pin_is_a_no_op() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.add_pin(pin("p1", 27.70));
        assert!(!map.remove_pin("p2"));
        assert!(map.remove_pin("p1"));
        assert!(map.pins().is_empty());
        assert_eq!(map.surface().pins["p1"], 0);
    }

    #[test]
    fn reset_restores_default_view_and_empties_layers() {
        let mut map = MapRenderer::new(CountingSurface::default());
        map.add_pin(pin("p1", 27.70));
        map.apply_map_actions(Some(&actions(json!({
            "center": [27.6, 85.4], "zoom": 17,
            "markers": [{ "type": "place", "name": "Patan", "coordinates": [27.67, 85.32] }],
            "routes": [{ "polyline": [[27.71, 85.32], [27.72, 85.33]] }]
        }))));

        map.reset();

        assert_eq!(map.viewport(), Viewport { center: LatLng(27.7172, 85.3240), zoom: 13.0 });
        assert!(map.routes().is_empty() && map.markers().is_empty() && map.pins().is_empty());
        assert_eq!(map.surface().views.last(), Some(&(DEFAULT_CENTER, DEFAULT_ZOOM)));
    }

    #[test]
    fn pin_color_falls_back_by_kind() {
        let mut hotel = pin("h", 27.7);
        hotel.kind = Some("hotel".into());
        assert_eq!(hotel.color(), "#d9480f");
        hotel.color = Some("purple".into());
        assert_eq!(hotel.color(), "purple");
    }
}
