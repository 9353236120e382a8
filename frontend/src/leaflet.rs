//! Leaflet bindings and the [`MapSurface`] they implement.
//!
//! Leaflet itself is loaded from `index.html` and reached through the global `L`.

use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use ktm_planner_core::map::{HeadlessSurface, MapSurface, Pin};
use ktm_planner_core::models::{LatLng, Marker, Place, Route};

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

const ROUTE_COLOR: &str = "#e8590c";
const CATALOG_COLOR: &str = "#7048e8";

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(extends = Layer)]
    #[derive(Debug, Clone)]
    pub type LayerGroup;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(element_id: &str) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = on)]
    fn on_map(this: &LeafletMap, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn layer_group() -> LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(latlng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(latlngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap);

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Layer, content: &str);

    #[wasm_bindgen(method, js_name = on)]
    fn on_layer(this: &Layer, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LayerGroup, layer: &Layer);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LayerGroup, layer: &Layer);

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &LayerGroup);
}

fn latlng_js(p: LatLng) -> JsValue {
    js_sys::Array::of2(&JsValue::from_f64(p.lat()), &JsValue::from_f64(p.lng())).into()
}

fn options(pairs: &[(&str, JsValue)]) -> JsValue {
    let o = js_sys::Object::new();
    for (key, value) in pairs {
        let _ = js_sys::Reflect::set(&o, &JsValue::from_str(key), value);
    }
    o.into()
}

fn circle_options(color: &str, radius: f64) -> JsValue {
    options(&[
        ("radius", radius.into()),
        ("color", color.into()),
        ("fillColor", color.into()),
        ("fillOpacity", 0.85.into()),
        ("weight", 2.into()),
    ])
}

/// Reads `event.latlng` from a Leaflet mouse event.
fn event_latlng(event: &JsValue) -> Option<LatLng> {
    let latlng = js_sys::Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = js_sys::Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = js_sys::Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LatLng(lat, lng))
}

pub struct LeafletSurface {
    map: LeafletMap,
    routes: LayerGroup,
    markers: LayerGroup,
    pins: LayerGroup,
    catalog: LayerGroup,
    pin_layers: HashMap<String, Layer>,
    on_place: Rc<dyn Fn(Place)>,
    // Kept alive for as long as Leaflet may call them.
    catalog_handlers: Vec<Closure<dyn Fn()>>,
    _context_handler: Closure<dyn Fn(JsValue)>,
}

impl LeafletSurface {
    /// Creates the map inside the element with `element_id`.
    ///
    /// `on_place` fires when a catalog place is clicked, `on_context` when the
    /// map is right-clicked.
    pub fn mount(
        element_id: &str,
        on_place: impl Fn(Place) + 'static,
        on_context: impl Fn(LatLng) + 'static,
    ) -> Result<Self, JsValue> {
        let map = leaflet_map(element_id)?;
        tile_layer(
            TILE_URL,
            &options(&[("maxZoom", 19.into()), ("attribution", TILE_ATTRIBUTION.into())]),
        )
        .add_to(&map);

        let group = || {
            let g = layer_group();
            g.add_to(&map);
            g
        };
        let catalog = group();
        let markers = group();
        let routes = group();
        let pins = group();

        let context_handler = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            if let Some(at) = event_latlng(&event) {
                on_context(at);
            }
        });
        map.on_map("contextmenu", context_handler.as_ref().unchecked_ref());

        Ok(Self {
            map,
            routes,
            markers,
            pins,
            catalog,
            pin_layers: HashMap::new(),
            on_place: Rc::new(on_place),
            catalog_handlers: Vec::new(),
            _context_handler: context_handler,
        })
    }
}

impl MapSurface for LeafletSurface {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map.set_view(&latlng_js(center), zoom);
    }

    fn clear_routes(&mut self) {
        self.routes.clear_layers();
    }

    fn draw_route(&mut self, route: &Route) {
        let points: js_sys::Array = route.polyline.iter().map(|p| latlng_js(*p)).collect();
        let line = polyline(
            &points.into(),
            &options(&[("color", ROUTE_COLOR.into()), ("weight", 4.into()), ("opacity", 0.85.into())]),
        );
        if let Some(label) = route.label() {
            line.bind_tooltip(&label);
        }
        self.routes.add_layer(&line);
    }

    fn clear_markers(&mut self) {
        self.markers.clear_layers();
    }

    fn draw_marker(&mut self, marker: &Marker) {
        let layer = circle_marker(&latlng_js(marker.coordinates), &circle_options(marker.kind.color(), 8.0));
        if !marker.name.is_empty() {
            layer.bind_tooltip(&marker.name);
        }
        self.markers.add_layer(&layer);
    }

    fn draw_pin(&mut self, pin: &Pin) {
        let layer = circle_marker(&latlng_js(pin.position()), &circle_options(pin.color(), 9.0));
        if let Some(label) = pin.label.as_deref().filter(|l| !l.is_empty()) {
            layer.bind_tooltip(label);
        }
        self.pins.add_layer(&layer);
        self.pin_layers.insert(pin.id.clone(), layer);
    }

    fn erase_pin(&mut self, id: &str) {
        if let Some(layer) = self.pin_layers.remove(id) {
            self.pins.remove_layer(&layer);
        }
    }

    fn clear_pins(&mut self) {
        self.pins.clear_layers();
        self.pin_layers.clear();
    }

    fn clear_catalog(&mut self) {
        self.catalog.clear_layers();
        self.catalog_handlers.clear();
    }

    fn draw_catalog_place(&mut self, place: &Place) {
        let layer = circle_marker(&latlng_js(place.coordinates), &circle_options(CATALOG_COLOR, 6.0));
        layer.bind_tooltip(&place.name);

        let on_place = Rc::clone(&self.on_place);
        let clicked = place.clone();
        let handler = Closure::<dyn Fn()>::new(move || on_place(clicked.clone()));
        layer.on_layer("click", handler.as_ref().unchecked_ref());

        self.catalog.add_layer(&layer);
        self.catalog_handlers.push(handler);
    }
}

/// The Leaflet map, or a headless stand-in when Leaflet could not be mounted.
/// Chat keeps working either way.
pub enum BrowserMap {
    Leaflet(LeafletSurface),
    Headless(HeadlessSurface),
}

macro_rules! delegate {
    ($self:ident, $s:ident => $call:expr) => {
        match $self {
            BrowserMap::Leaflet($s) => $call,
            BrowserMap::Headless($s) => $call,
        }
    };
}

impl MapSurface for BrowserMap {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        delegate!(self, s => s.set_view(center, zoom))
    }

    fn clear_routes(&mut self) {
        delegate!(self, s => s.clear_routes())
    }

    fn draw_route(&mut self, route: &Route) {
        delegate!(self, s => s.draw_route(route))
    }

    fn clear_markers(&mut self) {
        delegate!(self, s => s.clear_markers())
    }

    fn draw_marker(&mut self, marker: &Marker) {
        delegate!(self, s => s.draw_marker(marker))
    }

    fn draw_pin(&mut self, pin: &Pin) {
        delegate!(self, s => s.draw_pin(pin))
    }

    fn erase_pin(&mut self, id: &str) {
        delegate!(self, s => s.erase_pin(id))
    }

    fn clear_pins(&mut self) {
        delegate!(self, s => s.clear_pins())
    }

    fn clear_catalog(&mut self) {
        delegate!(self, s => s.clear_catalog())
    }

    fn draw_catalog_place(&mut self, place: &Place) {
        delegate!(self, s => s.draw_catalog_place(place))
    }
}
