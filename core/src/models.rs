use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `[lat, lng]` pair as it travels on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng(pub f64, pub f64);

impl LatLng {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }
}

/// Decodes one JSON fragment, yielding `None` instead of an error.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

// ── Requests ─────────────────────────────────────────────────────────────────

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_event: Option<MapEvent>,
}

impl ChatRequest {
    /// The empty-message handshake used on boot and after a reset.
    pub fn hello(session_id: Option<String>) -> Self {
        Self { session_id, message: String::new(), map_event: None }
    }
}

/// Something the user did on the map.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    SelectPlace { name: String, coordinates: LatLng },
    SetHotel { name: String, coordinates: LatLng },
    CreateRoute {},
}

// ── Responses ────────────────────────────────────────────────────────────────

/// Body returned by `POST /api/chat`.
///
/// Only `session_id` is decoded strictly. Everything else is kept as raw JSON
/// and picked apart on demand, so one malformed section never costs the reply.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trip_state: Option<Value>,
    #[serde(default)]
    pub map_actions: Option<Value>,
    #[serde(default)]
    pub suggestions: Option<Value>,
    #[serde(default)]
    pub commands: Option<Value>,
}

impl ChatResponse {
    /// Assistant text. Older servers send `message` instead of `reply`.
    pub fn text(&self) -> Option<&str> {
        [self.reply.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
    }

    pub fn map_actions(&self) -> Option<MapActions> {
        self.map_actions.as_ref().and_then(MapActions::from_value)
    }

    /// Non-empty suggestion strings, in server order.
    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions
            .as_ref()
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn commands(&self) -> &[Value] {
        self.commands
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn trip_state(&self) -> Option<TripState> {
        self.trip_state.as_ref().and_then(decode)
    }
}

// ── Map actions ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Hotel,
    Place,
    #[default]
    #[serde(other)]
    Other,
}

impl MarkerKind {
    pub fn color(&self) -> &'static str {
        match self {
            MarkerKind::Hotel => "#d9480f",
            MarkerKind::Place => "#1c7ed6",
            MarkerKind::Other => "#495057",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Marker {
    pub coordinates: LatLng,
    #[serde(rename = "type", default)]
    pub kind: MarkerKind,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Route {
    pub polyline: Vec<LatLng>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl Route {
    /// Tooltip text such as `Hotel → Boudhanath Stupa`.
    pub fn label(&self) -> Option<String> {
        match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => Some(format!("{from} → {to}")),
            (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
            (None, None) => None,
        }
    }
}

/// What the server wants drawn.
///
/// `center`/`zoom` is the current shape. `markers` is the older shape, still
/// honoured when present: `Some(vec![])` means "no markers", `None` means the
/// server did not speak about markers at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapActions {
    pub center: Option<LatLng>,
    pub zoom: Option<f64>,
    pub markers: Option<Vec<Marker>>,
    pub routes: Vec<Route>,
}

impl MapActions {
    /// Lenient decode: malformed entries are dropped, as are routes with fewer
    /// than two points. Anything that is not an object yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let markers = obj
            .get("markers")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(decode::<Marker>).collect());

        let routes = obj
            .get("routes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(decode::<Route>)
                    .filter(|r| r.polyline.len() >= 2)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            center: obj.get("center").and_then(decode),
            zoom: obj.get("zoom").and_then(Value::as_f64),
            markers,
            routes,
        })
    }
}

// ── Places catalog ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub coordinates: LatLng,
    #[serde(default, alias = "category", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Place {
    /// Index key: the id, or the name for catalogs that ship without ids.
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Decodes `GET /api/pois`, which is either a bare array or `{ "places": [...] }`.
pub fn decode_catalog(value: &Value) -> Vec<Place> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => obj
            .get("places")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };
    items.iter().filter_map(decode::<Place>).collect()
}

// ── Export ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub links: Vec<ExportLink>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ExportLink {
    pub day: u32,
    pub url: String,
}

// ── Trip state (read-only view of the server's) ──────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NamedPoint {
    #[serde(default)]
    pub name: String,
    pub coordinates: LatLng,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TripProfile {
    #[serde(default)]
    pub time_days: Option<u32>,
    #[serde(default)]
    pub group: Option<Value>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub comfort: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TripState {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub hotel: Option<NamedPoint>,
    #[serde(default)]
    pub selected_places: Vec<NamedPoint>,
    #[serde(default)]
    pub trip_profile: TripProfile,
}

impl TripState {
    /// One-line status, e.g. `Kathmandu · exploring · stay: Thamel · 2 places`.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.city.is_empty() {
            parts.push(self.city.clone());
        }
        if !self.stage.is_empty() {
            parts.push(self.stage.clone());
        }
        if let Some(days) = self.trip_profile.time_days {
            parts.push(if days == 1 { "1 day".to_string() } else { format!("{days} days") });
        }
        if let Some(hotel) = &self.hotel {
            parts.push(format!("stay: {}", hotel.name));
        }
        match self.selected_places.len() {
            0 => {}
            1 => parts.push("1 place".to_string()),
            n => parts.push(format!("{n} places")),
        }
        parts.join(" · ")
    }
}
