//! UI commands pushed by the assistant.
//!
//! On the wire each command is a single-key object such as
//! `{"ui.enableButton": "export"}`. Parsing turns that into a [`UiCommand`];
//! anything unrecognised comes back as a [`CommandError`] so the caller can
//! log it and move on to the next command.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::CommandError;
use crate::map::Pin;
use crate::models::LatLng;
use crate::trip::{places_from_value, PlacesIndex};

#[derive(Clone, Debug, PartialEq)]
pub enum UiCommand {
    ZoomTo { center: LatLng, zoom: Option<f64> },
    AddPin(Pin),
    RemovePin(String),
    StoreProfile(Value),
    StorePlaces(PlacesIndex),
    AddPlaceToDay { day_index: u32, place_id: String },
    StoreHotel(HotelRecord),
    ConfirmDay(u32),
    EnableButton(String),
    ResetSession,
    ShowReview(String),
    ShowImages(Vec<String>),
}

/// Payload of `session.storeHotel`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HotelRecord {
    #[serde(rename = "dayIndex")]
    pub day_index: u32,
    #[serde(rename = "placeId", deserialize_with = "string_or_number")]
    pub place_id: String,
    #[serde(default)]
    pub name_en: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
struct ZoomToArgs {
    lat: f64,
    lng: f64,
    #[serde(default)]
    zoom: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayPlaceArgs {
    day_index: u32,
    #[serde(deserialize_with = "string_or_number")]
    place_id: String,
}

#[derive(Deserialize)]
struct ImagesArgs {
    urls: Vec<Value>,
}

impl UiCommand {
    pub fn parse(value: &Value) -> Result<Self, CommandError> {
        let obj = value.as_object().ok_or(CommandError::NotAnObject)?;
        if obj.len() != 1 {
            return Err(CommandError::NotSingleKey(obj.len()));
        }
        let Some((tag, payload)) = obj.iter().next() else {
            return Err(CommandError::NotSingleKey(0));
        };
        let tag = tag.as_str();

        match tag {
            "map.zoomTo" => {
                let a: ZoomToArgs = args(tag, payload)?;
                Ok(UiCommand::ZoomTo { center: LatLng(a.lat, a.lng), zoom: a.zoom })
            }
            "map.addPin" => Ok(UiCommand::AddPin(args(tag, payload)?)),
            "map.removePin" => {
                let id = match payload {
                    Value::Object(o) => o.get("id").and_then(id_string),
                    other => id_string(other),
                };
                id.map(UiCommand::RemovePin)
                    .ok_or_else(|| CommandError::malformed(tag, "expected a pin id"))
            }
            "session.storeProfile" => match payload {
                Value::Object(_) => Ok(UiCommand::StoreProfile(payload.clone())),
                _ => Err(CommandError::malformed(tag, "expected an object")),
            },
            "session.storePlaces" => places_from_value(payload)
                .map(UiCommand::StorePlaces)
                .ok_or_else(|| CommandError::malformed(tag, "expected an object or a list")),
            "session.addPlaceToDay" => {
                let a: DayPlaceArgs = args(tag, payload)?;
                Ok(UiCommand::AddPlaceToDay { day_index: a.day_index, place_id: a.place_id })
            }
            "session.storeHotel" => Ok(UiCommand::StoreHotel(args(tag, payload)?)),
            "session.confirmDay" => {
                let day = match payload {
                    Value::Object(o) => o.get("dayIndex").and_then(Value::as_u64),
                    other => other.as_u64(),
                };
                day.and_then(|d| u32::try_from(d).ok())
                    .map(UiCommand::ConfirmDay)
                    .ok_or_else(|| CommandError::malformed(tag, "expected a day index"))
            }
            "ui.enableButton" => payload
                .as_str()
                .map(|name| UiCommand::EnableButton(name.to_string()))
                .ok_or_else(|| CommandError::malformed(tag, "expected a button name")),
            "ui.resetSession" => Ok(UiCommand::ResetSession),
            "ui.showReview" => {
                let review = match payload {
                    Value::Object(o) => o.get("review").and_then(Value::as_str),
                    other => other.as_str(),
                };
                review
                    .map(|r| UiCommand::ShowReview(r.to_string()))
                    .ok_or_else(|| CommandError::malformed(tag, "expected review text"))
            }
            "ui.showImages" => {
                let a: ImagesArgs = args(tag, payload)?;
                let urls = a
                    .urls
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                Ok(UiCommand::ShowImages(urls))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            UiCommand::ZoomTo { .. } => "map.zoomTo",
            UiCommand::AddPin(_) => "map.addPin",
            UiCommand::RemovePin(_) => "map.removePin",
            UiCommand::StoreProfile(_) => "session.storeProfile",
            UiCommand::StorePlaces(_) => "session.storePlaces",
            UiCommand::AddPlaceToDay { .. } => "session.addPlaceToDay",
            UiCommand::StoreHotel(_) => "session.storeHotel",
            UiCommand::ConfirmDay(_) => "session.confirmDay",
            UiCommand::EnableButton(_) => "ui.enableButton",
            UiCommand::ResetSession => "ui.resetSession",
            UiCommand::ShowReview(_) => "ui.showReview",
            UiCommand::ShowImages(_) => "ui.showImages",
        }
    }
}

fn args<T: DeserializeOwned>(tag: &str, payload: &Value) -> Result<T, CommandError> {
    T::deserialize(payload).map_err(|e| CommandError::malformed(tag, e.to_string()))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Place and pin ids arrive as either strings or bare numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_string(&value).ok_or_else(|| de::Error::custom("expected a string or number id"))
}
