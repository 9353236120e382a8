//! Client-side mirrors of server state.
//!
//! Both structures are caches rebuilt from commands. The assistant owns the
//! real itinerary; these exist so the page can survive a reload within the tab.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{decode, Place};

/// Place id → place record.
pub type PlacesIndex = BTreeMap<String, Place>;

/// Builds an index from an id-keyed object or a list of records.
/// Records that do not decode are dropped. Non-container input yields `None`.
pub fn places_from_value(value: &Value) -> Option<PlacesIndex> {
    let records: Vec<(Option<&str>, &Value)> = match value {
        Value::Object(obj) => obj.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
        _ => return None,
    };

    let index = records
        .into_iter()
        .filter_map(|(key, raw)| {
            let mut place = decode::<Place>(raw)?;
            if place.id.is_empty() {
                if let Some(key) = key {
                    place.id = key.to_string();
                }
            }
            Some((place.key().to_string(), place))
        })
        .collect();
    Some(index)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_index: u32,
    #[serde(default)]
    pub hotel_place_id: Option<String>,
    #[serde(default)]
    pub visits: Vec<String>,
    #[serde(default)]
    pub confirmed: bool,
}

impl DayPlan {
    pub fn new(day_index: u32) -> Self {
        Self { day_index, ..Default::default() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripMirror {
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub notes: String,
}

impl TripMirror {
    pub fn day(&self, day_index: u32) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day_index == day_index)
    }

    /// Returns the day record, creating it (kept sorted by index) if absent.
    pub fn day_mut(&mut self, day_index: u32) -> &mut DayPlan {
        let pos = match self.days.binary_search_by_key(&day_index, |d| d.day_index) {
            Ok(pos) => pos,
            Err(pos) => {
                self.days.insert(pos, DayPlan::new(day_index));
                pos
            }
        };
        &mut self.days[pos]
    }

    /// Returns `false` when the place was already on that day.
    pub fn add_visit(&mut self, day_index: u32, place_id: &str) -> bool {
        let day = self.day_mut(day_index);
        if day.visits.iter().any(|v| v == place_id) {
            return false;
        }
        day.visits.push(place_id.to_string());
        true
    }

    pub fn set_hotel(&mut self, day_index: u32, place_id: &str) {
        self.day_mut(day_index).hotel_place_id = Some(place_id.to_string());
    }

    pub fn confirm(&mut self, day_index: u32) {
        self.day_mut(day_index).confirmed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_visit_is_idempotent() {
        let mut trip = TripMirror::default();
        assert!(trip.add_visit(1, "p1"));
        assert!(!trip.add_visit(1, "p1"));
        assert!(trip.add_visit(1, "p2"));
        assert_eq!(trip.day(1).unwrap().visits, vec!["p1", "p2"]);
    }

    #[test]
    fn days_are_created_on_demand_in_order() {
        let mut trip = TripMirror::default();
        trip.confirm(3);
        trip.set_hotel(1, "h1");
        trip.add_visit(2, "p1");

        let indexes: Vec<u32> = trip.days.iter().map(|d| d.day_index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert!(trip.day(3).unwrap().confirmed);
        assert_eq!(trip.day(1).unwrap().hotel_place_id.as_deref(), Some("h1"));
    }

    #[test]
    fn serializes_in_camel_case() {
        let mut trip = TripMirror::default();
        trip.set_hotel(1, "h1");
        assert_eq!(
            serde_json::to_value(&trip).unwrap(),
            json!({
                "days": [{ "dayIndex": 1, "hotelPlaceId": "h1", "visits": [], "confirmed": false }],
                "notes": ""
            })
        );
    }

    #[test]
    fn places_index_from_object_fills_missing_ids() {
        let index = places_from_value(&json!({
            "p1": { "name": "Patan Durbar Square", "coordinates": [27.6727, 85.325] },
            "p2": { "name": "broken" }
        }))
        .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["p1"].id, "p1");
    }

    #[test]
    fn places_index_from_list() {
        let index = places_from_value(&json!([
            { "id": "a", "name": "Asan Tole", "coordinates": [27.7077, 85.3105] },
            { "name": "Kirtipur", "coordinates": [27.678, 85.277] }
        ]))
        .unwrap();
        let keys: Vec<&str> = index.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Kirtipur", "a"]);
        assert!(places_from_value(&json!(5)).is_none());
    }
}
