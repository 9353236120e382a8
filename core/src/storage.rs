//! Browser storage tiers.
//!
//! The durable tier (`localStorage` in the browser) only ever holds the session
//! id. The ephemeral tier (`sessionStorage`) holds JSON mirrors of server state.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StorageError;
use crate::trip::{PlacesIndex, TripMirror};

pub const SESSION_ID_KEY: &str = "ktm_session_id_v1";
pub const PROFILE_KEY: &str = "userProfile";
pub const PLACES_KEY: &str = "places";
pub const TRIP_KEY: &str = "trip";

/// String key-value storage with Web Storage semantics: shared references,
/// infallible reads, writes that may be refused.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-process store, used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Typed access to both tiers.
pub struct ClientStorage<S> {
    durable: S,
    ephemeral: S,
}

impl<S: KeyValueStore> ClientStorage<S> {
    pub fn new(durable: S, ephemeral: S) -> Self {
        Self { durable, ephemeral }
    }

    pub fn durable(&self) -> &S {
        &self.durable
    }

    pub fn ephemeral(&self) -> &S {
        &self.ephemeral
    }

    // ── Session id ───────────────────────────────────────────────────────────

    pub fn session_id(&self) -> Option<String> {
        self.durable.get(SESSION_ID_KEY).filter(|s| !s.is_empty())
    }

    pub fn set_session_id(&self, id: &str) -> Result<(), StorageError> {
        self.durable.set(SESSION_ID_KEY, id)
    }

    // ── Mirrors ──────────────────────────────────────────────────────────────

    pub fn profile(&self) -> Option<Value> {
        self.read(PROFILE_KEY)
    }

    pub fn set_profile(&self, profile: &Value) -> Result<(), StorageError> {
        self.write(PROFILE_KEY, profile)
    }

    pub fn places(&self) -> PlacesIndex {
        self.read(PLACES_KEY).unwrap_or_default()
    }

    pub fn set_places(&self, places: &PlacesIndex) -> Result<(), StorageError> {
        self.write(PLACES_KEY, places)
    }

    pub fn update_places(&self, f: impl FnOnce(&mut PlacesIndex)) -> Result<(), StorageError> {
        let mut places = self.places();
        f(&mut places);
        self.set_places(&places)
    }

    pub fn trip(&self) -> TripMirror {
        self.read(TRIP_KEY).unwrap_or_default()
    }

    /// Read-modify-write of the trip mirror.
    pub fn update_trip<R>(&self, f: impl FnOnce(&mut TripMirror) -> R) -> Result<R, StorageError> {
        let mut trip = self.trip();
        let out = f(&mut trip);
        self.write(TRIP_KEY, &trip)?;
        Ok(out)
    }

    /// Drops the session id and every mirror.
    pub fn clear(&self) {
        self.durable.remove(SESSION_ID_KEY);
        self.ephemeral.clear();
    }

    /// A corrupt entry reads as absent rather than failing the caller.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.ephemeral.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Ignoring unreadable '{key}' mirror: {e}");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.ephemeral.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storage() -> ClientStorage<MemoryStore> {
        ClientStorage::new(MemoryStore::new(), MemoryStore::new())
    }

    #[test]
    fn session_id_lives_in_the_durable_tier() {
        let s = storage();
        assert_eq!(s.session_id(), None);
        s.set_session_id("abc").unwrap();
        assert_eq!(s.session_id().as_deref(), Some("abc"));
        assert_eq!(s.durable().get(SESSION_ID_KEY).as_deref(), Some("abc"));
        assert!(s.ephemeral().is_empty());
    }

    #[test]
    fn empty_session_id_reads_as_absent() {
        let s = storage();
        s.set_session_id("").unwrap();
        assert_eq!(s.session_id(), None);
    }

    #[test]
    fn trip_updates_round_through_json() {
        let s = storage();
        let added = s.update_trip(|t| t.add_visit(1, "p1")).unwrap();
        assert!(added);
        let raw = s.ephemeral().get(TRIP_KEY).unwrap();
        assert!(raw.contains("\"dayIndex\":1"));
        assert_eq!(s.trip().day(1).unwrap().visits, vec!["p1"]);
    }

    #[test]
    fn corrupt_mirror_reads_as_default() {
        let s = storage();
        s.ephemeral().set(TRIP_KEY, "{not json").unwrap();
        assert_eq!(s.trip(), TripMirror::default());
    }

    #[test]
    fn clear_wipes_both_tiers() {
        let s = storage();
        s.set_session_id("abc").unwrap();
        s.set_profile(&json!({ "time_days": 2 })).unwrap();
        s.update_trip(|t| t.confirm(1)).unwrap();

        s.clear();

        assert_eq!(s.session_id(), None);
        assert!(s.ephemeral().is_empty());
    }
}
