use ktm_planner_core::StorageError;
use ktm_planner_core::storage::{KeyValueStore, MemoryStore};

/// A Web Storage area, or process memory when the browser refuses one
/// (private browsing, disabled cookies).
pub enum BrowserStore {
    Web(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    /// `localStorage`.
    pub fn local() -> Self {
        Self::open("localStorage", |w| w.local_storage())
    }

    /// `sessionStorage`.
    pub fn session() -> Self {
        Self::open("sessionStorage", |w| w.session_storage())
    }

    fn open(
        name: &str,
        get: impl FnOnce(&web_sys::Window) -> Result<Option<web_sys::Storage>, wasm_bindgen::JsValue>,
    ) -> Self {
        match Self::try_open(get) {
            Ok(storage) => BrowserStore::Web(storage),
            Err(e) => {
                log::warn!("{name} unavailable, keeping state in memory: {e}");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }

    fn try_open(
        get: impl FnOnce(&web_sys::Window) -> Result<Option<web_sys::Storage>, wasm_bindgen::JsValue>,
    ) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        get(&window)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("storage area missing".into()))
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Web(s) => s.get_item(key).ok().flatten(),
            BrowserStore::Memory(m) => m.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Web(s) => s.set_item(key, value).map_err(|e| StorageError::WriteRejected {
                key: key.to_string(),
                reason: format!("{e:?}"),
            }),
            BrowserStore::Memory(m) => m.set(key, value),
        }
    }

    fn remove(&self, key: &str) {
        match self {
            BrowserStore::Web(s) => {
                if let Err(e) = s.remove_item(key) {
                    log::warn!("Could not remove '{key}' from storage: {e:?}");
                }
            }
            BrowserStore::Memory(m) => m.remove(key),
        }
    }

    fn clear(&self) {
        match self {
            BrowserStore::Web(s) => {
                if let Err(e) = s.clear() {
                    log::warn!("Could not clear storage: {e:?}");
                }
            }
            BrowserStore::Memory(m) => m.clear(),
        }
    }
}
