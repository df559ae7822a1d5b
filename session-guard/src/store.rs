use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Fixed storage key for the persisted session marker.
pub const SESSION_MARKER_KEY: &str = "attendee-portal.session";

/// Client-held identity, derived from the login endpoint's profile.
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Small persisted record proving a prior successful login.
///
/// Read synchronously at startup and by the route guard; treated as strong
/// evidence of a valid session until an explicit logout clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub account_id: String,
}

/// Error type for session persistence.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Failed to persist session marker: {0}")]
    Persist(String),
}

/// Synchronous persistence for the session marker under the fixed key.
///
/// `load` must not suspend; a marker that cannot be read or parsed is
/// reported as absent so failures lean toward requiring re-login.
pub trait MarkerStorage: Send + Sync + 'static {
    fn load(&self) -> Option<SessionMarker>;
    fn store(&self, marker: &SessionMarker) -> Result<(), SessionStoreError>;
    fn remove(&self) -> Result<(), SessionStoreError>;
}

/// Marker storage that lives only as long as the process. Used in tests
/// and anywhere persistence across restarts is not wanted.
#[derive(Debug, Default)]
pub struct InMemoryMarkerStorage {
    marker: Mutex<Option<SessionMarker>>,
}

impl InMemoryMarkerStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStorage for InMemoryMarkerStorage {
    fn load(&self) -> Option<SessionMarker> {
        self.marker.lock().unwrap().clone()
    }

    fn store(&self, marker: &SessionMarker) -> Result<(), SessionStoreError> {
        *self.marker.lock().unwrap() = Some(marker.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionStoreError> {
        *self.marker.lock().unwrap() = None;
        Ok(())
    }
}

/// Marker storage persisted as a JSON file, surviving restarts.
#[derive(Debug, Clone)]
pub struct JsonFileMarkerStorage {
    path: PathBuf,
}

impl JsonFileMarkerStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Place the marker file under `dir` using the fixed storage key.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", SESSION_MARKER_KEY)))
    }
}

impl MarkerStorage for JsonFileMarkerStorage {
    fn load(&self) -> Option<SessionMarker> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn store(&self, marker: &SessionMarker) -> Result<(), SessionStoreError> {
        let bytes = serde_json::to_vec(marker)
            .map_err(|e| SessionStoreError::Persist(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| SessionStoreError::Persist(e.to_string()))
    }

    fn remove(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::Persist(e.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    marker: Option<SessionMarker>,
    identity: Option<SessionIdentity>,
}

/// Process-wide session state.
///
/// Single writer by convention, last write wins; no expiry. The marker is
/// inspectable synchronously and independently of whatever asynchronous
/// mechanism re-hydrates the full identity.
pub struct SessionStore<B: MarkerStorage> {
    backend: B,
    inner: RwLock<Inner>,
}

impl<B: MarkerStorage> SessionStore<B> {
    /// Open the store, attempting the synchronous marker read at init.
    pub fn open(backend: B) -> Self {
        let marker = backend.load();
        Self {
            backend,
            inner: RwLock::new(Inner {
                marker,
                identity: None,
            }),
        }
    }

    /// Persist a freshly authenticated identity.
    ///
    /// # Errors
    /// * `Persist` - Backend write failed; in-memory state is unchanged
    pub fn write(&self, identity: SessionIdentity) -> Result<(), SessionStoreError> {
        let marker = SessionMarker {
            account_id: identity.account_id.clone(),
        };
        self.backend.store(&marker)?;

        let mut inner = self.inner.write().unwrap();
        inner.marker = Some(marker);
        inner.identity = Some(identity);
        Ok(())
    }

    /// Cache an identity re-hydrated after a reload, without touching the
    /// persisted marker.
    pub fn hydrate(&self, identity: SessionIdentity) {
        self.inner.write().unwrap().identity = Some(identity);
    }

    pub fn read(&self) -> Option<SessionIdentity> {
        self.inner.read().unwrap().identity.clone()
    }

    pub fn marker(&self) -> Option<SessionMarker> {
        self.inner.read().unwrap().marker.clone()
    }

    /// Suspension-free check used by the route guard.
    pub fn marker_present(&self) -> bool {
        self.inner.read().unwrap().marker.is_some()
    }

    /// Explicit logout: destroy marker and identity.
    ///
    /// # Errors
    /// * `Persist` - Backend removal failed; in-memory state is cleared anyway
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        {
            let mut inner = self.inner.write().unwrap();
            inner.marker = None;
            inner.identity = None;
        }
        self.backend.remove()
    }
}
