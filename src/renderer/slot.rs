//! Request tracking shared by all renderers.
//!
//! A renderer holds one [`RenderSlot`]. Each selection change calls
//! [`RenderSlot::begin`], which draws a fresh request id and moves it to
//! [`LoadState::Loading`]. The returned [`PendingLoad`] is awaited by the
//! caller, and its [`Fetched`] result is committed with
//! [`RenderSlot::settle`] only if no newer request was issued meanwhile.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::catalog::{AssetRef, AssetStore};
use crate::error::LoadError;

// ============================================================================
// RequestId
// ============================================================================

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Identifies one load issued by a renderer. Later requests compare greater.
///
/// Ids are drawn from one process-wide counter, so a slot never hands out an
/// id that any other slot, including one it replaced, has already issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(&self) -> u64 {
        self.0
    }

    fn fresh() -> Self {
        Self(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// LoadState
// ============================================================================

/// What a view currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing has been selected yet.
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// The selection has no asset; carries a user-facing message.
    NotFound(String),
    /// The store failed to deliver the asset; carries the error message.
    LoadError(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the loaded value, if any.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the message of a `NotFound` or `LoadError` state.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NotFound(message) | Self::LoadError(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// RenderSlot
// ============================================================================

/// The state of one view plus the id of its latest request.
#[derive(Debug, Clone)]
pub struct RenderSlot<T> {
    state: LoadState<T>,
    latest: RequestId,
}

impl<T> Default for RenderSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RenderSlot<T> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            latest: RequestId::default(),
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// The most recently issued request id.
    pub fn latest(&self) -> RequestId {
        self.latest
    }

    /// Starts a new request, superseding any in flight.
    pub fn begin(&mut self) -> RequestId {
        self.latest = RequestId::fresh();
        self.state = LoadState::Loading;
        self.latest
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id == self.latest
    }

    /// Commits `state` if `id` is still the latest request.
    ///
    /// Returns false, leaving the slot untouched, for a stale result.
    pub fn settle(&mut self, id: RequestId, state: LoadState<T>) -> bool {
        if !self.is_current(id) {
            debug!(request = %id, latest = %self.latest, "discarding stale result");
            return false;
        }
        self.state = state;
        true
    }
}

// ============================================================================
// PendingLoad
// ============================================================================

/// The result of a [`PendingLoad`], tagged with its request.
#[derive(Debug)]
pub struct Fetched<T> {
    pub id: RequestId,
    pub result: Result<T, LoadError>,
}

/// A load a renderer has resolved but not yet performed.
///
/// Holds its own handle on the store, so it can be awaited while the
/// renderer stays free to accept newer selections.
#[must_use = "a pending load does nothing until fetched and applied"]
pub struct PendingLoad {
    id: RequestId,
    paths: Vec<String>,
    store: Arc<dyn AssetStore>,
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("id", &self.id)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl PendingLoad {
    pub(crate) fn new(id: RequestId, paths: Vec<String>, store: Arc<dyn AssetStore>) -> Self {
        Self { id, paths, store }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Catalog paths this load will read.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    fn first_path(&self) -> Result<&str, LoadError> {
        self.paths
            .first()
            .map(String::as_str)
            .ok_or_else(|| LoadError::Missing(String::new()))
    }

    /// Loads the first path as text.
    pub async fn fetch_text(self) -> Fetched<String> {
        let result = match self.first_path() {
            Ok(path) => self.store.load_text(path).await,
            Err(err) => Err(err),
        };
        Fetched {
            id: self.id,
            result,
        }
    }

    /// Loads every path as text, in order. The first failure aborts the load.
    pub async fn fetch_all_text(self) -> Fetched<Vec<String>> {
        let mut contents = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            match self.store.load_text(path).await {
                Ok(text) => contents.push(text),
                Err(err) => {
                    return Fetched {
                        id: self.id,
                        result: Err(err),
                    };
                }
            }
        }
        Fetched {
            id: self.id,
            result: Ok(contents),
        }
    }

    /// Loads a displayable reference to the first path.
    pub async fn fetch_ref(self) -> Fetched<AssetRef> {
        let result = match self.first_path() {
            Ok(path) => self.store.load_binary_ref(path).await,
            Err(err) => Err(err),
        };
        Fetched {
            id: self.id,
            result,
        }
    }
}
