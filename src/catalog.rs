//! Asset catalogs: the read-only stores that hold the fraction graphics.
//!
//! Paths are logical, `/`-separated and relative to the catalog root, e.g.
//! `shapes/circle/equal/1:2/1.svg`. Listing is always lexicographic so that
//! positional lookups are deterministic.
//!
//! Two catalogs are provided:
//! - [`MemoryStore`], an embedded resource table (tests, bundled builds)
//! - [`DirStore`], a directory on disk indexed once when opened

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use crate::error::{LoadError, StoreError};

// ============================================================================
// AssetStore
// ============================================================================

/// Capability for looking up and loading catalog assets.
///
/// `exists` and `list` answer from an index and never block. Loads are
/// asynchronous and may fail even for listed paths.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns true if an asset exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Returns every path starting with `prefix`, sorted lexicographically.
    fn list(&self, prefix: &str) -> Vec<String>;

    /// Loads an asset as UTF-8 text.
    async fn load_text(&self, path: &str) -> Result<String, LoadError>;

    /// Loads a displayable reference to an asset without inspecting it.
    async fn load_binary_ref(&self, path: &str) -> Result<AssetRef, LoadError>;
}

/// A displayable reference to a binary asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Logical catalog path.
    pub path: String,
    /// URL a consumer can hand to an `<img>` or SVG `<image>`.
    pub url: String,
}

/// Guesses a MIME type from a logical path's extension.
pub fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// An in-memory catalog built once and then only read.
///
/// # Example
///
/// ```
/// use fraction_visuals::{AssetStore, MemoryStore};
///
/// let store = MemoryStore::new()
///     .with_text("shapes/circle/equal/1:2/1.svg", "<svg/>")
///     .with_bytes("fraction_objects/pizza/0.png", vec![0x89, b'P', b'N', b'G']);
///
/// assert!(store.exists("fraction_objects/pizza/0.png"));
/// assert_eq!(store.list("shapes/circle/").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text asset.
    pub fn with_text(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content.into().into_bytes());
        self
    }

    /// Adds a binary asset.
    pub fn with_bytes(mut self, path: impl Into<String>, content: Vec<u8>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces an asset.
    pub fn insert(&mut self, path: impl Into<String>, content: Vec<u8>) {
        self.entries.insert(path.into(), content);
    }

    /// Returns the number of assets in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog holds no assets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn list(&self, prefix: &str) -> Vec<String> {
        self.entries
            .range(prefix.to_string()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, _)| path.clone())
            .collect()
    }

    async fn load_text(&self, path: &str) -> Result<String, LoadError> {
        let bytes = self
            .entries
            .get(path)
            .ok_or_else(|| LoadError::Missing(path.to_string()))?;
        String::from_utf8(bytes.clone()).map_err(|_| LoadError::NotText(path.to_string()))
    }

    async fn load_binary_ref(&self, path: &str) -> Result<AssetRef, LoadError> {
        let bytes = self
            .entries
            .get(path)
            .ok_or_else(|| LoadError::Missing(path.to_string()))?;
        Ok(AssetRef {
            path: path.to_string(),
            url: format!("data:{};base64,{}", mime_type(path), BASE64.encode(bytes)),
        })
    }
}

// ============================================================================
// DirStore
// ============================================================================

/// A catalog backed by a directory on disk.
///
/// The directory is walked once by [`DirStore::open`]; later changes on disk
/// are not picked up by `exists`/`list`, but loads always read the file.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    index: BTreeSet<String>,
}

impl DirStore {
    /// Indexes every file under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let mut index = BTreeSet::new();
        walk(&root, "", &mut index)?;
        debug!(root = %root.display(), assets = index.len(), "indexed asset directory");
        Ok(Self { root, index })
    }

    /// Returns the directory this catalog was opened on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of indexed assets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no files were indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn file_path(&self, path: &str) -> Result<PathBuf, LoadError> {
        if !self.index.contains(path) {
            return Err(LoadError::Missing(path.to_string()));
        }
        Ok(path.split('/').fold(self.root.clone(), |acc, part| acc.join(part)))
    }
}

fn walk(dir: &Path, logical: &str, index: &mut BTreeSet<String>) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: dir.display().to_string(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            debug!(dir = %dir.display(), "skipping non-UTF-8 file name");
            continue;
        };
        let child = if logical.is_empty() {
            name
        } else {
            format!("{logical}/{name}")
        };
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_dir() {
            walk(&entry.path(), &child, index)?;
        } else if file_type.is_file() {
            index.insert(child);
        }
    }
    Ok(())
}

#[async_trait]
impl AssetStore for DirStore {
    fn exists(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    fn list(&self, prefix: &str) -> Vec<String> {
        self.index
            .range(prefix.to_string()..)
            .take_while(|path| path.starts_with(prefix))
            .cloned()
            .collect()
    }

    async fn load_text(&self, path: &str) -> Result<String, LoadError> {
        let file = self.file_path(path)?;
        let bytes = tokio::fs::read(&file).await.map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| LoadError::NotText(path.to_string()))
    }

    async fn load_binary_ref(&self, path: &str) -> Result<AssetRef, LoadError> {
        let file = self.file_path(path)?;
        let metadata = tokio::fs::metadata(&file)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_string(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(LoadError::Missing(path.to_string()));
        }
        let absolute = tokio::fs::canonicalize(&file)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(AssetRef {
            path: path.to_string(),
            url: file_url(&absolute),
        })
    }
}

/// Builds a `file://` URL, percent-encoding every byte outside the RFC 3986
/// unreserved set and `/`.
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut url = String::with_capacity(raw.len() + 7);
    url.push_str("file://");
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}

// ============================================================================
// Tests
// ============================================================================
