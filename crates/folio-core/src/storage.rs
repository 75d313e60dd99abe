//! Preference persistence for the two keys the page remembers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Preferences                   │
//! │   - typed load/store of `lang` and `theme`    │
//! │   - logs and swallows backend failures        │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                 StorageBackend                │
//! │   - MemoryStorage: in-memory (tests)          │
//! │   - LocalStorage: `window.localStorage` (web) │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Unavailable` | private mode, disabled storage | Defaults used, logged |
//! | `StorageError::Backend` | quota, security error | Write dropped, logged |
//! | Invalid stored value | hand-edited storage | Ignored, default used |

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::theme::Theme;

/// Storage key for the last selected language code.
pub const LANG_KEY: &str = "lang";

/// Storage key for the last selected theme.
pub const THEME_KEY: &str = "theme";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during preference storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be used at all.
    Unavailable(String),
    /// The backend rejected a read or write.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StorageError::Backend(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A string key/value store.
///
/// Not `Send`: the browser backend wraps a JS object that lives on the UI
/// thread.
pub trait StorageBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for tests and hosts without web storage.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Snapshot of all entries.
    #[must_use]
    pub fn entries(&self) -> HashMap<String, String> {
        self.data.read().map(|g| g.clone()).unwrap_or_default()
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Typed access to the `lang` and `theme` keys over any backend.
///
/// Failures never propagate: a broken backend behaves like an empty one.
pub struct Preferences<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Preferences<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Last stored language code, if any.
    #[must_use]
    pub fn lang(&self) -> Option<String> {
        self.read(LANG_KEY).filter(|code| !code.is_empty())
    }

    /// Raw stored theme value, if any. Validation is the caller's job
    /// (see [`Theme::resolve_initial`]).
    #[must_use]
    pub fn theme_raw(&self) -> Option<String> {
        self.read(THEME_KEY)
    }

    /// Stored theme, if it is a valid value.
    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        self.theme_raw().as_deref().and_then(Theme::parse)
    }

    pub fn store_lang(&self, code: &str) {
        self.write(LANG_KEY, code);
    }

    pub fn store_theme(&self, theme: Theme) {
        self.write(THEME_KEY, theme.as_str());
    }

    /// Write an arbitrary key (used when replaying persisted effects).
    pub fn store(&self, key: &str, value: &str) {
        self.write(key, value);
    }

    fn read(&self, key: &str) -> Option<String> {
        if !self.backend.is_available() {
            return None;
        }
        match self.backend.get(key) {
            Ok(value) => value,
            Err(_err) => {
                crate::warn!(backend = self.backend.name(), key, error = %_err, "preference read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if !self.backend.is_available() {
            return;
        }
        if let Err(_err) = self.backend.set(key, value) {
            crate::warn!(backend = self.backend.name(), key, error = %_err, "preference write failed");
        }
    }
}

impl<B: StorageBackend> fmt::Debug for Preferences<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("backend", &self.backend.name())
            .finish()
    }
}
