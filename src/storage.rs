//! Durable slot holding the JSON-serialized cart.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::{debug, instrument};

use crate::domain::Cart;
use crate::error::StorageError;

/// Key of the cart slot when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// A single string-keyed slot that survives restarts.
///
/// Calls are synchronous; the cart actor invokes them between messages.
pub trait CartStorage: Send + Sync + 'static {
    /// Returns the stored cart, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<Cart>, StorageError>;

    /// Replaces the stored cart.
    fn write(&self, cart: &Cart) -> Result<(), StorageError>;
}

/// Keeps the slot as a JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", file_stem(key))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartStorage for JsonFileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&self) -> Result<Option<Cart>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored cart");
                return Ok(None);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let cart = serde_json::from_str::<Cart>(&raw).map_err(|source| {
            StorageError::Deserialize {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!(items = cart.len(), "Stored cart loaded");
        Ok(Some(cart))
    }

    #[instrument(skip(self, cart), fields(path = %self.path.display(), items = cart.len()))]
    fn write(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart).map_err(StorageError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }

        // Staged write; the rename swaps the slot in one step.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(|error| self.io_error(error))?;
        fs::rename(&staging, &self.path).map_err(|error| self.io_error(error))?;

        debug!("Cart persisted");
        Ok(())
    }
}

/// In-memory slot that counts writes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `cart`, as if written by an earlier session.
    pub fn with_cart(cart: &Cart) -> Result<Self, StorageError> {
        let raw = serde_json::to_string(cart).map_err(StorageError::Serialize)?;
        Ok(Self {
            slot: Mutex::new(Some(raw)),
            writes: AtomicUsize::new(0),
        })
    }

    /// A slot holding arbitrary text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw JSON currently in the slot.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Cart>, StorageError> {
        match self.lock().as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| StorageError::Deserialize {
                    path: PathBuf::from("<memory>"),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart).map_err(StorageError::Serialize)?;
        *self.lock() = Some(raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<S: CartStorage + ?Sized> CartStorage for std::sync::Arc<S> {
    fn read(&self) -> Result<Option<Cart>, StorageError> {
        (**self).read()
    }

    fn write(&self, cart: &Cart) -> Result<(), StorageError> {
        (**self).write(cart)
    }
}

fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
