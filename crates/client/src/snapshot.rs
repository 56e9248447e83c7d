//! Cached copies of the provider's own profiles.
//!
//! After the server confirms a create or update the returned record is
//! mirrored here under the kind's snapshot key, so screens can show the
//! profile and answer "is this mine?" without a round trip. Vehicles have
//! no snapshot key; every operation on them is a no-op.

use std::sync::Arc;

use serde_json::Value;
use tripnest_core::{EntityKind, ProviderRecord};

use crate::store::{KeyValueStore, StoreError};

/// Typed access to profile snapshots in a [`KeyValueStore`].
#[derive(Clone)]
pub struct SnapshotRepository {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SnapshotRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRepository").finish_non_exhaustive()
    }
}

impl SnapshotRepository {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the snapshot for `R`'s kind.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored JSON does not parse as `R`.
    pub fn load<R: ProviderRecord>(&self) -> Result<Option<R>, StoreError> {
        let Some(key) = R::KIND.snapshot_key() else {
            return Ok(None);
        };
        self.store
            .get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Load the snapshot for `kind` as untyped JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored value is not JSON.
    pub fn load_raw(&self, kind: EntityKind) -> Result<Option<Value>, StoreError> {
        let Some(key) = kind.snapshot_key() else {
            return Ok(None);
        };
        self.store
            .get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Replace the snapshot with `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or stored.
    pub fn save<R: ProviderRecord>(&self, record: &R) -> Result<(), StoreError> {
        let Some(key) = R::KIND.snapshot_key() else {
            return Ok(());
        };
        let raw = serde_json::to_string(record).map_err(StoreError::Encode)?;
        self.store.set(key, &raw)
    }

    /// Drop the snapshot for `kind`; returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn remove(&self, kind: EntityKind) -> Result<bool, StoreError> {
        match kind.snapshot_key() {
            Some(key) => self.store.remove(key),
            None => Ok(false),
        }
    }

    /// The `id` of the stored snapshot, rendered as a string so numeric and
    /// string ids compare alike.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored value is not JSON.
    pub fn stored_id(&self, kind: EntityKind) -> Result<Option<String>, StoreError> {
        Ok(self.load_raw(kind)?.and_then(|value| match value.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }))
    }

    /// Whether the stored snapshot for `R`'s kind carries `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored value is not JSON.
    pub fn holds<R: ProviderRecord>(&self, id: R::Id) -> Result<bool, StoreError> {
        Ok(self
            .stored_id(R::KIND)?
            .is_some_and(|stored| stored == id.to_string()))
    }
}
