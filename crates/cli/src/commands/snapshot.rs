//! Cached profile snapshot commands.

use tracing::info;
use tripnest_client::snapshot::SnapshotRepository;
use tripnest_core::EntityKind;

use super::{CommandError, print_json, print_line};

/// Print the cached profile for `kind`.
///
/// # Errors
///
/// Returns error if the store cannot be read or holds invalid JSON.
pub fn show(snapshots: &SnapshotRepository, kind: EntityKind) -> Result<(), CommandError> {
    if kind.snapshot_key().is_none() {
        print_line(&format!("No snapshot is kept for {kind} records"));
        return Ok(());
    }

    match snapshots.load_raw(kind)? {
        Some(value) => print_json(&value)?,
        None => print_line(&format!("No cached {kind} profile")),
    }
    Ok(())
}

/// Remove the cached profile for `kind`.
///
/// # Errors
///
/// Returns error if the store cannot be written.
pub fn clear(snapshots: &SnapshotRepository, kind: EntityKind) -> Result<(), CommandError> {
    if snapshots.remove(kind)? {
        info!(%kind, "Cleared cached profile");
    } else {
        info!(%kind, "No cached profile to clear");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tripnest_client::store::{KeyValueStore, MemoryStore};

    use super::*;

    #[test]
    fn test_clear_removes_only_the_given_kind() {
        let store = Arc::new(MemoryStore::with_entries([
            ("hotel_profile", r#"{"id":1}"#),
            ("tour_guide_profile", r#"{"id":2}"#),
        ]));
        let snapshots = SnapshotRepository::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        clear(&snapshots, EntityKind::Hotel).unwrap();
        clear(&snapshots, EntityKind::Hotel).unwrap();

        assert_eq!(store.get("hotel_profile").unwrap(), None);
        assert!(store.get("tour_guide_profile").unwrap().is_some());
    }

    #[test]
    fn test_show_handles_every_kind() {
        let store = Arc::new(MemoryStore::with_entries([("hotel_profile", r#"{"id":1}"#)]));
        let snapshots = SnapshotRepository::new(store);

        show(&snapshots, EntityKind::Hotel).unwrap();
        show(&snapshots, EntityKind::TravelAgency).unwrap();
        show(&snapshots, EntityKind::Vehicle).unwrap();
    }
}
