use moviephile_models::{
    clamp_progress, ContentItem, NewWatchlistEntry, User, WatchStatus, WatchlistEntry,
};
use moviephile_sources::{SourceError, WatchlistStore};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};
use crate::cache::QueryCache;
use crate::error::CoreError;

/// Result of [`WatchlistSync::toggle`]. The local state always flips; the remote
/// write may still have failed.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub movie_id: u64,
    /// Saved state shown locally after the toggle
    pub saved: bool,
    pub remote_error: Option<SourceError>,
}

impl ToggleOutcome {
    pub fn is_consistent(&self) -> bool {
        self.remote_error.is_none()
    }
}

/// Client-side mirror of one user's remote watchlist.
///
/// Saved state for a content id is the mirror's membership, overridden by any
/// local toggle made since the last refresh. Toggles update the override before
/// the remote write is attempted and are not rolled back when it fails, so local
/// and remote can disagree until the next [`WatchlistSync::refresh`].
pub struct WatchlistSync<S> {
    store: S,
    user_id: Option<String>,
    mirror: QueryCache<String, Vec<WatchlistEntry>>,
    overrides: HashMap<u64, bool>,
}

impl<S: WatchlistStore> WatchlistSync<S> {
    pub fn new(store: S, stale_after: Duration) -> Self {
        Self {
            store,
            user_id: None,
            mirror: QueryCache::new(stale_after),
            overrides: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Switch identity. Local overrides belong to the previous user and are dropped.
    pub fn set_user(&mut self, user: Option<&User>) {
        let next = user.map(|u| u.identity().to_string());
        if next != self.user_id {
            debug!("Watchlist identity changed to {:?}", next);
            self.overrides.clear();
            self.user_id = next;
        }
    }

    fn require_user(&self) -> Result<String, CoreError> {
        self.user_id.clone().ok_or(CoreError::NotSignedIn)
    }

    /// Refetch from the remote table and drop all local overrides
    pub async fn refresh(&mut self) -> Result<&[WatchlistEntry], CoreError> {
        let user_id = self.require_user()?;
        let rows = self.store.fetch(&user_id).await?;
        debug!("Refreshed watchlist for {}: {} entries", user_id, rows.len());
        self.overrides.clear();
        self.mirror.insert(user_id.clone(), rows, Instant::now());
        Ok(self.mirror.get(&user_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Mirror contents, refetching first when stale
    pub async fn entries(&mut self) -> Result<&[WatchlistEntry], CoreError> {
        let user_id = self.require_user()?;
        if self.mirror.is_stale(&user_id, Instant::now()) {
            return self.refresh().await;
        }
        Ok(self.mirror.get(&user_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Last known rows, possibly stale; empty when signed out
    pub fn cached_entries(&self) -> &[WatchlistEntry] {
        self.user_id
            .as_ref()
            .and_then(|user_id| self.mirror.get(user_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn mirror_entry(&self, movie_id: u64) -> Option<&WatchlistEntry> {
        self.cached_entries().iter().find(|e| e.movie_id == movie_id)
    }

    pub fn is_saved(&self, movie_id: u64) -> bool {
        match self.overrides.get(&movie_id) {
            Some(saved) => *saved,
            None => self.mirror_entry(movie_id).is_some(),
        }
    }

    /// Status and progress of a saved title
    pub fn status_of(&self, movie_id: u64) -> Option<(WatchStatus, u8)> {
        if self.overrides.get(&movie_id) == Some(&false) {
            return None;
        }
        self.mirror_entry(movie_id).map(|e| (e.status, e.progress))
    }

    /// Status and progress of a saved title, asking the remote table for that
    /// one row when the mirror is stale or was never loaded
    pub async fn lookup(&mut self, movie_id: u64) -> Result<Option<(WatchStatus, u8)>, CoreError> {
        let user_id = self.require_user()?;
        if self.overrides.get(&movie_id) == Some(&false) {
            return Ok(None);
        }
        if !self.mirror.is_stale(&user_id, Instant::now()) {
            return Ok(self.status_of(movie_id));
        }
        let row = self.store.get(&user_id, movie_id).await?;
        trace!("Looked up watchlist row {} for {}: {}", movie_id, user_id, row.is_some());
        Ok(row.map(|e| (e.status, e.progress)))
    }

    /// Fill an empty mirror so local toggles start from the remote membership.
    /// A failed fetch leaves the mirror empty.
    async fn ensure_loaded(&mut self, user_id: &str) {
        if self.mirror.get(&user_id.to_string()).is_some() {
            return;
        }
        match self.store.fetch(user_id).await {
            Ok(rows) => {
                debug!("Loaded watchlist for {}: {} entries", user_id, rows.len());
                self.mirror.insert(user_id.to_string(), rows, Instant::now());
            }
            Err(e) => warn!("Could not load watchlist for {}: {}", user_id, e),
        }
    }

    /// Flip saved state locally, then mirror the change remotely.
    ///
    /// Only a missing identity is an error. Remote failures are logged and
    /// reported in the outcome while the local flip stands.
    pub async fn toggle(&mut self, item: &ContentItem) -> Result<ToggleOutcome, CoreError> {
        let user_id = self.require_user()?;
        self.ensure_loaded(&user_id).await;
        let saved = !self.is_saved(item.id);
        self.overrides.insert(item.id, saved);

        let remote = self.toggle_remote(&user_id, item).await;
        if let Err(e) = &remote {
            warn!(
                "Watchlist toggle for {} not applied remotely, local state may diverge until refresh: {}",
                item.id, e
            );
        }
        self.mirror.invalidate(&user_id);

        Ok(ToggleOutcome {
            movie_id: item.id,
            saved,
            remote_error: remote.err(),
        })
    }

    async fn toggle_remote(&self, user_id: &str, item: &ContentItem) -> Result<(), SourceError> {
        if self.store.contains(user_id, item.id).await? {
            self.store.delete(user_id, item.id).await
        } else {
            self.store
                .insert(&new_entry(user_id, item, WatchStatus::Plan))
                .await
                .map(|_| ())
        }
    }

    /// Insert a row; local state changes only once the write succeeds
    pub async fn add(&mut self, item: &ContentItem, status: WatchStatus) -> Result<WatchlistEntry, CoreError> {
        let user_id = self.require_user()?;
        let row = self.store.insert(&new_entry(&user_id, item, status)).await?;
        info!("Added '{}' to watchlist as {}", row.movie_title, row.status);
        self.overrides.insert(item.id, true);
        self.mirror.invalidate(&user_id);
        Ok(row)
    }

    pub async fn remove(&mut self, movie_id: u64) -> Result<(), CoreError> {
        let user_id = self.require_user()?;
        self.store.delete(&user_id, movie_id).await?;
        self.overrides.insert(movie_id, false);
        self.mirror.invalidate(&user_id);
        Ok(())
    }

    /// Set status. Plan forces progress to 0 and Watched forces it to 100.
    ///
    /// Both remote writes are attempted; the first failure is returned.
    pub async fn set_status(&mut self, movie_id: u64, status: WatchStatus) -> Result<(), CoreError> {
        let user_id = self.require_user()?;
        let progress = status.implied_progress();
        if let Some(rows) = self.mirror.get_mut(&user_id) {
            if let Some(row) = rows.iter_mut().find(|r| r.movie_id == movie_id) {
                row.status = status;
                if let Some(progress) = progress {
                    row.progress = progress;
                }
            }
        }

        let status_write = self.store.update_status(&user_id, movie_id, status).await;
        let progress_write = match progress {
            Some(progress) => self.store.update_progress(&user_id, movie_id, progress).await,
            None => Ok(()),
        };
        self.mirror.invalidate(&user_id);

        status_write?;
        progress_write?;
        debug!("Set status of {} to {}", movie_id, status);
        Ok(())
    }

    /// Advance plan -> watching -> watched -> plan and return the new status
    pub async fn cycle_status(&mut self, movie_id: u64) -> Result<WatchStatus, CoreError> {
        let current = self
            .lookup(movie_id)
            .await?
            .map(|(status, _)| status)
            .unwrap_or_default();
        let next = current.next();
        self.set_status(movie_id, next).await?;
        Ok(next)
    }

    /// Store progress clamped into 0..=100 and return the stored value
    pub async fn update_progress(&mut self, movie_id: u64, progress: i64) -> Result<u8, CoreError> {
        let user_id = self.require_user()?;
        let progress = clamp_progress(progress);
        if let Some(rows) = self.mirror.get_mut(&user_id) {
            if let Some(row) = rows.iter_mut().find(|r| r.movie_id == movie_id) {
                row.progress = progress;
            }
        }
        let result = self.store.update_progress(&user_id, movie_id, progress).await;
        self.mirror.invalidate(&user_id);
        result?;
        Ok(progress)
    }
}

fn new_entry(user_id: &str, item: &ContentItem, status: WatchStatus) -> NewWatchlistEntry {
    NewWatchlistEntry {
        user_id: user_id.to_string(),
        movie_id: item.id,
        movie_title: item.title.clone(),
        movie_poster_path: item.poster_path.clone(),
        status,
        progress: status.implied_progress().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::profile_for_email;
    use crate::testing::{item, FakeStore};

    const EMAIL: &str = "sam@example.com";

    fn signed_in(store: FakeStore) -> WatchlistSync<FakeStore> {
        let mut sync = WatchlistSync::new(store, Duration::from_secs(30));
        sync.set_user(Some(&profile_for_email(EMAIL)));
        sync
    }

    #[tokio::test]
    async fn test_operations_require_identity() {
        let mut sync = WatchlistSync::new(FakeStore::new(), Duration::from_secs(30));
        assert!(matches!(sync.toggle(&item(1)).await, Err(CoreError::NotSignedIn)));
        assert!(matches!(sync.refresh().await, Err(CoreError::NotSignedIn)));
        assert!(matches!(
            sync.set_status(1, WatchStatus::Watched).await,
            Err(CoreError::NotSignedIn)
        ));
        assert!(!sync.is_saved(1));
    }

    #[tokio::test]
    async fn test_toggle_adds_then_removes() {
        let mut sync = signed_in(FakeStore::new());

        let added = sync.toggle(&item(7)).await.unwrap();
        assert!(added.saved);
        assert!(added.is_consistent());
        assert!(sync.is_saved(7));
        let row = sync.store().row(EMAIL, 7).unwrap();
        assert_eq!(row.status, WatchStatus::Plan);
        assert_eq!(row.progress, 0);

        let removed = sync.toggle(&item(7)).await.unwrap();
        assert!(!removed.saved);
        assert!(!sync.is_saved(7));
        assert!(sync.store().row(EMAIL, 7).is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_diverges_until_refresh() {
        let store = FakeStore::new().with_row(EMAIL, 42, WatchStatus::Watching);
        let mut sync = signed_in(store);
        sync.refresh().await.unwrap();
        assert!(sync.is_saved(42));

        sync.store().fail_deletes(true);
        let outcome = sync.toggle(&item(42)).await.unwrap();
        assert!(!outcome.saved);
        assert!(outcome.remote_error.is_some());
        // Local flip stands even though the row is still there
        assert!(!sync.is_saved(42));
        assert!(sync.store().row(EMAIL, 42).is_some());

        sync.refresh().await.unwrap();
        assert!(sync.is_saved(42));
    }

    #[tokio::test]
    async fn test_toggle_without_refresh_starts_from_remote() {
        let store = FakeStore::new().with_row(EMAIL, 42, WatchStatus::Plan);
        let mut sync = signed_in(store);

        let outcome = sync.toggle(&item(42)).await.unwrap();
        assert!(!outcome.saved);
        assert!(outcome.is_consistent());
        assert!(!sync.is_saved(42));
        assert!(sync.store().row(EMAIL, 42).is_none());
        assert_eq!(sync.store().fetch_calls(), 1);

        sync.toggle(&item(42)).await.unwrap();
        assert_eq!(sync.store().fetch_calls(), 1);
        assert!(sync.store().row(EMAIL, 42).is_some());
    }

    #[tokio::test]
    async fn test_lookup_reads_single_row_when_not_loaded() {
        let store = FakeStore::new().with_row(EMAIL, 8, WatchStatus::Watched);
        let mut sync = signed_in(store);

        assert_eq!(sync.lookup(8).await.unwrap(), Some((WatchStatus::Watched, 100)));
        assert_eq!(sync.lookup(9).await.unwrap(), None);
        assert_eq!(sync.store().fetch_calls(), 0);

        assert_eq!(sync.cycle_status(8).await.unwrap(), WatchStatus::Plan);
        assert_eq!(sync.store().row(EMAIL, 8).unwrap().progress, 0);
    }

    #[tokio::test]
    async fn test_status_forces_progress() {
        let store = FakeStore::new().with_row(EMAIL, 5, WatchStatus::Watching);
        let mut sync = signed_in(store);
        sync.refresh().await.unwrap();

        sync.set_status(5, WatchStatus::Watched).await.unwrap();
        assert_eq!(sync.status_of(5), Some((WatchStatus::Watched, 100)));
        assert_eq!(sync.store().row(EMAIL, 5).unwrap().progress, 100);

        sync.set_status(5, WatchStatus::Watching).await.unwrap();
        assert_eq!(sync.store().row(EMAIL, 5).unwrap().progress, 100);

        sync.set_status(5, WatchStatus::Plan).await.unwrap();
        let row = sync.store().row(EMAIL, 5).unwrap();
        assert_eq!((row.status, row.progress), (WatchStatus::Plan, 0));
    }

    #[tokio::test]
    async fn test_cycle_status_wraps() {
        let store = FakeStore::new().with_row(EMAIL, 9, WatchStatus::Watched);
        let mut sync = signed_in(store);
        sync.refresh().await.unwrap();

        assert_eq!(sync.cycle_status(9).await.unwrap(), WatchStatus::Plan);
        assert_eq!(sync.cycle_status(9).await.unwrap(), WatchStatus::Watching);
    }

    #[tokio::test]
    async fn test_progress_is_clamped() {
        let store = FakeStore::new().with_row(EMAIL, 3, WatchStatus::Watching);
        let mut sync = signed_in(store);
        sync.refresh().await.unwrap();

        assert_eq!(sync.update_progress(3, 150).await.unwrap(), 100);
        assert_eq!(sync.update_progress(3, -20).await.unwrap(), 0);
        assert_eq!(sync.store().row(EMAIL, 3).unwrap().progress, 0);
    }

    #[tokio::test]
    async fn test_entries_refetch_only_when_stale() {
        let store = FakeStore::new().with_row(EMAIL, 1, WatchStatus::Plan);
        let mut sync = signed_in(store);

        assert_eq!(sync.entries().await.unwrap().len(), 1);
        assert_eq!(sync.entries().await.unwrap().len(), 1);
        assert_eq!(sync.store().fetch_calls(), 1);

        sync.toggle(&item(2)).await.unwrap();
        assert_eq!(sync.entries().await.unwrap().len(), 2);
        assert_eq!(sync.store().fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_state_unchanged() {
        let store = FakeStore::new();
        store.fail_writes(true);
        let mut sync = signed_in(store);
        assert!(sync.add(&item(11), WatchStatus::Plan).await.is_err());
        assert!(!sync.is_saved(11));
    }

    #[tokio::test]
    async fn test_user_switch_drops_overrides() {
        let store = FakeStore::new();
        store.fail_writes(true);
        let mut sync = signed_in(store);
        let outcome = sync.toggle(&item(4)).await.unwrap();
        assert!(outcome.saved);
        assert!(sync.is_saved(4));

        sync.set_user(Some(&profile_for_email("other@example.com")));
        assert!(!sync.is_saved(4));
        sync.set_user(None);
        assert!(sync.user_id().is_none());
    }
}
