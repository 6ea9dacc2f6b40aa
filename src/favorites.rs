use log::warn;
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persisted set of favorite recipe ids.
///
/// All operations are synchronous and visible immediately on return. Every
/// mutation re-serializes the set to the backing file before releasing the
/// mutation lock, so concurrent toggles on different ids cannot lose updates.
///
/// Persistence is fail-open: a failed write is logged and swallowed, and the
/// in-memory set stays authoritative for the current process. Callers that
/// need durability confirmation can call [`persist`](Self::persist).
pub struct FavoritesStore {
    ids: Mutex<HashSet<String>>,
    path: Option<PathBuf>,
}

impl FavoritesStore {
    /// Store backed by a JSON file of id strings.
    ///
    /// A missing or undecodable file yields an empty set; construction never
    /// fails.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = std::fs::read(&path)
            .ok()
            .and_then(|data| serde_json::from_slice::<HashSet<String>>(&data).ok())
            .unwrap_or_default();

        Self {
            ids: Mutex::new(ids),
            path: Some(path),
        }
    }

    /// In-memory store with no backing file; favorites last for the process.
    pub fn in_memory() -> Self {
        Self {
            ids: Mutex::new(HashSet::new()),
            path: None,
        }
    }

    /// Store configured from [`Settings`](crate::config::Settings):
    /// file-backed when `favorites_path` is set, in-memory otherwise.
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        match &settings.favorites_path {
            Some(path) => Self::new(path),
            None => Self::in_memory(),
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    /// Flip membership of `id` and persist the new set.
    pub fn toggle_favorite(&self, id: &str) {
        let mut ids = self.lock();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        self.save(&ids);
    }

    /// Snapshot of the current favorite ids.
    ///
    /// Later mutations are not visible through a returned snapshot.
    pub fn favorite_ids(&self) -> HashSet<String> {
        self.lock().clone()
    }

    /// Empty the set and persist.
    pub fn clear_all(&self) {
        let mut ids = self.lock();
        ids.clear();
        self.save(&ids);
    }

    /// Write the current set to the backing file, surfacing the error.
    ///
    /// The explicit error channel for callers that cannot accept the default
    /// fail-open behavior of the mutating operations.
    pub fn persist(&self) -> io::Result<()> {
        let ids = self.lock();
        self.write(&ids)
    }

    fn save(&self, ids: &HashSet<String>) {
        if let Err(e) = self.write(ids) {
            warn!("failed to persist favorites: {e}");
        }
    }

    fn write(&self, ids: &HashSet<String>) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(ids)?;
        std::fs::write(path, data)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // Favorites hold no invariant that a panic could break mid-update
        self.ids.lock().unwrap_or_else(|e| e.into_inner())
    }
}
