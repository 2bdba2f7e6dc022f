use std::sync::Arc;

use lesson_core::model::{Catalog, LessonId, Progress};
use storage::repository::ProgressRepository;
use tokio::sync::Mutex;

/// Persists the completion set. Every operation fails soft: storage problems
/// are logged and otherwise treated as "no saved progress".
///
/// Writes from all clones go through one lock, so they reach the backend in
/// the order they were issued.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
    catalog: Arc<Catalog>,
    writes: Arc<Mutex<()>>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>, catalog: Arc<Catalog>) -> Self {
        Self {
            repo,
            catalog,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Load the saved set. Missing, unreadable or malformed data yields an
    /// empty set; ids the catalog does not know are dropped.
    pub async fn load(&self) -> Progress {
        match self.repo.load_completed().await {
            Ok(Some(ids)) => Progress::from_persisted(ids, &self.catalog),
            Ok(None) => Progress::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load saved progress; starting fresh");
                Progress::new()
            }
        }
    }

    pub async fn save(&self, progress: &Progress) {
        let ids: Vec<LessonId> = progress.ids().collect();
        let _write = self.writes.lock().await;
        if let Err(err) = self.repo.save_completed(&ids).await {
            tracing::warn!(error = %err, completed = ids.len(), "failed to save progress");
        }
    }

    pub async fn clear(&self) {
        let _write = self.writes.lock().await;
        if let Err(err) = self.repo.clear_completed().await {
            tracing::warn!(error = %err, "failed to clear saved progress");
        }
    }
}
