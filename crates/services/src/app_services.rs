use std::sync::Arc;

use lesson_core::model::Catalog;
use lesson_core::model::curriculum::r_basics;
use storage::repository::Storage;
use tokio::runtime::Handle;

use crate::Clock;
use crate::config::SessionConfig;
use crate::engine::Engine;
use crate::error::AppServicesError;
use crate::orchestrator::Orchestrator;
use crate::progress_store::ProgressStore;
use crate::session::InterpreterSession;

/// Assembles the curriculum, progress persistence and interpreter session.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    store: ProgressStore,
    session: Arc<InterpreterSession>,
}

impl AppServices {
    /// Build services over an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Curriculum` if the built-in catalog is invalid.
    pub fn new(
        storage: &Storage,
        engine: Arc<dyn Engine>,
        config: SessionConfig,
        runtime: Handle,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(r_basics()?);
        let store = ProgressStore::new(Arc::clone(&storage.progress), Arc::clone(&catalog));
        let session = Arc::new(InterpreterSession::new(engine, config, runtime));
        Ok(Self {
            catalog,
            store,
            session,
        })
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// catalog is invalid.
    pub async fn new_sqlite(
        db_url: &str,
        engine: Arc<dyn Engine>,
        config: SessionConfig,
        runtime: Handle,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new(&storage, engine, config, runtime)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn store(&self) -> ProgressStore {
        self.store.clone()
    }

    #[must_use]
    pub fn session(&self) -> Arc<InterpreterSession> {
        Arc::clone(&self.session)
    }

    /// Load saved progress and build an orchestrator positioned at the
    /// learner's resume point.
    pub async fn orchestrator(&self, clock: Clock) -> Orchestrator {
        let progress = self.store.load().await;
        tracing::info!(
            completed = progress.len(),
            total = self.catalog.len(),
            "loaded progress"
        );
        Orchestrator::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.session),
            progress,
            clock,
        )
    }
}
