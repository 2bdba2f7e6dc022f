use std::sync::Arc;

use lesson_core::model::Catalog;
use services::{Clock, InterpreterSession, ProgressStore};

pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<Catalog>;
    fn session(&self) -> Arc<InterpreterSession>;
    fn progress_store(&self) -> ProgressStore;
    fn clock(&self) -> Clock;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<Catalog>,
    session: Arc<InterpreterSession>,
    store: ProgressStore,
    clock: Clock,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            session: app.session(),
            store: app.progress_store(),
            clock: app.clock(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn session(&self) -> Arc<InterpreterSession> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn store(&self) -> ProgressStore {
        self.store.clone()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
