//! Learner intents that touch both the orchestrator and persisted progress.
//!
//! The synchronous halves (`settle_run`, `forget_progress`) mutate the
//! orchestrator and return the storage write they imply, so callers that
//! cannot hold the orchestrator across an `.await` can apply it afterwards.

use lesson_core::model::Progress;

use crate::error::EngineError;
use crate::harness::Evaluation;
use crate::orchestrator::{Orchestrator, RunReport, RunTicket};
use crate::progress_store::ProgressStore;

/// A pending write to the progress store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Persist {
    Nothing,
    Save(Progress),
    Clear,
}

impl Persist {
    pub async fn apply(self, store: &ProgressStore) {
        match self {
            Persist::Nothing => {}
            Persist::Save(progress) => store.save(&progress).await,
            Persist::Clear => store.clear().await,
        }
    }
}

/// Close a run and work out whether progress needs saving.
pub fn settle_run(
    orchestrator: &mut Orchestrator,
    ticket: RunTicket,
    result: Result<Evaluation, EngineError>,
) -> (RunReport, Persist) {
    let report = orchestrator.finish_run(ticket, result);
    let persist = if report.newly_completed {
        Persist::Save(orchestrator.progress().clone())
    } else {
        Persist::Nothing
    };
    (report, persist)
}

/// Forget every completed lesson in memory; the returned write clears storage.
pub fn forget_progress(orchestrator: &mut Orchestrator) -> Persist {
    orchestrator.clear_progress();
    Persist::Clear
}

/// Run the current code and save progress if the run completed a lesson.
/// Returns `None` when the run was not accepted (not ready or already running).
pub async fn submit(orchestrator: &mut Orchestrator, store: &ProgressStore) -> Option<RunReport> {
    let ticket = orchestrator.begin_run()?;
    let result = orchestrator.session().evaluate(ticket.code()).await;
    let (report, persist) = settle_run(orchestrator, ticket, result);
    persist.apply(store).await;
    Some(report)
}

/// Forget every completed lesson, in memory and in storage.
pub async fn reset_progress(orchestrator: &mut Orchestrator, store: &ProgressStore) {
    forget_progress(orchestrator).apply(store).await;
}
