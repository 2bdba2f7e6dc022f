//! The execution orchestrator: owns the lesson/editor/console state and
//! drives runs through the interpreter session.

use std::sync::Arc;

use lesson_core::Clock;
use lesson_core::model::{
    ActiveView, Canvas, Catalog, Lesson, LessonId, LessonStatus, LogEntry, LogKind, Progress,
    Transcript, looks_like_graphics,
};

use crate::engine::{CanvasEvent, EngineMessage};
use crate::error::EngineError;
use crate::harness::Evaluation;
use crate::session::InterpreterSession;

/// What the editor holds after a lesson switch or a reset.
pub const CODE_PLACEHOLDER: &str = "# Write your R code here...\n";
/// Logged when an engine fault carries no message.
pub const EXECUTION_ERROR_FALLBACK: &str = "Execution Error";
pub const PROGRESS_RESET_MESSAGE: &str = "Progress has been reset.";

/// Proof that a run was opened. Consumed by `Orchestrator::finish_run`.
#[derive(Debug)]
pub struct RunTicket {
    lesson_id: LessonId,
    code: String,
}

impl RunTicket {
    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Printed something.
    Output,
    /// Ran but printed nothing.
    Silent,
    /// The learner's code raised an error.
    Error,
    /// The engine itself failed.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub lesson_id: LessonId,
    pub outcome: RunOutcome,
    /// The run completed the lesson for the first time; progress needs saving.
    pub newly_completed: bool,
}

pub struct Orchestrator {
    catalog: Arc<Catalog>,
    session: Arc<InterpreterSession>,
    clock: Clock,
    progress: Progress,
    transcript: Transcript,
    canvas: Canvas,
    current: LessonId,
    code: String,
    view: ActiveView,
    running: bool,
    hint_visible: bool,
    celebrating: bool,
}

impl Orchestrator {
    /// Start at the learner's resume point for the given progress.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        session: Arc<InterpreterSession>,
        progress: Progress,
        clock: Clock,
    ) -> Self {
        let current = progress.resume_point(&catalog);
        Self {
            catalog,
            session,
            clock,
            progress,
            transcript: Transcript::new(),
            canvas: Canvas::new(),
            current,
            code: CODE_PLACEHOLDER.to_string(),
            view: ActiveView::Console,
            running: false,
            hint_visible: false,
            celebrating: false,
        }
    }

    // ─── Read access ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn session(&self) -> Arc<InterpreterSession> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn current_id(&self) -> LessonId {
        self.current
    }

    #[must_use]
    pub fn current_lesson(&self) -> &Lesson {
        self.catalog
            .get(self.current)
            .unwrap_or_else(|| self.catalog.first())
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn view(&self) -> ActiveView {
        self.view
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    #[must_use]
    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.progress.percent(&self.catalog)
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub fn status_of(&self, id: LessonId) -> LessonStatus {
        self.progress.status_of(id, self.current)
    }

    /// Navigator rows: every lesson with its status, in catalog order.
    #[must_use]
    pub fn lesson_statuses(&self) -> Vec<(LessonId, LessonStatus)> {
        self.catalog
            .iter()
            .map(|lesson| (lesson.id(), self.status_of(lesson.id())))
            .collect()
    }

    /// True when a run request would be accepted right now.
    #[must_use]
    pub fn can_run(&self) -> bool {
        !self.running && self.session.is_ready()
    }

    // ─── Editor and layout intents ───────────────────────────────────────────

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn reset_code(&mut self) {
        self.code = CODE_PLACEHOLDER.to_string();
    }

    pub fn toggle_hint(&mut self) {
        self.hint_visible = !self.hint_visible;
    }

    pub fn set_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// Close the celebration dialog and stay on the lesson.
    pub fn dismiss_celebration(&mut self) {
        self.celebrating = false;
    }

    /// Move to the next lesson (the last lesson stays put).
    pub fn advance(&mut self) {
        let next = self.catalog.next_id(self.current);
        self.select_lesson(next);
    }

    /// Switch lessons. Unknown ids are ignored. Returns whether the switch happened.
    pub fn select_lesson(&mut self, id: LessonId) -> bool {
        if !self.catalog.contains(id) {
            tracing::debug!(lesson = %id, "ignoring unknown lesson id");
            return false;
        }
        self.current = id;
        self.code = CODE_PLACEHOLDER.to_string();
        self.hint_visible = false;
        self.celebrating = false;
        self.view = if self.catalog.is_visualization(id) {
            ActiveView::Graphics
        } else {
            ActiveView::Console
        };
        true
    }

    /// Empty the completion set, go back to the first lesson and say so in the log.
    /// The caller clears persisted storage.
    pub fn clear_progress(&mut self) {
        self.progress.clear();
        let first = self.catalog.first().id();
        self.select_lesson(first);
        self.log(LogKind::System, PROGRESS_RESET_MESSAGE);
    }

    // ─── Runs ────────────────────────────────────────────────────────────────

    /// Open a run for the current code. `None` when the session is not ready
    /// or a run is already in flight.
    pub fn begin_run(&mut self) -> Option<RunTicket> {
        if !self.can_run() {
            return None;
        }
        self.running = true;

        if looks_like_graphics(&self.code) {
            self.view = ActiveView::Graphics;
        }
        self.log(LogKind::Input, self.code.clone());

        Some(RunTicket {
            lesson_id: self.current,
            code: self.code.clone(),
        })
    }

    /// Record the result of a run, validate it, and return to idle.
    pub fn finish_run(
        &mut self,
        ticket: RunTicket,
        result: Result<Evaluation, EngineError>,
    ) -> RunReport {
        let RunTicket { lesson_id, code } = ticket;

        let report = match result {
            Ok(evaluation) => {
                let outcome = if evaluation.is_error() {
                    RunOutcome::Error
                } else if evaluation.is_blank() {
                    RunOutcome::Silent
                } else {
                    RunOutcome::Output
                };
                if !evaluation.is_blank() {
                    let kind = if evaluation.is_error() {
                        LogKind::Error
                    } else {
                        LogKind::Output
                    };
                    self.log(kind, evaluation.text());
                }

                let accepted = !evaluation.is_error()
                    && self
                        .catalog
                        .get(lesson_id)
                        .is_some_and(|lesson| lesson.accepts(&code));
                let newly_completed = accepted && self.progress.mark_complete(lesson_id);
                if newly_completed {
                    tracing::info!(lesson = %lesson_id, "lesson completed");
                    // A lesson switch during the run means the dialog would
                    // congratulate the wrong lesson.
                    if self.current == lesson_id {
                        self.celebrating = true;
                    }
                }

                RunReport {
                    lesson_id,
                    outcome,
                    newly_completed,
                }
            }
            Err(err) => {
                tracing::warn!(lesson = %lesson_id, error = %err, "run failed");
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    EXECUTION_ERROR_FALLBACK.to_string()
                } else {
                    message
                };
                self.log(LogKind::Error, message);
                RunReport {
                    lesson_id,
                    outcome: RunOutcome::Failed,
                    newly_completed: false,
                }
            }
        };

        self.running = false;
        report
    }

    /// `begin_run`, evaluate, `finish_run`. `None` if the run was not accepted.
    pub async fn run_code(&mut self) -> Option<RunReport> {
        let ticket = self.begin_run()?;
        let result = self.session.evaluate(ticket.code()).await;
        Some(self.finish_run(ticket, result))
    }

    // ─── Listener ────────────────────────────────────────────────────────────

    /// Fold an out-of-band engine message into the console or canvas.
    pub fn apply_message(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Stdout(text) => self.log(LogKind::Output, text),
            EngineMessage::Stderr(text) => self.log(LogKind::Error, text),
            EngineMessage::Canvas(CanvasEvent::NewPage) => self.canvas.clear(),
            EngineMessage::Canvas(CanvasEvent::ImageReady(bitmap)) => self.canvas.blit(&bitmap),
        }
    }

    fn log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.transcript
            .push(LogEntry::new(kind, text, self.clock.now()));
    }
}
