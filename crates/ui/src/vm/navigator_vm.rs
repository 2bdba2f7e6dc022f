use lesson_core::model::LessonStatus;
use services::{Orchestrator, SessionStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorRowVm {
    pub id: u32,
    pub title: String,
    pub module: String,
    pub status: LessonStatus,
    pub marker: &'static str,
    pub class: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressDotVm {
    pub id: u32,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorVm {
    pub rows: Vec<NavigatorRowVm>,
    pub dots: Vec<ProgressDotVm>,
    pub percent: u8,
    pub completed: usize,
    pub total: usize,
}

#[must_use]
pub fn map_navigator(orchestrator: &Orchestrator) -> NavigatorVm {
    let catalog = orchestrator.catalog();
    let rows: Vec<NavigatorRowVm> = catalog
        .iter()
        .map(|lesson| {
            let status = orchestrator.status_of(lesson.id());
            let (marker, class) = match status {
                LessonStatus::Completed => ("✓", "nav-row nav-completed"),
                LessonStatus::Current => ("▶", "nav-row nav-current"),
                LessonStatus::Locked => ("•", "nav-row nav-locked"),
            };
            NavigatorRowVm {
                id: lesson.id().value(),
                title: lesson.title().to_string(),
                module: lesson.module().to_string(),
                status,
                marker,
                class,
            }
        })
        .collect();
    let dots = rows
        .iter()
        .map(|row| ProgressDotVm {
            id: row.id,
            class: match row.status {
                LessonStatus::Completed => "dot dot-completed",
                LessonStatus::Current => "dot dot-current",
                LessonStatus::Locked => "dot",
            },
        })
        .collect();

    NavigatorVm {
        rows,
        dots,
        percent: orchestrator.progress_percent(),
        completed: orchestrator.progress().len(),
        total: catalog.len(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusBadgeVm {
    pub label: &'static str,
    pub class: &'static str,
}

#[must_use]
pub fn status_badge(status: &SessionStatus) -> StatusBadgeVm {
    match status {
        SessionStatus::Ready => StatusBadgeVm {
            label: "R engine ready",
            class: "badge badge-ready",
        },
        SessionStatus::Starting => StatusBadgeVm {
            label: "Loading R engine...",
            class: "badge badge-loading",
        },
        SessionStatus::Failed(_) => StatusBadgeVm {
            label: "R engine unavailable",
            class: "badge badge-failed",
        },
    }
}
