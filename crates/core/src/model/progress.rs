use std::collections::BTreeSet;

use crate::model::{Catalog, LessonId};

/// Per-lesson marker shown in the navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonStatus {
    Completed,
    Current,
    /// Not yet done. Purely visual; the lesson can still be selected.
    Locked,
}

/// The completion set: ids of lessons the learner has satisfied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    completed: BTreeSet<LessonId>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted ids, keeping only ids the catalog knows.
    #[must_use]
    pub fn from_persisted(ids: impl IntoIterator<Item = LessonId>, catalog: &Catalog) -> Self {
        Self {
            completed: ids.into_iter().filter(|id| catalog.contains(*id)).collect(),
        }
    }

    /// Add `id` to the set. Returns false if it was already there.
    pub fn mark_complete(&mut self, id: LessonId) -> bool {
        self.completed.insert(id)
    }

    #[must_use]
    pub fn is_complete(&self, id: LessonId) -> bool {
        self.completed.contains(&id)
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Completed ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.completed.iter().copied()
    }

    /// Rounded share of the catalog that is complete, 0 to 100.
    #[must_use]
    pub fn percent(&self, catalog: &Catalog) -> u8 {
        let total = catalog.len();
        if total == 0 {
            return 0;
        }
        let done = self.completed.len().min(total);
        let rounded = (done * 100 + total / 2) / total;
        u8::try_from(rounded).unwrap_or(100)
    }

    /// Where a returning learner picks up: the lesson after the highest completed
    /// one, clamped to the last lesson, or the first lesson for a fresh start.
    #[must_use]
    pub fn resume_point(&self, catalog: &Catalog) -> LessonId {
        match self.completed.last() {
            Some(max) => catalog.next_id(*max),
            None => catalog.first().id(),
        }
    }

    #[must_use]
    pub fn status_of(&self, id: LessonId, current: LessonId) -> LessonStatus {
        if self.is_complete(id) {
            LessonStatus::Completed
        } else if id == current {
            LessonStatus::Current
        } else {
            LessonStatus::Locked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::curriculum::r_basics;

    #[test]
    fn mark_complete_is_idempotent() {
        let mut progress = Progress::new();
        assert!(progress.mark_complete(LessonId::new(3)));
        assert!(!progress.mark_complete(LessonId::new(3)));
        assert_eq!(progress.len(), 1);
    }

    #[test]
    fn from_persisted_drops_foreign_ids() {
        let catalog = r_basics().unwrap();
        let progress = Progress::from_persisted(
            [LessonId::new(0), LessonId::new(2), LessonId::new(21), LessonId::new(2)],
            &catalog,
        );
        assert_eq!(progress.ids().collect::<Vec<_>>(), vec![LessonId::new(2)]);
    }

    #[test]
    fn resume_point_follows_highest_completed() {
        let catalog = r_basics().unwrap();
        assert_eq!(Progress::new().resume_point(&catalog), LessonId::new(1));

        let progress = Progress::from_persisted([LessonId::new(2), LessonId::new(7)], &catalog);
        assert_eq!(progress.resume_point(&catalog), LessonId::new(8));

        let progress = Progress::from_persisted([LessonId::new(20)], &catalog);
        assert_eq!(progress.resume_point(&catalog), LessonId::new(20));
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let catalog = r_basics().unwrap();
        let mut progress = Progress::new();
        assert_eq!(progress.percent(&catalog), 0);
        progress.mark_complete(LessonId::new(1));
        assert_eq!(progress.percent(&catalog), 5);
        for id in 1..=20 {
            progress.mark_complete(LessonId::new(id));
        }
        assert_eq!(progress.percent(&catalog), 100);
    }

    #[test]
    fn status_prefers_completed_over_current() {
        let mut progress = Progress::new();
        progress.mark_complete(LessonId::new(1));
        let current = LessonId::new(1);
        assert_eq!(progress.status_of(LessonId::new(1), current), LessonStatus::Completed);
        assert_eq!(
            progress.status_of(LessonId::new(2), LessonId::new(2)),
            LessonStatus::Current
        );
        assert_eq!(progress.status_of(LessonId::new(3), current), LessonStatus::Locked);
    }
}
