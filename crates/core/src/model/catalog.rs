use std::ops::RangeInclusive;

use thiserror::Error;

use crate::model::{Lesson, LessonId};

/// Ordered, immutable list of lessons with ids exactly `1..=N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    visualization: RangeInclusive<u32>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog has no lessons")]
    Empty,

    #[error("lesson at position {position} has id {found}, expected {expected}")]
    OutOfSequence {
        position: usize,
        expected: u32,
        found: LessonId,
    },

    #[error("too many lessons for a catalog: {len}")]
    TooManyLessons { len: usize },
}

impl Catalog {
    /// Build a catalog from lessons ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::OutOfSequence` if ids are not `1, 2, ..., N` in order.
    pub fn new(lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        if lessons.is_empty() {
            return Err(CatalogError::Empty);
        }
        if u32::try_from(lessons.len()).is_err() {
            return Err(CatalogError::TooManyLessons { len: lessons.len() });
        }
        for (position, lesson) in lessons.iter().enumerate() {
            // Length was checked to fit in u32 above.
            let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
            if lesson.id().value() != expected {
                return Err(CatalogError::OutOfSequence {
                    position,
                    expected,
                    found: lesson.id(),
                });
            }
        }
        Ok(Self {
            lessons,
            visualization: 1..=0,
        })
    }

    /// Mark a contiguous id range as visualization lessons (graphics tab by default).
    #[must_use]
    pub fn with_visualization_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.visualization = range;
        self
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: LessonId) -> Option<&Lesson> {
        let index = usize::try_from(id.value()).ok()?.checked_sub(1)?;
        self.lessons.get(index)
    }

    #[must_use]
    pub fn contains(&self, id: LessonId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn first(&self) -> &Lesson {
        &self.lessons[0]
    }

    #[must_use]
    pub fn last_id(&self) -> LessonId {
        self.lessons[self.lessons.len() - 1].id()
    }

    /// The lesson after `id`, clamped to the last lesson.
    #[must_use]
    pub fn next_id(&self, id: LessonId) -> LessonId {
        id.next().min(self.last_id())
    }

    #[must_use]
    pub fn is_visualization(&self, id: LessonId) -> bool {
        self.visualization.contains(&id.value())
    }

    #[must_use]
    pub fn visualization_range(&self) -> &RangeInclusive<u32> {
        &self.visualization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonDraft;

    fn lesson(id: u32) -> Lesson {
        LessonDraft {
            title: format!("Lesson {id}"),
            module: "Basics".into(),
            expected_keywords: vec!["x".into()],
            ..LessonDraft::new()
        }
        .validate(LessonId::new(id))
        .unwrap()
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn rejects_gaps_in_ids() {
        let err = Catalog::new(vec![lesson(1), lesson(3)]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::OutOfSequence {
                position: 1,
                expected: 2,
                found: LessonId::new(3),
            }
        );
    }

    #[test]
    fn lookups_by_id() {
        let catalog = Catalog::new(vec![lesson(1), lesson(2), lesson(3)]).unwrap();
        assert_eq!(catalog.get(LessonId::new(2)).unwrap().title(), "Lesson 2");
        assert!(catalog.get(LessonId::new(0)).is_none());
        assert!(catalog.get(LessonId::new(4)).is_none());
        assert_eq!(catalog.first().id(), LessonId::FIRST);
        assert_eq!(catalog.last_id(), LessonId::new(3));
    }

    #[test]
    fn next_id_is_clamped() {
        let catalog = Catalog::new(vec![lesson(1), lesson(2)]).unwrap();
        assert_eq!(catalog.next_id(LessonId::new(1)), LessonId::new(2));
        assert_eq!(catalog.next_id(LessonId::new(2)), LessonId::new(2));
    }

    #[test]
    fn visualization_range_defaults_to_none() {
        let catalog = Catalog::new(vec![lesson(1), lesson(2)]).unwrap();
        assert!(!catalog.is_visualization(LessonId::new(1)));

        let catalog = catalog.with_visualization_range(2..=2);
        assert!(catalog.is_visualization(LessonId::new(2)));
        assert!(!catalog.is_visualization(LessonId::new(1)));
    }
}
