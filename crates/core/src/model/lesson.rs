use thiserror::Error;

use crate::model::LessonId;

/// Unvalidated lesson fields, as written in a curriculum table.
#[derive(Clone, Debug, Default)]
pub struct LessonDraft {
    pub title: String,
    pub module: String,
    pub scenario: String,
    pub task: String,
    pub hint: String,
    pub default_code: String,
    pub expected_keywords: Vec<String>,
}

impl LessonDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft and bind it to an id.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title or module is blank, if there are no
    /// expected keywords, or if any keyword is blank.
    pub fn validate(self, id: LessonId) -> Result<Lesson, LessonError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle { id });
        }
        let module = self.module.trim().to_string();
        if module.is_empty() {
            return Err(LessonError::EmptyModule { id });
        }
        if self.expected_keywords.is_empty() {
            return Err(LessonError::NoKeywords { id });
        }
        if self.expected_keywords.iter().any(|kw| kw.trim().is_empty()) {
            return Err(LessonError::BlankKeyword { id });
        }

        Ok(Lesson {
            id,
            title,
            module,
            scenario: self.scenario,
            task: self.task,
            hint: self.hint,
            default_code: self.default_code,
            expected_keywords: self.expected_keywords,
        })
    }
}

/// One catalog entry: scenario, task, hint and completion criteria.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    module: String,
    scenario: String,
    task: String,
    hint: String,
    default_code: String,
    expected_keywords: Vec<String>,
}

impl Lesson {
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    #[must_use]
    pub fn expected_keywords(&self) -> &[String] {
        &self.expected_keywords
    }

    /// True when every expected keyword occurs in `code`, ignoring case.
    ///
    /// This is a purely textual check on the submitted source; it says nothing
    /// about what the code printed.
    #[must_use]
    pub fn accepts(&self, code: &str) -> bool {
        let haystack = code.to_lowercase();
        self.expected_keywords
            .iter()
            .all(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson {id} has an empty title")]
    EmptyTitle { id: LessonId },

    #[error("lesson {id} has an empty module label")]
    EmptyModule { id: LessonId },

    #[error("lesson {id} has no expected keywords")]
    NoKeywords { id: LessonId },

    #[error("lesson {id} has a blank expected keyword")]
    BlankKeyword { id: LessonId },
}
