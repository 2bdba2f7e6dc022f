use lesson_core::model::Lesson;

use super::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonVm {
    pub id: u32,
    pub module: String,
    pub title: String,
    pub scenario_html: String,
    pub task_html: String,
    pub hint_code: String,
    pub hint_visible: bool,
}

#[must_use]
pub fn map_lesson(lesson: &Lesson, hint_visible: bool) -> LessonVm {
    LessonVm {
        id: lesson.id().value(),
        module: lesson.module().to_string(),
        title: lesson.title().to_string(),
        scenario_html: markdown_to_html(lesson.scenario()),
        task_html: markdown_to_html(lesson.task()),
        hint_code: lesson.hint().to_string(),
        hint_visible,
    }
}
