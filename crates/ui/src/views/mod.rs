mod celebration;
mod editor;
mod lesson_pane;
mod navigator;
mod output;
mod workspace;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use celebration::CelebrationDialog;
pub use editor::CodeEditor;
pub use lesson_pane::LessonPane;
pub use navigator::{Navigator, WorkspaceHeader};
pub use output::{GraphicsPane, LogViewer, OutputTabs};
pub use workspace::WorkspaceView;
#[cfg(test)]
pub(crate) use workspace::WorkspaceTestHandles;
