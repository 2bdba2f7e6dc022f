mod canvas;
mod catalog;
pub mod curriculum;
mod ids;
mod lesson;
mod log;
mod progress;
mod view;

pub use canvas::{Bitmap, CANVAS_SIZE, Canvas};
pub use catalog::{Catalog, CatalogError};
pub use ids::{LessonId, ParseIdError};
pub use lesson::{Lesson, LessonDraft, LessonError};
pub use log::{LogEntry, LogKind, Transcript};
pub use progress::{LessonStatus, Progress};
pub use view::{ActiveView, GRAPHICS_MARKERS, looks_like_graphics};
