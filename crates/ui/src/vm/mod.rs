mod canvas_vm;
mod lesson_vm;
mod log_vm;
mod markdown_vm;
mod navigator_vm;
mod time_fmt;

pub use canvas_vm::canvas_data_url;
pub use lesson_vm::{LessonVm, map_lesson};
pub use log_vm::{LogLineVm, map_log_lines};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use navigator_vm::{
    NavigatorRowVm, NavigatorVm, ProgressDotVm, StatusBadgeVm, map_navigator, status_badge,
};
pub use time_fmt::format_clock_time;
