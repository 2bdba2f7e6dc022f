/// Which output tab is in front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActiveView {
    #[default]
    Console,
    Graphics,
}

/// Function names that suggest the code will draw something.
pub const GRAPHICS_MARKERS: [&str; 3] = ["plot", "hist", "barplot"];

/// Heuristic: does this code look like it draws a chart?
#[must_use]
pub fn looks_like_graphics(code: &str) -> bool {
    let lower = code.to_lowercase();
    GRAPHICS_MARKERS.iter().any(|marker| lower.contains(marker))
}
