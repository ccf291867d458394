//! Filter, sort, and render pipeline for a read-only project catalog, plus
//! the event coordinator that drives it from user input.

pub mod coordinator;
pub mod dates;
pub mod filter;
pub mod options;
pub mod render;
pub mod sort;
pub mod surface;
pub mod view;

pub use coordinator::{
    Clock, Coordinator, CoordinatorConfig, DebounceState, ManualClock, RenderSurface,
    SearchDebounce, SystemClock, DEFAULT_DEBOUNCE,
};
pub use filter::{filter_groups, filter_projects, FilterCriteria, GroupMatch};
pub use options::{selector_options, SelectorOptions};
pub use render::{Frame, HtmlMode, HtmlRenderer, RenderError, TextRenderer, ViewRenderer};
pub use sort::{sort_groups, sort_projects};
pub use surface::RenderedSurface;
pub use view::{build_view, load_failure_view, UiState, View, ViewBody};
