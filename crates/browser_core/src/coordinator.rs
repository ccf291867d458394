//! Event coordinator: turns user input into Filter -> Sort -> Render runs.
//!
//! Only the search field is debounced. The debounce is an explicit two-state
//! machine driven by an injectable [`Clock`], so callers decide when time
//! passes (`poll`) and tests never sleep.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use shared::{
    domain::{Catalog, Selector, SortKey},
    error::LoadFailure,
};
use source::{load_catalog, ProjectSource};
use tracing::{debug, info};

use crate::{
    options::{selector_options, SelectorOptions},
    render::Frame,
    view::{build_view, load_failure_view, UiState, View},
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub trait Clock {
    /// Monotonic time for the debounce timer.
    fn now(&self) -> Instant;
    /// Wall-clock time for relative dates.
    fn wall_time(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    wall_origin: DateTime<Utc>,
    elapsed_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(wall_origin: DateTime<Utc>) -> Self {
        Self {
            origin: Instant::now(),
            wall_origin,
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(millis, Ordering::SeqCst);
    }

    fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn wall_time(&self) -> DateTime<Utc> {
        let elapsed =
            chrono::Duration::from_std(self.elapsed()).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall_origin + elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    PendingSearch { deadline: Instant },
}

/// Single outstanding timer: every keystroke replaces the deadline.
#[derive(Debug, Clone)]
pub struct SearchDebounce {
    delay: Duration,
    state: DebounceState,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::PendingSearch { deadline } => Some(deadline),
        }
    }

    pub fn keystroke(&mut self, now: Instant) {
        self.state = DebounceState::PendingSearch {
            deadline: now + self.delay,
        };
    }

    /// Returns to `Idle` and reports `true` when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::PendingSearch { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drops any pending timer; reports whether one was armed.
    pub fn cancel(&mut self) -> bool {
        let was_pending = matches!(self.state, DebounceState::PendingSearch { .. });
        self.state = DebounceState::Idle;
        was_pending
    }
}

/// The rendering collaborator the coordinator drives.
pub trait RenderSurface {
    /// Called once after a successful load, before the first render.
    fn populate_options(&mut self, _options: &SelectorOptions) {}
    fn present(&mut self, frame: &Frame<'_>);
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub debounce: Duration,
    pub initial: UiState,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            initial: UiState::default(),
        }
    }
}

#[derive(Debug)]
enum Session {
    Ready {
        catalog: Catalog,
        options: SelectorOptions,
    },
    Failed(LoadFailure),
}

pub struct Coordinator<S, C> {
    session: Session,
    ui: UiState,
    debounce: SearchDebounce,
    surface: S,
    clock: C,
    renders: u64,
}

impl<S: RenderSurface, C: Clock> Coordinator<S, C> {
    /// Performs the session's single load, then the initial render (or the
    /// load-failure placeholder).
    pub async fn start(
        source: &dyn ProjectSource,
        surface: S,
        clock: C,
        config: CoordinatorConfig,
    ) -> Self {
        match load_catalog(source).await {
            Ok(loaded) => Self::with_catalog(loaded.catalog, surface, clock, config),
            Err(failure) => Self::failed(failure, surface, clock, config),
        }
    }

    pub fn with_catalog(catalog: Catalog, surface: S, clock: C, config: CoordinatorConfig) -> Self {
        let options = selector_options(&catalog);
        let mut coordinator = Self {
            session: Session::Ready { catalog, options },
            ui: config.initial,
            debounce: SearchDebounce::new(config.debounce),
            surface,
            clock,
            renders: 0,
        };
        if let Session::Ready { options, .. } = &coordinator.session {
            coordinator.surface.populate_options(options);
        }
        coordinator.refresh();
        coordinator
    }

    pub fn failed(failure: LoadFailure, surface: S, clock: C, config: CoordinatorConfig) -> Self {
        let mut coordinator = Self {
            session: Session::Failed(failure),
            ui: config.initial,
            debounce: SearchDebounce::new(config.debounce),
            surface,
            clock,
            renders: 0,
        };
        coordinator.refresh();
        coordinator
    }

    pub fn on_search_input(&mut self, text: &str) {
        if self.is_failed() {
            return;
        }
        self.ui.criteria.query = text.to_string();
        self.debounce.keystroke(self.clock.now());
    }

    pub fn on_category_change(&mut self, value: &str) {
        if self.is_failed() {
            return;
        }
        self.ui.criteria.category = Selector::from_value(value);
        self.run_now("category");
    }

    pub fn on_technology_change(&mut self, value: &str) {
        if self.is_failed() {
            return;
        }
        self.ui.criteria.technology = Selector::from_value(value);
        self.run_now("technology");
    }

    /// Unknown keys are kept as "no ordering" rather than rejected.
    pub fn on_sort_change(&mut self, value: &str) {
        if self.is_failed() {
            return;
        }
        self.ui.sort = SortKey::parse(value);
        if self.ui.sort.is_none() {
            debug!(sort = value, "unrecognized sort key; keeping current order");
        }
        self.run_now("sort");
    }

    /// Flips a group's expanded flag. Unknown names and flat catalogs are
    /// ignored.
    pub fn on_toggle_group(&mut self, name: &str) -> bool {
        let Session::Ready { catalog, .. } = &self.session else {
            return false;
        };
        let Catalog::Grouped(groups) = catalog else {
            return false;
        };
        if !groups.iter().any(|g| g.name == name) {
            return false;
        }
        let expanded = self.ui.toggle_group(name);
        debug!(group = name, expanded, "toggled group");
        self.refresh();
        true
    }

    /// Runs a pending search whose timer has expired.
    pub fn poll(&mut self) -> bool {
        if self.debounce.fire_if_due(self.clock.now()) {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Runs a pending search immediately.
    pub fn flush(&mut self) -> bool {
        if self.debounce.cancel() {
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debounce.state()
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    pub fn load_failure(&self) -> Option<&LoadFailure> {
        match &self.session {
            Session::Failed(failure) => Some(failure),
            Session::Ready { .. } => None,
        }
    }

    pub fn options(&self) -> Option<&SelectorOptions> {
        match &self.session {
            Session::Ready { options, .. } => Some(options),
            Session::Failed(_) => None,
        }
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Builds the current view without presenting it.
    pub fn current_view(&self) -> View {
        match &self.session {
            Session::Ready { catalog, .. } => build_view(catalog, &self.ui, self.clock.wall_time()),
            Session::Failed(failure) => load_failure_view(failure),
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self.session, Session::Failed(_))
    }

    fn run_now(&mut self, trigger: &'static str) {
        // Applies any typed-but-unfired query in this same run.
        self.debounce.cancel();
        debug!(trigger, "immediate refresh");
        self.refresh();
    }

    fn refresh(&mut self) {
        let view = self.current_view();
        let empty = SelectorOptions::default();
        let options = match &self.session {
            Session::Ready { options, .. } => options,
            Session::Failed(_) => &empty,
        };
        self.surface.present(&Frame {
            view: &view,
            ui: &self.ui,
            options,
        });
        self.renders += 1;
        if self.renders == 1 {
            info!(count = view.count, "initial render");
        }
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
