//! Page-level controller for the seat-matrix pipeline
//!
//! [`Session`] is the single owner of the load state machine, the current
//! [`FilterState`] and [`PageState`]. Render code only ever sees a borrowed
//! [`SessionView`] snapshot.
//!
//! ```text
//! Idle -> Loading -> Error(LoadError)
//!                 -> Ready
//! ```
//!
//! `Error` stays put until a reload re-enters `Loading`. In `Ready`, filter
//! changes recompute the view and reset to page 1; page changes only move
//! the slice.

use crate::core::{Facet, FacetSelection, FilterState, PageState, SeatDataset, SeatRecord};
use crate::error::LoadError;
use crate::services::{FacetOptions, FilterService, FilteredView, Page, Paginator};
use tracing::{debug, info};

/// Where the pipeline currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        /// Candidate currently being fetched, once known
        attempting: Option<String>,
    },
    Error(LoadError),
    Ready,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Error(_) => "error",
            Self::Ready => "ready",
        }
    }
}

/// Immutable snapshot handed to render components
#[derive(Debug)]
pub struct SessionView<'a> {
    pub phase: &'a Phase,
    pub filters: &'a FilterState,
    pub facets: &'a FacetOptions,
    pub page: Page,
    pub rows: Vec<&'a SeatRecord>,
    pub total_records: usize,
    pub filtered_records: usize,
    pub skipped_rows: usize,
    pub source: Option<&'a str>,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    generation: u64,
    dataset: Option<SeatDataset>,
    facets: FacetOptions,
    filters: FilterState,
    page: PageState,
    view: Option<FilteredView>,
}

impl Session {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            dataset: None,
            facets: FacetOptions::default(),
            filters: FilterState::default(),
            page: PageState::new(page_size),
            view: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn dataset(&self) -> Option<&SeatDataset> {
        self.dataset.as_ref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    /// Enter `Loading` and return the generation the result must carry
    ///
    /// Allowed from every phase; any load still in flight is superseded and
    /// its result will be ignored.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading { attempting: None };
        self.dataset = None;
        self.view = None;
        self.facets = FacetOptions::default();
        info!("Starting load {}", self.generation);
        self.generation
    }

    /// Record which candidate load `generation` is trying
    pub fn note_attempt(&mut self, generation: u64, candidate: &str) {
        if generation != self.generation {
            return;
        }
        if let Phase::Loading { attempting } = &mut self.phase {
            *attempting = Some(candidate.to_string());
        }
    }

    /// Apply the outcome of load `generation`
    ///
    /// Returns false when the outcome belongs to a superseded load and was
    /// discarded.
    pub fn finish_load(&mut self, generation: u64, result: Result<SeatDataset, LoadError>) -> bool {
        if generation != self.generation || !self.is_loading() {
            debug!(
                "Discarding stale load {} (current {})",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(dataset) => {
                info!(
                    "Load {} ready: {} records from {}",
                    generation,
                    dataset.len(),
                    dataset.source
                );
                self.facets = FacetOptions::from_records(dataset.records());
                self.filters = FilterState::default();
                self.page.reset();
                self.dataset = Some(dataset);
                self.phase = Phase::Ready;
                self.refilter();
            }
            Err(e) => {
                self.phase = Phase::Error(e);
            }
        }
        true
    }

    fn refilter(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| FilterService::apply(ds, &self.filters));
        self.page.reset();
        debug!(
            "Filter recomputed: {} of {} records",
            self.filtered_len(),
            self.dataset.as_ref().map_or(0, SeatDataset::len)
        );
    }

    /// Replace the whole predicate; recomputes the view and resets the page
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refilter();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search == self.filters.search {
            return;
        }
        self.filters.search = search;
        self.refilter();
    }

    pub fn set_facet(&mut self, facet: Facet, selection: FacetSelection) {
        self.filters.set_selection(facet, selection);
        self.refilter();
    }

    /// Step a facet through its options, wrapping at either end
    pub fn cycle_facet(&mut self, facet: Facet, step: isize) {
        let next = self
            .facets
            .cycle(facet, self.filters.selection(facet), step);
        self.set_facet(facet, next);
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.set_facet(facet, FacetSelection::All);
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(FilterState::default());
    }

    pub fn filtered_len(&self) -> usize {
        self.view.as_ref().map_or(0, FilteredView::len)
    }

    fn paginator(&self) -> Paginator {
        Paginator::new(self.filtered_len(), self.page.page_size)
    }

    pub fn current_page(&self) -> Page {
        self.paginator().page(self.page.page)
    }

    /// Move to `page`, clamped into the valid range
    pub fn set_page(&mut self, page: usize) {
        self.page.page = self.paginator().clamp(page);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.paginator().total_pages());
    }

    /// Record at `offset` within the current page
    pub fn record_on_page(&self, offset: usize) -> Option<&SeatRecord> {
        let page = self.current_page();
        let pos = page.range.start.checked_add(offset)?;
        if pos >= page.range.end {
            return None;
        }
        self.view.as_ref()?.get(pos)
    }

    pub fn snapshot(&self) -> SessionView<'_> {
        let page = self.current_page();
        let rows = self
            .view
            .as_ref()
            .map(|v| v.slice(page.range.start, page.range.end))
            .unwrap_or_default();
        SessionView {
            phase: &self.phase,
            filters: &self.filters,
            facets: &self.facets,
            page,
            rows,
            total_records: self.dataset.as_ref().map_or(0, SeatDataset::len),
            filtered_records: self.filtered_len(),
            skipped_rows: self
                .dataset
                .as_ref()
                .map_or(0, |ds| ds.stats.skipped_rows()),
            source: self.dataset.as_ref().map(|ds| ds.source.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRow;
    use pretty_assertions::assert_eq;

    fn dataset(n: usize) -> SeatDataset {
        let rows: Vec<RawRow> = (0..n)
            .map(|i| {
                let state = if i % 2 == 0 { "Delhi" } else { "Kerala" };
                let institute = format!("Institute {i}");
                RawRow::from_pairs(
                    i as u64 + 2,
                    [
                        ("Institute", institute.as_str()),
                        ("Course", "MD"),
                        ("State", state),
                        ("Round", "1"),
                    ],
                )
            })
            .collect();
        SeatDataset::from_rows("mem.csv", &rows, 0).unwrap()
    }

    fn ready_session(n: usize) -> Session {
        let mut session = Session::new(50);
        let generation = session.begin_load();
        assert!(session.finish_load(generation, Ok(dataset(n))));
        session
    }

    #[test]
    fn test_idle_loading_ready() {
        let mut session = Session::new(50);
        assert_eq!(session.phase(), &Phase::Idle);

        let generation = session.begin_load();
        session.note_attempt(generation, "/data/Seat_Matric.csv");
        assert_eq!(
            session.phase(),
            &Phase::Loading {
                attempting: Some("/data/Seat_Matric.csv".into())
            }
        );

        assert!(session.finish_load(generation, Ok(dataset(3))));
        assert!(session.is_ready());
        assert_eq!(session.snapshot().total_records, 3);
        assert_eq!(session.facets().states, vec!["all", "Delhi", "Kerala"]);
    }

    #[test]
    fn test_error_is_terminal_until_reload() {
        let mut session = Session::new(50);
        let generation = session.begin_load();
        session.finish_load(generation, Err(LoadError::SourceNotFound { attempts: vec![] }));
        assert!(matches!(session.phase(), Phase::Error(_)));

        // A late duplicate of the same outcome changes nothing
        assert!(!session.finish_load(generation, Ok(dataset(2))));
        assert!(matches!(session.phase(), Phase::Error(_)));

        let retry = session.begin_load();
        assert!(session.finish_load(retry, Ok(dataset(2))));
        assert!(session.is_ready());
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut session = Session::new(50);
        let first = session.begin_load();
        let second = session.begin_load();

        assert!(!session.finish_load(first, Ok(dataset(5))));
        assert!(session.is_loading());
        session.note_attempt(first, "/stale.csv");
        assert_eq!(session.phase(), &Phase::Loading { attempting: None });

        assert!(session.finish_load(second, Ok(dataset(1))));
        assert_eq!(session.snapshot().total_records, 1);
    }

    #[test]
    fn test_120_rows_pages() {
        let mut session = ready_session(120);
        assert_eq!(session.snapshot().rows.len(), 50);
        session.next_page();
        assert_eq!(session.current_page().number, 2);
        session.next_page();
        let view = session.snapshot();
        assert_eq!(view.rows.len(), 20);
        assert_eq!(view.page.summary(), "Showing 101 to 120 of 120 results");

        session.set_page(4);
        assert_eq!(session.current_page().number, 3);
        session.first_page();
        session.prev_page();
        assert_eq!(session.current_page().number, 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut session = ready_session(120);
        session.last_page();
        assert_eq!(session.current_page().number, 3);

        session.set_facet(Facet::State, FacetSelection::Value("Kerala".into()));
        assert_eq!(session.current_page().number, 1);
        assert_eq!(session.filtered_len(), 60);
        assert!(session.snapshot().rows.iter().all(|r| r.state == "Kerala"));

        session.next_page();
        session.set_search("institute 1");
        assert_eq!(session.current_page().number, 1);

        session.clear_filters();
        assert_eq!(session.filtered_len(), 120);
        assert!(session.filters().is_unfiltered());
    }

    #[test]
    fn test_cycle_and_clear_facet() {
        let mut session = ready_session(4);
        session.cycle_facet(Facet::State, 1);
        assert_eq!(session.filters().state, FacetSelection::Value("Delhi".into()));
        session.clear_facet(Facet::State);
        assert!(session.filters().state.is_all());
    }

    #[test]
    fn test_empty_filter_result() {
        let mut session = ready_session(10);
        session.set_search("no such thing");
        let view = session.snapshot();
        assert!(view.rows.is_empty());
        assert_eq!(view.page.number, 1);
        assert_eq!(view.filtered_records, 0);
        assert!(session.record_on_page(0).is_none());
    }

    #[test]
    fn test_record_on_page() {
        let mut session = ready_session(60);
        session.next_page();
        assert_eq!(
            session.record_on_page(0).map(|r| r.institute.as_str()),
            Some("Institute 50")
        );
        assert!(session.record_on_page(10).is_none());
    }
}
