//! Facet option derivation and the conjunctive record filter
//!
//! Filtering never copies or mutates records. A [`FilteredView`] is a list of
//! indices into the shared record slice of a [`SeatDataset`].

use crate::core::{Facet, FacetSelection, FilterState, SeatDataset, SeatRecord, WILDCARD};
use std::collections::BTreeSet;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Selectable values per facet, each list starting with the wildcard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub states: Vec<String>,
    pub rounds: Vec<String>,
    pub quotas: Vec<String>,
    pub categories: Vec<String>,
}

impl FacetOptions {
    /// Sorted distinct non-empty values observed for every facet
    pub fn from_records(records: &[SeatRecord]) -> Self {
        let collect = |facet: Facet| -> Vec<String> {
            let distinct: BTreeSet<&str> = records
                .iter()
                .map(|r| r.facet_value(facet))
                .filter(|v| !v.is_empty())
                .collect();
            std::iter::once(WILDCARD.to_string())
                .chain(distinct.into_iter().map(str::to_string))
                .collect()
        };

        Self {
            states: collect(Facet::State),
            rounds: collect(Facet::Round),
            quotas: collect(Facet::Quota),
            categories: collect(Facet::Category),
        }
    }

    pub fn for_facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::State => &self.states,
            Facet::Round => &self.rounds,
            Facet::Quota => &self.quotas,
            Facet::Category => &self.categories,
        }
    }

    /// Selection after moving `step` entries from the current one, wrapping
    pub fn cycle(&self, facet: Facet, current: &FacetSelection, step: isize) -> FacetSelection {
        let options = self.for_facet(facet);
        if options.is_empty() {
            return FacetSelection::All;
        }
        let pos = options
            .iter()
            .position(|o| o == current.as_str())
            .unwrap_or(0) as isize;
        let len = options.len() as isize;
        let next = (pos + step).rem_euclid(len) as usize;
        options[next].parse().unwrap_or_default()
    }
}

/// Indices of the records that satisfy a [`FilterState`]
#[derive(Debug, Clone)]
pub struct FilteredView {
    records: Arc<[SeatRecord]>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn get(&self, pos: usize) -> Option<&SeatRecord> {
        self.indices.get(pos).and_then(|&i| self.records.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatRecord> + '_ {
        self.indices.iter().filter_map(|&i| self.records.get(i))
    }

    /// Records in the half-open position range `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Vec<&SeatRecord> {
        let end = end.min(self.indices.len());
        let start = start.min(end);
        self.indices[start..end]
            .iter()
            .filter_map(|&i| self.records.get(i))
            .collect()
    }
}

/// Service applying filter predicates to a dataset
pub struct FilterService;

impl FilterService {
    /// Whether a record passes the free-text term and every facet selection
    ///
    /// The term is matched case-insensitively against institute, course and
    /// state. Facets compare exactly.
    pub fn matches(record: &SeatRecord, filters: &FilterState, needle: &str) -> bool {
        let text_ok = needle.is_empty()
            || [&record.institute, &record.course, &record.state]
                .iter()
                .any(|field| field.to_lowercase().contains(needle));

        text_ok
            && Facet::iter().all(|facet| {
                filters
                    .selection(facet)
                    .matches(record.facet_value(facet))
            })
    }

    /// Filter the dataset; pure in `(dataset, filters)`
    pub fn apply(dataset: &SeatDataset, filters: &FilterState) -> FilteredView {
        let records = dataset.shared_records();
        let needle = filters.search.to_lowercase();
        let indices = records
            .iter()
            .enumerate()
            .filter(|(_, r)| Self::matches(r, filters, &needle))
            .map(|(i, _)| i)
            .collect();
        FilteredView { records, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRow;
    use pretty_assertions::assert_eq;

    fn dataset() -> SeatDataset {
        let rows = [
            ("1", "All India", "General", "Delhi", "AIIMS New Delhi", "MD Medicine"),
            ("1", "State", "OBC", "Kerala", "GMC Kozhikode", "MS Surgery"),
            ("2", "All India", "SC", "Odisha", "AIIMS Bhubaneswar", "MD Pediatrics"),
            ("2", "Deemed", "General", "Karnataka", "KMC Manipal", "MD Radiology"),
            ("3", "State", "ST", "Kerala", "GMC Thrissur", "MS Ortho"),
        ];
        let raw: Vec<RawRow> = rows
            .iter()
            .enumerate()
            .map(|(i, (round, quota, category, state, institute, course))| {
                RawRow::from_pairs(
                    i as u64 + 2,
                    [
                        ("Round", *round),
                        ("Quota", *quota),
                        ("Category", *category),
                        ("State", *state),
                        ("Institute", *institute),
                        ("Course", *course),
                    ],
                )
            })
            .collect();
        SeatDataset::from_rows("test.csv", &raw, 0).unwrap()
    }

    #[test]
    fn test_facet_options_sorted_with_wildcard() {
        let options = FacetOptions::from_records(dataset().records());
        assert_eq!(options.states, vec!["all", "Delhi", "Karnataka", "Kerala", "Odisha"]);
        assert_eq!(options.rounds, vec!["all", "1", "2", "3"]);
        assert_eq!(options.quotas, vec!["all", "All India", "Deemed", "State"]);
    }

    #[test]
    fn test_facet_options_skip_empty_values() {
        let record = SeatRecord {
            institute: "X".into(),
            course: "Y".into(),
            state: "Z".into(),
            ..Default::default()
        };
        let options = FacetOptions::from_records(&[record]);
        assert_eq!(options.rounds, vec!["all"]);
        assert_eq!(options.categories, vec!["all"]);
    }

    #[test]
    fn test_unfiltered_is_full_set() {
        let ds = dataset();
        let view = FilterService::apply(&ds, &FilterState::default());
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let ds = dataset();
        let filters = FilterState {
            search: "AIIMS".into(),
            ..Default::default()
        };
        let view = FilterService::apply(&ds, &filters);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|r| r.institute.to_lowercase().contains("aiims")));

        let lower = FilterState {
            search: "kerala".into(),
            ..Default::default()
        };
        assert_eq!(FilterService::apply(&ds, &lower).len(), 2);
    }

    #[test]
    fn test_search_term_is_matched_verbatim() {
        let ds = dataset();
        let blank = FilterState {
            search: "   ".into(),
            ..Default::default()
        };
        assert_eq!(FilterService::apply(&ds, &blank).len(), 0);

        let padded = FilterState {
            search: " aiims ".into(),
            ..Default::default()
        };
        assert_eq!(FilterService::apply(&ds, &padded).len(), 0);

        let inner = FilterState {
            search: "aiims ".into(),
            ..Default::default()
        };
        assert_eq!(FilterService::apply(&ds, &inner).len(), 2);
    }

    #[test]
    fn test_facets_are_conjunctive_and_exact() {
        let ds = dataset();
        let mut filters = FilterState::default();
        filters.set_selection(Facet::State, FacetSelection::Value("Kerala".into()));
        filters.set_selection(Facet::Quota, FacetSelection::Value("State".into()));
        filters.set_selection(Facet::Category, FacetSelection::Value("ST".into()));

        let view = FilterService::apply(&ds, &filters);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).map(|r| r.institute.as_str()), Some("GMC Thrissur"));

        filters.set_selection(Facet::Category, FacetSelection::Value("st".into()));
        assert!(FilterService::apply(&ds, &filters).is_empty());
    }

    #[test]
    fn test_apply_is_subset_and_idempotent() {
        let ds = dataset();
        let filters = FilterState {
            search: "md".into(),
            round: FacetSelection::Value("2".into()),
            ..Default::default()
        };
        let first = FilterService::apply(&ds, &filters);
        let second = FilterService::apply(&ds, &filters);
        assert_eq!(first.indices(), second.indices());
        assert!(first.indices().iter().all(|&i| i < ds.len()));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_cycle_wraps_through_options() {
        let options = FacetOptions::from_records(dataset().records());
        let next = options.cycle(Facet::Round, &FacetSelection::All, 1);
        assert_eq!(next, FacetSelection::Value("1".into()));
        let back = options.cycle(Facet::Round, &FacetSelection::All, -1);
        assert_eq!(back, FacetSelection::Value("3".into()));
        let wrapped = options.cycle(Facet::Round, &FacetSelection::Value("3".into()), 1);
        assert_eq!(wrapped, FacetSelection::All);
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let view = FilterService::apply(&dataset(), &FilterState::default());
        assert_eq!(view.slice(3, 99).len(), 2);
        assert!(view.slice(10, 20).is_empty());
    }
}
