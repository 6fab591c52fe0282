use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter};

/// Wildcard facet value meaning "do not constrain this facet"
pub const WILDCARD: &str = "all";

/// Years for which historical cut-off ranks are published
pub const CUTOFF_YEARS: [u16; 2] = [2023, 2024];

/// Number of rank positions recorded per cut-off year
pub const CUTOFF_POSITIONS: usize = 5;

/// Historical closing rank for one year/position pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CutoffRank {
    /// Cell was absent or held no digits
    #[default]
    Unknown,
    Rank(u32),
}

impl CutoffRank {
    /// Numeric value of the rank; unknown ranks read as zero
    pub fn value(&self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Rank(n) => *n,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Rank(_))
    }
}

impl fmt::Display for CutoffRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown | Self::Rank(0) => write!(f, "-"),
            Self::Rank(n) => write!(f, "{}", n),
        }
    }
}

/// Cut-off ranks for every tracked year, positions 1..=5
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffHistory {
    pub year_2023: [CutoffRank; CUTOFF_POSITIONS],
    pub year_2024: [CutoffRank; CUTOFF_POSITIONS],
}

impl CutoffHistory {
    pub fn for_year(&self, year: u16) -> Option<&[CutoffRank; CUTOFF_POSITIONS]> {
        match year {
            2023 => Some(&self.year_2023),
            2024 => Some(&self.year_2024),
            _ => None,
        }
    }

    pub fn for_year_mut(&mut self, year: u16) -> Option<&mut [CutoffRank; CUTOFF_POSITIONS]> {
        match year {
            2023 => Some(&mut self.year_2023),
            2024 => Some(&mut self.year_2024),
            _ => None,
        }
    }

    /// Iterate as (year, 1-based position, rank)
    pub fn iter(&self) -> impl Iterator<Item = (u16, usize, CutoffRank)> + '_ {
        CUTOFF_YEARS.iter().flat_map(move |&year| {
            self.for_year(year)
                .into_iter()
                .flat_map(move |ranks| ranks.iter().enumerate().map(move |(i, r)| (year, i + 1, *r)))
        })
    }
}

/// One row of the seat-matrix dataset
///
/// Records are only ever built by the row normalizer and are immutable once
/// admitted into a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub round: String,
    pub quota: String,
    pub category: String,
    pub state: String,
    pub institute: String,
    pub course: String,
    pub seats: u32,
    pub fee_stipend_year_1: String,
    pub bond_years: u32,
    pub bond_penalty: String,
    pub beds: u32,
    pub cutoffs: CutoffHistory,
}

impl SeatRecord {
    /// Value of the given facet field
    pub fn facet_value(&self, facet: Facet) -> &str {
        match facet {
            Facet::State => &self.state,
            Facet::Round => &self.round,
            Facet::Quota => &self.quota,
            Facet::Category => &self.category,
        }
    }
}

/// The four fields the dataset can be narrowed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Facet {
    State,
    Round,
    Quota,
    Category,
}

impl Facet {
    /// Label shown for the wildcard entry of this facet
    pub fn all_label(&self) -> &'static str {
        match self {
            Self::State => "All States",
            Self::Round => "All Rounds",
            Self::Quota => "All Quotas",
            Self::Category => "All Categories",
        }
    }

    /// Label shown for a concrete option (rounds read "Round 2")
    pub fn option_label(&self, value: &str) -> String {
        if value == WILDCARD {
            return self.all_label().to_string();
        }
        match self {
            Self::Round => format!("Round {}", value),
            _ => value.to_string(),
        }
    }
}

/// Selected value for a single facet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FacetSelection {
    #[default]
    All,
    Value(String),
}

impl FacetSelection {
    /// Exact, case-sensitive match; `All` matches everything
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => WILDCARD,
            Self::Value(v) => v,
        }
    }
}

impl FromStr for FacetSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WILDCARD {
            Ok(Self::All)
        } else if s.is_empty() {
            Err("facet value cannot be empty".to_string())
        } else {
            Ok(Self::Value(s.to_string()))
        }
    }
}

/// Current user-selected predicate over the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub state: FacetSelection,
    pub round: FacetSelection,
    pub quota: FacetSelection,
    pub category: FacetSelection,
}

impl FilterState {
    pub fn selection(&self, facet: Facet) -> &FacetSelection {
        match facet {
            Facet::State => &self.state,
            Facet::Round => &self.round,
            Facet::Quota => &self.quota,
            Facet::Category => &self.category,
        }
    }

    pub fn set_selection(&mut self, facet: Facet, selection: FacetSelection) {
        match facet {
            Facet::State => self.state = selection,
            Facet::Round => self.round = selection,
            Facet::Quota => self.quota = selection,
            Facet::Category => self.category = selection,
        }
    }

    /// True when nothing narrows the dataset
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.state.is_all()
            && self.round.is_all()
            && self.quota.is_all()
            && self.category.is_all()
    }

    /// Facets holding a concrete value, in display order
    pub fn active_facets(&self) -> Vec<(Facet, &str)> {
        use strum::IntoEnumIterator;
        Facet::iter()
            .filter_map(|facet| match self.selection(facet) {
                FacetSelection::All => None,
                FacetSelection::Value(v) => Some((facet, v.as_str())),
            })
            .collect()
    }
}

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Current page (1-indexed) and fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_cutoff_rank_display() {
        assert_eq!(CutoffRank::Rank(1234).to_string(), "1234");
        assert_eq!(CutoffRank::Unknown.to_string(), "-");
        assert_eq!(CutoffRank::Rank(0).to_string(), "-");
        assert_eq!(CutoffRank::Unknown.value(), 0);
        assert!(!CutoffRank::Unknown.is_known());
    }

    #[test]
    fn test_cutoff_history_iter_order() {
        let mut history = CutoffHistory::default();
        history.year_2024[4] = CutoffRank::Rank(99);

        let entries: Vec<_> = history.iter().collect();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0], (2023, 1, CutoffRank::Unknown));
        assert_eq!(entries[9], (2024, 5, CutoffRank::Rank(99)));
        assert!(history.for_year(2022).is_none());
    }

    #[test]
    fn test_facet_labels() {
        assert_eq!(Facet::Round.option_label("2"), "Round 2");
        assert_eq!(Facet::State.option_label("Kerala"), "Kerala");
        assert_eq!(Facet::Category.option_label(WILDCARD), "All Categories");
        assert_eq!(Facet::iter().count(), 4);
    }

    #[test]
    fn test_facet_selection_parsing() {
        assert_eq!(FacetSelection::from_str("all").unwrap(), FacetSelection::All);
        assert_eq!(
            FacetSelection::from_str("OBC").unwrap(),
            FacetSelection::Value("OBC".to_string())
        );
        assert!(FacetSelection::from_str("").is_err());
        // Facet matching is case-sensitive
        assert!(!FacetSelection::Value("OBC".into()).matches("obc"));
    }

    #[test]
    fn test_filter_state_active_facets() {
        let mut filters = FilterState::default();
        assert!(filters.is_unfiltered());

        filters.set_selection(Facet::Quota, FacetSelection::Value("All India".into()));
        filters.set_selection(Facet::State, FacetSelection::Value("Delhi".into()));

        let active = filters.active_facets();
        assert_eq!(active, vec![(Facet::State, "Delhi"), (Facet::Quota, "All India")]);
        assert!(!filters.is_unfiltered());
    }

    #[test]
    fn test_page_state_never_zero_sized() {
        let state = PageState::new(0);
        assert_eq!(state.page_size, 1);
        assert_eq!(state.page, 1);
    }
}
