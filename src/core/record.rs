//! Row normalization: raw CSV rows in, validated [`SeatRecord`]s out.
//!
//! Column headers are normalized before they are used as keys, and every
//! record field is looked up through a short alias list so that both
//! `Seats` and `SEATS` style exports load.

use crate::core::types::{CutoffRank, SeatRecord, CUTOFF_YEARS};
use crate::error::{RejectReason, RequiredField};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("static regex");
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_]").expect("static regex");
}

const ROUND: &[&str] = &["Round", "ROUND"];
const QUOTA: &[&str] = &["Quota", "QUOTA"];
const CATEGORY: &[&str] = &["Category", "CATEGORY"];
const STATE: &[&str] = &["State", "STATE"];
const INSTITUTE: &[&str] = &["Institute", "INSTITUTE"];
const COURSE: &[&str] = &["Course", "COURSE"];
const SEATS: &[&str] = &["Seats", "SEATS"];
const FEE_STIPEND: &[&str] = &["Fee_Stipend_Year_1", "FEE_STIPEND_YEAR_1"];
const BOND_YEARS: &[&str] = &["Bond_Years", "BOND_YEARS"];
const BOND_PENALTY: &[&str] = &["Bond_Penalty", "BOND_PENALTY"];
const BEDS: &[&str] = &["Beds", "BEDS"];

/// Normalize a header token into a field key
///
/// Surrounding whitespace is trimmed, inner whitespace runs collapse to a
/// single `_`, and any remaining non-word character becomes `_`.
/// `" Fee Stipend Year 1 "` becomes `Fee_Stipend_Year_1`.
pub fn normalize_header(header: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(header.trim(), "_");
    NON_WORD.replace_all(&collapsed, "_").into_owned()
}

/// A parsed CSV row keyed by normalized header, values untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line of the row in the source text
    pub line: u64,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    pub fn from_pairs<K, V>(line: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of the first alias holding non-blank text
    pub fn first_present(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn text(row: &RawRow, aliases: &[&str]) -> String {
    row.first_present(aliases)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a count cell, keeping only its digits; anything unparsable is zero
pub fn parse_count(value: &str) -> u32 {
    digits(value).parse().unwrap_or(0)
}

/// Parse a cut-off rank cell; cells without digits are [`CutoffRank::Unknown`]
pub fn parse_rank(value: &str) -> CutoffRank {
    match digits(value).parse() {
        Ok(n) => CutoffRank::Rank(n),
        Err(_) => CutoffRank::Unknown,
    }
}

fn count(row: &RawRow, aliases: &[&str]) -> u32 {
    row.first_present(aliases).map(parse_count).unwrap_or(0)
}

fn require(value: String, field: RequiredField) -> Result<String, RejectReason> {
    if value.is_empty() {
        Err(RejectReason::MissingField(field))
    } else {
        Ok(value)
    }
}

impl SeatRecord {
    /// Validate a raw row into a record
    ///
    /// Rows without an institute, course or state are rejected.
    pub fn from_raw(row: &RawRow) -> Result<Self, RejectReason> {
        let institute = require(text(row, INSTITUTE), RequiredField::Institute)?;
        let course = require(text(row, COURSE), RequiredField::Course)?;
        let state = require(text(row, STATE), RequiredField::State)?;

        let mut record = SeatRecord {
            round: text(row, ROUND),
            quota: text(row, QUOTA),
            category: text(row, CATEGORY),
            state,
            institute,
            course,
            seats: count(row, SEATS),
            fee_stipend_year_1: text(row, FEE_STIPEND),
            bond_years: count(row, BOND_YEARS),
            bond_penalty: text(row, BOND_PENALTY),
            beds: count(row, BEDS),
            ..Default::default()
        };

        for year in CUTOFF_YEARS {
            if let Some(ranks) = record.cutoffs.for_year_mut(year) {
                for (idx, rank) in ranks.iter_mut().enumerate() {
                    let key = format!("CR_{}_{}", year, idx + 1);
                    *rank = row.first_present(&[key.as_str()]).map(parse_rank).unwrap_or_default();
                }
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_row() -> RawRow {
        RawRow::from_pairs(
            2,
            [
                ("Round", "1"),
                ("Quota", " All India "),
                ("Category", "OBC"),
                ("State", "Delhi"),
                ("Institute", "AIIMS New Delhi"),
                ("Course", "MD General Medicine"),
                ("Seats", "12 seats"),
                ("Fee_Stipend_Year_1", "Rs 1,00,000"),
                ("Bond_Years", "2"),
                ("Bond_Penalty", "10 Lakh"),
                ("Beds", "2,500"),
                ("CR_2023_1", "1,204"),
                ("CR_2024_5", "n/a"),
            ],
        )
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Fee Stipend Year 1 "), "Fee_Stipend_Year_1");
        assert_eq!(normalize_header("Bond   Years"), "Bond_Years");
        assert_eq!(normalize_header("Fee/Stipend"), "Fee_Stipend");
        assert_eq!(normalize_header("CR 2023 1"), "CR_2023_1");
        assert_eq!(normalize_header("SEATS"), "SEATS");
    }

    #[test]
    fn test_from_raw_full_row() {
        let record = SeatRecord::from_raw(&full_row()).unwrap();

        assert_eq!(record.quota, "All India");
        assert_eq!(record.institute, "AIIMS New Delhi");
        assert_eq!(record.seats, 12);
        assert_eq!(record.beds, 2500);
        assert_eq!(record.bond_years, 2);
        assert_eq!(record.fee_stipend_year_1, "Rs 1,00,000");
        assert_eq!(record.cutoffs.year_2023[0], CutoffRank::Rank(1204));
        assert_eq!(record.cutoffs.year_2023[1], CutoffRank::Unknown);
        assert_eq!(record.cutoffs.year_2024[4], CutoffRank::Unknown);
    }

    #[test]
    fn test_uppercase_aliases() {
        let row = RawRow::from_pairs(
            3,
            [
                ("INSTITUTE", "GMC"),
                ("COURSE", "MS Ortho"),
                ("STATE", "Kerala"),
                ("SEATS", "4"),
                ("BEDS", "x"),
            ],
        );
        let record = SeatRecord::from_raw(&row).unwrap();
        assert_eq!(record.institute, "GMC");
        assert_eq!(record.seats, 4);
        assert_eq!(record.beds, 0);
    }

    #[test]
    fn test_blank_alias_falls_through() {
        let row = RawRow::from_pairs(
            4,
            [
                ("Institute", "  "),
                ("INSTITUTE", "GMC"),
                ("Course", "MD"),
                ("State", "Goa"),
            ],
        );
        assert_eq!(SeatRecord::from_raw(&row).unwrap().institute, "GMC");
    }

    #[test]
    fn test_missing_identity_fields_rejected() {
        let no_course = RawRow::from_pairs(
            5,
            [("Institute", "GMC"), ("Course", ""), ("State", "Goa"), ("Seats", "9")],
        );
        assert_eq!(
            SeatRecord::from_raw(&no_course),
            Err(RejectReason::MissingField(RequiredField::Course))
        );

        let no_state = RawRow::from_pairs(6, [("Institute", "GMC"), ("Course", "MD")]);
        assert_eq!(
            SeatRecord::from_raw(&no_state),
            Err(RejectReason::MissingField(RequiredField::State))
        );
    }

    #[test]
    fn test_parse_count_edge_cases() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-7"), 7);
        assert_eq!(parse_count("99999999999999"), 0);
        assert_eq!(parse_rank(" 15 "), CutoffRank::Rank(15));
    }
}
