use crate::core::record::RawRow;
use crate::core::types::SeatRecord;
use crate::error::{LoadError, RejectReason};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Aggregate outcome of normalizing one parsed CSV
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub parsed_rows: usize,
    pub admitted_rows: usize,
    pub rejected: HashMap<RejectReason, usize>,
    /// Malformed lines the parser excluded before normalization
    pub parse_warnings: usize,
}

impl NormalizeStats {
    pub fn rejected_rows(&self) -> usize {
        self.rejected.values().sum()
    }

    /// Rows present in the source that did not make it into the dataset
    pub fn skipped_rows(&self) -> usize {
        self.rejected_rows() + self.parse_warnings
    }
}

/// The admitted seat-matrix records of one successful load
///
/// Records are shared read-only; cloning a dataset is cheap.
#[derive(Debug, Clone)]
pub struct SeatDataset {
    records: Arc<[SeatRecord]>,
    /// Location the CSV text was read from
    pub source: String,
    pub stats: NormalizeStats,
}

impl SeatDataset {
    /// Normalize parsed rows into a dataset
    ///
    /// Rejected rows are dropped and only counted. A result with no admitted
    /// rows is reported as [`LoadError::EmptyDataset`].
    pub fn from_rows(
        source: impl Into<String>,
        rows: &[RawRow],
        parse_warnings: usize,
    ) -> Result<Self, LoadError> {
        let source = source.into();
        let mut stats = NormalizeStats {
            parsed_rows: rows.len(),
            parse_warnings,
            ..Default::default()
        };

        let records: Vec<SeatRecord> = rows
            .iter()
            .filter_map(|row| match SeatRecord::from_raw(row) {
                Ok(record) => Some(record),
                Err(reason) => {
                    debug!("Skipping line {}: {}", row.line, reason);
                    *stats.rejected.entry(reason).or_default() += 1;
                    None
                }
            })
            .collect();
        stats.admitted_rows = records.len();

        if stats.rejected_rows() > 0 {
            warn!(
                "Dropped {} of {} rows from {} ({:?})",
                stats.rejected_rows(),
                stats.parsed_rows,
                source,
                stats.rejected
            );
        }

        if records.is_empty() {
            return Err(LoadError::EmptyDataset {
                location: source,
                parsed_rows: stats.parsed_rows,
                rejected_rows: stats.rejected_rows(),
            });
        }

        info!("Processed {} valid records from {}", records.len(), source);
        Ok(Self {
            records: records.into(),
            source,
            stats,
        })
    }

    pub fn records(&self) -> &[SeatRecord] {
        &self.records
    }

    pub fn shared_records(&self) -> Arc<[SeatRecord]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequiredField;

    fn row(line: u64, institute: &str, course: &str, state: &str) -> RawRow {
        RawRow::from_pairs(
            line,
            [("Institute", institute), ("Course", course), ("State", state)],
        )
    }

    #[test]
    fn test_from_rows_counts_rejections() {
        let rows = vec![
            row(2, "AIIMS", "MD", "Delhi"),
            row(3, "GMC", "", "Goa"),
            row(4, "", "MS", "Goa"),
            row(5, "JIPMER", "MD", "Puducherry"),
        ];

        let dataset = SeatDataset::from_rows("/data/Seat_Matric.csv", &rows, 1).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.stats.parsed_rows, 4);
        assert_eq!(dataset.stats.rejected_rows(), 2);
        assert_eq!(dataset.stats.skipped_rows(), 3);
        assert_eq!(
            dataset.stats.rejected[&RejectReason::MissingField(RequiredField::Course)],
            1
        );
        assert!(dataset.records().iter().all(|r| !r.course.is_empty()));
    }

    #[test]
    fn test_all_rows_rejected_is_empty_dataset() {
        let rows = vec![row(2, "GMC", "MD", ""), row(3, "", "", "")];
        let err = SeatDataset::from_rows("seats.csv", &rows, 0).unwrap_err();
        assert_eq!(
            err,
            LoadError::EmptyDataset {
                location: "seats.csv".to_string(),
                parsed_rows: 2,
                rejected_rows: 2,
            }
        );
    }

    #[test]
    fn test_no_rows_is_empty_dataset() {
        let err = SeatDataset::from_rows("seats.csv", &[], 3).unwrap_err();
        assert!(matches!(err, LoadError::EmptyDataset { parsed_rows: 0, .. }));
    }
}
