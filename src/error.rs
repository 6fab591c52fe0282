//! Error taxonomy for loading the seat-matrix dataset.
//!
//! Everything below the ingestion boundary is folded into one of the two
//! user-visible [`LoadError`] variants. Per-candidate failures
//! ([`FetchError`]) and per-row rejections ([`RejectReason`]) never escape
//! on their own.

use std::fmt;

/// Why a single candidate location could not supply CSV text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("server answered {status}")]
    Status { status: u16 },
    #[error("could not read file: {0}")]
    Io(String),
    #[error("resource is empty")]
    Empty,
    #[error("header row could not be parsed: {0}")]
    Header(String),
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// One failed candidate and the reason it was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub location: String,
    pub error: FetchError,
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.error)
    }
}

/// User-visible load failure; both variants offer a retry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("CSV file not found at any of the expected locations ({} tried)", .attempts.len())]
    SourceNotFound { attempts: Vec<SourceAttempt> },
    #[error("no valid data found in {location} ({parsed_rows} rows parsed, {rejected_rows} rejected)")]
    EmptyDataset {
        location: String,
        parsed_rows: usize,
        rejected_rows: usize,
    },
}

impl LoadError {
    /// Short headline for the error screen
    pub fn headline(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "Seat matrix source not found",
            Self::EmptyDataset { .. } => "Seat matrix is empty",
        }
    }
}

/// Field a row was rejected for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Institute,
    Course,
    State,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Institute => write!(f, "institute"),
            Self::Course => write!(f, "course"),
            Self::State => write!(f, "state"),
        }
    }
}

/// Why a raw row was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum RejectReason {
    #[error("missing {0}")]
    MissingField(RequiredField),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_message_counts_attempts() {
        let err = LoadError::SourceNotFound {
            attempts: vec![
                SourceAttempt {
                    location: "/data/a.csv".into(),
                    error: FetchError::Status { status: 404 },
                },
                SourceAttempt {
                    location: "/data/b.csv".into(),
                    error: FetchError::Empty,
                },
            ],
        };
        assert!(err.to_string().contains("2 tried"));
        assert_eq!(err.headline(), "Seat matrix source not found");
    }

    #[test]
    fn test_reject_reason_display() {
        let reason = RejectReason::MissingField(RequiredField::Course);
        assert_eq!(reason.to_string(), "missing course");
    }
}
