//! CSV ingestion with ordered candidate fallback
//!
//! Candidates are tried one at a time, in priority order. The first one that
//! yields a non-empty body with a readable header row wins and no further
//! candidate is touched. Only when every candidate has failed does loading
//! fail with [`LoadError::SourceNotFound`].

use crate::core::{normalize_header, RawRow, SeatDataset};
use crate::error::{FetchError, LoadError, SourceAttempt};
use reqwest::blocking::Client as HttpClient;
use reqwest::Url;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Resolved location of one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(Url),
    File(PathBuf),
}

impl SourceLocation {
    /// Resolve a candidate against an optional base
    ///
    /// Absolute `http(s)://` and `file://` candidates are taken as-is. Against
    /// an `http(s)` base the candidate is joined like a browser would join a
    /// link; against any other base it is treated as a path below that
    /// directory.
    pub fn resolve(base: Option<&str>, candidate: &str) -> Result<Self, FetchError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(FetchError::InvalidLocation("empty candidate".to_string()));
        }
        if let Some(location) = Self::parse_absolute(candidate)? {
            return Ok(location);
        }

        match base.map(str::trim).filter(|b| !b.is_empty()) {
            Some(base) if is_http(base) => {
                let base_url = Url::parse(base)
                    .map_err(|e| FetchError::InvalidLocation(format!("{base}: {e}")))?;
                base_url
                    .join(candidate)
                    .map(Self::Url)
                    .map_err(|e| FetchError::InvalidLocation(format!("{candidate}: {e}")))
            }
            Some(base) => Ok(Self::File(
                PathBuf::from(base).join(candidate.trim_start_matches('/')),
            )),
            None => Ok(Self::File(PathBuf::from(candidate))),
        }
    }

    fn parse_absolute(candidate: &str) -> Result<Option<Self>, FetchError> {
        if is_http(candidate) {
            return Url::parse(candidate)
                .map(|url| Some(Self::Url(url)))
                .map_err(|e| FetchError::InvalidLocation(format!("{candidate}: {e}")));
        }
        if candidate.starts_with("file://") {
            let url = Url::parse(candidate)
                .map_err(|e| FetchError::InvalidLocation(format!("{candidate}: {e}")))?;
            return url
                .to_file_path()
                .map(|p| Some(Self::File(p)))
                .map_err(|_| FetchError::InvalidLocation(candidate.to_string()));
        }
        Ok(None)
    }
}

fn is_http(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Retrieves the raw bytes behind a [`SourceLocation`]
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, FetchError>;
}

/// Fetches URLs over HTTP and paths from the local filesystem
pub struct DefaultFetcher {
    http: HttpClient,
}

impl DefaultFetcher {
    pub fn new(timeout: Option<Duration>) -> color_eyre::Result<Self> {
        let mut builder = HttpClient::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        // reqwest's blocking client defaults to a 30s timeout; None disables it
        builder = builder.timeout(timeout);
        Ok(Self {
            http: builder.build()?,
        })
    }
}

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<Vec<u8>, FetchError> {
        match location {
            SourceLocation::Url(url) => {
                let response = self
                    .http
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "text/csv")
                    .send()
                    .map_err(|e| FetchError::Http(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                    });
                }
                response
                    .bytes()
                    .map(|b| b.to_vec())
                    .map_err(|e| FetchError::Http(e.to_string()))
            }
            SourceLocation::File(path) => {
                std::fs::read(path).map_err(|e| FetchError::Io(e.to_string()))
            }
        }
    }
}

/// A malformed CSV line that was excluded from the parse result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: u64,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Rows parsed from one CSV body
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    /// Normalized, de-duplicated header keys
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub warnings: Vec<ParseWarning>,
}

/// Decode a fetched body as UTF-8, dropping a leading BOM
pub fn decode_body(bytes: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        warn!("Body contained invalid UTF-8; replaced offending bytes");
    }
    text
}

/// Give repeated header keys a numeric suffix (`Seats`, `Seats_1`, ...)
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let count = seen.entry(h.clone()).or_insert(0);
            let key = if *count == 0 {
                h.clone()
            } else {
                format!("{}_{}", h, count)
            };
            *count += 1;
            key
        })
        .collect()
}

/// Parse comma-delimited text whose first line is the header row
///
/// Lines whose field count does not match the header are reported as
/// warnings and left out. Fails only when no header row can be read.
pub fn parse_csv(text: &str) -> Result<ParsedCsv, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(b',')
        .from_reader(text.as_bytes());

    let raw_headers = reader
        .headers()
        .map_err(|e| FetchError::Header(e.to_string()))?
        .clone();
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(FetchError::Header("no column names".to_string()));
    }
    let headers = dedupe_headers(raw_headers.iter().map(normalize_header).collect());

    let mut parsed = ParsedCsv {
        headers,
        ..Default::default()
    };

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                if record.len() != parsed.headers.len() {
                    parsed.warnings.push(ParseWarning {
                        line,
                        message: format!(
                            "expected {} fields, found {}",
                            parsed.headers.len(),
                            record.len()
                        ),
                    });
                    continue;
                }
                let fields = parsed
                    .headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                parsed.rows.push(RawRow::new(line, fields));
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                parsed.warnings.push(ParseWarning {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(parsed)
}

/// Loads the seat-matrix dataset from the first usable candidate
#[derive(Clone)]
pub struct IngestService {
    fetcher: Arc<dyn SourceFetcher>,
    base: Option<String>,
}

impl IngestService {
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            fetcher,
            base: None,
        }
    }

    /// Resolve relative candidates against this URL or directory
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Fetch and parse a single candidate
    fn try_candidate(&self, candidate: &str) -> Result<(SourceLocation, ParsedCsv), SourceAttempt> {
        let fail = |error: FetchError| SourceAttempt {
            location: candidate.to_string(),
            error,
        };

        let location = SourceLocation::resolve(self.base(), candidate).map_err(fail)?;
        info!("Trying to fetch CSV from: {}", location);
        let bytes = self.fetcher.fetch(&location).map_err(fail)?;
        let text = decode_body(&bytes);
        if text.trim().is_empty() {
            return Err(fail(FetchError::Empty));
        }
        info!("Loaded CSV from {} ({} characters)", location, text.len());
        let parsed = parse_csv(&text).map_err(fail)?;
        Ok((location, parsed))
    }

    /// Walk the candidates in order and stop at the first that parses
    ///
    /// `progress` is told about every candidate before it is attempted.
    pub fn fetch_first(
        &self,
        candidates: &[String],
        mut progress: impl FnMut(&str),
    ) -> Result<(SourceLocation, ParsedCsv), LoadError> {
        let mut attempts = Vec::new();
        candidates
            .iter()
            .find_map(|candidate| {
                progress(candidate);
                match self.try_candidate(candidate) {
                    Ok(found) => Some(found),
                    Err(attempt) => {
                        warn!("Failed to load {}", attempt);
                        attempts.push(attempt);
                        None
                    }
                }
            })
            .ok_or_else(|| LoadError::SourceNotFound { attempts })
    }

    /// Fetch, parse and normalize the dataset
    pub fn load_with_progress(
        &self,
        candidates: &[String],
        progress: impl FnMut(&str),
    ) -> Result<SeatDataset, LoadError> {
        let (location, parsed) = self.fetch_first(candidates, progress)?;
        for warning in &parsed.warnings {
            warn!("CSV parsing warning in {}: {}", location, warning);
        }
        SeatDataset::from_rows(location.to_string(), &parsed.rows, parsed.warnings.len())
    }

    pub fn load(&self, candidates: &[String]) -> Result<SeatDataset, LoadError> {
        self.load_with_progress(candidates, |_| {})
    }
}
