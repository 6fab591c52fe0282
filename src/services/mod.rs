pub mod filter_service;
pub mod ingest_service;
pub mod links;
pub mod pagination;
pub mod status_service;
pub mod worker;

pub use filter_service::{FacetOptions, FilterService, FilteredView};
pub use ingest_service::{
    DefaultFetcher, IngestService, ParseWarning, ParsedCsv, SourceFetcher, SourceLocation,
};
pub use links::{ExternalLink, LinkOutcome, LinkService};
pub use pagination::{page_window, Page, Paginator};
pub use status_service::{HealthReport, HealthState, StatusService};
pub use worker::{Worker, WorkerEvent};
