pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod services;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use core::{FilterState, PageState, SeatDataset, SeatRecord};
pub use error::LoadError;
pub use services::{FilterService, IngestService, Paginator};
pub use session::{Phase, Session, SessionView};
pub use tui::{Action, ActionCategory, App};
