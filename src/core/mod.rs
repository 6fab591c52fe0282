pub mod dataset;
pub mod record;
pub mod types;

pub use dataset::{NormalizeStats, SeatDataset};
pub use record::{normalize_header, RawRow};
pub use types::*;
