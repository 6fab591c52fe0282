pub mod announcement;
pub mod filter_panel;
pub mod help_overlay;
pub mod load_screen;
pub mod message_dialog;
pub mod record_detail;
pub mod seat_table;
pub mod status_page;

pub use announcement::Announcement;
pub use filter_panel::{FilterField, FilterPanel};
pub use help_overlay::HelpOverlay;
pub use load_screen::LoadScreen;
pub use message_dialog::MessageDialog;
pub use record_detail::RecordDetail;
pub use seat_table::SeatTable;
pub use status_page::StatusPage;
