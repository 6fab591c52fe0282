use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GoToTop,
    GoToBottom,

    // Paging
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,

    // Filters
    FocusSearch,
    NextField,
    PrevField,
    ClearFilters,
    ClearField,

    // View
    ToggleSidebar,
    ToggleAnnouncement,
    ToggleStatus,
    ToggleHelp,
    Reload,

    // Links and status tools
    OpenLink,
    TestAlert,
    WriteProbe,

    // Application
    Quit,
    Confirm,
    Cancel,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Move up",
            Action::MoveDown => "Move down",
            Action::MoveLeft => "Previous option",
            Action::MoveRight => "Next option",
            Action::GoToTop => "First row on page",
            Action::GoToBottom => "Last row on page",
            Action::NextPage => "Next page",
            Action::PrevPage => "Previous page",
            Action::FirstPage => "First page",
            Action::LastPage => "Last page",
            Action::FocusSearch => "Search",
            Action::NextField => "Next filter",
            Action::PrevField => "Previous filter",
            Action::ClearFilters => "Clear all filters",
            Action::ClearField => "Clear selected filter",
            Action::ToggleSidebar => "Toggle filter panel",
            Action::ToggleAnnouncement => "Results announcement",
            Action::ToggleStatus => "Status page",
            Action::ToggleHelp => "Toggle help",
            Action::Reload => "Reload data",
            Action::OpenLink => "Open link",
            Action::TestAlert => "Test alert",
            Action::WriteProbe => "Diagnostic probe",
            Action::Quit => "Quit application",
            Action::Confirm => "Confirm",
            Action::Cancel => "Close / cancel",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::MoveUp
            | Action::MoveDown
            | Action::MoveLeft
            | Action::MoveRight
            | Action::GoToTop
            | Action::GoToBottom => ActionCategory::Navigation,

            Action::NextPage | Action::PrevPage | Action::FirstPage | Action::LastPage => {
                ActionCategory::Paging
            }

            Action::FocusSearch
            | Action::NextField
            | Action::PrevField
            | Action::ClearFilters
            | Action::ClearField => ActionCategory::Filters,

            Action::ToggleSidebar
            | Action::ToggleAnnouncement
            | Action::ToggleStatus
            | Action::ToggleHelp
            | Action::Reload => ActionCategory::View,

            Action::OpenLink | Action::TestAlert | Action::WriteProbe => ActionCategory::Tools,

            Action::Quit | Action::Confirm | Action::Cancel => ActionCategory::Application,
        }
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::GoToTop,
            Action::GoToBottom,
            Action::NextPage,
            Action::PrevPage,
            Action::FirstPage,
            Action::LastPage,
            Action::FocusSearch,
            Action::NextField,
            Action::PrevField,
            Action::ClearFilters,
            Action::ClearField,
            Action::ToggleSidebar,
            Action::ToggleAnnouncement,
            Action::ToggleStatus,
            Action::ToggleHelp,
            Action::Reload,
            Action::OpenLink,
            Action::TestAlert,
            Action::WriteProbe,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    Paging,
    Filters,
    View,
    Tools,
    Application,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::Paging => write!(f, "Paging"),
            ActionCategory::Filters => write!(f, "Filters"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Tools => write!(f, "Tools"),
            ActionCategory::Application => write!(f, "Application"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_actions_have_descriptions() {
        for action in Action::all() {
            assert!(!action.description().is_empty());
        }
    }

    #[test]
    fn test_paging_actions_grouped() {
        for action in [Action::NextPage, Action::PrevPage, Action::FirstPage, Action::LastPage] {
            assert_eq!(action.category(), ActionCategory::Paging);
        }
        assert_eq!(Action::ClearFilters.category().to_string(), "Filters");
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::NextPage;
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, "\"NextPage\"");

        let restored: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, action);
    }
}
