use crate::core::Facet;
use crate::services::ExternalLink;
use crate::session::SessionView;
use crate::tui::action::Action;
use crate::tui::{KeyBindings, Theme};
use color_eyre::Result;
use ratatui::{layout::Rect, Frame};

/// Page movement requested by a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Next,
    Prev,
    First,
    Last,
}

/// Work a component asks the app to carry out on its behalf
///
/// Components never touch the session directly; anything that changes the
/// pipeline state goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    CycleFacet(Facet, isize),
    ClearFacet(Facet),
    ClearFilters,
    Page(PageMove),
    Reload,
    OpenLink(ExternalLink),
    ShowMessage { title: String, body: String },
    WriteProbe,
    CheckHealth,
    /// Give focus back to the table
    FocusTable,
    /// Close the overlay that issued the command
    Close,
}

/// Outcome of [`Component::handle_action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Not for this component; keep routing
    No,
    Yes,
    Command(Command),
}

impl Handled {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::No)
    }
}

/// Everything a component may read while rendering
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub keys: &'a KeyBindings,
    pub view: &'a SessionView<'a>,
}

/// Base trait for all TUI components
///
/// All interactive UI elements implement this trait to provide consistent
/// behavior for action handling, rendering, and component lifecycle.
pub trait Component {
    /// Handle an action
    ///
    /// Returns [`Handled::No`] when the action should keep propagating.
    fn handle_action(&mut self, action: Action) -> Result<Handled>;

    /// Render the component within the given area
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>);

    /// Get list of actions this component supports
    ///
    /// Used for the key hints in the status bar.
    fn supported_actions(&self) -> &[Action];

    /// Get component name for debugging/logging
    fn name(&self) -> &str;

    /// Update component state (called on every tick)
    fn update(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Focusable component trait
///
/// Focus determines which component receives keyboard input.
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);
}

/// Rectangle of `percent_w` x `percent_h` centred in `area`
pub fn centered_rect(percent_w: u16, percent_h: u16, area: Rect) -> Rect {
    let width = (area.width * percent_w) / 100;
    let height = (area.height * percent_h) / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}
