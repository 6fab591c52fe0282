//! Filter sidebar
//!
//! Holds the free-text search box and one selector per facet. The panel only
//! keeps editing state of its own; every change to the actual filters is
//! returned to the app as a [`Command`].

use crate::core::{Facet, FilterState};
use crate::tui::component::{Command, Handled, RenderContext};
use crate::tui::{Action, Component, Focusable};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const SEARCH_PLACEHOLDER: &str = "Search institutes, courses...";

/// Selectable rows of the panel, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    State,
    Round,
    Quota,
    Category,
    Clear,
}

impl FilterField {
    const ORDER: [FilterField; 6] = [
        FilterField::Search,
        FilterField::State,
        FilterField::Round,
        FilterField::Quota,
        FilterField::Category,
        FilterField::Clear,
    ];

    pub fn facet(&self) -> Option<Facet> {
        match self {
            Self::State => Some(Facet::State),
            Self::Round => Some(Facet::Round),
            Self::Quota => Some(Facet::Quota),
            Self::Category => Some(Facet::Category),
            Self::Search | Self::Clear => None,
        }
    }

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(&self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct FilterPanel {
    active_field: FilterField,
    editing: bool,
    search_input: String,
    /// Cursor position in characters
    search_cursor: usize,
    focused: bool,
    supported_actions: Vec<Action>,
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPanel {
    pub fn new() -> Self {
        Self {
            active_field: FilterField::Search,
            editing: false,
            search_input: String::new(),
            search_cursor: 0,
            focused: false,
            supported_actions: vec![
                Action::MoveUp,
                Action::MoveDown,
                Action::MoveLeft,
                Action::MoveRight,
                Action::NextField,
                Action::PrevField,
                Action::Confirm,
                Action::ClearField,
                Action::ClearFilters,
                Action::Cancel,
            ],
        }
    }

    pub fn active_field(&self) -> FilterField {
        self.active_field
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Jump to the search box and start typing
    pub fn start_search(&mut self) {
        self.active_field = FilterField::Search;
        self.editing = true;
        self.search_cursor = self.search_input.chars().count();
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }

    pub fn clear_input(&mut self) {
        self.search_input.clear();
        self.search_cursor = 0;
    }

    /// Pick up the search text from the session after an external change
    pub fn sync(&mut self, filters: &FilterState) {
        if !self.editing && self.search_input != filters.search {
            self.search_input = filters.search.clone();
            self.search_cursor = self.search_input.chars().count();
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.search_input
            .char_indices()
            .nth(char_pos)
            .map_or(self.search_input.len(), |(i, _)| i)
    }

    fn search_command(&self) -> Handled {
        Handled::Command(Command::Search(self.search_input.clone()))
    }

    /// Raw key input while the search box is being edited
    ///
    /// Returns `None` when the key is not text editing and should go through
    /// the key bindings instead.
    pub fn handle_key_input(&mut self, key: KeyEvent) -> Option<Handled> {
        if !self.editing {
            return None;
        }
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let at = self.byte_index(self.search_cursor);
                self.search_input.insert(at, c);
                self.search_cursor += 1;
                Some(self.search_command())
            }
            KeyCode::Backspace => {
                if self.search_cursor > 0 {
                    self.search_cursor -= 1;
                    let at = self.byte_index(self.search_cursor);
                    self.search_input.remove(at);
                    Some(self.search_command())
                } else {
                    Some(Handled::Yes)
                }
            }
            KeyCode::Delete => {
                if self.search_cursor < self.search_input.chars().count() {
                    let at = self.byte_index(self.search_cursor);
                    self.search_input.remove(at);
                    Some(self.search_command())
                } else {
                    Some(Handled::Yes)
                }
            }
            KeyCode::Left => {
                self.search_cursor = self.search_cursor.saturating_sub(1);
                Some(Handled::Yes)
            }
            KeyCode::Right => {
                self.search_cursor = (self.search_cursor + 1).min(self.search_input.chars().count());
                Some(Handled::Yes)
            }
            KeyCode::Home => {
                self.search_cursor = 0;
                Some(Handled::Yes)
            }
            KeyCode::End => {
                self.search_cursor = self.search_input.chars().count();
                Some(Handled::Yes)
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.editing = false;
                Some(Handled::Yes)
            }
            _ => None,
        }
    }

    fn search_line(&self, ctx: &RenderContext<'_>) -> Line<'static> {
        let theme = ctx.theme;
        let active = self.focused && self.active_field == FilterField::Search;
        let prefix = Span::styled(
            if active { "> " } else { "  " },
            theme.focused_border_style(),
        );

        if self.editing {
            let chars: Vec<char> = self.search_input.chars().collect();
            let before: String = chars[..self.search_cursor.min(chars.len())].iter().collect();
            let at: String = chars
                .get(self.search_cursor)
                .map_or(" ".to_string(), |c| c.to_string());
            let after: String = chars
                .get(self.search_cursor + 1..)
                .map_or(String::new(), |rest| rest.iter().collect());
            return Line::from(vec![
                prefix,
                Span::raw(before),
                Span::styled(at, theme.selected_style()),
                Span::raw(after),
            ]);
        }

        let body = if self.search_input.is_empty() {
            Span::styled(SEARCH_PLACEHOLDER, theme.muted_style())
        } else {
            Span::raw(self.search_input.clone())
        };
        let body = if active {
            body.patch_style(theme.selected_style())
        } else {
            body
        };
        Line::from(vec![prefix, body])
    }

    fn facet_line(&self, field: FilterField, facet: Facet, ctx: &RenderContext<'_>) -> Line<'static> {
        let theme = ctx.theme;
        let active = self.focused && self.active_field == field;
        let label = facet.option_label(ctx.view.filters.selection(facet).as_str());
        let value = if active {
            Span::styled(format!("‹ {} ›", label), theme.selected_style())
        } else {
            Span::raw(format!("  {}", label))
        };
        Line::from(vec![
            Span::styled(format!("{:<9}", facet.to_string()), theme.muted_style()),
            value,
        ])
    }
}

impl Component for FilterPanel {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        let handled = match action {
            Action::MoveDown | Action::NextField => {
                self.editing = false;
                self.active_field = self.active_field.next();
                Handled::Yes
            }
            Action::MoveUp | Action::PrevField => {
                self.editing = false;
                self.active_field = self.active_field.prev();
                Handled::Yes
            }
            Action::MoveLeft | Action::MoveRight => match self.active_field.facet() {
                Some(facet) => {
                    let step = if action == Action::MoveLeft { -1 } else { 1 };
                    Handled::Command(Command::CycleFacet(facet, step))
                }
                None => Handled::Yes,
            },
            Action::Confirm => match self.active_field {
                FilterField::Search => {
                    self.start_search();
                    Handled::Yes
                }
                FilterField::Clear => {
                    self.clear_input();
                    Handled::Command(Command::ClearFilters)
                }
                field => match field.facet() {
                    Some(facet) => Handled::Command(Command::CycleFacet(facet, 1)),
                    None => Handled::Yes,
                },
            },
            Action::ClearField => match self.active_field.facet() {
                Some(facet) => Handled::Command(Command::ClearFacet(facet)),
                None => {
                    self.clear_input();
                    Handled::Command(Command::Search(String::new()))
                }
            },
            Action::ClearFilters => {
                self.editing = false;
                self.clear_input();
                Handled::Command(Command::ClearFilters)
            }
            Action::Cancel => {
                if self.editing {
                    self.editing = false;
                    Handled::Yes
                } else {
                    Handled::Command(Command::FocusTable)
                }
            }
            _ => Handled::No,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Filters ")
            .title_style(theme.title_style())
            .border_style(theme.border_for(self.focused));

        let section = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
        };

        let mut lines = vec![section("Search"), self.search_line(ctx), Line::from("")];
        lines.push(section("Filter by"));
        for field in FilterField::ORDER {
            if let Some(facet) = field.facet() {
                lines.push(self.facet_line(field, facet, ctx));
            }
        }
        lines.push(Line::from(""));

        let clear_style = if self.focused && self.active_field == FilterField::Clear {
            theme.selected_style()
        } else {
            theme.error_style()
        };
        lines.push(Line::from(Span::styled("[ Clear Filters ]", clear_style)));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Total Records: ", theme.muted_style()),
            Span::styled(
                ctx.view.total_records.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "FilterPanel"
    }
}

impl Focusable for FilterPanel {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.editing = false;
        }
    }
}
