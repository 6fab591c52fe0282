use crate::core::{CutoffRank, SeatRecord};
use crate::services::page_window;
use crate::tui::component::{Command, Handled, PageMove, RenderContext};
use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const HEADERS: [&str; 14] = [
    "Round",
    "State",
    "Institute",
    "Course",
    "Quota",
    "Category",
    "Seats",
    "Fee/Stipend",
    "Bond Yrs",
    "Beds",
    "CR 2023-1",
    "CR 2023-2",
    "CR 2024-1",
    "CR 2024-2",
];

fn column_widths() -> [Constraint; 14] {
    [
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ]
}

fn rank_cell(rank: CutoffRank) -> Cell<'static> {
    Cell::from(rank.to_string())
}

/// The paged seat-matrix table with its pagination footer
pub struct SeatTable {
    /// Selected row within the current page
    cursor: usize,
    /// First page row drawn in the viewport
    top: usize,
    /// Rows that fit below the header, from the last render
    viewport_height: usize,
    rows_on_page: usize,
    focused: bool,
    supported_actions: Vec<Action>,
}

impl Default for SeatTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatTable {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            top: 0,
            viewport_height: 0,
            rows_on_page: 0,
            focused: false,
            supported_actions: vec![
                Action::MoveUp,
                Action::MoveDown,
                Action::GoToTop,
                Action::GoToBottom,
                Action::NextPage,
                Action::PrevPage,
                Action::FirstPage,
                Action::LastPage,
            ],
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.top = 0;
    }

    /// First page row currently drawn
    pub fn top(&self) -> usize {
        self.top
    }

    /// Tell the table how many rows the current page holds
    pub fn set_rows_on_page(&mut self, rows: usize) {
        self.rows_on_page = rows;
        self.cursor = self.cursor.min(rows.saturating_sub(1));
        self.ensure_cursor_visible();
    }

    /// Account for borders and the header row
    fn update_viewport(&mut self, area: Rect) {
        self.viewport_height = area.height.saturating_sub(3) as usize;
    }

    /// Scroll so the cursor row is inside the viewport
    fn ensure_cursor_visible(&mut self) {
        if self.viewport_height == 0 {
            return;
        }
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + self.viewport_height {
            self.top = self.cursor.saturating_sub(self.viewport_height - 1);
        }
        let max_top = self.rows_on_page.saturating_sub(self.viewport_height);
        self.top = self.top.min(max_top);
    }

    fn page(&mut self, movement: PageMove) -> Handled {
        self.reset_cursor();
        Handled::Command(Command::Page(movement))
    }

    fn record_row<'a>(record: &'a SeatRecord, theme: &Theme) -> Vec<Cell<'a>> {
        let y23 = &record.cutoffs.year_2023;
        let y24 = &record.cutoffs.year_2024;
        vec![
            Cell::from(record.round.as_str()),
            Cell::from(record.state.as_str()),
            Cell::from(record.institute.as_str()),
            Cell::from(record.course.as_str()),
            Cell::from(Span::styled(
                record.quota.as_str(),
                theme.quota_style(&record.quota),
            )),
            Cell::from(Span::styled(
                record.category.as_str(),
                theme.category_style(&record.category),
            )),
            Cell::from(record.seats.to_string()),
            Cell::from(record.fee_stipend_year_1.as_str()),
            Cell::from(record.bond_years.to_string()),
            Cell::from(record.beds.to_string()),
            rank_cell(y23[0]),
            rank_cell(y23[1]),
            rank_cell(y24[0]),
            rank_cell(y24[1]),
        ]
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let view = ctx.view;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Seat Matrix [page {}/{}] ",
                view.page.number,
                view.page.total_pages.max(1)
            ))
            .border_style(theme.border_for(self.focused));

        if view.rows.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No results found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Try adjusting your filters or search terms",
                    theme.muted_style(),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        self.update_viewport(area);
        self.ensure_cursor_visible();

        let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(theme.header_style());
        let rows: Vec<Row> = view
            .rows
            .iter()
            .enumerate()
            .skip(self.top)
            .take(self.viewport_height)
            .map(|(idx, record)| {
                let style = if idx == self.cursor && self.focused {
                    theme.selected_style()
                } else if idx == self.cursor {
                    theme.alt_row_style().add_modifier(Modifier::BOLD)
                } else if idx % 2 == 1 {
                    theme.alt_row_style()
                } else {
                    theme.normal_style()
                };
                Row::new(Self::record_row(record, theme)).style(style)
            })
            .collect();

        let table = Table::new(rows, column_widths())
            .header(header)
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let view = ctx.view;
        let page = &view.page;

        let mut summary = vec![Span::raw(page.summary())];
        if view.filtered_records != view.total_records {
            summary.push(Span::styled(
                format!(" (filtered from {} total)", view.total_records),
                theme.muted_style(),
            ));
        }

        let nav_style = |enabled: bool| {
            if enabled {
                theme.normal_style()
            } else {
                theme.muted_style()
            }
        };
        let mut buttons = vec![Span::styled("‹ Prev ", nav_style(page.has_prev()))];
        for number in page_window(page.number, page.total_pages) {
            let label = format!(" {} ", number);
            if number == page.number {
                buttons.push(Span::styled(label, theme.selected_style()));
            } else {
                buttons.push(Span::styled(label, theme.border_style()));
            }
        }
        buttons.push(Span::styled(" Next ›", nav_style(page.has_next())));

        let footer = Paragraph::new(vec![Line::from(summary), Line::from(buttons)]);
        frame.render_widget(footer, area);
    }
}

impl Component for SeatTable {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        let handled = match action {
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                self.ensure_cursor_visible();
                Handled::Yes
            }
            Action::MoveDown => {
                if self.cursor + 1 < self.rows_on_page {
                    self.cursor += 1;
                    self.ensure_cursor_visible();
                }
                Handled::Yes
            }
            Action::GoToTop => {
                self.reset_cursor();
                Handled::Yes
            }
            Action::GoToBottom => {
                self.cursor = self.rows_on_page.saturating_sub(1);
                self.ensure_cursor_visible();
                Handled::Yes
            }
            Action::NextPage => self.page(PageMove::Next),
            Action::PrevPage => self.page(PageMove::Prev),
            Action::FirstPage => self.page(PageMove::First),
            Action::LastPage => self.page(PageMove::Last),
            _ => Handled::No,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        self.set_rows_on_page(ctx.view.rows.len());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(2)])
            .split(area);
        self.render_table(frame, chunks[0], ctx);
        self.render_footer(frame, chunks[1], ctx);
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "SeatTable"
    }
}

impl Focusable for SeatTable {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawRow;
    use crate::session::Session;
    use crate::tui::KeyBindings;
    use ratatui::{backend::TestBackend, Terminal};

    fn session(n: usize) -> Session {
        let rows: Vec<RawRow> = (0..n)
            .map(|i| {
                let institute = format!("AIIMS Campus {i}");
                RawRow::from_pairs(
                    i as u64 + 2,
                    [
                        ("Institute", institute.as_str()),
                        ("Course", "MD Medicine"),
                        ("State", "Delhi"),
                        ("Quota", "All India"),
                        ("Category", "OBC"),
                    ],
                )
            })
            .collect();
        let dataset = crate::core::SeatDataset::from_rows("t.csv", &rows, 0).unwrap();
        let mut session = Session::new(50);
        let generation = session.begin_load();
        session.finish_load(generation, Ok(dataset));
        session
    }

    fn render_to_text(table: &mut SeatTable, session: &Session) -> String {
        let backend = TestBackend::new(160, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        let keys = KeyBindings::default();
        let view = session.snapshot();
        let ctx = RenderContext {
            theme: &theme,
            keys: &keys,
            view: &view,
        };
        terminal
            .draw(|f| table.render(f, f.area(), &ctx))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cursor_stays_on_page() {
        let mut table = SeatTable::new();
        table.set_rows_on_page(3);
        table.handle_action(Action::MoveDown).unwrap();
        table.handle_action(Action::MoveDown).unwrap();
        table.handle_action(Action::MoveDown).unwrap();
        assert_eq!(table.cursor(), 2);
        table.handle_action(Action::GoToTop).unwrap();
        assert_eq!(table.cursor(), 0);
        table.handle_action(Action::MoveUp).unwrap();
        assert_eq!(table.cursor(), 0);

        table.handle_action(Action::GoToBottom).unwrap();
        table.set_rows_on_page(1);
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn test_paging_emits_command_and_resets_cursor() {
        let mut table = SeatTable::new();
        table.set_rows_on_page(10);
        table.handle_action(Action::GoToBottom).unwrap();
        let handled = table.handle_action(Action::NextPage).unwrap();
        assert_eq!(handled, Handled::Command(Command::Page(PageMove::Next)));
        assert_eq!(table.cursor(), 0);
        assert_eq!(table.handle_action(Action::Reload).unwrap(), Handled::No);
    }

    #[test]
    fn test_render_shows_rows_and_footer() {
        let session = session(120);
        let mut table = SeatTable::new();
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("AIIMS Campus 0"));
        assert!(text.contains("Showing 1 to 50 of 120 results"));
        assert!(text.contains("CR 2023-1"));
    }

    #[test]
    fn test_viewport_follows_cursor_below_the_fold() {
        let session = session(50);
        let mut table = SeatTable::new();
        table.set_focused(true);
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("AIIMS Campus 0 "));
        assert!(!text.contains("AIIMS Campus 40"));

        for _ in 0..40 {
            table.handle_action(Action::MoveDown).unwrap();
        }
        assert_eq!(table.cursor(), 40);
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("AIIMS Campus 40"));
        assert!(!text.contains("AIIMS Campus 0 "));
        assert!(table.top() > 0 && table.top() <= 40);

        table.handle_action(Action::GoToTop).unwrap();
        assert_eq!(table.top(), 0);
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("AIIMS Campus 0 "));

        table.handle_action(Action::GoToBottom).unwrap();
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("AIIMS Campus 49"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut session = session(5);
        session.set_search("nothing matches this");
        let mut table = SeatTable::new();
        let text = render_to_text(&mut table, &session);
        assert!(text.contains("No results found"));
        assert!(text.contains("(filtered from 5 total)"));
    }
}
