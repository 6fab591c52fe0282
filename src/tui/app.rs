use crate::config::{Config, RuntimeEnv};
use crate::services::links::{CHECK_RESULTS, START_COUNSELLING};
use crate::services::{
    DefaultFetcher, HealthReport, IngestService, LinkService, StatusService, Worker, WorkerEvent,
};
use crate::session::{Phase, Session};
use crate::tui::component::{Command, Handled, PageMove, RenderContext};
use crate::tui::components::{
    Announcement, FilterPanel, HelpOverlay, LoadScreen, MessageDialog, RecordDetail, SeatTable,
    StatusPage,
};
use crate::tui::{Action, Component, Focusable, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

const SIDEBAR_WIDTH: u16 = 36;
const DETAIL_HEIGHT: u16 = 6;

/// Command-line overrides applied on top of [`Config`]
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Extra candidates tried before the configured ones
    pub sources: Vec<String>,
    pub base: Option<String>,
    pub page_size: Option<usize>,
    pub no_announcement: bool,
    pub theme: Theme,
}

/// Full-screen overlays; at most one is open
enum Overlay {
    Announcement(Announcement),
    Status(StatusPage),
    Help(HelpOverlay),
}

impl Overlay {
    fn component(&mut self) -> &mut dyn Component {
        match self {
            Overlay::Announcement(c) => c,
            Overlay::Status(c) => c,
            Overlay::Help(c) => c,
        }
    }
}

/// Application state
///
/// Owns the [`Session`] and the components, routes key events to whoever
/// has focus and applies the [`Command`]s they hand back.
pub struct App {
    config: Config,
    runtime: RuntimeEnv,
    session: Session,
    worker: Worker,
    ingest: IngestService,
    candidates: Vec<String>,

    seat_table: SeatTable,
    filter_panel: FilterPanel,
    overlay: Option<Overlay>,
    /// Modal message shown above everything else
    message: Option<MessageDialog>,
    show_sidebar: bool,
    last_health: Option<HealthReport>,

    keybindings: KeyBindings,
    theme: Theme,
    tick: usize,
    should_quit: bool,
}

impl App {
    /// Create a new App reading data through the default HTTP/file fetcher
    pub fn new(config: Config, options: AppOptions) -> Result<Self> {
        let fetcher = DefaultFetcher::new(config.source.timeout())?;
        let ingest = IngestService::new(Arc::new(fetcher));
        Self::with_service(config, options, ingest)
    }

    /// Create an App around an existing ingest service
    pub fn with_service(config: Config, options: AppOptions, ingest: IngestService) -> Result<Self> {
        let keybindings = KeyBindings::load_or_default(&config.keybindings_path())?;
        for warning in keybindings.validate() {
            warn!("Key bindings: {}", warning);
        }

        let base = options.base.clone().or_else(|| config.source.base.clone());
        let ingest = match base {
            Some(base) => ingest.with_base(base),
            None => ingest,
        };

        let page_size = options.page_size.unwrap_or(config.table.page_size);
        let candidates = config.candidates(&options.sources);
        let overlay = (config.announcement.show_on_start && !options.no_announcement)
            .then(|| Overlay::Announcement(Announcement::new()));

        let mut seat_table = SeatTable::new();
        seat_table.set_focused(true);

        Ok(Self {
            runtime: config.runtime_env(),
            config,
            session: Session::new(page_size),
            worker: Worker::new(),
            ingest,
            candidates,
            seat_table,
            filter_panel: FilterPanel::new(),
            overlay,
            message: None,
            show_sidebar: true,
            last_health: None,
            keybindings,
            theme: options.theme,
            tick: 0,
            should_quit: false,
        })
    }

    /// Kick off the initial load
    pub fn start(&mut self) {
        self.reload();
    }

    /// Start a new load generation; any load still running is ignored
    pub fn reload(&mut self) {
        let generation = self.session.begin_load();
        info!(
            "Starting load {} over {} candidates",
            generation,
            self.candidates.len()
        );
        self.seat_table.reset_cursor();
        self.worker
            .spawn_load(self.ingest.clone(), self.candidates.clone(), generation);
    }

    /// Apply whatever background jobs have reported since the last tick
    pub fn update(&mut self) -> Result<()> {
        self.tick = self.tick.wrapping_add(1);
        for event in self.worker.drain() {
            match event {
                WorkerEvent::Attempting {
                    generation,
                    candidate,
                } => self.session.note_attempt(generation, &candidate),
                WorkerEvent::Loaded { generation, result } => {
                    if self.session.finish_load(generation, result) {
                        self.seat_table.reset_cursor();
                        self.filter_panel.sync(self.session.filters());
                    }
                }
                WorkerEvent::Health(report) => {
                    if let Some(Overlay::Status(page)) = &mut self.overlay {
                        page.set_health(report.clone());
                    }
                    self.last_health = Some(report);
                }
            }
        }
        self.seat_table.update()?;
        self.filter_panel.update()
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Only handle key press events, ignore release/repeat
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Text typed into the search box bypasses the bindings
        if self.message.is_none()
            && self.overlay.is_none()
            && self.filter_panel.is_focused()
            && let Some(handled) = self.filter_panel.handle_key_input(key)
        {
            return self.apply_handled(handled);
        }

        if let Some(action) = self.keybindings.get_action(&key) {
            self.handle_action(action)?;
        }
        Ok(())
    }

    /// Route an action: message, overlay, app-level, then focused component
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        if let Some(dialog) = &mut self.message {
            let handled = dialog.handle_action(action)?;
            return self.apply_handled(handled);
        }

        if let Some(overlay) = &mut self.overlay {
            let handled = overlay.component().handle_action(action)?;
            if handled.is_handled() {
                return self.apply_handled(handled);
            }
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Action::ToggleHelp => {
                self.overlay = Some(Overlay::Help(HelpOverlay::new()));
                return Ok(());
            }
            Action::ToggleAnnouncement | Action::OpenLink => {
                self.overlay = Some(Overlay::Announcement(Announcement::new()));
                return Ok(());
            }
            Action::ToggleStatus => {
                self.open_status_page();
                return Ok(());
            }
            Action::ToggleSidebar => {
                self.show_sidebar = !self.show_sidebar;
                if !self.show_sidebar {
                    self.focus_table();
                }
                return Ok(());
            }
            Action::Reload => {
                self.reload();
                return Ok(());
            }
            _ => {}
        }

        // Everything below works on loaded data
        if !self.session.is_ready() {
            return Ok(());
        }

        match action {
            Action::FocusSearch => {
                self.focus_filters();
                self.filter_panel.start_search();
                return Ok(());
            }
            Action::NextField | Action::PrevField if self.seat_table.is_focused() => {
                self.focus_filters();
                return Ok(());
            }
            _ => {}
        }

        let handled = if self.filter_panel.is_focused() {
            self.filter_panel.handle_action(action)?
        } else {
            self.seat_table.handle_action(action)?
        };

        // Paging and clearing work from either pane
        if !handled.is_handled() && self.filter_panel.is_focused() {
            let fallback = self.seat_table.handle_action(action)?;
            return self.apply_handled(fallback);
        }
        if !handled.is_handled() && action == Action::ClearFilters {
            return self.apply_command(Command::ClearFilters);
        }
        self.apply_handled(handled)
    }

    fn apply_handled(&mut self, handled: Handled) -> Result<()> {
        match handled {
            Handled::Command(command) => self.apply_command(command),
            Handled::Yes | Handled::No => Ok(()),
        }
    }

    fn apply_command(&mut self, command: Command) -> Result<()> {
        debug!("Applying {:?}", command);
        match command {
            Command::Search(text) => {
                self.session.set_search(text);
                self.seat_table.reset_cursor();
            }
            Command::CycleFacet(facet, step) => {
                self.session.cycle_facet(facet, step);
                self.seat_table.reset_cursor();
            }
            Command::ClearFacet(facet) => {
                self.session.clear_facet(facet);
                self.seat_table.reset_cursor();
            }
            Command::ClearFilters => {
                self.session.clear_filters();
                self.filter_panel.clear_input();
                self.seat_table.reset_cursor();
            }
            Command::Page(movement) => {
                match movement {
                    PageMove::Next => self.session.next_page(),
                    PageMove::Prev => self.session.prev_page(),
                    PageMove::First => self.session.first_page(),
                    PageMove::Last => self.session.last_page(),
                }
                self.seat_table.reset_cursor();
            }
            Command::Reload => self.reload(),
            Command::OpenLink(link) => {
                let outcome = LinkService::open(&link);
                if let Some(text) = outcome.message(&link) {
                    self.message = Some(MessageDialog::with_title(text, "Open Link"));
                } else if link == CHECK_RESULTS || link == START_COUNSELLING {
                    self.overlay = None;
                }
            }
            Command::ShowMessage { title, body } => {
                self.message = Some(MessageDialog::with_title(body, title));
            }
            Command::WriteProbe => {
                let (text, summary) = match StatusService::write_probe(&self.config.config.data_dir) {
                    Ok(path) => (
                        format!("Diagnostic probe completed!\nWrote {}", path.display()),
                        format!("Last probe: {}", path.display()),
                    ),
                    Err(e) => (
                        format!("Diagnostic probe failed: {}", e),
                        format!("Last probe failed: {}", e),
                    ),
                };
                if let Some(Overlay::Status(page)) = &mut self.overlay {
                    page.set_probe_result(summary);
                }
                self.message = Some(MessageDialog::with_title(text, "Diagnostics"));
            }
            Command::CheckHealth => {
                self.worker
                    .spawn_health(self.runtime.api_url.clone(), self.config.source.timeout());
            }
            Command::FocusTable => self.focus_table(),
            Command::Close => {
                if self.message.is_some() {
                    self.message = None;
                } else {
                    self.overlay = None;
                }
            }
        }
        Ok(())
    }

    fn open_status_page(&mut self) {
        let mut page = StatusPage::new();
        page.set_environment(StatusService::environment_info(
            &self.runtime,
            self.session.dataset().map(|ds| ds.source.as_str()),
        ));
        if let Some(report) = &self.last_health {
            page.set_health(report.clone());
        }
        self.overlay = Some(Overlay::Status(page));
        self.worker
            .spawn_health(self.runtime.api_url.clone(), self.config.source.timeout());
    }

    fn focus_table(&mut self) {
        self.filter_panel.set_focused(false);
        self.seat_table.set_focused(true);
    }

    fn focus_filters(&mut self) {
        self.show_sidebar = true;
        self.seat_table.set_focused(false);
        self.filter_panel.set_focused(true);
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let view = self.session.snapshot();
        let ctx = RenderContext {
            theme: &self.theme,
            keys: &self.keybindings,
            view: &view,
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        render_header(frame, rows[0], &ctx, &self.runtime.app_name);

        if matches!(view.phase, Phase::Ready) {
            let body = if self.show_sidebar {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                    .split(rows[1]);
                self.filter_panel.render(frame, cols[0], &ctx);
                cols[1]
            } else {
                rows[1]
            };

            let main = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(DETAIL_HEIGHT)])
                .split(body);
            self.seat_table.render(frame, main[0], &ctx);
            let selected = view.rows.get(self.seat_table.cursor()).copied();
            RecordDetail::render(frame, main[1], selected, &self.theme);
        } else {
            LoadScreen::render(frame, rows[1], self.tick, &ctx);
        }

        let focused: &dyn Component = if self.filter_panel.is_focused() {
            &self.filter_panel
        } else {
            &self.seat_table
        };
        render_status_bar(frame, rows[2], &ctx, focused.supported_actions());

        if let Some(overlay) = &mut self.overlay {
            overlay.component().render(frame, area, &ctx);
        }
        if let Some(dialog) = &mut self.message {
            dialog.render(frame, area, &ctx);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn message(&self) -> Option<&MessageDialog> {
        self.message.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Get reference to theme
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Set theme
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Get keybindings
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Set keybindings
    pub fn set_keybindings(&mut self, keybindings: KeyBindings) {
        self.keybindings = keybindings;
    }
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>, app_name: &str) {
    let theme = ctx.theme;
    let view = ctx.view;

    let mut spans = vec![
        Span::styled("NEET PG Seat Matrix", theme.title_style()),
        Span::styled(format!("  {}  ", app_name), theme.muted_style()),
    ];
    if matches!(view.phase, Phase::Ready) {
        spans.push(Span::raw(format!(
            "Showing {} of {} records",
            view.filtered_records, view.total_records
        )));
    }

    let mut pills = Vec::new();
    if !view.filters.search.is_empty() {
        pills.push(format!("Search: {}", view.filters.search));
    }
    for (facet, value) in view.filters.active_facets() {
        pills.push(format!("{}: {}", facet, value));
    }
    for pill in pills {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} ", pill),
            theme.info_style().add_modifier(Modifier::REVERSED),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border_style());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>, actions: &[Action]) {
    let theme = ctx.theme;
    let view = ctx.view;
    let mut spans = vec![Span::styled(
        format!(" {} ", view.phase.label()),
        theme.selected_style(),
    )];

    for action in actions
        .iter()
        .copied()
        .chain([Action::ToggleHelp, Action::Quit])
        .take(8)
    {
        spans.push(Span::styled(
            format!(" {}", ctx.keys.hint(action)),
            theme.info_style(),
        ));
        spans.push(Span::styled(
            format!(" {} ", action.description()),
            theme.muted_style(),
        ));
    }

    if view.skipped_rows > 0 {
        spans.push(Span::styled(
            format!(" {} rows skipped ", view.skipped_rows),
            theme.warning_style(),
        ));
    }
    if let Some(source) = view.source {
        spans.push(Span::styled(format!(" {}", source), theme.muted_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
