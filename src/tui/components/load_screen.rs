//! Full-screen states shown instead of the table: loading and load failure

use crate::error::LoadError;
use crate::session::Phase;
use crate::tui::component::{centered_rect, RenderContext};
use crate::tui::Action;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct LoadScreen;

impl LoadScreen {
    pub fn loading_lines(attempting: Option<&str>, tick: usize, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Loading Seat Matrix Data...", SPINNER[tick % SPINNER.len()]),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Fetching from CSV file", theme.muted_style())),
        ];
        if let Some(candidate) = attempting {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(candidate.to_string(), theme.info_style())));
        }
        lines
    }

    pub fn error_lines(error: &LoadError, ctx: &RenderContext<'_>) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        let mut lines = vec![
            Line::from(Span::styled(
                "Error Loading Data",
                theme.error_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(error.headline()),
            Line::from(""),
        ];

        match error {
            LoadError::SourceNotFound { attempts } => {
                lines.push(Line::from(Span::styled("Tried:", theme.muted_style())));
                for attempt in attempts {
                    lines.push(Line::from(vec![
                        Span::raw(format!("  {} ", attempt.location)),
                        Span::styled(format!("({})", attempt.error), theme.muted_style()),
                    ]));
                }
            }
            LoadError::EmptyDataset {
                location,
                parsed_rows,
                rejected_rows,
            } => {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{}: {} rows parsed, {} rejected",
                        location, parsed_rows, rejected_rows
                    ),
                    theme.muted_style(),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!(" Retry [{}] ", ctx.keys.hint(Action::Reload)),
                theme.selected_style(),
            ),
            Span::raw("  "),
            Span::styled(format!("Quit [{}]", ctx.keys.hint(Action::Quit)), theme.muted_style()),
        ]));
        lines
    }

    /// Render the loading or error screen for `phase`; other phases draw nothing
    pub fn render(frame: &mut Frame, area: Rect, tick: usize, ctx: &RenderContext<'_>) {
        let (lines, border) = match ctx.view.phase {
            Phase::Idle => (Self::loading_lines(None, tick, ctx), ctx.theme.border_style()),
            Phase::Loading { attempting } => (
                Self::loading_lines(attempting.as_deref(), tick, ctx),
                ctx.theme.border_style(),
            ),
            Phase::Error(error) => (Self::error_lines(error, ctx), ctx.theme.error_style()),
            Phase::Ready => return,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .block(block),
            centered_rect(70, 60, area),
        );
    }
}
