//! NEET PG 2025 results announcement overlay

use crate::services::links::{
    ExternalLink, CHECK_RESULTS, MCC_PORTAL, NBE_WEBSITE, START_COUNSELLING,
};
use crate::tui::component::{centered_rect, Command, Handled, RenderContext};
use crate::tui::{Action, Component};
use color_eyre::Result;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HEADLINE: &str = "NEET PG 2025 Results Announced!";
const TAGLINE: &str =
    "Your results are now available. Check your score and start your counselling journey!";

const STATS: [(&str, &str); 3] = [
    ("2,05,179", "Total Registered"),
    ("1,63,287", "Qualified"),
    ("51,953", "Total Seats"),
];

const BULLETS: [&str; 4] = [
    "Results are available on the official NBE website",
    "Counselling registration will start soon",
    "Keep your documents ready for counselling",
    "Check your category-wise cutoff marks",
];

/// Links in display order: two actions, then two quick links
pub const LINKS: [ExternalLink; 4] = [CHECK_RESULTS, START_COUNSELLING, MCC_PORTAL, NBE_WEBSITE];

pub struct Announcement {
    selected: usize,
    supported_actions: Vec<Action>,
}

impl Default for Announcement {
    fn default() -> Self {
        Self::new()
    }
}

impl Announcement {
    pub fn new() -> Self {
        Self {
            selected: 0,
            supported_actions: vec![
                Action::MoveUp,
                Action::MoveDown,
                Action::Confirm,
                Action::OpenLink,
                Action::Cancel,
            ],
        }
    }

    pub fn selected_link(&self) -> ExternalLink {
        LINKS[self.selected]
    }

    fn link_line(&self, idx: usize, ctx: &RenderContext<'_>) -> Line<'static> {
        let link = LINKS[idx];
        let style = if idx == self.selected {
            ctx.theme.selected_style()
        } else {
            ctx.theme.info_style()
        };
        Line::from(vec![
            Span::raw(if idx == self.selected { " > " } else { "   " }),
            Span::styled(format!(" {} ", link.label), style),
        ])
    }
}

impl Component for Announcement {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        let handled = match action {
            Action::MoveUp => {
                self.selected = (self.selected + LINKS.len() - 1) % LINKS.len();
                Handled::Yes
            }
            Action::MoveDown => {
                self.selected = (self.selected + 1) % LINKS.len();
                Handled::Yes
            }
            Action::Confirm | Action::OpenLink => {
                Handled::Command(Command::OpenLink(self.selected_link()))
            }
            Action::Cancel | Action::ToggleAnnouncement => Handled::Command(Command::Close),
            _ => Handled::No,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let popup = centered_rect(70, 80, area);
        frame.render_widget(Clear, popup);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(HEADLINE, theme.title_style())).alignment(Alignment::Center),
            Line::from(Span::styled(TAGLINE, theme.muted_style())).alignment(Alignment::Center),
            Line::from(""),
        ];

        let mut stats = Vec::new();
        for (value, label) in STATS {
            stats.push(Span::styled(value, theme.success_style().add_modifier(Modifier::BOLD)));
            stats.push(Span::styled(format!(" {}    ", label), theme.muted_style()));
        }
        lines.push(Line::from(stats).alignment(Alignment::Center));
        lines.push(Line::from(""));

        lines.push(self.link_line(0, ctx));
        lines.push(self.link_line(1, ctx));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Important Information", bold)));
        for bullet in BULLETS {
            lines.push(Line::from(format!("  • {}", bullet)));
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Quick Links", bold)));
        lines.push(self.link_line(2, ctx));
        lines.push(self.link_line(3, ctx));
        lines.push(Line::from(""));

        let hint = format!(
            "Need help? Contact our support team    [{}] open  [{}] close",
            ctx.keys.hint(Action::Confirm),
            ctx.keys.hint(Action::Cancel)
        );
        lines.push(Line::from(Span::styled(hint, theme.muted_style())));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Announcement ")
            .border_style(theme.focused_border_style());
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            popup,
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "Announcement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_link_selection_wraps() {
        let mut modal = Announcement::new();
        assert_eq!(modal.selected_link(), CHECK_RESULTS);
        modal.handle_action(Action::MoveUp).unwrap();
        assert_eq!(modal.selected_link(), NBE_WEBSITE);
        modal.handle_action(Action::MoveDown).unwrap();
        modal.handle_action(Action::MoveDown).unwrap();
        assert_eq!(modal.selected_link(), START_COUNSELLING);
    }

    #[test]
    fn test_confirm_opens_selected_link() {
        let mut modal = Announcement::new();
        modal.handle_action(Action::MoveDown).unwrap();
        assert_eq!(
            modal.handle_action(Action::Confirm).unwrap(),
            Handled::Command(Command::OpenLink(START_COUNSELLING))
        );
        assert_eq!(
            modal.handle_action(Action::Cancel).unwrap(),
            Handled::Command(Command::Close)
        );
        assert_eq!(modal.handle_action(Action::NextPage).unwrap(), Handled::No);
    }
}
