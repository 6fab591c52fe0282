use crate::tui::component::{centered_rect, Command, Handled, RenderContext};
use crate::tui::{Action, ActionCategory, Component, KeyBindings};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

const CATEGORIES: [ActionCategory; 6] = [
    ActionCategory::Navigation,
    ActionCategory::Paging,
    ActionCategory::Filters,
    ActionCategory::View,
    ActionCategory::Tools,
    ActionCategory::Application,
];

/// Key binding reference, grouped by action category
pub struct HelpOverlay {
    scroll: u16,
    supported_actions: Vec<Action>,
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            supported_actions: vec![Action::MoveUp, Action::MoveDown, Action::Cancel],
        }
    }

    /// (category heading, [(keys, description)])
    pub fn entries(keys: &KeyBindings) -> Vec<(ActionCategory, Vec<(String, &'static str)>)> {
        CATEGORIES
            .iter()
            .map(|category| {
                let rows = Action::all()
                    .into_iter()
                    .filter(|a| a.category() == *category)
                    .filter_map(|action| {
                        let bound = keys.get_keys_for_action(action);
                        (!bound.is_empty()).then(|| (bound.join(", "), action.description()))
                    })
                    .collect();
                (*category, rows)
            })
            .collect()
    }
}

impl Component for HelpOverlay {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        let handled = match action {
            Action::MoveUp => {
                self.scroll = self.scroll.saturating_sub(1);
                Handled::Yes
            }
            Action::MoveDown => {
                self.scroll = self.scroll.saturating_add(1);
                Handled::Yes
            }
            Action::Cancel | Action::ToggleHelp | Action::Confirm => Handled::Command(Command::Close),
            _ => Handled::No,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let popup = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup);

        let mut lines = Vec::new();
        for (category, rows) in Self::entries(ctx.keys) {
            if rows.is_empty() {
                continue;
            }
            lines.push(Line::from(Span::styled(
                category.to_string(),
                theme.header_style().add_modifier(Modifier::UNDERLINED),
            )));
            for (keys, description) in rows {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<18}", keys), theme.info_style()),
                    Span::raw(description),
                ]));
            }
            lines.push(Line::from(""));
        }

        let max_scroll = (lines.len() as u16).saturating_sub(popup.height.saturating_sub(2));
        self.scroll = self.scroll.min(max_scroll);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Help ")
            .title_style(theme.title_style())
            .border_style(theme.focused_border_style());
        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll, 0)),
            popup,
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "HelpOverlay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_cover_default_bindings() {
        let keys = KeyBindings::default();
        let entries = HelpOverlay::entries(&keys);
        assert_eq!(entries.len(), CATEGORIES.len());

        let paging = &entries[1];
        assert_eq!(paging.0, ActionCategory::Paging);
        assert!(paging.1.iter().any(|(k, d)| k.contains("PageDown") && *d == "Next page"));
    }

    #[test]
    fn test_close_actions() {
        let mut help = HelpOverlay::new();
        assert_eq!(
            help.handle_action(Action::ToggleHelp).unwrap(),
            Handled::Command(Command::Close)
        );
        assert_eq!(help.handle_action(Action::MoveDown).unwrap(), Handled::Yes);
        assert_eq!(help.handle_action(Action::Reload).unwrap(), Handled::No);
    }
}
