use crate::tui::component::{Command, Handled, RenderContext};
use crate::tui::{Action, Component};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Simple dialog for transient notifications (alerts, probe results, link failures)
#[derive(Debug, Clone)]
pub struct MessageDialog {
    title: String,
    message: String,
    supported_actions: Vec<Action>,
}

impl MessageDialog {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_title(message, "Message")
    }

    pub fn with_title(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            supported_actions: vec![Action::Confirm, Action::Cancel],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn modal_area(&self, area: Rect) -> Rect {
        let max_width = area.width.clamp(20, 60);
        let wrap_width = max_width.saturating_sub(4) as usize;
        let wrapped = textwrap::wrap(&self.message, wrap_width);
        let content_lines = wrapped.len() as u16;
        let height = content_lines
            .saturating_add(4) // borders + hint
            .clamp(5, area.height.saturating_sub(4).max(5));
        let width = max_width.min(area.width);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height: height.min(area.height),
        }
    }
}

impl Component for MessageDialog {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        match action {
            Action::Confirm | Action::Cancel => Ok(Handled::Command(Command::Close)),
            // Modal: swallow everything else
            _ => Ok(Handled::Yes),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let modal = self.modal_area(area);
        frame.render_widget(Clear, modal);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(ctx.theme.title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(ctx.theme.focused_border_style());
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let wrap_width = inner.width.saturating_sub(2) as usize;
        let text = textwrap::wrap(&self.message, wrap_width.max(1))
            .into_iter()
            .map(|line| format!(" {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        frame.render_widget(
            Paragraph::new(text).style(ctx.theme.normal_style()),
            inner,
        );

        let hint = format!(
            "{}/{} to close",
            ctx.keys.hint(Action::Confirm),
            ctx.keys.hint(Action::Cancel)
        );
        let hint_x = inner.x + inner.width.saturating_sub(hint.chars().count() as u16 + 1);
        let hint_y = inner.y + inner.height.saturating_sub(1);
        frame
            .buffer_mut()
            .set_string(hint_x, hint_y, hint, ctx.theme.muted_style());
    }

    fn supported_actions(&self) -> &[Action] {
        &self.supported_actions
    }

    fn name(&self) -> &str {
        "MessageDialog"
    }
}
