//! Diagnostics overlay: UI status, backend health and environment info

use crate::services::{HealthReport, HealthState};
use crate::tui::component::{centered_rect, Command, Handled, RenderContext};
use crate::tui::{Action, Component};
use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub const UI_STATUS: &str = "Terminal UI is working!";
pub const TEST_ALERT: &str = "Key handling is working!";

pub struct StatusPage {
    health: Option<HealthReport>,
    environment: Vec<(String, String)>,
    probe_result: Option<String>,
    supported_actions: Vec<Action>,
}

impl Default for StatusPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPage {
    pub fn new() -> Self {
        Self {
            health: None,
            environment: Vec::new(),
            probe_result: None,
            supported_actions: vec![
                Action::TestAlert,
                Action::WriteProbe,
                Action::Reload,
                Action::Cancel,
            ],
        }
    }

    pub fn set_health(&mut self, report: HealthReport) {
        self.health = Some(report);
    }

    pub fn health(&self) -> Option<&HealthReport> {
        self.health.as_ref()
    }

    pub fn set_environment(&mut self, environment: Vec<(String, String)>) {
        self.environment = environment;
    }

    pub fn set_probe_result(&mut self, result: impl Into<String>) {
        self.probe_result = Some(result.into());
    }

    fn health_line(&self, ctx: &RenderContext<'_>) -> Line<'static> {
        let theme = ctx.theme;
        match &self.health {
            None => Line::from(Span::styled(
                HealthState::Checking.describe(),
                theme.warning_style(),
            )),
            Some(report) => {
                let style = match report.state {
                    HealthState::Checking => theme.warning_style(),
                    HealthState::Reachable(_) => theme.success_style(),
                    HealthState::Unreachable(_) => theme.error_style(),
                };
                Line::from(vec![
                    Span::styled(report.state.describe(), style),
                    Span::styled(
                        format!("  ({} at {})", report.url, report.checked_at.format("%H:%M:%S")),
                        theme.muted_style(),
                    ),
                ])
            }
        }
    }
}

impl Component for StatusPage {
    fn handle_action(&mut self, action: Action) -> Result<Handled> {
        let handled = match action {
            Action::TestAlert => Handled::Command(Command::ShowMessage {
                title: "Test Alert".to_string(),
                body: TEST_ALERT.to_string(),
            }),
            Action::WriteProbe => Handled::Command(Command::WriteProbe),
            Action::Reload => {
                self.health = None;
                Handled::Command(Command::CheckHealth)
            }
            Action::Cancel | Action::ToggleStatus => Handled::Command(Command::Close),
            _ => Handled::No,
        };
        Ok(handled)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        let theme = ctx.theme;
        let popup = centered_rect(75, 80, area);
        frame.render_widget(Clear, popup);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled("UI Status", bold)),
            Line::from(Span::styled(format!("  {}", UI_STATUS), theme.success_style())),
            Line::from(""),
            Line::from(Span::styled("Backend Status", bold)),
        ];
        let mut health = self.health_line(ctx);
        health.spans.insert(0, Span::raw("  "));
        lines.push(health);
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Environment", bold)));
        let width = self
            .environment
            .iter()
            .map(|(k, _)| k.len())
            .max()
            .unwrap_or(0);
        for (key, value) in &self.environment {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<width$}  ", key, width = width), theme.muted_style()),
                Span::raw(value.clone()),
            ]));
        }
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled("Tools", bold)));
        for action in [Action::TestAlert, Action::WriteProbe, Action::Reload] {
            let label = match action {
                Action::Reload => "Re-check backend",
                other => other.description(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] ", ctx.keys.hint(action)), theme.info_style()),
                Span::raw(label),
            ]));
        }
        if let Some(result) = &self.probe_result {
            lines.push(Line::from(Span::styled(
                format!("  {}", result),
                theme.muted_style(),
            )));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Status ")
            .title_style(theme.title_style())
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
        "StatusPage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tools_emit_commands() {
        let mut page = StatusPage::new();
        assert_eq!(
            page.handle_action(Action::WriteProbe).unwrap(),
            Handled::Command(Command::WriteProbe)
        );
        assert!(matches!(
            page.handle_action(Action::TestAlert).unwrap(),
            Handled::Command(Command::ShowMessage { .. })
        ));
        assert_eq!(
            page.handle_action(Action::Cancel).unwrap(),
            Handled::Command(Command::Close)
        );
    }

    #[test]
    fn test_recheck_clears_previous_report() {
        let mut page = StatusPage::new();
        page.set_health(HealthReport {
            url: "http://127.0.0.1:8000/health/".into(),
            state: HealthState::Unreachable("connection refused".into()),
            checked_at: Local::now(),
        });
        assert!(page.health().is_some());
        assert_eq!(
            page.handle_action(Action::Reload).unwrap(),
            Handled::Command(Command::CheckHealth)
        );
        assert!(page.health().is_none());
    }
}
