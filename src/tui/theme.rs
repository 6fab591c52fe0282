use ratatui::style::{Color, Modifier, Style};

/// A theme defines the color scheme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,

    // Table colors
    pub header_fg: Color,
    pub header_bg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub row_alt_bg: Color, // For zebra striping

    // Status/feedback colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,

    // Quota badges
    pub quota_all_india: Color,
    pub quota_state: Color,
    pub quota_other: Color,

    // Category badges
    pub category_general: Color,
    pub category_obc: Color,
    pub category_sc: Color,
    pub category_st: Color,
    pub category_other: Color,
}

impl Default for Theme {
    /// Default dark theme
    fn default() -> Self {
        Self {
            name: "Default Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            accent: Color::Magenta,
            header_fg: Color::Cyan,
            header_bg: Color::Reset,
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            row_alt_bg: Color::Rgb(25, 25, 35),
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            quota_all_india: Color::LightGreen,
            quota_state: Color::LightBlue,
            quota_other: Color::LightMagenta,
            category_general: Color::Gray,
            category_obc: Color::LightYellow,
            category_sc: Color::Rgb(244, 114, 182),
            category_st: Color::Rgb(45, 212, 191),
            category_other: Color::Rgb(251, 146, 60),
        }
    }
}

impl Theme {
    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Blue,
            accent: Color::Magenta,
            header_fg: Color::Blue,
            header_bg: Color::Rgb(240, 240, 240),
            selected_fg: Color::White,
            selected_bg: Color::Blue,
            row_alt_bg: Color::Rgb(245, 245, 250),
            success: Color::Green,
            error: Color::Red,
            warning: Color::Rgb(200, 150, 0), // Darker yellow for light bg
            info: Color::Blue,
            quota_all_india: Color::Green,
            quota_state: Color::Blue,
            quota_other: Color::Magenta,
            category_general: Color::DarkGray,
            category_obc: Color::Rgb(180, 120, 0),
            category_sc: Color::Rgb(190, 24, 93),
            category_st: Color::Rgb(15, 118, 110),
            category_other: Color::Rgb(194, 65, 12),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn alt_row_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.row_alt_bg)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn border_for(&self, focused: bool) -> Style {
        if focused {
            self.focused_border_style()
        } else {
            self.border_style()
        }
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Badge colour for a quota value ("All India ...", "State ...", other)
    pub fn quota_style(&self, quota: &str) -> Style {
        let color = if quota.contains("All India") {
            self.quota_all_india
        } else if quota.contains("State") {
            self.quota_state
        } else {
            self.quota_other
        };
        Style::default().fg(color)
    }

    /// Badge colour for a category value
    pub fn category_style(&self, category: &str) -> Style {
        let color = match category {
            "General" => self.category_general,
            "OBC" => self.category_obc,
            "SC" => self.category_sc,
            "ST" => self.category_st,
            _ => self.category_other,
        };
        Style::default().fg(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Default Dark");
        assert_ne!(theme.header_fg, Color::Reset);
        assert_ne!(theme.selected_bg, Color::Reset);
    }

    #[test]
    fn test_light_theme() {
        let theme = Theme::light();
        assert_eq!(theme.background, Color::White);
        assert_eq!(theme.foreground, Color::Black);
    }

    #[test]
    fn test_badge_styles() {
        let theme = Theme::default();
        assert_eq!(theme.quota_style("All India").fg, Some(theme.quota_all_india));
        assert_eq!(theme.quota_style("State Quota").fg, Some(theme.quota_state));
        assert_eq!(theme.quota_style("Deemed").fg, Some(theme.quota_other));
        assert_eq!(theme.category_style("OBC").fg, Some(theme.category_obc));
        // Matching is exact, like the facet filters
        assert_eq!(theme.category_style("obc").fg, Some(theme.category_other));
    }

    #[test]
    fn test_style_helpers() {
        let theme = Theme::default();
        assert!(theme.header_style().add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.border_for(true).fg, Some(theme.border_focused));
        assert_eq!(theme.border_for(false).fg, Some(theme.border));
    }
}
