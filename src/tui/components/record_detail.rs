use crate::core::{SeatRecord, CUTOFF_POSITIONS, CUTOFF_YEARS};
use crate::tui::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Detail pane for the selected row: bond terms, beds and every cut-off rank
pub struct RecordDetail;

impl RecordDetail {
    fn field(label: &str, value: String, theme: &Theme) -> Vec<Span<'static>> {
        vec![
            Span::styled(format!("{}: ", label), theme.muted_style()),
            Span::raw(value),
            Span::raw("   "),
        ]
    }

    pub fn lines(record: &SeatRecord, theme: &Theme) -> Vec<Line<'static>> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(vec![
            Span::styled(record.institute.clone(), bold),
            Span::raw(" - "),
            Span::raw(record.course.clone()),
        ])];

        let mut terms = Self::field("Bond", format!("{} yrs", record.bond_years), theme);
        if !record.bond_penalty.is_empty() {
            terms.extend(Self::field("Penalty", record.bond_penalty.clone(), theme));
        }
        terms.extend(Self::field("Beds", record.beds.to_string(), theme));
        terms.extend(Self::field("Seats", record.seats.to_string(), theme));
        lines.push(Line::from(terms));

        for year in CUTOFF_YEARS {
            let Some(ranks) = record.cutoffs.for_year(year) else {
                continue;
            };
            let mut spans = vec![Span::styled(format!("CR {}  ", year), theme.header_style())];
            for (idx, rank) in ranks.iter().enumerate().take(CUTOFF_POSITIONS) {
                spans.push(Span::styled(format!("{}:", idx + 1), theme.muted_style()));
                spans.push(Span::raw(format!("{:<8}", rank.to_string())));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    pub fn render(frame: &mut Frame, area: Rect, record: Option<&SeatRecord>, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .border_style(theme.border_style());

        let lines = match record {
            Some(record) => Self::lines(record, theme),
            None => vec![Line::from(Span::styled("No record selected", theme.muted_style()))],
        };
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CutoffRank;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_detail_lists_all_cutoffs() {
        let mut record = SeatRecord {
            institute: "AIIMS New Delhi".into(),
            course: "MD Medicine".into(),
            bond_years: 3,
            bond_penalty: "25 Lakh".into(),
            beds: 2500,
            ..Default::default()
        };
        record.cutoffs.year_2023[0] = CutoffRank::Rank(42);
        record.cutoffs.year_2024[4] = CutoffRank::Rank(9001);

        let rendered = text(&RecordDetail::lines(&record, &Theme::default()));
        assert!(rendered.contains("AIIMS New Delhi - MD Medicine"));
        assert!(rendered.contains("Bond: 3 yrs"));
        assert!(rendered.contains("Penalty: 25 Lakh"));
        assert!(rendered.contains("Beds: 2500"));
        assert!(rendered.contains("CR 2023"));
        assert!(rendered.contains("1:42"));
        assert!(rendered.contains("5:9001"));
        assert!(rendered.contains("2:-"));
    }
}
