use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::Theme;
use crate::ui::Keybinding;

/// Bottom bar with the store summary and the active key hints.
pub struct StatusBar {
    summary: String,
}

impl StatusBar {
    pub fn new(service_count: usize) -> Self {
        let noun = if service_count == 1 { "service" } else { "services" };
        Self {
            summary: format!("{service_count} {noun}"),
        }
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        keybindings: &[Keybinding],
    ) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()))
            .style(Style::default().bg(theme.mantle()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [summary_area, hints_area] =
            Layout::horizontal([Constraint::Length(24), Constraint::Min(10)]).areas(inner);

        let summary = Line::from(vec![
            Span::styled(
                "DigitalHub",
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" · ", Style::default().fg(theme.overlay0())),
            Span::styled(self.summary.as_str(), Style::default().fg(theme.subtext0())),
        ]);
        frame.render_widget(Paragraph::new(summary), summary_area);

        let key_style = Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.subtext0());
        let mut spans = Vec::new();
        for kb in keybindings.iter().filter(|kb| kb.hint) {
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(kb.key.clone(), key_style));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(kb.description.clone(), desc_style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), hints_area);
    }
}
