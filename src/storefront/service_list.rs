use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use crate::Theme;
use crate::catalog::ServiceRecord;
use crate::config::KeyResolver;
use crate::ui::{Component, EventResult, List, ListEvent, ListRow, Result};

#[derive(Clone)]
struct ServiceTile(Arc<ServiceRecord>);

impl ListRow for ServiceTile {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        let service = &self.0;
        let accent = theme.accent(&service.color);

        ListItem::new(vec![
            Line::from(vec![
                Span::raw(format!("{} ", service.logo)),
                Span::styled(
                    service.name.clone(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("   {}", service.description),
                Style::default().fg(theme.subtext0()),
            )),
            Line::from(Span::styled(
                "   View Plans ›",
                Style::default().fg(accent).add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ])
    }
}

/// One selectable tile per catalog service, in catalog order.
///
/// Activating a tile emits that tile's record. The view keeps no state
/// besides the highlighted row.
pub struct ServiceListView {
    list: List<ServiceTile>,
}

impl ServiceListView {
    pub fn new(services: &[Arc<ServiceRecord>], resolver: Arc<KeyResolver>) -> Self {
        let tiles = services.iter().cloned().map(ServiceTile).collect();
        Self {
            list: List::new(tiles, resolver).with_title(" Premium Digital Services "),
        }
    }

    pub fn service_count(&self) -> usize {
        self.list.items().len()
    }
}

impl Component for ServiceListView {
    type Output = Arc<ServiceRecord>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match self.list.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(tile)) => tile.0.into(),
            EventResult::Event(ListEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.list.render(frame, area, theme);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::ui::testing::buffer_lines;

    fn service(id: &str, name: &str) -> Arc<ServiceRecord> {
        Arc::new(ServiceRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            logo: "*".to_string(),
            color: "from-blue-500 to-blue-600".to_string(),
            bg_color: String::new(),
            border_color: String::new(),
            plans: vec![],
        })
    }

    fn services() -> Vec<Arc<ServiceRecord>> {
        vec![
            service("a", "Alpha"),
            service("b", "Bravo"),
            service("c", "Charlie"),
        ]
    }

    fn press(view: &mut ServiceListView, code: KeyCode) -> EventResult<Arc<ServiceRecord>> {
        view.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_one_tile_per_service_in_order() {
        let mut view = ServiceListView::new(&services(), Arc::new(KeyResolver::default()));
        assert_eq!(view.service_count(), 3);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), &Theme::default()))
            .unwrap();
        let lines = buffer_lines(terminal.backend().buffer());

        let row_of = |name: &str| lines.iter().position(|line| line.contains(name)).unwrap();
        assert!(row_of("Alpha") < row_of("Bravo"));
        assert!(row_of("Bravo") < row_of("Charlie"));
        assert_eq!(
            lines.iter().filter(|line| line.contains("View Plans")).count(),
            3
        );
    }

    #[test]
    fn test_activating_tile_emits_its_record() {
        for (index, expected) in services().iter().enumerate() {
            let mut view = ServiceListView::new(&services(), Arc::new(KeyResolver::default()));
            for _ in 0..index {
                assert_eq!(press(&mut view, KeyCode::Down), EventResult::Consumed);
            }
            assert_eq!(
                press(&mut view, KeyCode::Enter),
                EventResult::Event(Arc::clone(expected))
            );
        }
    }

    #[test]
    fn test_empty_catalog() {
        let mut view = ServiceListView::new(&[], Arc::new(KeyResolver::default()));
        assert_eq!(view.service_count(), 0);
        assert_eq!(press(&mut view, KeyCode::Enter), EventResult::Ignored);
    }
}
