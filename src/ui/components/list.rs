use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, List as RatatuiList, ListItem, ListState};

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

const PAGE_STEP: usize = 5;

pub enum ListEvent<T> {
    Changed(T),
    Activated(T),
}

pub trait ListRow {
    fn render_row(&self, theme: &Theme) -> ListItem<'static>;
}

/// Vertical list with keyboard navigation.
///
/// Items are rendered in the order given; the list never sorts, filters or
/// deduplicates them.
pub struct List<T: ListRow + Clone> {
    items: Vec<T>,
    state: ListState,
    title: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl<T: ListRow + Clone> List<T> {
    pub fn new(items: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            items,
            state,
            title: None,
            resolver,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    fn get_change_event(&self, before: Option<usize>) -> EventResult<ListEvent<T>> {
        if let Some(selected) = self.state.selected()
            && Some(selected) != before
            && let Some(item) = self.items.get(selected)
        {
            return ListEvent::Changed(item.clone()).into();
        }
        EventResult::Consumed
    }

    fn select_clamped(&mut self, index: usize) {
        if self.items.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(index.min(self.items.len() - 1)));
        }
    }
}

impl<T: ListRow + Clone> Component for List<T> {
    type Output = ListEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let before = self.state.selected();
        let current = before.unwrap_or(0);

        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.select_clamped(before.map_or(0, |i| i + 1));
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.select_clamped(current.saturating_sub(1));
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.select_clamped(0);
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.select_clamped(usize::MAX);
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.select_clamped(current.saturating_add(PAGE_STEP));
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.select_clamped(current.saturating_sub(PAGE_STEP));
        } else if self.resolver.matches_nav(&key, NavAction::Select) {
            return Ok(match self.selected() {
                Some(item) => ListEvent::Activated(item.clone()).into(),
                None => EventResult::Ignored,
            });
        } else {
            return Ok(EventResult::Ignored);
        }

        Ok(self.get_change_event(before))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = self.items.iter().map(|i| i.render_row(theme)).collect();

        let mut list = RatatuiList::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        if let Some(title) = &self.title {
            list = list.block(
                Block::bordered()
                    .title(title.as_str())
                    .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.surface1())),
            );
        }

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str);

    impl ListRow for Row {
        fn render_row(&self, _theme: &Theme) -> ListItem<'static> {
            ListItem::new(self.0)
        }
    }

    fn list(items: Vec<Row>) -> List<Row> {
        List::new(items, Arc::new(KeyResolver::default()))
    }

    fn press(list: &mut List<Row>, code: KeyCode) -> EventResult<ListEvent<Row>> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_navigation_clamps_at_edges() {
        let mut list = list(vec![Row("a"), Row("b")]);
        assert!(matches!(press(&mut list, KeyCode::Up), EventResult::Consumed));
        assert!(matches!(
            press(&mut list, KeyCode::Down),
            EventResult::Event(ListEvent::Changed(Row("b")))
        ));
        assert!(matches!(press(&mut list, KeyCode::Down), EventResult::Consumed));
        assert_eq!(list.selected(), Some(&Row("b")));
        press(&mut list, KeyCode::Home);
        assert_eq!(list.selected(), Some(&Row("a")));
        press(&mut list, KeyCode::End);
        assert_eq!(list.selected(), Some(&Row("b")));
    }

    #[test]
    fn test_activate_selected() {
        let mut list = list(vec![Row("a"), Row("b")]);
        press(&mut list, KeyCode::Char('j'));
        assert!(matches!(
            press(&mut list, KeyCode::Enter),
            EventResult::Event(ListEvent::Activated(Row("b")))
        ));
    }

    #[test]
    fn test_empty_list_ignores_select() {
        let mut list = list(vec![]);
        assert!(matches!(press(&mut list, KeyCode::Enter), EventResult::Ignored));
        assert!(matches!(press(&mut list, KeyCode::Down), EventResult::Consumed));
        assert!(list.selected().is_none());
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut list = list(vec![Row("a")]);
        assert!(matches!(press(&mut list, KeyCode::Char('x')), EventResult::Ignored));
    }
}
