use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::Theme;
use crate::ui::Component;

const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
        }
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= TOAST_DURATION
    }
}

/// Stack of short-lived notifications in the bottom-right corner.
#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn show(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    #[cfg(test)]
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let toast_height = 3u16;
        let toast_width = 50u16.min(area.width.saturating_sub(4));
        let spacing = 1u16;

        // Newest toast sits at the bottom.
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(toast_height + spacing);
            let Some(y) = area
                .bottom()
                .checked_sub(toast_height + offset + 1)
                .filter(|y| *y >= area.y)
            else {
                break;
            };
            let x = area.x + area.width.saturating_sub(toast_width + 2);
            let toast_area = Rect::new(x, y, toast_width, toast_height);

            let (border_color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Info => (theme.blue(), "ℹ"),
                ToastType::Error => (theme.red(), "✗"),
            };

            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .style(Style::default().bg(theme.surface0()));

            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(block);

            frame.render_widget(Clear, toast_area);
            frame.render_widget(paragraph, toast_area);
        }
    }
}
