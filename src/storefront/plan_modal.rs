use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::catalog::{PlanRecord, ServiceRecord};
use crate::config::{GlobalAction, KeyResolver, NavAction, PlanAction};
use crate::storefront::Selection;
use crate::ui::{EventResult, Result};

pub enum PlanEvent {
    /// The highlighted plan was activated.
    Selected {
        service: Arc<ServiceRecord>,
        plan: PlanRecord,
    },
    /// Copy the hand-off link of the highlighted plan.
    CopyLink {
        service: Arc<ServiceRecord>,
        plan: PlanRecord,
    },
    Dismissed,
}

/// Overlay listing the plans of the open service.
///
/// The modal never changes the selection itself: it reads it and reports
/// what the visitor did. Its only own state is which plan card is
/// highlighted.
pub struct PlanModal {
    highlighted: usize,
    resolver: Arc<KeyResolver>,
}

impl PlanModal {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            highlighted: 0,
            resolver,
        }
    }

    /// Move the highlight back to the first plan.
    pub const fn reset(&mut self) {
        self.highlighted = 0;
    }

    fn highlighted_plan(&self, service: &Arc<ServiceRecord>) -> Option<(Arc<ServiceRecord>, PlanRecord)> {
        service
            .plans
            .get(self.highlighted)
            .map(|plan| (Arc::clone(service), plan.clone()))
    }

    pub fn handle_key(&mut self, key: KeyEvent, selection: &Selection) -> Result<EventResult<PlanEvent>> {
        let Some(service) = selection.service() else {
            return Ok(EventResult::Ignored);
        };
        let last = service.plans.len().saturating_sub(1);
        let resolver = Arc::clone(&self.resolver);
        let nav = |action| resolver.matches_nav(&key, action);

        if resolver.matches_global(&key, GlobalAction::Back) {
            return Ok(PlanEvent::Dismissed.into());
        }
        if nav(NavAction::Left) || nav(NavAction::Up) {
            self.highlighted = self.highlighted.saturating_sub(1);
            return Ok(EventResult::Consumed);
        }
        if nav(NavAction::Right) || nav(NavAction::Down) {
            self.highlighted = (self.highlighted + 1).min(last);
            return Ok(EventResult::Consumed);
        }
        if nav(NavAction::Home) {
            self.highlighted = 0;
            return Ok(EventResult::Consumed);
        }
        if nav(NavAction::End) {
            self.highlighted = last;
            return Ok(EventResult::Consumed);
        }
        if nav(NavAction::Select) {
            return Ok(match self.highlighted_plan(service) {
                Some((service, plan)) => PlanEvent::Selected { service, plan }.into(),
                None => EventResult::Consumed,
            });
        }
        if resolver.matches_plan(&key, PlanAction::CopyLink) {
            return Ok(match self.highlighted_plan(service) {
                Some((service, plan)) => PlanEvent::CopyLink { service, plan }.into(),
                None => EventResult::Consumed,
            });
        }

        Ok(EventResult::Ignored)
    }

    /// Draw the modal over `area`. Draws nothing at all while closed.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, selection: &Selection) {
        let Selection::Open(service) = selection else {
            return;
        };

        let popup_area = area.centered(Constraint::Percentage(90), Constraint::Percentage(85));
        frame.render_widget(Clear, popup_area);

        let hints = format!(
            " {} choose  {} select  {} copy link  {} close ",
            self.resolver.display_nav(NavAction::Right),
            self.resolver.display_nav(NavAction::Select),
            self.resolver.display_plan(PlanAction::CopyLink),
            self.resolver.display_global(GlobalAction::Back),
        );
        let block = Block::bordered()
            .title(format!(" {} {} ", service.logo, service.name))
            .title_style(
                Style::default()
                    .fg(theme.accent(&service.color))
                    .add_modifier(Modifier::BOLD),
            )
            .title_bottom(Line::from(hints).style(Style::default().fg(theme.overlay1())))
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.accent(&service.border_color)))
            .style(Style::default().bg(theme.base()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let [description_area, heading_area, cards_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(service.description.as_str())
                .style(Style::default().fg(theme.subtext0()))
                .alignment(Alignment::Center),
            description_area,
        );
        frame.render_widget(
            Paragraph::new("Choose Your Plan")
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            heading_area,
        );

        if service.plans.is_empty() {
            return;
        }

        let cards = Layout::horizontal(service.plans.iter().map(|_| Constraint::Fill(1)))
            .spacing(1)
            .split(cards_area);
        for (index, (plan, card_area)) in service.plans.iter().zip(cards.iter()).enumerate() {
            let card = PlanCard {
                plan,
                accent: theme.accent(&service.color),
                highlighted: index == self.highlighted,
            };
            card.render(frame, *card_area, theme);
        }
    }
}

struct PlanCard<'a> {
    plan: &'a PlanRecord,
    accent: Color,
    highlighted: bool,
}

impl PlanCard<'_> {
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let plan = self.plan;
        let border_color = if self.highlighted {
            theme.lavender()
        } else if plan.popular {
            self.accent
        } else {
            theme.surface1()
        };

        let mut block = Block::bordered()
            .border_type(if self.highlighted {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(Style::default().fg(border_color));
        if plan.popular {
            block = block.title(
                Line::from(Span::styled(
                    " ★ Most Popular ",
                    Style::default()
                        .fg(theme.base())
                        .bg(theme.yellow())
                        .add_modifier(Modifier::BOLD),
                ))
                .centered(),
            );
        }

        let check_color = if plan.popular { self.accent } else { theme.green() };
        let mut lines = vec![
            Line::from(Span::styled(
                plan.duration.clone(),
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(vec![
                Span::styled(
                    plan.price.clone(),
                    Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(plan.currency.clone(), Style::default().fg(theme.subtext0())),
            ])
            .centered(),
            Line::from(""),
        ];
        lines.extend(plan.features.iter().map(|feature| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(check_color)),
                Span::styled(feature.clone(), Style::default().fg(theme.text())),
            ])
        }));
        lines.push(Line::from(""));

        let button_style = if self.highlighted {
            Style::default()
                .fg(theme.base())
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent)
        };
        lines.push(Line::from(Span::styled("[ Select Plan ]", button_style)).centered());

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}
