//! The storefront screen.
//!
//! [`Storefront`] coordinates the service list, the plan modal and the
//! WhatsApp hand-off. It is the only owner of the [`Selection`]; the modal
//! receives it by shared reference and reports back through events.

mod plan_modal;
mod service_list;

use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tracing::{debug, info};

use crate::Theme;
use crate::catalog::{Catalog, PlanRecord, ServiceRecord};
use crate::commands::{Command, CopyToClipboardCmd};
use crate::config::{GlobalAction, KeyResolver, NavAction, PlanAction};
use crate::handoff::{self, Launcher};
use crate::ui::{Component, EventResult, Keybinding, KeybindingSection, Toast, ToastType};

use plan_modal::{PlanEvent, PlanModal};
use service_list::ServiceListView;

/// Which service, if any, has its plans open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Closed,
    Open(Arc<ServiceRecord>),
}

impl Selection {
    /// Show the plans of `service`, replacing whatever was open.
    pub fn open(&mut self, service: Arc<ServiceRecord>) {
        *self = Self::Open(service);
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub const fn service(&self) -> Option<&Arc<ServiceRecord>> {
        match self {
            Self::Open(service) => Some(service),
            Self::Closed => None,
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// What the storefront asks the application to do after a key press.
pub enum StorefrontMsg {
    Toast(Toast),
    Run(Box<dyn Command>),
}

pub struct Storefront {
    catalog: Catalog,
    selection: Selection,
    service_list: ServiceListView,
    plan_modal: PlanModal,
    launcher: Box<dyn Launcher>,
    resolver: Arc<KeyResolver>,
}

impl Storefront {
    pub fn new(catalog: &Catalog, resolver: Arc<KeyResolver>, launcher: Box<dyn Launcher>) -> Self {
        Self {
            catalog: catalog.clone(),
            selection: Selection::Closed,
            service_list: ServiceListView::new(catalog.services(), Arc::clone(&resolver)),
            plan_modal: PlanModal::new(Arc::clone(&resolver)),
            launcher,
            resolver,
        }
    }

    #[cfg(test)]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn service_count(&self) -> usize {
        self.service_list.service_count()
    }

    pub fn handle_service_click(&mut self, service: Arc<ServiceRecord>) {
        info!(service = %service.id, "Opening plans");
        self.plan_modal.reset();
        self.selection.open(service);
    }

    pub fn handle_close_modal(&mut self) {
        debug!("Closing plans");
        self.selection.close();
    }

    /// Hand the chosen plan off to WhatsApp. The modal stays open.
    pub fn handle_select_plan(&self, service: &ServiceRecord, plan: &PlanRecord) -> Toast {
        info!(service = %service.id, plan = %plan.duration, "Plan selected");
        let url = handoff::plan_handoff_url(&self.catalog.contact().whatsapp, service, plan);
        self.launcher.launch(&url);
        Toast::new(
            format!("Opening WhatsApp for {} {}", service.name, plan.duration),
            ToastType::Info,
        )
    }

    /// Open a chat with the default contact message.
    pub fn handle_contact(&self) -> Toast {
        let contact = self.catalog.contact();
        let url = handoff::build_handoff_url(&contact.whatsapp, &contact.message, &[]);
        self.launcher.launch(&url);
        Toast::new("Opening WhatsApp chat", ToastType::Info)
    }

    /// Open the plans of the service with the given id.
    ///
    /// # Errors
    /// Returns an error if the catalog has no such service.
    pub fn open_service(&mut self, id: &str) -> Result<()> {
        let service = self
            .catalog
            .service(id)
            .ok_or_else(|| eyre!("No service with id '{id}' in the catalog"))?;
        self.handle_service_click(service);
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<StorefrontMsg>> {
        let result: EventResult<StorefrontMsg> = if self.selection.is_open() {
            match self.plan_modal.handle_key(key, &self.selection)? {
                EventResult::Event(PlanEvent::Selected { service, plan }) => {
                    StorefrontMsg::Toast(self.handle_select_plan(&service, &plan)).into()
                }
                EventResult::Event(PlanEvent::CopyLink { service, plan }) => {
                    let phone = &self.catalog.contact().whatsapp;
                    let url = handoff::plan_handoff_url(phone, &service, &plan);
                    let label = format!("{} {} link", service.name, plan.duration);
                    StorefrontMsg::Run(Box::new(CopyToClipboardCmd::new(url, label))).into()
                }
                EventResult::Event(PlanEvent::Dismissed) => {
                    self.handle_close_modal();
                    EventResult::Consumed
                }
                EventResult::Consumed => EventResult::Consumed,
                EventResult::Ignored => EventResult::Ignored,
            }
        } else {
            match self.service_list.handle_key(key)? {
                EventResult::Event(service) => {
                    self.handle_service_click(service);
                    EventResult::Consumed
                }
                EventResult::Consumed => EventResult::Consumed,
                EventResult::Ignored => EventResult::Ignored,
            }
        };

        if !result.is_consumed() && self.resolver.matches_global(&key, GlobalAction::Contact) {
            return Ok(StorefrontMsg::Toast(self.handle_contact()).into());
        }
        Ok(result)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [header_area, list_area, perks_area] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(area);

        render_header(frame, header_area, theme);
        self.service_list.render(frame, list_area, theme);
        render_perks(frame, perks_area, theme);
        self.plan_modal.render(frame, area, theme, &self.selection);
    }

    /// Keys available in the current state.
    pub fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let contact = Keybinding::hint(r.display_global(GlobalAction::Contact), "contact us");
        if self.selection.is_open() {
            vec![
                Keybinding::hint(
                    format!("{}/{}", r.display_nav(NavAction::Left), r.display_nav(NavAction::Right)),
                    "choose plan",
                ),
                Keybinding::hint(r.display_nav(NavAction::Select), "select plan"),
                Keybinding::hint(r.display_plan(PlanAction::CopyLink), "copy link"),
                Keybinding::hint(r.display_global(GlobalAction::Back), "close"),
                contact,
            ]
        } else {
            vec![
                Keybinding::hint(
                    format!("{}/{}", r.display_nav(NavAction::Up), r.display_nav(NavAction::Down)),
                    "browse",
                ),
                Keybinding::hint(r.display_nav(NavAction::Select), "view plans"),
                contact,
            ]
        }
    }

    pub fn help_sections(&self) -> Vec<KeybindingSection> {
        let r = &self.resolver;
        vec![
            KeybindingSection::new(
                "Catalog",
                vec![
                    Keybinding::new(r.display_nav(NavAction::Up), "Previous service"),
                    Keybinding::new(r.display_nav(NavAction::Down), "Next service"),
                    Keybinding::new(r.display_nav(NavAction::Home), "First service"),
                    Keybinding::new(r.display_nav(NavAction::End), "Last service"),
                    Keybinding::new(r.display_nav(NavAction::Select), "View plans"),
                    Keybinding::new(r.display_global(GlobalAction::Contact), "Contact us on WhatsApp"),
                ],
            ),
            KeybindingSection::new(
                "Plans",
                vec![
                    Keybinding::new(r.display_nav(NavAction::Left), "Previous plan"),
                    Keybinding::new(r.display_nav(NavAction::Right), "Next plan"),
                    Keybinding::new(r.display_nav(NavAction::Select), "Order plan on WhatsApp"),
                    Keybinding::new(r.display_plan(PlanAction::CopyLink), "Copy order link"),
                    Keybinding::new(r.display_global(GlobalAction::Back), "Close plans"),
                ],
            ),
        ]
    }
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.surface1()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand_area, badges_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(30)]).areas(inner);

    let brand = vec![
        Line::from(vec![
            Span::styled("⚡ ", Style::default().fg(theme.yellow())),
            Span::styled(
                "DigitalHub",
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            "Premium Digital Services",
            Style::default().fg(theme.subtext0()),
        )),
        Line::from(Span::styled(
            "Access the world's best streaming, music, and design platforms. \
             Affordable prices, instant activation, and premium support.",
            Style::default().fg(theme.overlay1()),
        )),
    ];
    frame.render_widget(Paragraph::new(brand), brand_area);

    let badges = Line::from(vec![
        Span::styled("🛡 Secure", Style::default().fg(theme.green())),
        Span::raw("   "),
        Span::styled("⏱ Instant Access", Style::default().fg(theme.blue())),
    ])
    .right_aligned();
    frame.render_widget(Paragraph::new(badges), badges_area);
}

/// The "Why Choose DigitalHub?" strip under the catalog.
fn render_perks(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::bordered()
        .title(Line::from(" Why Choose DigitalHub? ").centered())
        .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.surface1()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let perks = [
        ("⚡", "Instant Activation", theme.yellow()),
        ("🛡", "100% Secure", theme.green()),
        ("☎", "24/7 Support", theme.blue()),
    ];
    let columns = Layout::horizontal([Constraint::Fill(1); 3]).split(inner);
    for ((icon, title, color), column) in perks.into_iter().zip(columns.iter()) {
        let line = Line::from(Span::styled(
            format!("{icon} {title}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .centered();
        frame.render_widget(Paragraph::new(line), *column);
    }
}
