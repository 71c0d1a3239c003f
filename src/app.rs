use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::catalog::Catalog;
use crate::commands::Command;
use crate::config::{GlobalAction, KeyResolver};
use crate::handoff::Launcher;
use crate::storefront::{Storefront, StorefrontMsg};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, EventResult, HelpEvent, HelpOverlay, Keybinding, KeybindingSection, StatusBar,
    Toast, ToastManager, ToastType,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 4.0;

/// Application-level messages.
#[derive(Debug, Clone)]
pub enum AppMessage {
    // === Lifecycle ===
    /// Periodic tick for toast expiry
    Tick,
    /// Render the UI
    Render,
    /// Terminal resized
    Resize(u16, u16),
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Resume from suspension
    Resume,
    /// Quit the application
    Quit,
    /// Clear and redraw the screen
    ClearScreen,

    // === Feedback ===
    /// Show a notification
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    /// Display an error to the user
    DisplayError(String),
    /// Display help overlay
    DisplayHelp,
}

pub struct App {
    storefront: Storefront,
    help: Option<HelpOverlay>,
    toasts: ToastManager,
    status_bar: StatusBar,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    should_quit: bool,
    should_suspend: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        catalog: &Catalog,
        resolver: Arc<KeyResolver>,
        theme: Theme,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let storefront = Storefront::new(catalog, Arc::clone(&resolver), launcher);
        Self {
            status_bar: StatusBar::new(storefront.service_count()),
            storefront,
            help: None,
            toasts: ToastManager::default(),
            resolver,
            theme,
            should_quit: false,
            should_suspend: false,
            message_tx,
            message_rx,
        }
    }

    /// Open the plans of a service before the first frame is drawn.
    ///
    /// # Errors
    /// Returns an error if the catalog has no such service.
    pub fn open_service(&mut self, id: &str) -> Result<()> {
        self.storefront.open_service(id)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.message_tx.send(AppMessage::Resume)?;
                self.message_tx.send(AppMessage::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Quit => self.message_tx.send(AppMessage::Quit)?,
            Event::Suspend => self.message_tx.send(AppMessage::Suspend)?,
            Event::Tick => self.message_tx.send(AppMessage::Tick)?,
            Event::Render => self.message_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => self.message_tx.send(AppMessage::Resize(width, height))?,
            Event::Error(e) => self.message_tx.send(AppMessage::DisplayError(e))?,
            Event::Key(key) => self.handle_key(key)?,
            Event::Init => {}
        }
        Ok(())
    }

    /// Route a key through the layers: help overlay, storefront, global keys.
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(help) = &mut self.help {
            if let EventResult::Event(HelpEvent::Close) = help.handle_key(key)? {
                self.help = None;
            }
            return Ok(());
        }

        match self.storefront.handle_key(key)? {
            EventResult::Event(StorefrontMsg::Toast(toast)) => {
                self.toasts.show(toast);
                return Ok(());
            }
            EventResult::Event(StorefrontMsg::Run(command)) => {
                self.spawn_command(command);
                return Ok(());
            }
            EventResult::Consumed => return Ok(()),
            EventResult::Ignored => {}
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.message_tx.send(AppMessage::Quit)?;
        } else if self.resolver.matches_global(&key, GlobalAction::Help) {
            self.message_tx.send(AppMessage::DisplayHelp)?;
        }
        Ok(())
    }

    fn spawn_command(&self, command: Box<dyn Command>) {
        let name = command.name();
        debug!("Running command: {name}");
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = command.execute(message_tx.clone()).await {
                error!("Command '{name}' failed: {e:?}");
                let _ = message_tx.send(AppMessage::DisplayError(format!("{name} failed: {e}")));
            }
        });
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            if !matches!(message, AppMessage::Tick | AppMessage::Render) {
                debug!("Handling message: {message:?}");
            }

            match message {
                AppMessage::Render => self.draw(tui)?,
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.draw(tui)?;
                }
                AppMessage::ClearScreen => tui.clear()?,
                message => self.update(message),
            }
        }
        Ok(())
    }

    /// Apply a message that does not touch the terminal.
    fn update(&mut self, message: AppMessage) {
        match message {
            AppMessage::Tick => self.toasts.handle_tick(),
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::Quit => {
                info!("Quitting");
                self.should_quit = true;
            }
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::DisplayError(message) => {
                error!("{message}");
                self.toasts.show(Toast::new(message, ToastType::Error));
            }
            AppMessage::DisplayHelp => self.show_help(),
            AppMessage::Render | AppMessage::Resize(..) | AppMessage::ClearScreen => {}
        }
    }

    fn show_help(&mut self) {
        let r = &self.resolver;
        let mut sections = vec![KeybindingSection::new(
            "Global",
            vec![
                Keybinding::new(format!("{}/Ctrl+c", r.display_global(GlobalAction::Quit)), "Quit"),
                Keybinding::new(r.display_global(GlobalAction::Help), "Toggle help"),
                Keybinding::new("Ctrl+z", "Suspend"),
            ],
        )];
        sections.extend(self.storefront.help_sections());
        self.help = Some(HelpOverlay::new(sections, Arc::clone(&self.resolver)));
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let mut keybindings = self.storefront.keybindings();
        keybindings.push(Keybinding::hint(
            self.resolver.display_global(GlobalAction::Help),
            "help",
        ));
        keybindings.push(Keybinding::hint(
            self.resolver.display_global(GlobalAction::Quit),
            "quit",
        ));
        keybindings
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let theme = self.theme;
        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        self.storefront.render(frame, body, &theme);
        self.status_bar
            .render_with_keybindings(frame, footer, &theme, &self.keybindings());
        self.toasts.render(frame, body, &theme);
        if let Some(help) = &mut self.help {
            help.render(frame, area, &theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::handoff::testing::RecordingLauncher;
    use crate::ui::testing::buffer_lines;

    fn app() -> (App, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let app = App::new(
            &Catalog::bundled().unwrap(),
            Arc::new(KeyResolver::default()),
            Theme::default(),
            Box::new(launcher.clone()),
        );
        (app, launcher)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn pending(app: &mut App) -> Vec<AppMessage> {
        std::iter::from_fn(|| app.message_rx.try_recv().ok()).collect()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn test_quit_key() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(matches!(pending(&mut app).as_slice(), [AppMessage::Quit]));
        app.update(AppMessage::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_blocks_storefront() {
        let (mut app, launcher) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(pending(&mut app).as_slice(), [AppMessage::DisplayHelp]));
        app.update(AppMessage::DisplayHelp);

        press(&mut app, KeyCode::Char('w'));
        assert!(launcher.urls().is_empty());
        assert!(screen(&mut app).contains("Copy order link"));

        press(&mut app, KeyCode::Esc);
        assert!(app.help.is_none());
    }

    #[test]
    fn test_help_lists_global_keys_first() {
        let (mut app, _) = app();
        app.update(AppMessage::DisplayHelp);
        let lines: Vec<String> = screen(&mut app).lines().map(str::to_string).collect();

        let row_of = |needle: &str| lines.iter().position(|line| line.contains(needle)).unwrap();
        assert!(row_of("── Global ──") < row_of("── Catalog ──"));
        assert!(lines[row_of("Quit")].contains("q/Ctrl+c"));
        assert!(lines[row_of("Toggle help")].contains('?'));
        assert!(lines[row_of("Suspend")].contains("Ctrl+z"));
    }

    #[test]
    fn test_plan_selection_shows_toast() {
        let (mut app, launcher) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(launcher.urls().len(), 1);
        assert_eq!(app.toasts.visible().count(), 1);
        assert!(app.storefront.selection().is_open());
    }

    #[test]
    fn test_error_message_becomes_toast() {
        let (mut app, _) = app();
        app.update(AppMessage::DisplayError("boom".to_string()));
        assert!(screen(&mut app).contains("boom"));
    }

    #[test]
    fn test_status_bar_lists_service_count() {
        let (mut app, _) = app();
        let text = screen(&mut app);
        assert!(text.contains("6 services"));
        assert!(text.contains("quit"));
    }

    #[test]
    fn test_open_service_on_start() {
        let (mut app, _) = app();
        app.open_service("spotify").unwrap();
        assert!(screen(&mut app).contains("Choose Your Plan"));
        assert!(app.open_service("nope").is_err());
    }
}
