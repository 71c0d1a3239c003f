//! Raw-mode terminal and its input pump.
//!
//! [`Tui`] owns the ratatui terminal. While entered, a background task turns
//! crossterm input, timers and SIGTERM into [`Event`]s on a channel.

use std::io::Stdout;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::cursor;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// After this long the input task is aborted instead of waited for.
const ABORT_AFTER: Duration = Duration::from_millis(500);
/// After this long `exit` gives up on the input task entirely.
const GIVE_UP_AFTER: Duration = Duration::from_secs(2);

pub type Backend = CrosstermBackend<Stdout>;

#[derive(Clone, Debug)]
pub enum Event {
    Init,
    Quit,
    Suspend,
    Error(String),
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Map a crossterm event to ours. Key releases, mouse, paste and focus
/// events are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            Some(match key.code {
                KeyCode::Char('c') if ctrl => Event::Quit,
                KeyCode::Char('z') if ctrl => Event::Suspend,
                _ => Event::Key(key),
            })
        }
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}

pub struct Tui {
    terminal: Terminal<Backend>,
    input_task: JoinHandle<()>,
    cancel: CancellationToken,
    event_tx: UnboundedSender<Event>,
    event_rx: UnboundedReceiver<Event>,
    frame_period: Duration,
    tick_period: Duration,
}

impl Tui {
    /// `frame_rate` and `tick_rate` are in events per second.
    pub fn new(frame_rate: f64, tick_rate: f64) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(Backend::new(std::io::stdout()))?,
            input_task: tokio::spawn(async {}),
            cancel: CancellationToken::new(),
            event_tx,
            event_rx,
            frame_period: Duration::from_secs_f64(frame_rate.recip()),
            tick_period: Duration::from_secs_f64(tick_rate.recip()),
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.spawn_input_task();
        Ok(())
    }

    /// Stop reading input and hand the terminal back to the shell.
    pub fn exit(&mut self) -> Result<()> {
        self.stop_input_task()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Restore the terminal and stop the process with SIGTSTP. Call
    /// [`Tui::enter`] once the shell resumes us.
    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)?;
        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn spawn_input_task(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.input_task = tokio::spawn(pump_events(
            self.event_tx.clone(),
            self.cancel.clone(),
            self.tick_period,
            self.frame_period,
        ));
    }

    fn stop_input_task(&mut self) -> Result<()> {
        self.cancel.cancel();
        let started = Instant::now();
        while !self.input_task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            let waited = started.elapsed();
            if waited >= GIVE_UP_AFTER {
                return Err(eyre!("Input task did not stop within {GIVE_UP_AFTER:?}"));
            }
            if waited >= ABORT_AFTER {
                self.input_task.abort();
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn forward_sigterm(event_tx: UnboundedSender<Event>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                let _ = event_tx.send(Event::Quit);
            }
            Err(e) => warn!("Failed to install SIGTERM handler: {e}"),
        }
    });
}

async fn pump_events(
    event_tx: UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_period: Duration,
    frame_period: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = interval(tick_period);
    let mut frames = interval(frame_period);

    #[cfg(unix)]
    forward_sigterm(event_tx.clone());

    if event_tx.send(Event::Init).is_err() {
        return;
    }

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            next = input.next().fuse() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => Event::Error(e.to_string()),
                None => break,
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
    cancel.cancel();
}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!("Failed to restore terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_ctrl_shortcuts() {
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        let ctrl_z = key(KeyCode::Char('z'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert!(matches!(translate(ctrl_c), Some(Event::Quit)));
        assert!(matches!(translate(ctrl_z), Some(Event::Suspend)));
    }

    #[test]
    fn test_plain_keys_pass_through() {
        let c = key(KeyCode::Char('c'), KeyModifiers::NONE, KeyEventKind::Press);
        assert!(matches!(
            translate(c),
            Some(Event::Key(KeyEvent { code: KeyCode::Char('c'), .. }))
        ));
    }

    #[test]
    fn test_dropped_events() {
        let release = key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        let mouse = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(translate(release).is_none());
        assert!(translate(mouse).is_none());
        assert!(translate(CrosstermEvent::FocusLost).is_none());
        assert!(matches!(
            translate(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
    }
}
