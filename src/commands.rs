//! Asynchronous side effects.
//!
//! Commands run on their own task so the UI never waits on the platform.
//! They report back only through [`AppMessage`]s.

mod clipboard;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;

pub use clipboard::CopyToClipboardCmd;

#[async_trait]
pub trait Command: Send + 'static {
    /// Short description used in logs.
    fn name(&self) -> String;

    /// Run the command to completion.
    async fn execute(self: Box<Self>, message_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
