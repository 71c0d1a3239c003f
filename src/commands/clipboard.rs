use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::ui::ToastType;

/// Copies text to the system clipboard and confirms with a toast.
pub struct CopyToClipboardCmd {
    text: String,
    label: String,
}

impl CopyToClipboardCmd {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.label)
    }

    async fn execute(self: Box<Self>, message_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let Self { text, label } = *self;
        // arboard talks to the display server synchronously.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut clipboard = Clipboard::new()?;
            clipboard.set_text(text)?;
            Ok(())
        })
        .await??;

        message_tx.send(AppMessage::ShowToast {
            message: format!("Copied {label}"),
            toast_type: ToastType::Success,
        })?;
        Ok(())
    }
}
