//! Permission-gated terminal notifier. Implements NotifierPort.
//!
//! The permission model follows the platform notification API: `Default`
//! until asked, then `Granted` or `Denied`, persisted via PermissionStore.
//! On a non-interactive stdout the channel is unsupported and requests
//! resolve to `Denied` without throwing.

use std::io::{stdout, IsTerminal, Write};
use std::sync::Arc;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;
use inquire::Confirm;
use tracing::info;

use crate::adapters::persistence::PermissionStore;
use crate::domain::{DomainError, NotifyPermission};
use crate::ports::NotifierPort;

pub struct TerminalNotifier {
    store: Arc<PermissionStore>,
}

impl TerminalNotifier {
    pub fn new(store: Arc<PermissionStore>) -> Self {
        Self { store }
    }

    fn supported() -> bool {
        stdout().is_terminal()
    }
}

#[async_trait::async_trait]
impl NotifierPort for TerminalNotifier {
    async fn permission(&self) -> NotifyPermission {
        self.store.permission().await
    }

    async fn request_permission(&self) -> Result<NotifyPermission, DomainError> {
        if !Self::supported() {
            return Ok(NotifyPermission::Denied);
        }
        let current = self.store.permission().await;
        if current != NotifyPermission::Default {
            return Ok(current);
        }
        let granted = Confirm::new("Ativar notificações no terminal?")
            .with_default(true)
            .prompt()
            .map_err(|e| DomainError::Notify(e.to_string()))?;
        let permission = if granted {
            NotifyPermission::Granted
        } else {
            NotifyPermission::Denied
        };
        self.store.set_permission(permission).await?;
        info!(?permission, "notification permission updated");
        Ok(permission)
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), DomainError> {
        if !Self::supported() || self.store.permission().await != NotifyPermission::Granted {
            return Ok(());
        }
        let mut out = stdout();
        let _ = out.execute(SetForegroundColor(Color::Cyan));
        let _ = out.execute(Print(format!("  🔔 {title}: {body}\r\n")));
        let _ = out.execute(ResetColor);
        let _ = out.flush();
        Ok(())
    }
}
