use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::notification::domain::notifier::Notifier;

/// Seconds a desktop notification stays visible where the platform allows it.
const DISPLAY_TIMEOUT_SECS: u32 = 10;

/// Shows a native desktop notification by spawning the platform's
/// notification command without waiting for it.
///
/// - macOS: `osascript -e 'display notification ...'`
/// - Windows: PowerShell balloon tip
/// - Other: `notify-send`
///
/// Spawned commands are kept until they exit and are reaped on later calls,
/// so a long-running watcher does not accumulate zombie processes.
pub struct DesktopNotifier {
    app_name: String,
    children: Mutex<Vec<Child>>,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            children: Mutex::new(Vec::new()),
        }
    }

    /// Reaps exited notification commands and returns how many still run.
    pub fn reap(&self) -> usize {
        let mut children = self.children.lock().unwrap_or_else(|e| e.into_inner());
        children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
        children.len()
    }

    fn launch(&self, mut cmd: Command) {
        self.reap();
        let spawned = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self
                .children
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(child),
            Err(e) => log::warn!("Desktop notification unavailable: {e}"),
        }
    }

    fn command(&self, title: &str, message: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
                escape_quoted(message),
                escape_quoted(&self.app_name),
                escape_quoted(title)
            );
            let mut cmd = Command::new("osascript");
            cmd.args(["-e", &script]);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let script = format!(
                "Add-Type -AssemblyName System.Windows.Forms; \
                 $n = New-Object System.Windows.Forms.NotifyIcon; \
                 $n.Icon = [System.Drawing.SystemIcons]::Warning; \
                 $n.Visible = $true; \
                 $n.ShowBalloonTip({}, '{} - {}', '{}', 'Warning'); \
                 Start-Sleep -Seconds {}; $n.Dispose()",
                DISPLAY_TIMEOUT_SECS * 1000,
                self.app_name.replace('\'', "''"),
                title.replace('\'', "''"),
                message.replace('\'', "''"),
                DISPLAY_TIMEOUT_SECS
            );
            let mut cmd = Command::new("powershell");
            cmd.args(["-NoProfile", "-WindowStyle", "Hidden", "-Command", &script]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("notify-send");
            cmd.args([
                "--app-name",
                &self.app_name,
                "--expire-time",
                &(DISPLAY_TIMEOUT_SECS * 1000).to_string(),
                title,
                message,
            ]);
            cmd
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.launch(self.command(title, message));
    }
}

#[cfg(target_os = "macos")]
fn escape_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
