//! # Notification Module
//! The alert sink the watch loop reports changes to, and its desktop backends.

use crate::error::{Result, WatchError};
use crate::settings::Settings;

/// Something that can surface a change message to the user.
pub trait Alert {
    fn alert(&mut self, message: &str) -> Result<()>;
}

impl<T: Alert + ?Sized> Alert for Box<T> {
    fn alert(&mut self, message: &str) -> Result<()> {
        (**self).alert(message)
    }
}

/// Writes alerts to the log only. Used when desktop notifications are off.
#[derive(Debug, Default)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&mut self, message: &str) -> Result<()> {
        log::warn!("{}", message);
        Ok(())
    }
}

/// Shows alerts as desktop notifications.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    title: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, title: impl Into<String>) -> Self {
        DesktopNotifier {
            app_name: app_name.into(),
            title: title.into(),
        }
    }
}

impl Alert for DesktopNotifier {
    fn alert(&mut self, message: &str) -> Result<()> {
        show_notification(&self.app_name, &self.title, message)?;
        log::info!("Notification shown: {}", message);
        Ok(())
    }
}

/// Picks the alert sink described by the settings.
pub fn from_settings(settings: &Settings) -> Box<dyn Alert> {
    if settings.desktop_notifications {
        Box::new(DesktopNotifier::new(
            &settings.app_name,
            &settings.notification_title,
        ))
    } else {
        Box::new(LogAlert)
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_notification(app_name: &str, title: &str, message: &str) -> Result<()> {
    use std::process::Command;

    let status = Command::new("notify-send")
        .arg("--app-name")
        .arg(app_name)
        .arg(title)
        .arg(message)
        .status()
        .map_err(|e| WatchError::Alert(format!("could not run notify-send: {}", e)))?;
    if !status.success() {
        return Err(WatchError::Alert(format!("notify-send exited with {}", status)));
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn show_notification(_app_name: &str, title: &str, message: &str) -> Result<()> {
    use std::process::Command;

    let script = format!(
        "display notification {} with title {}",
        applescript_string(message),
        applescript_string(title)
    );
    let output = Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .map_err(|e| WatchError::Alert(format!("could not run osascript: {}", e)))?;
    if !output.status.success() {
        return Err(WatchError::Alert(format!(
            "osascript failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn applescript_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(windows)]
fn show_notification(_app_name: &str, title: &str, message: &str) -> Result<()> {
    use windows_sys::Win32::System::RemoteDesktop::{WTSGetActiveConsoleSessionId, WTSSendMessageW};
    use windows_sys::Win32::UI::WindowsAndMessaging::{MB_ICONWARNING, MB_OK};

    let title: Vec<u16> = title.encode_utf16().collect();
    let message: Vec<u16> = message.encode_utf16().collect();
    let mut response = 0;

    // bWait = 0: the message box is shown without blocking the poll loop.
    let shown = unsafe {
        WTSSendMessageW(
            0 as _,
            WTSGetActiveConsoleSessionId(),
            title.as_ptr(),
            (title.len() * 2) as u32,
            message.as_ptr(),
            (message.len() * 2) as u32,
            MB_OK | MB_ICONWARNING,
            0,
            &mut response,
            0,
        )
    };
    if shown == 0 {
        return Err(WatchError::Alert(format!(
            "WTSSendMessageW failed: {}",
            std::io::Error::last_os_error()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_alert_never_fails() {
        assert!(LogAlert.alert("Hash mismatch for a.txt!").is_ok());
    }

    #[test]
    fn settings_without_desktop_use_the_log_sink() {
        let settings = Settings {
            desktop_notifications: false,
            ..Settings::default()
        };
        let mut sink = from_settings(&settings);
        assert!(sink.alert("Hash mismatch for b.txt!").is_ok());
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn applescript_strings_are_escaped() {
        assert_eq!(applescript_string(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }
}
