//! Transient confirmation messages ("Task deleted!") shown after a command.

use crate::config::NotificationMode;
use crate::error::AppError;
use std::io::Write;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "TASKMASTER_DISABLE_NOTIFICATIONS";
pub(crate) const APP_TITLE: &str = "taskmaster";

pub trait Notifier {
    fn notify(&self, message: &str) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Prints `✓ <message>` on stderr so stdout stays machine-readable.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) -> Result<(), AppError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "\u{2713} {message}")?;
        Ok(())
    }
}

pub fn notifier_for(mode: NotificationMode) -> Box<dyn Notifier> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Box::new(NoopNotifier);
    }

    match mode {
        NotificationMode::Off => Box::new(NoopNotifier),
        NotificationMode::Console => Box::new(ConsoleNotifier),
        NotificationMode::Desktop => match platform_notifier() {
            Ok(notifier) => notifier,
            Err(err) => {
                tracing::warn!(error = %err, "desktop notifications unavailable, using console");
                Box::new(ConsoleNotifier)
            }
        },
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
