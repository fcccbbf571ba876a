use crate::error::AppError;
use crate::notify::{APP_TITLE, Notifier};
use notify_rust::{Notification, Timeout};

const DISPLAY_MILLIS: u32 = 3_000;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, message: &str) -> Result<(), AppError> {
        Notification::new()
            .summary(APP_TITLE)
            .body(message)
            .timeout(Timeout::Milliseconds(DISPLAY_MILLIS))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
