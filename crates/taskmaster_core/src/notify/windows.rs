use crate::error::AppError;
use crate::notify::{APP_TITLE, Notifier};
use tauri_winrt_notification::{Duration, Toast};

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, message: &str) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(APP_TITLE)
            .text1(message)
            .duration(Duration::Short)
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }
}
