use crate::notification::domain::notifier::Notifier;

/// Writes notifications to the `log` facade at info level.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        log::info!("[{title}] {message}");
    }
}

/// Discards every notification.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifiers_never_fail() {
        LogNotifier.notify("Fire Detected", "Fire detected! Recording video...");
        NullNotifier.notify("", "");
    }
}
