/// Best-effort, fire-and-forget user notification.
///
/// Implementations must return promptly and swallow their own failures;
/// nothing a notifier does may affect the detection loop.
pub trait Notifier: Send {
    fn notify(&self, title: &str, message: &str);
}
