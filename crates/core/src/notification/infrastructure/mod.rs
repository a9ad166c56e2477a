pub mod desktop_notifier;
pub mod log_notifier;
