//! Side-channel operator notifications.
//!
//! The toast rendering itself lives in the host UI layer; this trait is
//! the seam the dispatcher pushes through.

/// Receiver for transient success/failure notices.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that drops everything. Useful for headless flows and screens
/// without a toast region.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
