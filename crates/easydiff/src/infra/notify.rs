//! User-facing error notifications.

/// Host facility for showing a blocking error message to the user.
pub trait Notifier: Send + Sync {
    fn error_message(&self, message: &str);
}

/// Prints notifications to stderr, for the command-line host.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error_message(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
