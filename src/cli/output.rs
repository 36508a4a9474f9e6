//! Console output for CLI runs

/// Output helper for consistent formatting
///
/// Progress and results go to stdout; failures go to stderr so a run's
/// problems can be collected with a plain `2>` redirect.
#[derive(Default)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Prints a progress message
    pub fn info(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints a final success message
    pub fn success(&self, message: &str) {
        println!("{}", message);
    }

    /// Prints a non-fatal error message
    pub fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}
