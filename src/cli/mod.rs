/// Terminal helpers for the `mcp-terminal` binary
///
/// Results go to stdout as JSON so they can be piped; progress and errors go
/// to stderr.
pub mod output;
pub mod progress;

pub use output::{OutputFormat, OutputWriter};
pub use progress::ProgressReporter;
