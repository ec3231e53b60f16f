//! Pretty-printing messages to the console
//!
//! The free functions below are the teacher's own driver-level printers,
//! used for things that never go through the diagnostic bus (bad CLI
//! usage, file I/O failures). [print_error] and [print_warning] are the
//! default [crate::diagnostics::Sink] callbacks the driver registers on
//! the bus's error/warning queues, prefixing each rendered
//! [crate::diagnostics::Diagnostic] the same way the original tool does.

use crate::diagnostics::Diagnostic;
use colored::Colorize;

/// Pretty-print an error message to the console
pub fn error(error_message: String) {
    let error_title = "error:".red().bold();
    eprintln!("{} {}", error_title, error_message);
}

/// Render a queued diagnostic as an error: `Error: <file>:<line>:<col>: ...`
pub fn print_error(diagnostic: &Diagnostic) {
    eprintln!("{}: {}", "Error".red().bold(), diagnostic);
}

/// Render a queued diagnostic as a warning: `Warning: <file>:<line>:<col>: ...`
pub fn print_warning(diagnostic: &Diagnostic) {
    eprintln!("{}: {}", "Warning".yellow().bold(), diagnostic);
}
