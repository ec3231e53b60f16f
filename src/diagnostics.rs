//! Position-tagged diagnostics and the notification bus that carries them
//!
//! A [Diagnostic] is a message anchored to a source location, with a caret
//! highlighter under the offending span. [NotificationBus] keeps three
//! independent queues — diagnostic, error, warning — each with its own set
//! of callback [Sink]s, mirroring the three streams the assembler driver
//! needs to tell "this should fail the build" apart from "this is just a
//! style note".

use colored::Colorize;
use std::fmt;

/// A single position-tagged message plus enough context to render a caret
/// underline beneath the offending span.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub source_line: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        column: usize,
        length: usize,
        source_line: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            column,
            length,
            source_line: source_line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}:{}:{}: {}",
            self.file.green(),
            self.line,
            self.column,
            self.message
        )?;
        if !self.source_line.is_empty() {
            let underline = if self.length > 0 {
                format!("^{}", "~".repeat(self.length - 1))
            } else {
                "^".to_string()
            };
            writeln!(f, "{}", self.source_line)?;
            write!(
                f,
                "{}{}",
                " ".repeat(self.column),
                underline.magenta()
            )?;
        }
        Ok(())
    }
}

/// Which of the three queues a diagnostic was filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Diagnostic,
    Error,
    Warning,
}

/// A callback registered against one of the bus's queues.
///
/// `wants_previous` replays every already-queued diagnostic at
/// subscription time; `wants_updates` invokes the callback for each
/// diagnostic filed afterwards. `notify_all_and_clear` always invokes
/// every sink once per queued diagnostic before emptying the queue,
/// regardless of `wants_updates` (matching the notifier's flush pass).
pub struct Sink {
    pub wants_previous: bool,
    pub wants_updates: bool,
    callback: Box<dyn FnMut(&Diagnostic)>,
}

impl Sink {
    pub fn new(
        wants_previous: bool,
        wants_updates: bool,
        callback: impl FnMut(&Diagnostic) + 'static,
    ) -> Self {
        Sink {
            wants_previous,
            wants_updates,
            callback: Box::new(callback),
        }
    }

    fn call(&mut self, diagnostic: &Diagnostic) {
        (self.callback)(diagnostic);
    }
}

#[derive(Default)]
struct Queue {
    diagnostics: Vec<Diagnostic>,
    sinks: Vec<Sink>,
}

impl Queue {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn subscribe(&mut self, mut sink: Sink) {
        if sink.wants_previous {
            for diagnostic in &self.diagnostics {
                sink.call(diagnostic);
            }
        }
        self.sinks.push(sink);
    }

    fn notify_all_and_clear(&mut self) {
        for diagnostic in &self.diagnostics {
            for sink in &mut self.sinks {
                sink.call(diagnostic);
            }
        }
        self.diagnostics.clear();
    }

    fn count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// The three-stream notification bus threaded through the assembly
/// pipeline (tokenizer, binder, parser all take `&mut NotificationBus`).
///
/// Unlike the original's process-wide singleton queues, this is ordinary
/// owned state — one bus per `assemble()` call — since Rust has no need
/// for the C++ global to make the pipeline stages ergonomic to call.
#[derive(Default)]
pub struct NotificationBus {
    diagnostic: Queue,
    error: Queue,
    warning: Queue,
    warning_as_error: bool,
}

impl NotificationBus {
    pub fn new(warning_as_error: bool) -> Self {
        NotificationBus {
            warning_as_error,
            ..Default::default()
        }
    }

    pub fn note(&mut self, diagnostic: Diagnostic) {
        self.diagnostic.push(diagnostic);
    }

    pub fn error(&mut self, diagnostic: Diagnostic) {
        self.error.push(diagnostic);
    }

    /// File a warning. If `-e`/`--error` was requested, the warning is
    /// promoted to an error *at the queue*, not at the call site — the
    /// promotion happens here so every caller can simply call `warning()`
    /// without knowing the policy in effect.
    pub fn warning(&mut self, diagnostic: Diagnostic) {
        if self.warning_as_error {
            self.error.push(diagnostic);
        } else {
            self.warning.push(diagnostic);
        }
    }

    pub fn subscribe(&mut self, severity: Severity, sink: Sink) {
        self.queue_mut(severity).subscribe(sink);
    }

    pub fn notify_all_and_clear(&mut self, severity: Severity) {
        self.queue_mut(severity).notify_all_and_clear();
    }

    pub fn error_count(&self) -> usize {
        self.error.count()
    }

    pub fn warning_count(&self) -> usize {
        self.warning.count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn queue_mut(&mut self, severity: Severity) -> &mut Queue {
        match severity {
            Severity::Diagnostic => &mut self.diagnostic,
            Severity::Error => &mut self.error,
            Severity::Warning => &mut self.warning,
        }
    }
}
