//! Error kinds, the error value itself, and the pluggable reporting sink.
//!
//! Shaped after `rhai::error::EvalAltResult`: a closed enum with a
//! hand-written `Display`/`std::error::Error` implementation rather than a
//! `thiserror` derive, so embedding `wisp` never forces a particular
//! error-handling crate on the caller.

use crate::token::Position;
use std::fmt;

/// The seven error kinds a command can fail with.
///
/// Named after the conventional scripting-language exceptions they mirror
/// (see the original source's own `error_types` enum), not after the Rust
/// module that raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SyntaxError,
    NameError,
    TypeError,
    ZeroDivisionError,
    IndexError,
    AssertionError,
    RuntimeError,
}

impl ErrorKind {
    /// The identifier printed before `: <message>` in a formatted error.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SyntaxError => "SyntaxError",
            Self::NameError => "NameError",
            Self::TypeError => "TypeError",
            Self::ZeroDivisionError => "ZeroDivisionError",
            Self::IndexError => "IndexError",
            Self::AssertionError => "AssertionError",
            Self::RuntimeError => "RuntimeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single reported error: a kind, a message, and the position it occurred
/// at (the position is always [`Position::NONE`] when the `no_position`
/// feature is enabled).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WispError {
    kind: ErrorKind,
    message: String,
    position: Position,
}

impl WispError {
    /// Creates a new error with no position information.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Position::NONE,
        }
    }

    /// Creates a new error at a given position.
    #[must_use]
    pub fn at(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Formats this error the way the error reporter (§4.5/§7) specifies:
    /// a `Traceback` preamble for every kind except [`ErrorKind::SyntaxError`],
    /// then the `File "<stdin>", line 1, in <module>` marker, then
    /// `<KindName>: <message>`.
    #[must_use]
    pub fn to_report_string(&self) -> String {
        let mut out = String::new();
        if self.kind != ErrorKind::SyntaxError {
            out.push_str("Traceback (most recent call last):\n");
        }
        out.push_str("  File \"<stdin>\", line 1, in <module>\n");
        out.push_str(self.kind.name());
        out.push_str(": ");
        out.push_str(&self.message);
        out.push('\n');
        out
    }
}

impl fmt::Display for WispError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.position.is_none() {
            write!(f, " ({})", self.position)?;
        }
        Ok(())
    }
}

impl std::error::Error for WispError {}

/// Convenience constructors, one per [`ErrorKind`], used throughout the
/// lexer/parser/evaluator instead of spelling out [`WispError::new`]/`at`
/// at every call site.
impl WispError {
    #[must_use]
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::at(ErrorKind::SyntaxError, message, position)
    }
    #[must_use]
    pub fn name(identifier: &str, position: Position) -> Self {
        Self::at(
            ErrorKind::NameError,
            format!("name '{}' is not defined", identifier),
            position,
        )
    }
    #[must_use]
    pub fn type_error(message: impl Into<String>, position: Position) -> Self {
        Self::at(ErrorKind::TypeError, message, position)
    }
    #[must_use]
    pub fn zero_division(position: Position) -> Self {
        Self::at(ErrorKind::ZeroDivisionError, "division by zero", position)
    }
    #[must_use]
    pub fn index(message: impl Into<String>, position: Position) -> Self {
        Self::at(ErrorKind::IndexError, message, position)
    }
    #[must_use]
    pub fn assertion(message: impl Into<String>, position: Position) -> Self {
        Self::at(ErrorKind::AssertionError, message, position)
    }
    #[must_use]
    pub fn runtime(message: impl Into<String>, position: Position) -> Self {
        Self::at(ErrorKind::RuntimeError, message, position)
    }
}

/// A sink for diagnostics, mirroring the `report_error`/`report_fatal`
/// collaborator interfaces of spec.md §6.
///
/// Kept as a trait — the way `rhai::Engine` exposes pluggable `on_print`/
/// `on_debug` callbacks instead of calling `println!` directly — so the
/// REPL shell (out of scope for this crate) can route diagnostics to a
/// display driver, a log, or (as in tests) an in-memory buffer.
pub trait ErrorReporter {
    /// Reports a recoverable error produced while lexing, parsing, or
    /// evaluating one command.
    fn report(&mut self, err: &WispError);

    /// Reports an internal invariant violation distinct from the ordinary
    /// error channel; the original source's `report_failure` equivalent.
    fn report_fatal(&mut self, message: &str);
}

/// An [`ErrorReporter`] that accumulates formatted output in memory.
///
/// Used by this crate's own tests, and a reasonable starting point for a
/// REPL host that wants to buffer a line before writing it to a device.
#[derive(Debug, Default, Clone)]
pub struct StringReporter {
    output: String,
}

impl StringReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl ErrorReporter for StringReporter {
    fn report(&mut self, err: &WispError) {
        self.output.push_str(&err.to_report_string());
    }

    fn report_fatal(&mut self, message: &str) {
        self.output
            .push_str("FATAL: unexpected error internal to interpreter\n  ");
        self.output.push_str(message);
        self.output
            .push_str("\n  disregard outputs and reboot the interpreter for safety\n");
    }
}
