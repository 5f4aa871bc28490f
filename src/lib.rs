//! `wisp` — the core of a tree-walking interpreter for a small,
//! indentation-insensitive, expression-oriented scripting language.
//!
//! This crate is the lexer, parser, and evaluator trio plus the AST data
//! model and variable environment (spec.md §1). It does not read input,
//! print output, or own any REPL loop: a host crate is expected to read one
//! line of source per [`Engine::eval`] call and print whatever `Value` (if
//! any) comes back, the way `rhai`'s own `Engine` leaves hosting a REPL to
//! `rhai-repl`/`rhai-rs`/whatever embeds it.
//!
//! # Example
//!
//! ```
//! use wisp::{Engine, Scope};
//!
//! let engine = Engine::new();
//! let mut scope = Scope::new();
//!
//! engine.eval("x = 5", &mut scope).unwrap();
//! engine.eval("x += 3", &mut scope).unwrap();
//! let result = engine.eval("x", &mut scope).unwrap();
//!
//! assert_eq!(result.unwrap().to_string(), "8");
//! ```
//!
//! Errors are returned, not printed — pairing [`Engine::eval`]'s `Err` with
//! an [`ErrorReporter`] (a [`StringReporter`] is the one this crate ships,
//! intended for tests and as a starting point for a real host) produces
//! the formatted diagnostic spec.md §4.5/§7 specify:
//!
//! ```
//! use wisp::{Engine, ErrorReporter, Scope, StringReporter};
//!
//! let engine = Engine::new();
//! let mut scope = Scope::new();
//! let mut reporter = StringReporter::new();
//!
//! if let Err(err) = engine.eval("5 / 0", &mut scope) {
//!     reporter.report(&err);
//! }
//! assert_eq!(
//!     reporter.output(),
//!     "Traceback (most recent call last):\n  File \"<stdin>\", line 1, in <module>\nZeroDivisionError: division by zero\n"
//! );
//! ```

mod arena;
mod ast;
mod engine;
mod error;
mod limits;
mod parse;
mod scope;
mod token;
mod value;

pub use arena::NodeArena;
pub use ast::{BinOp, LogicalOp, Node, NodeRef, Special, UnaryOp};
pub use engine::Engine;
pub use error::{ErrorKind, ErrorReporter, StringReporter, WispError};
pub use limits::{
    Limits, MAX_ARENA_NODES, MAX_IDENTIFIER_LEN, MAX_IDENTIFIERS, MAX_INPUT_LEN,
    MAX_INPUT_TOKENS, MAX_LIT_LEN, MAX_LITS, MAX_NUM_BRANCHES, MAX_NUM_STMTS, MAX_NUM_VAR,
};
pub use scope::Scope;
pub use token::{CommandInfo, Lexer, Position, Spanned as TokenSpanned, Token};
pub use value::Value;

/// Runs a single command against a fresh [`Engine`] and [`Scope`], for
/// quick one-off evaluation (tests, doctests, a REPL host that doesn't
/// need to hold its own `Engine`/`Scope` across commands).
///
/// A real REPL host keeps its own [`Engine`] and [`Scope`] alive across the
/// whole session instead — the environment must persist for the life of
/// the interpreter session (spec.md §3 "Lifecycle") — and calls
/// [`Engine::eval`] directly.
///
/// # Errors
///
/// Propagates any [`WispError`] produced while lexing, parsing, or
/// evaluating `source`.
pub fn run(source: &str) -> Result<Option<Value>, WispError> {
    Engine::new().eval(source, &mut Scope::new())
}
