//! Capacity constants for one interpreter cycle.
//!
//! The original board this interpreter grew out of had no heap to speak of,
//! so every per-cycle buffer (the token stream, the literal tables, the
//! variable table, the AST arena) was a fixed-size array. `wisp` keeps the
//! same capacities as configurable data instead of hardcoded array lengths,
//! the way `rhai::engine_settings` turns its own interpreter limits
//! (`max_expr_depth`, `max_string_size`, ...) into plain fields rather than
//! `const` values baked into the binary.

/// Default maximum length, in bytes, of one command passed to [`crate::run`].
pub const MAX_INPUT_LEN: usize = 64;
/// Default maximum number of tokens produced for one command.
pub const MAX_INPUT_TOKENS: usize = 64;
/// Default maximum number of string/number/identifier literals of one kind.
pub const MAX_LITS: usize = 16;
/// Default maximum length, in bytes, of a string literal.
pub const MAX_LIT_LEN: usize = 32;
/// Default maximum number of distinct identifiers referenced in one command.
pub const MAX_IDENTIFIERS: usize = 16;
/// Default maximum length, in bytes, of an identifier.
pub const MAX_IDENTIFIER_LEN: usize = 32;
/// Default maximum number of variables held in one [`crate::scope::Scope`].
pub const MAX_NUM_VAR: usize = 64;
/// Default maximum number of statements in one block.
pub const MAX_NUM_STMTS: usize = 32;
/// Default maximum number of `elif` branches in one `if` chain.
pub const MAX_NUM_BRANCHES: usize = 16;
/// Default maximum number of nodes held in one [`crate::arena::NodeArena`].
pub const MAX_ARENA_NODES: usize = 128;

/// Capacity configuration for a single lex/parse/eval cycle.
///
/// A fresh [`Limits::default()`] matches the defaults mandated by the
/// specification; callers embedding `wisp` on more constrained hosts can
/// shrink any field, or grow it where more memory is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_input_len: usize,
    pub max_input_tokens: usize,
    pub max_lits: usize,
    pub max_lit_len: usize,
    pub max_identifiers: usize,
    pub max_identifier_len: usize,
    pub max_num_var: usize,
    pub max_num_stmts: usize,
    pub max_num_branches: usize,
    pub max_arena_nodes: usize,
}

impl Default for Limits {
    #[inline]
    fn default() -> Self {
        Self {
            max_input_len: MAX_INPUT_LEN,
            max_input_tokens: MAX_INPUT_TOKENS,
            max_lits: MAX_LITS,
            max_lit_len: MAX_LIT_LEN,
            max_identifiers: MAX_IDENTIFIERS,
            max_identifier_len: MAX_IDENTIFIER_LEN,
            max_num_var: MAX_NUM_VAR,
            max_num_stmts: MAX_NUM_STMTS,
            max_num_branches: MAX_NUM_BRANCHES,
            max_arena_nodes: MAX_ARENA_NODES,
        }
    }
}
