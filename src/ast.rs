//! The AST node catalog.
//!
//! Grounded directly on the original source's `expr.h`/`expr.cpp`: one
//! `node` tagged over `{assign, binary, grouping, literal, unary,
//! variable}`, extended with `block`, `if/elif/else`, `while`, `for`, and
//! `special` to cover every statement form in spec.md's grammar. Unlike the
//! teacher crate, which splits `Expr`/`Stmt` into two enums because it also
//! carries function calls, indexing, and object-dot chains, `wisp` keeps the
//! original's single unified `Node` type — there is no statement/expression
//! split to make here, since every statement form is itself used as a value
//! (an `if` with no matching branch yields `None`, a loop yields `None`).

use crate::token::Position;
use crate::value::Value;
use smartstring::alias::String as SmartStr;
use smallvec::SmallVec;

/// Binary operators, covering every tier from `bor` down to `power`,
/// plus the six comparison operators, identity, and membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
    IsNot,
    In,
    NotIn,
}

impl BinOp {
    /// The source spelling, used in `TypeError` messages.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::MatMul => "@",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
}

/// Short-circuit logical operators; kept distinct from [`BinOp`] so the
/// evaluator's dispatcher for strict binary operators never has a code path
/// that could force the right operand early (see spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

/// The three bare keyword statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    Break,
    Continue,
    Pass,
}

/// One AST node. Children are referenced by [`NodeRef`] — a key into the
/// [`crate::arena::NodeArena`] that produced this node, never a direct Rust
/// reference — so the tree can be built breadth-first-or-depth-first in any
/// order without fighting the borrow checker, and so every reference is
/// `Copy` and trivially stable for the lifetime of one parse (spec.md §4.6).
#[derive(Debug, Clone)]
pub enum Node {
    /// A literal value: `False`, `None`, `True`, a number, or a string.
    Literal(Value),
    /// A bare variable read.
    Variable(SmartStr),
    /// `name = value`.
    Assign { name: SmartStr, value: NodeRef },
    /// `op right`.
    Unary { op: UnaryOp, right: NodeRef },
    /// `left op right`, strict (both operands always evaluated).
    Binary {
        left: NodeRef,
        op: BinOp,
        right: NodeRef,
    },
    /// `left op right`, short-circuit.
    Logical {
        left: NodeRef,
        op: LogicalOp,
        right: NodeRef,
    },
    /// `( expression )`.
    Grouping { expr: NodeRef },
    /// A sequence of statements evaluated in order.
    Block { stmts: SmallVec<[NodeRef; 4]> },
    /// `if cond: then else else_branch` — `elif` chains and a missing
    /// `else` are already desugared into nested `IfElse` nodes by the
    /// parser (spec.md §4.2).
    IfElse {
        cond: NodeRef,
        then_branch: NodeRef,
        else_branch: NodeRef,
    },
    /// `while cond: body else else_branch`.
    While {
        cond: NodeRef,
        body: NodeRef,
        or_else: NodeRef,
    },
    /// `for name in iterable: body else else_branch`.
    For {
        name: SmartStr,
        iterable: NodeRef,
        body: NodeRef,
        or_else: NodeRef,
    },
    /// `break` / `continue` / `pass`.
    Special(Special),
}

slotmap::new_key_type! {
    /// A stable reference to a [`Node`] stored in a [`crate::arena::NodeArena`].
    ///
    /// Grounded on `rhai-hir`'s own `slotmap::new_key_type!` keys
    /// (`examples/rhaiscript-lsp/crates/rhai-hir/src/module.rs` and
    /// siblings) — the same vendored teacher repository, not an unrelated
    /// borrow.
    pub struct NodeRef;
}

/// Attaches a source position to a node reference, the way every AST node
/// in `rhai::ast` carries its own [`crate::token::Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned {
    pub node: NodeRef,
    pub position: Position,
}
