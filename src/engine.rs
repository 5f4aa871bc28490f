//! The evaluator (spec.md §4.3): a recursive walker over one parsed
//! command's statement roots, threading a [`Scope`] through each step.
//!
//! Named `Engine` after `rhai::engine::Engine`, the role it plays here:
//! the single entry point that ties the lexer, parser, and tree-walk
//! together behind one `eval` call, configured by a [`Limits`] the way
//! the teacher's `Engine` is configured by its own limits fields
//! (`engine_settings.rs`).

use crate::arena::NodeArena;
use crate::ast::{BinOp, LogicalOp, Node, NodeRef, Special, UnaryOp};
use crate::error::WispError;
use crate::limits::Limits;
use crate::parse::parse;
use crate::scope::Scope;
use crate::token::{Lexer, Position};
use crate::value::Value;
use smartstring::alias::String as SmartStr;

/// A control-flow request threaded back out of statement evaluation.
///
/// Kept out of the `Result` channel entirely (spec.md §4.3, §9): a
/// `break`/`continue` is not an error, so it travels as a second return
/// value instead of forcing every caller to match on an `Err` variant that
/// isn't one. The nearest enclosing [`Node::While`]/[`Node::For`] is the
/// only place a non-`None` signal is inspected and absorbed; everything
/// between the signal's origin and that loop (nested blocks, `if`/`elif`/
/// `else` branches) only forwards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    None,
    Break,
    Continue,
}

/// The tree-walking evaluator.
///
/// Stateless beyond its [`Limits`]: all mutable state for one command lives
/// in the caller-supplied [`Scope`] (persists across commands) and the
/// [`NodeArena`] the parser just produced (discarded at the end of the
/// command). `Engine::eval` is the only public entry point and performs
/// the full lex → parse → evaluate pipeline in one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    limits: Limits,
}

impl Engine {
    /// An engine using the default capacities (spec.md §6).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine configured with custom capacities.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Lexes, parses, and evaluates one command against `scope`.
    ///
    /// Returns `Some(value)` when the command's last statement was an
    /// expression (to be printed by the REPL host per spec.md §6), or
    /// `None` when it was a pure statement (an assignment, a loop, a bare
    /// `if`, or a `break`/`continue`/`pass`).
    ///
    /// # Errors
    ///
    /// Any lex, parse, or evaluation failure aborts the command and
    /// returns a [`WispError`]; statements after the failing one are never
    /// executed, but writes already committed to `scope` are retained
    /// (spec.md §4.3 "Failure semantics").
    pub fn eval(&self, source: &str, scope: &mut Scope) -> Result<Option<Value>, WispError> {
        let tokens = Lexer::tokenize(source, &self.limits)?;
        let mut arena = NodeArena::new(self.limits.max_arena_nodes);
        let roots = parse(&tokens, &mut arena, &self.limits)?;

        let mut result = None;
        for root in roots {
            let is_assign = matches!(arena.get(root), Node::Assign { .. });
            let (value, _signal) = self.eval_node(root, &arena, scope)?;
            // An assignment is a pure statement at the top level (spec.md
            // §4.3) even though a nested `Assign` now yields its written
            // value so chained assignment (`x = y = 5`) can consume it.
            result = if is_assign { None } else { value };
        }
        Ok(result)
    }

    /// Evaluates one node, returning its value (when it is an expression)
    /// and any control-flow signal it raised or forwarded.
    fn eval_node(
        &self,
        node_ref: NodeRef,
        arena: &NodeArena,
        scope: &mut Scope,
    ) -> Result<(Option<Value>, Signal), WispError> {
        match arena.get(node_ref) {
            Node::Literal(value) => Ok((Some(value.clone()), Signal::None)),

            Node::Variable(name) => {
                let value = scope
                    .read(name)
                    .cloned()
                    .ok_or_else(|| WispError::name(name, Position::NONE))?;
                Ok((Some(value), Signal::None))
            }

            Node::Assign { name, value } => {
                let name = name.clone();
                let value = self.eval_expr(*value, arena, scope)?;
                if scope.read(&name).is_none() && scope.len() >= self.limits.max_num_var {
                    return Err(WispError::runtime(
                        "maximum number of variables exceeded",
                        Position::NONE,
                    ));
                }
                scope.write(&name, value.clone())?;
                // Yields the written value so a nested `Assign` (the RHS of
                // a chained assignment like `x = y = 5`) can be consumed by
                // the enclosing `Assign`; `Engine::eval`'s per-root loop
                // discards this at the top level so a bare assignment still
                // prints nothing.
                Ok((Some(value), Signal::None))
            }

            Node::Unary { op, right } => {
                let right = self.eval_expr(*right, arena, scope)?;
                Ok((Some(eval_unary(*op, right)?), Signal::None))
            }

            Node::Binary { left, op, right } => {
                let left = self.eval_expr(*left, arena, scope)?;
                let right = self.eval_expr(*right, arena, scope)?;
                Ok((
                    Some(eval_binary(*op, left, right, self.limits.max_lit_len)?),
                    Signal::None,
                ))
            }

            Node::Logical { left, op, right } => {
                let left = self.eval_expr(*left, arena, scope)?;
                // Short-circuit: the right operand is only ever touched
                // when `left`'s truthiness doesn't already decide the
                // result (spec.md §4.3, §9).
                match op {
                    LogicalOp::And if !left.is_truthy() => Ok((Some(left), Signal::None)),
                    LogicalOp::Or if left.is_truthy() => Ok((Some(left), Signal::None)),
                    _ => Ok((Some(self.eval_expr(*right, arena, scope)?), Signal::None)),
                }
            }

            Node::Grouping { expr } => self.eval_node(*expr, arena, scope),

            Node::Block { stmts } => {
                for stmt in stmts {
                    let (_, signal) = self.eval_node(*stmt, arena, scope)?;
                    if signal != Signal::None {
                        return Ok((None, signal));
                    }
                }
                Ok((None, Signal::None))
            }

            Node::IfElse {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_expr(*cond, arena, scope)?.is_truthy() {
                    *then_branch
                } else {
                    *else_branch
                };
                let (_, signal) = self.eval_node(branch, arena, scope)?;
                Ok((None, signal))
            }

            Node::While { cond, body, or_else } => {
                self.eval_while(*cond, *body, *or_else, arena, scope)
            }

            Node::For {
                name,
                iterable,
                body,
                or_else,
            } => self.eval_for(name.clone(), *iterable, *body, *or_else, arena, scope),

            Node::Special(special) => Ok(match special {
                Special::Break => (None, Signal::Break),
                Special::Continue => (None, Signal::Continue),
                Special::Pass => (None, Signal::None),
            }),
        }
    }

    /// Evaluates a node reachable from an expression position (a
    /// `Binary`/`Unary`/`Logical` operand, a condition, an iterable, or the
    /// value side of an `Assign`), unwrapping the `Option<Value>` that
    /// [`Self::eval_node`] always returns `Some` for there — every node kind
    /// the grammar can place in that position (including a nested `Assign`
    /// from chained assignment) yields a value.
    fn eval_expr(
        &self,
        node_ref: NodeRef,
        arena: &NodeArena,
        scope: &mut Scope,
    ) -> Result<Value, WispError> {
        let (value, _signal) = self.eval_node(node_ref, arena, scope)?;
        Ok(value.expect("grammar guarantees an expression position never holds a bare statement"))
    }

    fn eval_while(
        &self,
        cond: NodeRef,
        body: NodeRef,
        or_else: NodeRef,
        arena: &NodeArena,
        scope: &mut Scope,
    ) -> Result<(Option<Value>, Signal), WispError> {
        loop {
            if !self.eval_expr(cond, arena, scope)?.is_truthy() {
                break;
            }
            let (_, signal) = self.eval_node(body, arena, scope)?;
            if signal == Signal::Break {
                return Ok((None, Signal::None));
            }
            // `Signal::Continue` and `Signal::None` both fall through to
            // re-check the condition, matching spec.md §4.3's "a continue
            // signal restarts the condition check".
        }
        self.eval_node(or_else, arena, scope)
    }

    fn eval_for(
        &self,
        name: SmartStr,
        iterable: NodeRef,
        body: NodeRef,
        or_else: NodeRef,
        arena: &NodeArena,
        scope: &mut Scope,
    ) -> Result<(Option<Value>, Signal), WispError> {
        let text = match self.eval_expr(iterable, arena, scope)? {
            Value::Str(s) => s,
            other => {
                return Err(WispError::type_error(
                    format!("'{}' object is not iterable", other.type_name()),
                    Position::NONE,
                ))
            }
        };
        for ch in text.chars() {
            scope.write(
                &name,
                Value::string_limited(ch.to_string(), self.limits.max_lit_len),
            )?;
            let (_, signal) = self.eval_node(body, arena, scope)?;
            if signal == Signal::Break {
                return Ok((None, Signal::None));
            }
        }
        self.eval_node(or_else, arena, scope)
    }
}

/// `+`/`-`/`~`/`not` applied to a single operand (spec.md §4.3).
fn eval_unary(op: UnaryOp, operand: Value) -> Result<Value, WispError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Plus => match operand {
            Value::Int(n) => Ok(Value::Int(n)),
            other => Err(unary_type_error("+", &other)),
        },
        UnaryOp::Neg => match operand {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            other => Err(unary_type_error("-", &other)),
        },
        UnaryOp::BitNot => match operand {
            Value::Int(n) => Ok(Value::Int(!n)),
            other => Err(unary_type_error("~", &other)),
        },
    }
}

fn unary_type_error(symbol: &str, operand: &Value) -> WispError {
    WispError::type_error(
        format!("bad operand type for unary {}: '{}'", symbol, operand.type_name()),
        Position::NONE,
    )
}

fn binary_type_error(symbol: &str, left: &Value, right: &Value) -> WispError {
    WispError::type_error(
        format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            symbol,
            left.type_name(),
            right.type_name()
        ),
        Position::NONE,
    )
}

fn compare_type_error(symbol: &str, left: &Value, right: &Value) -> WispError {
    WispError::type_error(
        format!(
            "'{}' not supported between instances of '{}' and '{}'",
            symbol,
            left.type_name(),
            right.type_name()
        ),
        Position::NONE,
    )
}

/// Extracts both operands as `Int`s, or fails with the conventional
/// `unsupported operand type(s) for <op>` message (spec.md §4.3: every
/// arithmetic/bitwise operator besides `+` on `Str` and `*` on `(Str, Int)`
/// is `Int`-only).
fn require_ints(symbol: &str, left: &Value, right: &Value) -> Result<(u16, u16), WispError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        _ => Err(binary_type_error(symbol, left, right)),
    }
}

/// Repeats `s` `count` times, truncating the result to `max_lit_len`
/// (spec.md §4.3: "`*` on `(Str, Int)`: string repetition; negative count
/// yields empty string; overflow truncates").
fn repeat_str(s: &str, count: u16, max_lit_len: usize) -> Value {
    let count = Value::as_signed(count);
    if count <= 0 {
        return Value::string_limited("", max_lit_len);
    }
    Value::string_limited(s.repeat(count as usize), max_lit_len)
}

/// Truncating (toward zero) integer division — spec.md's `/` operator.
/// There is no floating-point type to give `/` its usual "true division"
/// meaning (Non-goals, §1), so `wisp` resolves this as truncating integer
/// division and reserves floor semantics for `//`, matching the original
/// source's single fixed-width integer division and recorded as an Open
/// Question resolution in DESIGN.md.
fn div_trunc(a: i32, b: i32) -> i32 {
    a / b
}

/// Floor (round-toward-negative-infinity) integer division — `//`.
fn div_floor(a: i32, b: i32) -> i32 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Floor-division-consistent remainder — `%`, matching `//`'s rounding so
/// `a == (a // b) * b + (a % b)` holds the way it does in the original
/// source's own modulo.
fn rem_floor(a: i32, b: i32) -> i32 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// `**`: repeated multiplication for a non-negative exponent, `Int(0)` for
/// a negative one (spec.md §4.3).
fn int_pow(base: u16, exponent: u16) -> u16 {
    let exponent = Value::as_signed(exponent);
    if exponent < 0 {
        return 0;
    }
    let mut acc: u16 = 1;
    for _ in 0..exponent {
        acc = acc.wrapping_mul(base);
    }
    acc
}

/// `+ - * / // % ** & | ^ << >>`, `==`/`!=`/`<`/`<=`/`>`/`>=`, `is`/`is not`,
/// and `in`/`not in` (spec.md §4.3). `max_lit_len` bounds the two operators
/// that can grow a string (`+` concatenation, `*` repetition).
fn eval_binary(op: BinOp, left: Value, right: Value, max_lit_len: usize) -> Result<Value, WispError> {
    match op {
        BinOp::Add => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            (Value::Str(a), Value::Str(b)) => {
                Ok(Value::string_limited(format!("{}{}", a, b), max_lit_len))
            }
            _ => Err(binary_type_error("+", &left, &right)),
        },
        BinOp::Sub => {
            let (a, b) = require_ints("-", &left, &right)?;
            Ok(Value::Int(a.wrapping_sub(b)))
        }
        BinOp::Mul => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                Ok(repeat_str(s, *n, max_lit_len))
            }
            _ => Err(binary_type_error("*", &left, &right)),
        },
        BinOp::Div => {
            let (a, b) = require_ints("/", &left, &right)?;
            if b == 0 {
                return Err(WispError::zero_division(Position::NONE));
            }
            Ok(Value::Int(
                div_trunc(Value::as_signed(a), Value::as_signed(b)) as u16,
            ))
        }
        BinOp::FloorDiv => {
            let (a, b) = require_ints("//", &left, &right)?;
            if b == 0 {
                return Err(WispError::zero_division(Position::NONE));
            }
            Ok(Value::Int(
                div_floor(Value::as_signed(a), Value::as_signed(b)) as u16,
            ))
        }
        BinOp::Mod => {
            let (a, b) = require_ints("%", &left, &right)?;
            if b == 0 {
                return Err(WispError::zero_division(Position::NONE));
            }
            Ok(Value::Int(
                rem_floor(Value::as_signed(a), Value::as_signed(b)) as u16,
            ))
        }
        BinOp::Pow => {
            let (a, b) = require_ints("**", &left, &right)?;
            Ok(Value::Int(int_pow(a, b)))
        }
        BinOp::MatMul => Err(binary_type_error("@", &left, &right)),
        BinOp::BitAnd => {
            let (a, b) = require_ints("&", &left, &right)?;
            Ok(Value::Int(a & b))
        }
        BinOp::BitOr => {
            let (a, b) = require_ints("|", &left, &right)?;
            Ok(Value::Int(a | b))
        }
        BinOp::BitXor => {
            let (a, b) = require_ints("^", &left, &right)?;
            Ok(Value::Int(a ^ b))
        }
        BinOp::Shl => {
            let (a, b) = require_ints("<<", &left, &right)?;
            Ok(Value::Int(if b >= 16 { 0 } else { a.wrapping_shl(u32::from(b)) }))
        }
        BinOp::Shr => {
            let (a, b) = require_ints(">>", &left, &right)?;
            Ok(Value::Int(if b >= 16 { 0 } else { a.wrapping_shr(u32::from(b)) }))
        }
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::NotEq => Ok(Value::Bool(left != right)),
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => eval_comparison(op, &left, &right),
        // No distinct object identities exist in this interpreter, so
        // `is`/`is not` fall back to value equality (spec.md §4.3).
        BinOp::Is => Ok(Value::Bool(left == right)),
        BinOp::IsNot => Ok(Value::Bool(left != right)),
        BinOp::In => eval_membership(&left, &right),
        BinOp::NotIn => Ok(Value::Bool(!eval_membership(&left, &right)?.is_truthy())),
    }
}

/// `<`/`<=`/`>`/`>=`: signed compare on `Int`, lexicographic on `Str`
/// (spec.md §4.3).
fn eval_comparison(op: BinOp, left: &Value, right: &Value) -> Result<Value, WispError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Value::as_signed(*a).cmp(&Value::as_signed(*b)),
        (Value::Str(a), Value::Str(b)) => a.as_str().cmp(b.as_str()),
        _ => return Err(compare_type_error(op.symbol(), left, right)),
    };
    let result = match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::LtEq => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        BinOp::GtEq => ordering.is_ge(),
        _ => unreachable!("eval_comparison only called for ordering operators"),
    };
    Ok(Value::Bool(result))
}

/// `in`/`not in`: substring containment for `Str`; any other right operand
/// is a `TypeError` (spec.md §4.3).
fn eval_membership(needle: &Value, haystack: &Value) -> Result<Value, WispError> {
    match (needle, haystack) {
        (Value::Str(needle), Value::Str(haystack)) => {
            Ok(Value::Bool(haystack.contains(needle.as_str())))
        }
        _ => Err(WispError::type_error(
            format!("argument of type '{}' is not iterable", haystack.type_name()),
            Position::NONE,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn eval(source: &str) -> Result<Option<Value>, WispError> {
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine.eval(source, &mut scope)
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Some(Value::Int(7)));
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(eval("2 ** 3 ** 2").unwrap(), Some(Value::Int(512)));
    }

    #[test]
    fn augmented_assignment_then_read() {
        assert_eq!(eval("x = 5; x += 3; x").unwrap(), Some(Value::Int(8)));
    }

    #[test]
    fn chained_comparison_true() {
        assert_eq!(eval("1 < 2 < 3").unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn chained_comparison_false() {
        assert_eq!(eval("1 < 2 < 0").unwrap(), Some(Value::Bool(false)));
    }

    #[test]
    fn while_loop_counts_up() {
        // Each `then` in spec.md's scenario table is a separate REPL
        // invocation (Non-goals: "one logical command per invocation"),
        // so this is three `eval` calls sharing one `Scope`, not one
        // source string with embedded newlines.
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine.eval("i = 0", &mut scope).unwrap();
        engine.eval("while i < 3: i = i + 1", &mut scope).unwrap();
        assert_eq!(engine.eval("i", &mut scope).unwrap(), Some(Value::Int(3)));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("'ab' + 'cd'").unwrap(), Some(Value::string("abcd")));
    }

    #[test]
    fn division_by_zero_is_zero_division_error() {
        let err = eval("5 / 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDivisionError);
    }

    #[test]
    fn unbound_name_is_name_error() {
        let err = eval("y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameError);
    }

    #[test]
    fn if_else_picks_branch() {
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine
            .eval("if 1 < 2: a = 10 else: a = 20", &mut scope)
            .unwrap();
        assert_eq!(engine.eval("a", &mut scope).unwrap(), Some(Value::Int(10)));
    }

    #[test]
    fn double_negation_matches_truthiness() {
        assert_eq!(eval("not not 0").unwrap(), Some(Value::Bool(false)));
        assert_eq!(eval("not not 5").unwrap(), Some(Value::Bool(true)));
    }

    #[test]
    fn break_stops_loop_and_skips_else() {
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine.eval("i = 0", &mut scope).unwrap();
        engine
            .eval("while True: i = i + 1; if i == 3: break", &mut scope)
            .unwrap();
        assert_eq!(engine.eval("i", &mut scope).unwrap(), Some(Value::Int(3)));
    }

    #[test]
    fn continue_skips_rest_of_body() {
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine.eval("total = 0", &mut scope).unwrap();
        engine
            .eval(
                "for c in '12345': if c == '3': continue else: total = total + 1",
                &mut scope,
            )
            .unwrap();
        assert_eq!(
            engine.eval("total", &mut scope).unwrap(),
            Some(Value::Int(4))
        );
    }

    #[test]
    fn for_loop_else_runs_without_break() {
        let engine = Engine::new();
        let mut scope = Scope::new();
        engine.eval("seen = ''", &mut scope).unwrap();
        engine
            .eval(
                "for c in 'ab': seen = seen + c else: seen = seen + '!'",
                &mut scope,
            )
            .unwrap();
        assert_eq!(
            engine.eval("seen", &mut scope).unwrap(),
            Some(Value::string("ab!"))
        );
    }

    #[test]
    fn assignment_statement_prints_nothing() {
        assert_eq!(eval("x = 1").unwrap(), None);
    }

    #[test]
    fn matmul_has_no_defined_semantics() {
        let err = eval("1 @ 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}
