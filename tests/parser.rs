//! Parser-level tests: precedence, associativity, and the desugarings
//! spec.md §4.2 specifies. Exercised through evaluation (not direct AST
//! inspection) the same way the teacher crate's own `tests/*.rs` probe the
//! parser — through what a script evaluates to, not through its shape.

use wisp::{Engine, ErrorKind, Scope, Value};

fn eval(src: &str) -> Value {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval(src, &mut scope).unwrap().expect("expected an expression result")
}

#[test]
fn sum_and_term_tiers_are_left_associative() {
    // 10 - 3 - 2 == (10 - 3) - 2 == 5, not 10 - (3 - 2) == 9.
    assert_eq!(eval("10 - 3 - 2"), Value::Int(5));
    assert_eq!(eval("20 / 4 / 2"), Value::Int(2));
}

#[test]
fn power_tier_is_right_associative() {
    // 2 ** 3 ** 2 == 2 ** (3 ** 2) == 512, not (2 ** 3) ** 2 == 64.
    assert_eq!(eval("2 ** 3 ** 2"), Value::Int(512));
}

#[test]
fn term_binds_tighter_than_sum() {
    assert_eq!(eval("1 + 2 * 3"), Value::Int(7));
    assert_eq!(eval("(1 + 2) * 3"), Value::Int(9));
}

#[test]
fn factor_prefix_binds_tighter_than_power_base_but_not_its_rhs() {
    assert_eq!(eval("-2 ** 2"), Value::Int(65532)); // -(2 ** 2) == -4
}

#[test]
fn chained_comparison_is_conjunction_of_adjacent_pairs() {
    // Testable property 3 (spec.md §8).
    assert_eq!(eval("1 < 2 < 3"), Value::Bool(true));
    assert_eq!(eval("1 < 2 < 0"), Value::Bool(false));
    assert_eq!(eval("3 > 2 > 1 > 0"), Value::Bool(true));
}

#[test]
fn missing_else_on_if_synthesizes_none() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    // The `if` itself is a pure statement: it prints nothing...
    assert_eq!(engine.eval("if False: a = 1", &mut scope).unwrap(), None);
    // ...and since the condition is false and no `else` was written, the
    // parser's synthesized `Literal(None)` branch ran instead of `a = 1`,
    // so `a` was never bound.
    let err = engine.eval("a", &mut scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameError);
}

#[test]
fn break_outside_loop_is_syntax_error() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    let err = engine.eval("break", &mut scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}

#[test]
fn continue_outside_loop_is_syntax_error() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    let err = engine.eval("continue", &mut scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}

#[test]
fn unterminated_if_is_syntax_error() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    let err = engine.eval("if True", &mut scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}

#[test]
fn walrus_is_rejected_as_syntax_error() {
    // DESIGN.md Open Question OQ-2: `:=` is recognized by the lexer but
    // has no defined runtime semantics, so the parser rejects it rather
    // than silently guessing one.
    let engine = Engine::new();
    let mut scope = Scope::new();
    let err = engine.eval("x := 5", &mut scope).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}
