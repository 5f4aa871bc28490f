//! `and`/`or`/`not` short-circuit semantics and truthiness (spec.md §4.3,
//! §4.6, §9's "short-circuit vs strict operators" note).

use wisp::{Engine, Scope, Value};

fn eval(src: &str) -> Value {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval(src, &mut scope).unwrap().unwrap()
}

#[test]
fn or_returns_the_first_truthy_operand() {
    assert_eq!(eval("0 or 5"), Value::Int(5));
    assert_eq!(eval("3 or 5"), Value::Int(3));
}

#[test]
fn and_returns_the_first_falsy_operand_or_the_last() {
    assert_eq!(eval("0 and 5"), Value::Int(0));
    assert_eq!(eval("3 and 5"), Value::Int(5));
}

#[test]
fn or_short_circuits_before_the_right_operand_errors() {
    // If `or` evaluated both sides unconditionally this would raise
    // `NameError` for the unbound `y` on the right.
    assert_eq!(eval("1 or y"), Value::Int(1));
}

#[test]
fn and_short_circuits_before_the_right_operand_errors() {
    assert_eq!(eval("0 and y"), Value::Int(0));
}

#[test]
fn not_negates_truthiness_not_the_raw_value() {
    assert_eq!(eval("not 0"), Value::Bool(true));
    assert_eq!(eval("not 5"), Value::Bool(false));
    assert_eq!(eval("not ''"), Value::Bool(true));
    assert_eq!(eval("not 'x'"), Value::Bool(false));
    assert_eq!(eval("not None"), Value::Bool(true));
}

#[test]
fn double_negation_matches_truthiness_for_every_value_kind() {
    // `not not x` evaluates to `Bool(truthy(x))` — spec.md §8 round-trip law.
    assert_eq!(eval("not not None"), Value::Bool(false));
    assert_eq!(eval("not not False"), Value::Bool(false));
    assert_eq!(eval("not not True"), Value::Bool(true));
    assert_eq!(eval("not not 0"), Value::Bool(false));
    assert_eq!(eval("not not 7"), Value::Bool(true));
    assert_eq!(eval("not not ''"), Value::Bool(false));
    assert_eq!(eval("not not 'x'"), Value::Bool(true));
}

#[test]
fn conjunction_binds_tighter_than_disjunction() {
    // `or` is tier 8, `and` is tier 9 (tighter): `0 or 1 and 0` parses as
    // `0 or (1 and 0)` == `0 or 0` == `0`.
    assert_eq!(eval("0 or 1 and 0"), Value::Int(0));
}
