//! `while`/`for` loops, their `else` clauses, and `break`/`continue`
//! (spec.md §4.2, §4.3).

use wisp::{Engine, Scope, Value};

#[test]
fn while_loop_runs_until_condition_is_falsy() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("i = 0", &mut scope).unwrap();
    engine.eval("while i < 3: i = i + 1", &mut scope).unwrap();
    assert_eq!(engine.eval("i", &mut scope).unwrap(), Some(Value::Int(3)));
}

#[test]
fn while_else_runs_when_the_loop_ends_naturally() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("i = 0; ran_else = False", &mut scope).unwrap();
    engine
        .eval("while i < 3: i = i + 1 else: ran_else = True", &mut scope)
        .unwrap();
    assert_eq!(
        engine.eval("ran_else", &mut scope).unwrap(),
        Some(Value::Bool(true))
    );
}

#[test]
fn while_else_is_skipped_after_a_break() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("i = 0; ran_else = False", &mut scope).unwrap();
    engine
        .eval(
            "while True: i = i + 1; if i == 2: break else: ran_else = True",
            &mut scope,
        )
        .unwrap();
    assert_eq!(engine.eval("i", &mut scope).unwrap(), Some(Value::Int(2)));
    assert_eq!(
        engine.eval("ran_else", &mut scope).unwrap(),
        Some(Value::Bool(false))
    );
}

#[test]
fn while_continue_restarts_the_condition_check() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("i = 0; odds = 0", &mut scope).unwrap();
    engine
        .eval(
            "while i < 5: i = i + 1; if i % 2 == 0: continue else: odds = odds + 1",
            &mut scope,
        )
        .unwrap();
    assert_eq!(engine.eval("i", &mut scope).unwrap(), Some(Value::Int(5)));
    assert_eq!(engine.eval("odds", &mut scope).unwrap(), Some(Value::Int(3)));
}

#[test]
fn for_loop_iterates_a_string_character_by_character() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("seen = ''", &mut scope).unwrap();
    engine
        .eval("for c in 'abc': seen = seen + c", &mut scope)
        .unwrap();
    assert_eq!(
        engine.eval("seen", &mut scope).unwrap(),
        Some(Value::string("abc"))
    );
}

#[test]
fn for_else_runs_when_the_loop_completes_without_break() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("seen = ''", &mut scope).unwrap();
    engine
        .eval("for c in 'ab': seen = seen + c else: seen = seen + '!'", &mut scope)
        .unwrap();
    assert_eq!(
        engine.eval("seen", &mut scope).unwrap(),
        Some(Value::string("ab!"))
    );
}

#[test]
fn for_else_is_skipped_after_a_break() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("seen = ''", &mut scope).unwrap();
    engine
        .eval(
            "for c in 'abc': if c == 'b': break else: seen = seen + c else: seen = seen + '!'",
            &mut scope,
        )
        .unwrap();
    assert_eq!(
        engine.eval("seen", &mut scope).unwrap(),
        Some(Value::string("a"))
    );
}

#[test]
fn for_loop_binds_a_length_one_string_each_iteration() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("last = ''", &mut scope).unwrap();
    engine.eval("for c in 'xyz': last = c", &mut scope).unwrap();
    assert_eq!(
        engine.eval("last", &mut scope).unwrap(),
        Some(Value::string("z"))
    );
}

#[test]
fn nested_loops_each_track_their_own_loop_depth() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("count = 0", &mut scope).unwrap();
    engine
        .eval(
            "for a in 'xy': for b in '12': count = count + 1",
            &mut scope,
        )
        .unwrap();
    assert_eq!(engine.eval("count", &mut scope).unwrap(), Some(Value::Int(4)));
}

#[test]
fn break_in_an_inner_loop_does_not_stop_the_outer_loop() {
    let engine = Engine::new();
    let mut scope = Scope::new();
    engine.eval("count = 0", &mut scope).unwrap();
    engine
        .eval(
            "for a in 'xy': for b in '123': count = count + 1; if b == '2': break",
            &mut scope,
        )
        .unwrap();
    assert_eq!(engine.eval("count", &mut scope).unwrap(), Some(Value::Int(4)));
}
