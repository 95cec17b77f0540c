//! Custom uniform set tests.
//!
//! Full stack: declarations → build → initialize/update → push into a
//! recording sink.

use std::collections::HashMap;

use custom_uniforms::uniforms::{CachedVec2, UpdateFrequency::*};
use custom_uniforms::{
    resolve, CachedUniform, CustomUniforms, DeclarationError, ErrorCode, FunctionRegistry,
    ResolutionError, Token, Type, UniformSink, Value,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn num(text: &str) -> Token { Token::number(text) }
fn id(name: &str) -> Token { Token::id(name) }
fn bin(op: &str, l: Token, r: Token) -> Token { Token::binary(op, l, r) }

#[derive(Debug, Clone, PartialEq)]
enum Upload {
    Int(i32, Vec<i32>),
    Float(i32, Vec<f32>),
    Matrix(i32, u8, Vec<f32>),
}

#[derive(Default)]
struct Recorder(Vec<Upload>);

impl UniformSink for Recorder {
    fn set_int(&mut self, location: i32, value: i32)    { self.0.push(Upload::Int(location, vec![value])); }
    fn set_float(&mut self, location: i32, value: f32)  { self.0.push(Upload::Float(location, vec![value])); }
    fn set_ivec(&mut self, location: i32, value: &[i32]) { self.0.push(Upload::Int(location, value.to_vec())); }
    fn set_vec(&mut self, location: i32, value: &[f32])  { self.0.push(Upload::Float(location, value.to_vec())); }
    fn set_matrix(&mut self, location: i32, size: u8, columns: &[f32]) {
        self.0.push(Upload::Matrix(location, size, columns.to_vec()));
    }
}

fn builtin_types() -> HashMap<String, Type> {
    HashMap::from([
        ("time".to_string(),   Type::FLOAT),
        ("frame".to_string(),  Type::INT),
        ("paused".to_string(), Type::BOOL),
    ])
}

fn builtins(time: f32) -> HashMap<String, Value> {
    HashMap::from([
        ("time".to_string(),   Value::Float(time)),
        ("frame".to_string(),  Value::Int(12)),
        ("paused".to_string(), Value::Bool(false)),
    ])
}

fn location(name: &str) -> Option<i32> {
    ["u_time", "u_half_sq", "u_frame", "u_scale", "u_on", "u_rot"]
        .iter()
        .position(|n| *n == name)
        .map(|i| i as i32)
}

fn sample_set() -> CustomUniforms {
    CustomUniforms::builder()
        .uniform("u_time", Type::FLOAT, PerFrame, bin("*", id("time"), num("2.0")))
        .variable("half", Type::FLOAT, PerFrame, bin("/", id("time"), num("2")))
        .uniform("u_half_sq", Type::FLOAT, PerFrame, bin("*", id("half"), id("half")))
        .uniform("u_frame", Type::INT, PerTick, id("frame"))
        .uniform("u_scale", Type::vec(2), Once, Token::call("vec2", vec![num("1"), num("2.0")]))
        .uniform("u_on", Type::BOOL, PerFrame, Token::unary("!", id("paused")))
        .build(&FunctionRegistry::standard(), &builtin_types())
}

// ─── Build ───────────────────────────────────────────────────────────────────

#[test]
fn builds_in_declaration_order() {
    let set = sample_set();
    assert!(set.errors().is_empty(), "{:?}", set.errors());
    assert_eq!(set.len(), 6);
    assert_eq!(set.uniform_count(), 5);
    let names: Vec<&str> = set.holders().map(|h| h.name()).collect();
    assert_eq!(names, ["u_time", "half", "u_half_sq", "u_frame", "u_scale", "u_on"]);
}

#[test]
fn failing_declarations_are_skipped() {
    let set = CustomUniforms::builder()
        .uniform("a", Type::FLOAT, PerFrame, bin("+", id("missing"), num("1.0")))
        .uniform("b", Type::FLOAT, PerFrame, id("time"))
        .uniform("b", Type::FLOAT, PerFrame, num("1.0"))
        .uniform("time", Type::FLOAT, PerFrame, num("1.0"))
        .uniform("c", Type::INT, PerFrame, id("time"))
        .build(&FunctionRegistry::standard(), &builtin_types());

    assert_eq!(set.len(), 1);
    let codes: Vec<ErrorCode> = set.errors().iter().map(|e| e.code()).collect();
    assert_eq!(codes, [ErrorCode::R003, ErrorCode::R005, ErrorCode::R005, ErrorCode::R001]);
    let names: Vec<&str> = set.errors().iter().map(|e| e.name()).collect();
    assert_eq!(names, ["a", "b", "time", "c"]);
}

#[test]
fn forward_reference_is_unknown() {
    let set = CustomUniforms::builder()
        .uniform("early", Type::FLOAT, PerFrame, id("late"))
        .variable("late", Type::FLOAT, PerFrame, num("1.0"))
        .build(&FunctionRegistry::standard(), &builtin_types());

    assert_eq!(
        set.errors(),
        [DeclarationError::Resolution {
            name: "early".into(),
            source: ResolutionError::UnknownVariable("late".into()),
        }],
    );
}

#[test]
fn declaration_error_message_carries_code() {
    let set = CustomUniforms::builder()
        .uniform("bad", Type::INT, PerFrame, num("0xZZ"))
        .build(&FunctionRegistry::standard(), &builtin_types());
    assert_eq!(set.errors()[0].to_string(), "[R004] `bad`: invalid number literal `0xZZ`");
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[test]
fn initialize_evaluates_everything() {
    let mut set = sample_set();
    assert_eq!(set.initialize(&builtins(1.5)), 6);
    assert_eq!(set.get("u_time"),    Some(Value::Float(3.0)));
    assert_eq!(set.get("half"),      Some(Value::Float(0.75)));
    assert_eq!(set.get("u_half_sq"), Some(Value::Float(0.5625)));
    assert_eq!(set.get("u_frame"),   Some(Value::Int(12)));
    assert_eq!(set.get("u_scale"),   Some(Value::Vec2([1.0, 2.0])));
    assert_eq!(set.get("u_on"),      Some(Value::Bool(true)));
}

#[test]
fn update_only_touches_matching_frequency() {
    let mut set = sample_set();
    set.initialize(&builtins(1.5));

    // u_time, half and u_half_sq change; u_on stays true.
    assert_eq!(set.update(&builtins(2.0), PerFrame), 3);
    assert_eq!(set.get("u_half_sq"), Some(Value::Float(1.0)));

    assert_eq!(set.update(&builtins(2.0), PerTick), 0);
    assert_eq!(set.update(&builtins(9.0), Once), 0);
    assert_eq!(set.get("u_scale"), Some(Value::Vec2([1.0, 2.0])));
}

#[test]
fn later_declarations_see_fresh_values() {
    let mut set = sample_set();
    set.initialize(&builtins(1.5));
    set.update(&builtins(4.0), PerFrame);
    assert_eq!(set.get("half"),      Some(Value::Float(2.0)));
    assert_eq!(set.get("u_half_sq"), Some(Value::Float(4.0)));
}

// ─── Push ────────────────────────────────────────────────────────────────────

#[test]
fn push_uploads_uniforms_not_variables() {
    let mut set = sample_set();
    set.initialize(&builtins(1.5));

    let mut sink = Recorder::default();
    assert_eq!(set.push(&location, &mut sink, false), 5);
    assert_eq!(sink.0, [
        Upload::Float(0, vec![3.0]),
        Upload::Float(1, vec![0.5625]),
        Upload::Int(2, vec![12]),
        Upload::Float(3, vec![1.0, 2.0]),
        Upload::Int(4, vec![1]),
    ]);
}

#[test]
fn push_only_changed() {
    let mut set = sample_set();
    set.initialize(&builtins(1.5));
    set.push(&location, &mut Recorder::default(), false);

    set.update(&builtins(2.0), PerFrame);
    let mut sink = Recorder::default();
    assert_eq!(set.push(&location, &mut sink, true), 2);
    assert_eq!(sink.0, [Upload::Float(0, vec![4.0]), Upload::Float(1, vec![1.0])]);

    let mut sink = Recorder::default();
    assert_eq!(set.push(&location, &mut sink, true), 0);
    assert!(sink.0.is_empty());
}

#[test]
fn push_skips_missing_locations() {
    let mut set = CustomUniforms::builder()
        .uniform("unused", Type::FLOAT, PerFrame, id("time"))
        .build(&FunctionRegistry::standard(), &builtin_types());
    set.initialize(&builtins(1.0));
    assert_eq!(set.push(&location, &mut Recorder::default(), false), 0);
}

#[test]
fn matrix_uniform_uploads_columns() {
    let columns = vec![
        Token::call("vec2", vec![num("0.0"), num("1.0")]),
        Token::call("vec2", vec![Token::unary("-", num("1.0")), num("0.0")]),
    ];
    let mut set = CustomUniforms::builder()
        .uniform("u_rot", Type::matrix(2), Once, Token::call("mat2", columns))
        .build(&FunctionRegistry::standard(), &builtin_types());
    set.initialize(&builtins(0.0));

    let mut sink = Recorder::default();
    set.push(&location, &mut sink, true);
    assert_eq!(sink.0, [Upload::Matrix(5, 2, vec![0.0, 1.0, -1.0, 0.0])]);
}

// ─── Context ─────────────────────────────────────────────────────────────────

#[test]
fn set_values_visible_as_context() {
    let mut set = sample_set();
    let base = builtins(1.5);
    set.initialize(&base);

    let types: HashMap<String, Type> = [("u_time".to_string(), Type::FLOAT), ("time".to_string(), Type::FLOAT)].into();
    let mut expr = resolve(&FunctionRegistry::standard(), &types, Type::FLOAT, &bin("+", id("u_time"), id("time"))).unwrap();
    assert_eq!(expr.evaluate(&set.context(&base)), Value::Float(4.5));
}

#[test]
fn standalone_holder() {
    let expr = resolve(
        &FunctionRegistry::standard(),
        &builtin_types(),
        Type::vec(2),
        &Token::call("vec2", vec![id("time"), id("frame")]),
    ).unwrap();
    let mut holder = CachedVec2::new("u_pair", expr, PerFrame);
    let mut slot = Default::default();
    assert!(holder.update(&builtins(0.5), &mut slot));
    assert_eq!(holder.value(), [0.5, 12.0]);
    assert!(!holder.update(&builtins(0.5), &mut slot));
    assert!(!CachedUniform::changed(&holder));

    let mut sink = Recorder::default();
    holder.push(9, &mut sink);
    holder.push(9, &mut sink);
    assert_eq!(sink.0, [Upload::Float(9, vec![0.5, 12.0]), Upload::Float(9, vec![0.5, 12.0])]);
}

#[test]
fn set_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<CustomUniforms>();
}
