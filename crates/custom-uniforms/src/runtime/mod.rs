//! Evaluation runtime: resolved expressions and the slot they write into.

pub mod expression;
pub mod value;

use std::collections::HashMap;

use indexmap::IndexMap;

use value::{Payload, Value};

// ─── Return slot ──────────────────────────────────────────────────────────────

/// Shared output slot for expression evaluation.
///
/// One slot is reused across every expression and every frame. Whichever
/// node wrote last decides the variant; readers already know statically
/// which variant to expect from the expression's type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionReturn {
    value: Value,
}

impl FunctionReturn {
    pub fn new() -> Self {
        Self { value: Value::Int(0) }
    }

    pub fn value(&self) -> Value { self.value }

    pub fn set_value(&mut self, value: Value) { self.value = value; }

    /// Read the slot as `T`. Panics on a variant mismatch (a resolver defect).
    pub fn get<T: Payload>(&self) -> T { T::from_value(&self.value) }

    pub fn set<T: Payload>(&mut self, v: T) { self.value = v.into_value(); }
}

impl Default for FunctionReturn {
    fn default() -> Self { Self::new() }
}

// ─── Context ──────────────────────────────────────────────────────────────────

/// Read-only view of variable values for one evaluation pass.
///
/// Implementations write the current value of `name` into `out` and report
/// whether the name was known. Resolution has already checked every name
/// against the declared variable types, so `false` means the caller handed
/// evaluation a context that does not match the one used at load time.
pub trait FunctionContext {
    fn write_variable(&self, name: &str, out: &mut FunctionReturn) -> bool;
}

impl FunctionContext for HashMap<String, Value> {
    fn write_variable(&self, name: &str, out: &mut FunctionReturn) -> bool {
        match self.get(name) {
            Some(v) => { out.set_value(*v); true }
            None    => false,
        }
    }
}

impl FunctionContext for IndexMap<String, Value> {
    fn write_variable(&self, name: &str, out: &mut FunctionReturn) -> bool {
        match self.get(name) {
            Some(v) => { out.set_value(*v); true }
            None    => false,
        }
    }
}

/// Two contexts stacked: `top` shadows `base`.
pub struct LayeredContext<'a> {
    pub top:  &'a dyn FunctionContext,
    pub base: &'a dyn FunctionContext,
}

impl FunctionContext for LayeredContext<'_> {
    fn write_variable(&self, name: &str, out: &mut FunctionReturn) -> bool {
        self.top.write_variable(name, out) || self.base.write_variable(name, out)
    }
}

/// A context with no variables, for expressions built only from literals.
pub struct EmptyContext;

impl FunctionContext for EmptyContext {
    fn write_variable(&self, _name: &str, _out: &mut FunctionReturn) -> bool { false }
}
