//! Resolved expression graph.
//!
//! Produced once by the resolver; evaluated every frame. Evaluation walks
//! the tree, writes into a caller-owned `FunctionReturn` and never
//! allocates: each call node owns its parameter buffer up front.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::functions::TypedFunction;
use crate::types::Type;
use super::value::Value;
use super::{FunctionContext, FunctionReturn};

/// A literal value, memoized by the resolver per source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub value: Value,
}

impl Constant {
    pub fn ty(&self) -> Type { self.value.ty() }
}

#[derive(Debug)]
pub enum Expression {
    Constant(Constant),
    Variable { name: String, ty: Type },
    Call(CallExpression),
}

#[derive(Debug)]
pub struct CallExpression {
    function: Arc<TypedFunction>,
    args:     Vec<Expression>,
    /// One slot per argument, filled left-to-right before the body runs.
    params:   SmallVec<[Value; 4]>,
}

impl Expression {
    pub fn call(function: Arc<TypedFunction>, args: Vec<Expression>) -> Self {
        debug_assert_eq!(function.arity(), args.len());
        let params = function.params().iter().map(|ty| Value::zero(*ty)).collect();
        Expression::Call(CallExpression { function, args, params })
    }

    pub fn ty(&self) -> Type {
        match self {
            Expression::Constant(c)         => c.ty(),
            Expression::Variable { ty, .. } => *ty,
            Expression::Call(call)          => call.function.return_type(),
        }
    }

    pub fn evaluate_to(&mut self, ctx: &dyn FunctionContext, out: &mut FunctionReturn) {
        match self {
            Expression::Constant(c) => out.set_value(c.value),
            Expression::Variable { name, ty } => {
                if !ctx.write_variable(name, out) {
                    // Resolution already checked this name; keep the slot well-typed.
                    out.set_value(Value::zero(*ty));
                }
            }
            Expression::Call(call) => {
                for (arg, slot) in call.args.iter_mut().zip(call.params.iter_mut()) {
                    arg.evaluate_to(ctx, out);
                    *slot = out.value();
                }
                call.function.invoke(&call.params, out);
            }
        }
    }

    /// Evaluate into a fresh slot and return the value. Convenience for
    /// callers off the hot path.
    pub fn evaluate(&mut self, ctx: &dyn FunctionContext) -> Value {
        let mut out = FunctionReturn::new();
        self.evaluate_to(ctx, &mut out);
        out.value()
    }

    /// The function at the root of a call expression.
    pub fn function(&self) -> Option<&TypedFunction> {
        match self {
            Expression::Call(call) => Some(&call.function),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Expression] {
        match self {
            Expression::Call(call) => &call.args,
            _ => &[],
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(c)           => write!(f, "{:?}", c.value),
            Expression::Variable { name, .. } => f.write_str(name),
            Expression::Call(call) => {
                write!(f, "{}(", call.function.name())?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{arg}")?;
                }
                write!(f, "): {}", call.function.return_type())
            }
        }
    }
}
