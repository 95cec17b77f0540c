//! Expression resolver
//!
//! Turns a token tree plus a required type into a typed `Expression`,
//! choosing among overloads by arity and parameter type. Operators and
//! `v.x` accesses are rewritten to calls, so everything except literals
//! and identifiers goes through one call path:
//!
//! 1. direct: arguments must match parameter types exactly
//! 2. outer cast: resolve the whole call as some type that casts to the
//!    target, then wrap it in the cast
//! 3. inner casts: arguments may each be cast to their parameter type
//!
//! Steps 2 and 3 only run when implicit casting is allowed. More than one
//! match at any step is an error, never a silent pick.

use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, Level};

use crate::error::ResolutionError;
use crate::functions::{access_name, FunctionRegistry, TypedFunction, CAST};
use crate::runtime::expression::{Constant, Expression};
use crate::runtime::value::Value;
use crate::syntax::Token;
use crate::types::Type;

/// `Ok(None)` is an ordinary failed attempt; `Err` aborts the whole resolution.
type Resolved = Result<Option<Expression>, ResolutionError>;

type Candidates = SmallVec<[(Arc<TypedFunction>, Vec<Expression>); 1]>;

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfig {
    /// Record every branch attempt; see `extract_logs`.
    pub debug_trace: bool,
}

// ─── Resolver ─────────────────────────────────────────────────────────────────

pub struct ExpressionResolver<'a> {
    functions:     &'a FunctionRegistry,
    variable_type: &'a dyn Fn(&str) -> Option<Type>,
    config:        ResolverConfig,
    /// Literal text → parsed constant. Lives as long as the resolver.
    literals:      IndexMap<String, Constant>,
    /// Targets of the outer casts being tried for the current call,
    /// innermost last. Arguments start with an empty chain.
    cast_chain:    SmallVec<[Type; 4]>,
    depth:         usize,
    logs:          Vec<String>,
}

impl<'a> ExpressionResolver<'a> {
    pub fn new(functions: &'a FunctionRegistry, variable_type: &'a dyn Fn(&str) -> Option<Type>) -> Self {
        Self {
            functions,
            variable_type,
            config: ResolverConfig::default(),
            literals: IndexMap::new(),
            cast_chain: SmallVec::new(),
            depth: 0,
            logs: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve `token` as a `target`-typed expression.
    pub fn resolve_expression(&mut self, target: Type, token: &Token) -> Result<Expression, ResolutionError> {
        self.clear_logs();
        self.cast_chain.clear();
        self.depth = 0;

        match self.resolve_internal(target, token, true) {
            Ok(Some(expr)) => {
                debug!(%target, expression = %token, "resolved");
                Ok(expr)
            }
            Ok(None) => {
                debug!(%target, expression = %token, "unresolved");
                Err(ResolutionError::Unresolved {
                    target,
                    expression: token.to_string(),
                    trace: self.logs.clone(),
                })
            }
            Err(e) => {
                debug!(%target, expression = %token, error = %e, "resolution failed");
                Err(e)
            }
        }
    }

    /// Take the trace of the last `resolve_expression` call.
    pub fn extract_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    /// Number of distinct literal texts parsed so far.
    pub fn cached_literals(&self) -> usize {
        self.literals.len()
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    fn resolve_internal(&mut self, target: Type, token: &Token, implicit: bool) -> Resolved {
        match token {
            Token::Unary { op, inner } => {
                self.resolve_call(target, op, &[inner.as_ref()], implicit)
            }
            Token::Binary { op, left, right } => {
                self.resolve_call(target, op, &[left.as_ref(), right.as_ref()], implicit)
            }
            Token::Call { name, args } => {
                let args: SmallVec<[&Token; 4]> = args.iter().collect();
                self.resolve_call(target, name, &args, implicit)
            }
            Token::Access { base, index } => {
                self.resolve_call(target, &access_name(*index), &[base.as_ref()], implicit)
            }
            Token::Number(text) => self.resolve_literal(target, text, implicit),
            Token::Id(name)     => self.resolve_variable(target, name, implicit),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────────

    fn resolve_call(&mut self, target: Type, name: &str, args: &[&Token], implicit: bool) -> Resolved {
        self.log(|| format!("{name}/{} as {target}{}", args.len(), if implicit { "" } else { " (strict)" }));
        self.depth += 1;
        let result = self.resolve_call_steps(target, name, args, implicit);
        self.depth -= 1;
        result
    }

    fn resolve_call_steps(&mut self, target: Type, name: &str, args: &[&Token], implicit: bool) -> Resolved {
        // Direct: arguments resolve strictly, even for multi-argument calls,
        // so `1 + 2` as float becomes float(int + int) below rather than
        // float + float with two casts.
        if let Some(expr) = self.resolve_call_direct(target, name, args, false)? {
            return Ok(Some(expr));
        }
        if !implicit {
            return Ok(None);
        }
        if let Some(expr) = self.resolve_outer_cast(target, name, args)? {
            return Ok(Some(expr));
        }
        self.log(|| format!("inner casts for {name}"));
        self.resolve_call_direct(target, name, args, true)
    }

    /// Try every candidate of matching arity; each argument resolves against
    /// the candidate's parameter type, with casts only if `implicit`.
    fn resolve_call_direct(&mut self, target: Type, name: &str, args: &[&Token], implicit: bool) -> Resolved {
        // Arguments start their own cast chain; the enclosing one only
        // guards this call's outer-cast descent.
        let chain = std::mem::take(&mut self.cast_chain);
        let found = self.match_candidates(target, name, args, implicit);
        self.cast_chain = chain;
        let mut found = found?;

        if found.len() > 1 {
            return Err(self.ambiguous(name, target, found.iter().map(|(f, _)| f.to_string())));
        }
        Ok(found.pop().map(|(f, args)| Expression::call(f, args)))
    }

    fn match_candidates(&mut self, target: Type, name: &str, args: &[&Token], implicit: bool) -> Result<Candidates, ResolutionError> {
        let functions = self.functions;
        let mut found = Candidates::new();

        for candidate in functions.resolve(name, target).iter().filter(|f| f.arity() == args.len()) {
            let mut resolved = Vec::with_capacity(args.len());
            for (param, arg) in candidate.params().iter().zip(args) {
                match self.resolve_internal(*param, arg, implicit)? {
                    Some(expr) => resolved.push(expr),
                    None       => break,
                }
            }
            if resolved.len() == args.len() {
                self.log(|| format!("matched {candidate}"));
                found.push((Arc::clone(candidate), resolved));
            } else {
                self.log(|| format!("rejected {candidate}"));
            }
        }
        Ok(found)
    }

    /// Resolve the whole call as the source type of some cast into `target`.
    fn resolve_outer_cast(&mut self, target: Type, name: &str, args: &[&Token]) -> Resolved {
        let functions = self.functions;
        let mut found: SmallVec<[(Arc<TypedFunction>, Expression); 1]> = SmallVec::new();

        self.cast_chain.push(target);
        for cast in functions.resolve(CAST, target) {
            let &[inner] = cast.params() else { continue };
            if self.cast_chain.contains(&inner) {
                self.log(|| format!("skipped {cast}: {inner} already on the cast chain"));
                continue;
            }
            self.log(|| format!("outer {cast}"));
            match self.resolve_call(inner, name, args, true) {
                Ok(Some(expr)) => found.push((Arc::clone(cast), expr)),
                Ok(None)       => {}
                Err(e) => {
                    self.cast_chain.pop();
                    return Err(e);
                }
            }
        }
        self.cast_chain.pop();

        if found.len() > 1 {
            return Err(self.ambiguous(name, target, found.iter().map(|(cast, expr)| format!("{cast} of {expr}"))));
        }
        Ok(found.pop().map(|(cast, expr)| Expression::call(cast, vec![expr])))
    }

    // ── Leaves ────────────────────────────────────────────────────────────────

    fn resolve_literal(&mut self, target: Type, text: &str, implicit: bool) -> Resolved {
        let constant = self.literal(text)?;
        if constant.ty() == target {
            self.log(|| format!("literal {text}: {target}"));
            return Ok(Some(Expression::Constant(constant)));
        }
        if !implicit {
            self.log(|| format!("literal {text} is {}, not {target}", constant.ty()));
            return Ok(None);
        }
        Ok(self.cast_leaf(target, Expression::Constant(constant)))
    }

    fn resolve_variable(&mut self, target: Type, name: &str, implicit: bool) -> Resolved {
        let Some(ty) = (self.variable_type)(name) else {
            return Err(ResolutionError::UnknownVariable(name.to_string()));
        };
        let expr = Expression::Variable { name: name.to_string(), ty };
        if ty == target {
            self.log(|| format!("variable {name}: {target}"));
            return Ok(Some(expr));
        }
        if !implicit {
            self.log(|| format!("variable {name} is {ty}, not {target}"));
            return Ok(None);
        }
        Ok(self.cast_leaf(target, expr))
    }

    /// Wrap a leaf in the single cast from its type to `target`, if any.
    fn cast_leaf(&mut self, target: Type, expr: Expression) -> Option<Expression> {
        let from = expr.ty();
        let functions = self.functions;
        match functions.resolve(CAST, target).iter().find(|c| c.params() == [from]) {
            Some(cast) => {
                self.log(|| format!("cast {from} -> {target}"));
                Some(Expression::call(Arc::clone(cast), vec![expr]))
            }
            None => {
                self.log(|| format!("no cast {from} -> {target}"));
                None
            }
        }
    }

    /// Parse `text` once; later lookups of the same text reuse the constant.
    fn literal(&mut self, text: &str) -> Result<Constant, ResolutionError> {
        if let Some(constant) = self.literals.get(text) {
            return Ok(*constant);
        }
        let value = parse_number(text).ok_or_else(|| ResolutionError::NumberFormat(text.to_string()))?;
        let constant = Constant { value };
        self.literals.insert(text.to_string(), constant);
        Ok(constant)
    }

    // ── Trace ─────────────────────────────────────────────────────────────────

    fn log(&mut self, line: impl FnOnce() -> String) {
        let tracing_on = tracing::enabled!(Level::TRACE);
        if !self.config.debug_trace && !tracing_on {
            return;
        }
        let line = line();
        if tracing_on {
            trace!(depth = self.depth, "{line}");
        }
        if self.config.debug_trace {
            self.logs.push(format!("{:indent$}{line}", "", indent = self.depth * 2));
        }
    }

    fn ambiguous(&mut self, name: &str, target: Type, candidates: impl Iterator<Item = String>) -> ResolutionError {
        let candidates: Vec<String> = candidates.collect();
        self.log(|| format!("ambiguous {name} as {target}: {} candidates", candidates.len()));
        ResolutionError::Ambiguous {
            name: name.to_string(),
            target,
            candidates,
            trace: self.logs.clone(),
        }
    }
}

// ─── Literals ─────────────────────────────────────────────────────────────────

/// Integer rules first: `0b…` binary, `0x…` hex, any other leading `0`
/// octal, otherwise decimal. Text no integer rule accepts is read as a
/// float.
pub fn parse_number(text: &str) -> Option<Value> {
    let int = if text.len() >= 2 && text.starts_with('0') {
        if let Some(bin) = text.strip_prefix("0b") {
            i32::from_str_radix(bin, 2).ok()
        } else if let Some(hex) = text.strip_prefix("0x") {
            i32::from_str_radix(hex, 16).ok()
        } else {
            i32::from_str_radix(&text[1..], 8).ok()
        }
    } else {
        text.parse::<i32>().ok()
    };
    int.map(Value::Int)
        .or_else(|| text.parse::<f32>().ok().map(Value::Float))
}
