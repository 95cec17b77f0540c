//! Custom uniform set: declarations resolved once, updated per frequency.
//!
//! Declarations load in order and may read any earlier declaration by
//! name. A declaration that fails to resolve is reported and left out;
//! the rest of the set still loads.

use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::analysis::{ExpressionResolver, ResolverConfig};
use crate::error::DeclarationError;
use crate::functions::FunctionRegistry;
use crate::runtime::value::Value;
use crate::runtime::{FunctionContext, FunctionReturn, LayeredContext};
use crate::syntax::Token;
use crate::types::Type;
use super::{holder_for, CachedUniform, UniformSink, UpdateFrequency};

// ─── Declarations ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Uploaded to the shader.
    Uniform,
    /// Only visible to later declarations.
    Variable,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name:      String,
    pub ty:        Type,
    pub token:     Token,
    pub frequency: UpdateFrequency,
    pub kind:      DeclarationKind,
}

#[derive(Default)]
pub struct CustomUniformsBuilder {
    declarations: Vec<Declaration>,
    config:       ResolverConfig,
}

impl CustomUniformsBuilder {
    pub fn uniform(self, name: &str, ty: Type, frequency: UpdateFrequency, token: Token) -> Self {
        self.declare(name, ty, frequency, token, DeclarationKind::Uniform)
    }

    pub fn variable(self, name: &str, ty: Type, frequency: UpdateFrequency, token: Token) -> Self {
        self.declare(name, ty, frequency, token, DeclarationKind::Variable)
    }

    pub fn declare(mut self, name: &str, ty: Type, frequency: UpdateFrequency, token: Token, kind: DeclarationKind) -> Self {
        self.declarations.push(Declaration { name: name.to_string(), ty, token, frequency, kind });
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve every declaration against `registry`, with `builtin_types`
    /// and the declarations before it in scope.
    pub fn build(self, registry: &FunctionRegistry, builtin_types: &HashMap<String, Type>) -> CustomUniforms {
        let declared: RefCell<IndexMap<String, Type>> = RefCell::new(IndexMap::new());
        let lookup = |name: &str| {
            declared.borrow().get(name).copied().or_else(|| builtin_types.get(name).copied())
        };
        let mut resolver = ExpressionResolver::new(registry, &lookup).with_config(self.config);

        let mut set = CustomUniforms::default();
        for decl in self.declarations {
            if declared.borrow().contains_key(&decl.name) || builtin_types.contains_key(&decl.name) {
                let e = DeclarationError::Duplicate(decl.name);
                warn!(error = %e, "custom uniform disabled");
                set.errors.push(e);
                continue;
            }

            let expression = match resolver.resolve_expression(decl.ty, &decl.token) {
                Ok(expression) => expression,
                Err(source) => {
                    let e = DeclarationError::Resolution { name: decl.name, source };
                    warn!(error = %e, "custom uniform disabled");
                    set.errors.push(e);
                    continue;
                }
            };

            declared.borrow_mut().insert(decl.name.clone(), decl.ty);
            set.values.insert(decl.name.clone(), Value::zero(decl.ty));
            set.entries.push(Entry {
                holder:  holder_for(decl.name, expression, decl.frequency),
                kind:    decl.kind,
                pending: true,
            });
        }

        info!(
            uniforms = set.uniform_count(),
            variables = set.entries.len() - set.uniform_count(),
            failed = set.errors.len(),
            literals = resolver.cached_literals(),
            "custom uniforms built",
        );
        set
    }
}

// ─── Set ──────────────────────────────────────────────────────────────────────

struct Entry {
    holder:  Box<dyn CachedUniform>,
    kind:    DeclarationKind,
    /// Changed since the last push.
    pending: bool,
}

#[derive(Default)]
pub struct CustomUniforms {
    entries: Vec<Entry>,
    /// Current value of each entry, same order as `entries`.
    values:  IndexMap<String, Value>,
    errors:  Vec<DeclarationError>,
    slot:    FunctionReturn,
}

impl CustomUniforms {
    pub fn builder() -> CustomUniformsBuilder {
        CustomUniformsBuilder::default()
    }

    /// Evaluate every declaration once, whatever its frequency.
    pub fn initialize(&mut self, ctx: &dyn FunctionContext) -> usize {
        self.update_where(ctx, |_| true)
    }

    /// Re-evaluate the declarations tagged `frequency`, in declaration
    /// order. Returns how many changed.
    pub fn update(&mut self, ctx: &dyn FunctionContext, frequency: UpdateFrequency) -> usize {
        self.update_where(ctx, |f| f == frequency)
    }

    fn update_where(&mut self, ctx: &dyn FunctionContext, select: impl Fn(UpdateFrequency) -> bool) -> usize {
        let mut changed = 0;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if !select(entry.holder.frequency()) {
                continue;
            }
            let scope = LayeredContext { top: &self.values, base: ctx };
            if !entry.holder.update(&scope, &mut self.slot) {
                continue;
            }
            changed += 1;
            entry.pending = true;
            entry.holder.write_to(&mut self.slot);
            if let Some((_, value)) = self.values.get_index_mut(i) {
                *value = self.slot.value();
            }
        }
        changed
    }

    /// Upload uniforms that have a location. With `only_changed`, only those
    /// changed since their last push. Variables are never uploaded.
    pub fn push(&mut self, locations: &dyn Fn(&str) -> Option<i32>, sink: &mut dyn UniformSink, only_changed: bool) -> usize {
        let mut pushed = 0;
        for entry in &mut self.entries {
            if entry.kind != DeclarationKind::Uniform || (only_changed && !entry.pending) {
                continue;
            }
            let Some(location) = locations(entry.holder.name()) else { continue };
            entry.holder.push(location, sink);
            entry.pending = false;
            pushed += 1;
        }
        pushed
    }

    /// Current value of `name`, uniform or variable.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).copied()
    }

    /// Declarations that failed to load.
    pub fn errors(&self) -> &[DeclarationError] {
        &self.errors
    }

    pub fn holders(&self) -> impl Iterator<Item = &dyn CachedUniform> {
        self.entries.iter().map(|e| e.holder.as_ref())
    }

    pub fn uniform_count(&self) -> usize {
        self.entries.iter().filter(|e| e.kind == DeclarationKind::Uniform).count()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// These values shadowing `base`, for evaluating further expressions.
    pub fn context<'a>(&'a self, base: &'a dyn FunctionContext) -> LayeredContext<'a> {
        LayeredContext { top: self, base }
    }
}

impl FunctionContext for CustomUniforms {
    fn write_variable(&self, name: &str, out: &mut FunctionReturn) -> bool {
        self.values.write_variable(name, out)
    }
}
