//! Function registry: maps (name, return type) → overloaded candidates.
//!
//! Operators, component access and implicit casts are ordinary entries here
//! under synthetic names, so the resolver has a single call path.
//! Adding a function = calling `add()`. No edits to the resolver needed.

pub mod constructors;
pub mod math;
pub mod operators;
pub mod vectorized;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::runtime::FunctionReturn;
use crate::runtime::value::{Payload, Value};
use crate::types::Type;

// ─── Names ────────────────────────────────────────────────────────────────────

/// Registry key of the implicit cast family. Casts are looked up by their
/// return type like every other function.
pub const CAST: &str = "<cast>";

/// Registry key of component/column access at `index` (`v.x` is index 0).
pub fn access_name(index: usize) -> String {
    format!("<access${index}>")
}

// ─── Function pointer ─────────────────────────────────────────────────────────

/// Native body: read `args` (already typed by resolution), write the result
/// into `out`.
pub type NativeFn = fn(&[Value], &mut FunctionReturn);

/// Argument `i` as its native type. Caller guarantees the variant.
#[inline]
pub(crate) fn arg<T: Payload>(args: &[Value], i: usize) -> T {
    T::from_value(&args[i])
}

pub enum FunctionBody {
    Native(NativeFn),
    /// Scalar boolean predicate applied lane by lane, see `vectorized.rs`.
    Vectorized { inner: Arc<TypedFunction>, size: u8 },
}

// ─── TypedFunction ────────────────────────────────────────────────────────────

pub struct TypedFunction {
    name:        String,
    params:      SmallVec<[Type; 4]>,
    return_type: Type,
    body:        FunctionBody,
}

impl TypedFunction {
    pub fn native(name: impl Into<String>, params: &[Type], return_type: Type, f: NativeFn) -> Self {
        Self {
            name: name.into(),
            params: SmallVec::from_slice(params),
            return_type,
            body: FunctionBody::Native(f),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn params(&self) -> &[Type] { &self.params }
    pub fn arity(&self) -> usize { self.params.len() }
    pub fn return_type(&self) -> Type { self.return_type }

    /// Run the body on already-evaluated arguments.
    pub fn invoke(&self, args: &[Value], out: &mut FunctionReturn) {
        match &self.body {
            FunctionBody::Native(f) => f(args, out),
            FunctionBody::Vectorized { inner, size } => vectorized::invoke(inner, *size, args, out),
        }
    }
}

impl fmt::Display for TypedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 { f.write_str(", ")?; }
            write!(f, "{p}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

impl fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

/// `new()` and `default()` are both empty; `standard()` has the built-ins.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, HashMap<Type, Vec<Arc<TypedFunction>>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in function table available to every custom uniform.
    pub fn standard() -> Self {
        let mut r = Self::new();
        operators::register(&mut r);
        math::register(&mut r);
        constructors::register(&mut r);
        r
    }

    /// Register `f`. Registering two functions with the same name and
    /// parameter list is a programming error in the table being built.
    pub fn add(&mut self, f: TypedFunction) -> Arc<TypedFunction> {
        debug_assert!(
            !self.contains_signature(&f.name, &f.params),
            "duplicate registration of {f}",
        );
        let f = Arc::new(f);
        self.functions
            .entry(f.name.clone())
            .or_default()
            .entry(f.return_type)
            .or_default()
            .push(Arc::clone(&f));
        f
    }

    /// Register a lane-wise version of the scalar predicate `scalar` over
    /// vectors of `size`, under the same name. `scalar` must return `bool`
    /// and take only primitives; otherwise nothing is added and `None` is
    /// returned.
    pub fn add_vectorized(&mut self, scalar: &Arc<TypedFunction>, size: u8) -> Option<Arc<TypedFunction>> {
        let lifted = vectorized::vectorize(scalar, size)?;
        Some(self.add(lifted))
    }

    /// Every function named `name` that returns `target`, in registration
    /// order. Arity is left for the caller to filter.
    pub fn resolve(&self, name: &str, target: Type) -> &[Arc<TypedFunction>] {
        self.functions
            .get(name)
            .and_then(|by_ret| by_ret.get(&target))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All functions registered under `name`, any return type.
    pub fn overloads(&self, name: &str) -> impl Iterator<Item = &Arc<TypedFunction>> {
        self.functions.get(name).into_iter().flat_map(|m| m.values().flatten())
    }

    fn contains_signature(&self, name: &str, params: &[Type]) -> bool {
        self.overloads(name).any(|f| f.params() == params)
    }
}
