pub mod resolver;


use std::collections::HashMap;

use crate::error::ResolutionError;
use crate::functions::FunctionRegistry;
use crate::runtime::expression::Expression;
use crate::syntax::Token;
use crate::types::Type;

pub use resolver::{parse_number, ExpressionResolver, ResolverConfig};

// ─── Entry point ─────────────────────────────────────────────────────────────

/// One-shot resolution of `token` as `target` with `variables` in scope.
///
/// Resolving many expressions against the same table should go through a
/// single `ExpressionResolver` instead, so literals are parsed once.
pub fn resolve(
    functions: &FunctionRegistry,
    variables: &HashMap<String, Type>,
    target: Type,
    token: &Token,
) -> Result<Expression, ResolutionError> {
    let lookup = |name: &str| variables.get(name).copied();
    ExpressionResolver::new(functions, &lookup).resolve_expression(target, token)
}
