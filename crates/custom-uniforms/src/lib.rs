pub mod syntax;
pub mod types;
pub mod runtime;
pub mod functions;
pub mod analysis;
pub mod uniforms;
pub mod error;

pub use analysis::{resolve, ExpressionResolver, ResolverConfig};
pub use error::{DeclarationError, ErrorCode, ResolutionError};
pub use functions::{FunctionRegistry, TypedFunction};
pub use runtime::expression::{Constant, Expression};
pub use runtime::value::{Payload, Value};
pub use runtime::{EmptyContext, FunctionContext, FunctionReturn, LayeredContext};
pub use syntax::Token;
pub use types::{PrimitiveType, Type};
pub use uniforms::{
    CachedUniform, CustomUniforms, CustomUniformsBuilder, Declaration, DeclarationKind,
    UniformSink, UpdateFrequency,
};
