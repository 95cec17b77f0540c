//! Cached uniforms
//!
//! A holder owns one resolved expression and the last value it produced.
//! `update` re-evaluates and reports whether the value changed; `push`
//! uploads the cached value to a `UniformSink` in the layout the GPU
//! expects. There is one holder per output type, all sharing `Cached<T>`.

pub mod set;

use tracing::trace;

use crate::runtime::expression::Expression;
use crate::runtime::value::{Payload, Value};
use crate::runtime::{FunctionContext, FunctionReturn};
use crate::types::mat::{M2, M3, M4};
use crate::types::{PrimitiveType, Type};

pub use set::{CustomUniforms, CustomUniformsBuilder, Declaration, DeclarationKind};

// ─── Frequency ────────────────────────────────────────────────────────────────

/// When a holder is re-evaluated. Holders do not act on this themselves;
/// the owning set picks which holders to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateFrequency {
    /// Once, when the set is initialized.
    Once,
    /// Every simulation tick.
    PerTick,
    #[default]
    PerFrame,
}

// ─── Sink ─────────────────────────────────────────────────────────────────────

/// Destination for uniform uploads, typically a bound shader program.
///
/// Booleans and boolean vectors arrive as ints. Matrices arrive as
/// `size * size` floats in column-major order.
pub trait UniformSink {
    fn set_int(&mut self, location: i32, value: i32);
    fn set_float(&mut self, location: i32, value: f32);
    fn set_ivec(&mut self, location: i32, value: &[i32]);
    fn set_vec(&mut self, location: i32, value: &[f32]);
    fn set_matrix(&mut self, location: i32, size: u8, columns: &[f32]);
}

/// Upload `value` in its native layout.
pub fn upload(value: Value, location: i32, sink: &mut dyn UniformSink) {
    match value {
        Value::Bool(b)  => sink.set_int(location, i32::from(b)),
        Value::Int(i)   => sink.set_int(location, i),
        Value::Float(f) => sink.set_float(location, f),
        Value::BVec2(v) => sink.set_ivec(location, &v.map(i32::from)),
        Value::BVec3(v) => sink.set_ivec(location, &v.map(i32::from)),
        Value::BVec4(v) => sink.set_ivec(location, &v.map(i32::from)),
        Value::IVec2(v) => sink.set_ivec(location, &v),
        Value::IVec3(v) => sink.set_ivec(location, &v),
        Value::IVec4(v) => sink.set_ivec(location, &v),
        Value::Vec2(v)  => sink.set_vec(location, &v),
        Value::Vec3(v)  => sink.set_vec(location, &v),
        Value::Vec4(v)  => sink.set_vec(location, &v),
        Value::Mat2(m)  => sink.set_matrix(location, 2, m.as_flattened()),
        Value::Mat3(m)  => sink.set_matrix(location, 3, m.as_flattened()),
        Value::Mat4(m)  => sink.set_matrix(location, 4, m.as_flattened()),
    }
}

// ─── Holder ───────────────────────────────────────────────────────────────────

pub struct Cached<T: Payload> {
    name:       String,
    expression: Expression,
    frequency:  UpdateFrequency,
    value:      T,
    changed:    bool,
}

impl<T: Payload> Cached<T> {
    /// The cached value starts at zero and is marked changed, so the first
    /// push uploads it even if the first update produces zero.
    pub fn new(name: impl Into<String>, expression: Expression, frequency: UpdateFrequency) -> Self {
        debug_assert_eq!(expression.ty(), T::TYPE);
        Self {
            name: name.into(),
            expression,
            frequency,
            value: T::from_value(&Value::zero(T::TYPE)),
            changed: true,
        }
    }

    /// Evaluate through `slot` and keep the result if it differs from the
    /// cached value.
    pub fn update(&mut self, ctx: &dyn FunctionContext, slot: &mut FunctionReturn) -> bool {
        self.expression.evaluate_to(ctx, slot);
        let fresh = slot.get::<T>();
        self.changed = fresh != self.value;
        if self.changed {
            self.value = fresh;
            trace!(name = %self.name, value = ?fresh.into_value(), "uniform changed");
        }
        self.changed
    }

    pub fn value(&self) -> T { self.value }

    pub fn push(&self, location: i32, sink: &mut dyn UniformSink) {
        upload(self.value.into_value(), location, sink);
    }

    pub fn write_to(&self, out: &mut FunctionReturn) {
        out.set(self.value);
    }
}

pub type CachedBool  = Cached<bool>;
pub type CachedInt   = Cached<i32>;
pub type CachedFloat = Cached<f32>;
pub type CachedBVec2 = Cached<[bool; 2]>;
pub type CachedBVec3 = Cached<[bool; 3]>;
pub type CachedBVec4 = Cached<[bool; 4]>;
pub type CachedIVec2 = Cached<[i32; 2]>;
pub type CachedIVec3 = Cached<[i32; 3]>;
pub type CachedIVec4 = Cached<[i32; 4]>;
pub type CachedVec2  = Cached<[f32; 2]>;
pub type CachedVec3  = Cached<[f32; 3]>;
pub type CachedVec4  = Cached<[f32; 4]>;
pub type CachedMat2  = Cached<M2>;
pub type CachedMat3  = Cached<M3>;
pub type CachedMat4  = Cached<M4>;

// ─── Type-erased holder ───────────────────────────────────────────────────────

/// Object-safe view of any `Cached<T>`, so one set can hold every type.
pub trait CachedUniform: Send {
    fn name(&self) -> &str;
    fn ty(&self) -> Type;
    fn frequency(&self) -> UpdateFrequency;
    fn update(&mut self, ctx: &dyn FunctionContext, slot: &mut FunctionReturn) -> bool;
    /// Result of the last `update`.
    fn changed(&self) -> bool;
    fn value(&self) -> Value;
    fn write_to(&self, out: &mut FunctionReturn);
    fn push(&self, location: i32, sink: &mut dyn UniformSink);
}

impl<T: Payload> CachedUniform for Cached<T> {
    fn name(&self) -> &str { &self.name }
    fn ty(&self) -> Type { T::TYPE }
    fn frequency(&self) -> UpdateFrequency { self.frequency }

    fn update(&mut self, ctx: &dyn FunctionContext, slot: &mut FunctionReturn) -> bool {
        Cached::update(self, ctx, slot)
    }

    fn changed(&self) -> bool { self.changed }
    fn value(&self) -> Value { self.value.into_value() }

    fn write_to(&self, out: &mut FunctionReturn) {
        Cached::write_to(self, out)
    }

    fn push(&self, location: i32, sink: &mut dyn UniformSink) {
        Cached::push(self, location, sink)
    }
}

/// Build the holder matching the expression's type.
pub fn holder_for(name: impl Into<String>, expression: Expression, frequency: UpdateFrequency) -> Box<dyn CachedUniform> {
    use PrimitiveType::*;

    macro_rules! holder {
        ($t:ty) => { Box::new(Cached::<$t>::new(name, expression, frequency)) as Box<dyn CachedUniform> };
    }

    match expression.ty() {
        Type::Primitive(Boolean) => holder!(bool),
        Type::Primitive(Int)     => holder!(i32),
        Type::Primitive(Float)   => holder!(f32),
        Type::Vector { element: Boolean, size: 2 } => holder!([bool; 2]),
        Type::Vector { element: Boolean, size: 3 } => holder!([bool; 3]),
        Type::Vector { element: Boolean, .. }      => holder!([bool; 4]),
        Type::Vector { element: Int, size: 2 }     => holder!([i32; 2]),
        Type::Vector { element: Int, size: 3 }     => holder!([i32; 3]),
        Type::Vector { element: Int, .. }          => holder!([i32; 4]),
        Type::Vector { element: Float, size: 2 }   => holder!([f32; 2]),
        Type::Vector { element: Float, size: 3 }   => holder!([f32; 3]),
        Type::Vector { element: Float, .. }        => holder!([f32; 4]),
        Type::Matrix { size: 2 } => holder!(M2),
        Type::Matrix { size: 3 } => holder!(M3),
        Type::Matrix { .. }      => holder!(M4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::expression::Constant;
    use crate::runtime::EmptyContext;

    #[derive(Default)]
    struct Recorder {
        ints:     Vec<(i32, Vec<i32>)>,
        floats:   Vec<(i32, Vec<f32>)>,
        matrices: Vec<(i32, u8, Vec<f32>)>,
    }

    impl UniformSink for Recorder {
        fn set_int(&mut self, location: i32, value: i32) { self.ints.push((location, vec![value])); }
        fn set_float(&mut self, location: i32, value: f32) { self.floats.push((location, vec![value])); }
        fn set_ivec(&mut self, location: i32, value: &[i32]) { self.ints.push((location, value.to_vec())); }
        fn set_vec(&mut self, location: i32, value: &[f32]) { self.floats.push((location, value.to_vec())); }
        fn set_matrix(&mut self, location: i32, size: u8, columns: &[f32]) {
            self.matrices.push((location, size, columns.to_vec()));
        }
    }

    fn constant(value: Value) -> Expression {
        Expression::Constant(Constant { value })
    }

    #[test]
    fn booleans_upload_as_ints() {
        let mut sink = Recorder::default();
        upload(Value::Bool(true), 3, &mut sink);
        upload(Value::BVec3([true, false, true]), 4, &mut sink);
        assert_eq!(sink.ints, vec![(3, vec![1]), (4, vec![1, 0, 1])]);
    }

    #[test]
    fn matrices_upload_column_major() {
        let mut sink = Recorder::default();
        upload(Value::Mat2([[1.0, 2.0], [3.0, 4.0]]), 7, &mut sink);
        assert_eq!(sink.matrices, vec![(7, 2, vec![1.0, 2.0, 3.0, 4.0])]);
    }

    #[test]
    fn update_reports_change_once() {
        let mut slot = FunctionReturn::new();
        let mut holder = CachedFloat::new("k", constant(Value::Float(2.5)), UpdateFrequency::Once);
        assert!(holder.update(&EmptyContext, &mut slot));
        assert_eq!(holder.value(), 2.5);
        assert!(!holder.update(&EmptyContext, &mut slot));
        assert!(!CachedUniform::changed(&holder));
    }

    #[test]
    fn zero_result_on_first_update_is_unchanged() {
        let mut slot = FunctionReturn::new();
        let mut holder = CachedInt::new("z", constant(Value::Int(0)), UpdateFrequency::PerFrame);
        assert!(CachedUniform::changed(&holder));
        assert!(!holder.update(&EmptyContext, &mut slot));
    }

    #[test]
    fn holder_for_matches_expression_type() {
        for value in [Value::Bool(true), Value::IVec3([1, 2, 3]), Value::Vec4([0.5; 4]), Value::Mat3([[1.0; 3]; 3])] {
            let holder = holder_for("h", constant(value), UpdateFrequency::PerFrame);
            assert_eq!(holder.ty(), value.ty());
        }
    }

    #[test]
    fn write_to_exposes_cached_value() {
        let mut slot = FunctionReturn::new();
        let mut holder = holder_for("v", constant(Value::Vec2([1.0, -1.0])), UpdateFrequency::PerTick);
        holder.update(&EmptyContext, &mut slot);

        let mut out = FunctionReturn::new();
        holder.write_to(&mut out);
        assert_eq!(out.value(), Value::Vec2([1.0, -1.0]));
    }
}
