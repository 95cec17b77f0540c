use crate::types::mat::{M2, M3, M4};
use crate::types::{PrimitiveType, Type};

/// A fully evaluated value. Every variant is plain data, so values are
/// `Copy` and moving them through the evaluation graph never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    BVec2([bool; 2]),
    BVec3([bool; 3]),
    BVec4([bool; 4]),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat2(M2),   // column-major
    Mat3(M3),
    Mat4(M4),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Bool(_)  => Type::BOOL,
            Value::Int(_)   => Type::INT,
            Value::Float(_) => Type::FLOAT,
            Value::BVec2(_) => Type::bvec(2),
            Value::BVec3(_) => Type::bvec(3),
            Value::BVec4(_) => Type::bvec(4),
            Value::IVec2(_) => Type::ivec(2),
            Value::IVec3(_) => Type::ivec(3),
            Value::IVec4(_) => Type::ivec(4),
            Value::Vec2(_)  => Type::vec(2),
            Value::Vec3(_)  => Type::vec(3),
            Value::Vec4(_)  => Type::vec(4),
            Value::Mat2(_)  => Type::matrix(2),
            Value::Mat3(_)  => Type::matrix(3),
            Value::Mat4(_)  => Type::matrix(4),
        }
    }

    /// The zero value of `ty`: `false`, `0`, `0.0`, zero vectors, zero matrices.
    pub fn zero(ty: Type) -> Value {
        use PrimitiveType::*;
        match ty {
            Type::Primitive(Boolean) => Value::Bool(false),
            Type::Primitive(Int)     => Value::Int(0),
            Type::Primitive(Float)   => Value::Float(0.0),
            Type::Vector { element: Boolean, size: 2 } => Value::BVec2([false; 2]),
            Type::Vector { element: Boolean, size: 3 } => Value::BVec3([false; 3]),
            Type::Vector { element: Boolean, .. }      => Value::BVec4([false; 4]),
            Type::Vector { element: Int, size: 2 }     => Value::IVec2([0; 2]),
            Type::Vector { element: Int, size: 3 }     => Value::IVec3([0; 3]),
            Type::Vector { element: Int, .. }          => Value::IVec4([0; 4]),
            Type::Vector { element: Float, size: 2 }   => Value::Vec2([0.0; 2]),
            Type::Vector { element: Float, size: 3 }   => Value::Vec3([0.0; 3]),
            Type::Vector { element: Float, .. }        => Value::Vec4([0.0; 4]),
            Type::Matrix { size: 2 } => Value::Mat2([[0.0; 2]; 2]),
            Type::Matrix { size: 3 } => Value::Mat3([[0.0; 3]; 3]),
            Type::Matrix { .. }      => Value::Mat4([[0.0; 4]; 4]),
        }
    }

    /// Component `i` of a vector (a scalar) or column `i` of a matrix (a vector).
    /// Caller guarantees `i` is in range for this value's type.
    pub fn component(&self, i: usize) -> Value {
        match self {
            Value::BVec2(v) => Value::Bool(v[i]),
            Value::BVec3(v) => Value::Bool(v[i]),
            Value::BVec4(v) => Value::Bool(v[i]),
            Value::IVec2(v) => Value::Int(v[i]),
            Value::IVec3(v) => Value::Int(v[i]),
            Value::IVec4(v) => Value::Int(v[i]),
            Value::Vec2(v)  => Value::Float(v[i]),
            Value::Vec3(v)  => Value::Float(v[i]),
            Value::Vec4(v)  => Value::Float(v[i]),
            Value::Mat2(m)  => Value::Vec2(m[i]),
            Value::Mat3(m)  => Value::Vec3(m[i]),
            Value::Mat4(m)  => Value::Vec4(m[i]),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => unreachable!("scalar has no components"),
        }
    }
}

// ─── Payload conversion ───────────────────────────────────────────────────────

/// Native Rust representation of one `Value` variant.
///
/// `from_value` is only called where resolution has already proven the
/// variant, so a mismatch is a resolver defect.
pub trait Payload: Copy + PartialEq + Send + 'static {
    const TYPE: Type;
    fn from_value(v: &Value) -> Self;
    fn into_value(self) -> Value;
}

macro_rules! payload {
    ($($rust:ty => $variant:ident, $ty:expr;)*) => {$(
        impl Payload for $rust {
            const TYPE: Type = $ty;
            fn from_value(v: &Value) -> Self {
                let Value::$variant(x) = v else { unreachable!("expected {}, found {:?}", $ty, v) };
                *x
            }
            fn into_value(self) -> Value { Value::$variant(self) }
        }
    )*};
}

const fn vector(element: PrimitiveType, size: u8) -> Type { Type::Vector { element, size } }

payload! {
    bool       => Bool,  Type::BOOL;
    i32        => Int,   Type::INT;
    f32        => Float, Type::FLOAT;
    [bool; 2]  => BVec2, vector(PrimitiveType::Boolean, 2);
    [bool; 3]  => BVec3, vector(PrimitiveType::Boolean, 3);
    [bool; 4]  => BVec4, vector(PrimitiveType::Boolean, 4);
    [i32; 2]   => IVec2, vector(PrimitiveType::Int, 2);
    [i32; 3]   => IVec3, vector(PrimitiveType::Int, 3);
    [i32; 4]   => IVec4, vector(PrimitiveType::Int, 4);
    [f32; 2]   => Vec2,  vector(PrimitiveType::Float, 2);
    [f32; 3]   => Vec3,  vector(PrimitiveType::Float, 3);
    [f32; 4]   => Vec4,  vector(PrimitiveType::Float, 4);
    M2         => Mat2,  Type::Matrix { size: 2 };
    M3         => Mat3,  Type::Matrix { size: 3 };
    M4         => Mat4,  Type::Matrix { size: 4 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_have_requested_type() {
        for ty in [Type::BOOL, Type::INT, Type::FLOAT, Type::bvec(3), Type::ivec(2), Type::vec(4), Type::matrix(3)] {
            assert_eq!(Value::zero(ty).ty(), ty);
        }
    }

    #[test]
    fn payload_type_matches_variant() {
        assert_eq!(<[f32; 3]>::TYPE, Value::Vec3([0.0; 3]).ty());
        assert_eq!(<M2>::TYPE, Type::matrix(2));
        assert_eq!(<[i32; 4] as Payload>::from_value(&Value::IVec4([1, 2, 3, 4])), [1, 2, 3, 4]);
    }

    #[test]
    fn matrix_component_is_column() {
        let m = Value::Mat2([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.component(1), Value::Vec2([3.0, 4.0]));
    }
}
