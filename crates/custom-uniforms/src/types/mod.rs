//! Type model: the currency of resolution.
//!
//! Every resolved expression carries exactly one `Type`. Types are plain
//! `Copy` descriptors compared structurally, so they can key registry maps
//! and be passed around freely during resolution.

pub mod mat;

use std::fmt;

// ─── Primitive ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Float,
    Boolean,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Int     => "int",
            Self::Float   => "float",
            Self::Boolean => "bool",
        }
    }

    /// Prefix used for vectors of this element type (`ivec3`, `vec3`, `bvec3`).
    fn vector_prefix(self) -> &'static str {
        match self {
            Self::Int     => "ivec",
            Self::Float   => "vec",
            Self::Boolean => "bvec",
        }
    }
}

// ─── Type ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    /// `size` is 2, 3 or 4.
    Vector { element: PrimitiveType, size: u8 },
    /// Square float matrix, `size` is 2, 3 or 4.
    Matrix { size: u8 },
}

impl Type {
    pub const INT:   Type = Type::Primitive(PrimitiveType::Int);
    pub const FLOAT: Type = Type::Primitive(PrimitiveType::Float);
    pub const BOOL:  Type = Type::Primitive(PrimitiveType::Boolean);

    pub fn vector(element: PrimitiveType, size: u8) -> Self {
        debug_assert!((2..=4).contains(&size), "vector size {size} out of range");
        Type::Vector { element, size }
    }

    pub fn vec(size: u8) -> Self { Self::vector(PrimitiveType::Float, size) }
    pub fn ivec(size: u8) -> Self { Self::vector(PrimitiveType::Int, size) }
    pub fn bvec(size: u8) -> Self { Self::vector(PrimitiveType::Boolean, size) }

    pub fn matrix(size: u8) -> Self {
        debug_assert!((2..=4).contains(&size), "matrix size {size} out of range");
        Type::Matrix { size }
    }

    /// Type of a single component (`v.x`, `m[0]`), or `None` for scalars.
    pub fn component_type(self) -> Option<Type> {
        match self {
            Type::Primitive(_)               => None,
            Type::Vector { element, .. }     => Some(Type::Primitive(element)),
            Type::Matrix { size }            => Some(Type::vec(size)),
        }
    }

    /// Number of addressable components: vector lanes or matrix columns.
    pub fn component_count(self) -> usize {
        match self {
            Type::Primitive(_)          => 1,
            Type::Vector { size, .. }   => size as usize,
            Type::Matrix { size }       => size as usize,
        }
    }

    /// Every type the model can express: scalars, then vectors, then matrices.
    pub fn all() -> impl Iterator<Item = Type> {
        use PrimitiveType::*;
        let scalars = [Int, Float, Boolean].into_iter().map(Type::Primitive);
        let vectors = [Int, Float, Boolean]
            .into_iter()
            .flat_map(|e| (2..=4).map(move |n| Type::vector(e, n)));
        let matrices = (2..=4).map(Type::matrix);
        scalars.chain(vectors).chain(matrices)
    }

    /// Parse the shader-pack spelling of a type (`float`, `ivec3`, `mat4`, …).
    pub fn parse(name: &str) -> Option<Type> {
        match name {
            "int"   => return Some(Type::INT),
            "float" => return Some(Type::FLOAT),
            "bool"  => return Some(Type::BOOL),
            _ => {}
        }
        let (ctor, size): (fn(u8) -> Type, &str) = if let Some(n) = name.strip_prefix("ivec") {
            (Type::ivec, n)
        } else if let Some(n) = name.strip_prefix("bvec") {
            (Type::bvec, n)
        } else if let Some(n) = name.strip_prefix("vec") {
            (Type::vec, n)
        } else if let Some(n) = name.strip_prefix("mat") {
            (Type::matrix, n)
        } else {
            return None;
        };
        match size {
            "2" => Some(ctor(2)),
            "3" => Some(ctor(3)),
            "4" => Some(ctor(4)),
            _   => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p)              => f.write_str(p.name()),
            Type::Vector { element, size }  => write!(f, "{}{size}", element.vector_prefix()),
            Type::Matrix { size }           => write!(f, "mat{size}"),
        }
    }
}
