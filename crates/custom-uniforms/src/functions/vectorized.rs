//! Lane-wise boolean functions.
//!
//! A scalar predicate `p(a, b, …) -> bool` lifted to vectors of one size:
//! the result is `true` iff `p` holds for every lane. Lanes are visited in
//! order and evaluation stops at the first `false`.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::runtime::FunctionReturn;
use crate::runtime::value::Value;
use crate::types::Type;
use super::{FunctionBody, TypedFunction};

/// Lift `scalar` to vectors of `size`. `None` unless `scalar` returns
/// `bool` and every parameter is a primitive.
pub fn vectorize(scalar: &Arc<TypedFunction>, size: u8) -> Option<TypedFunction> {
    if scalar.return_type() != Type::BOOL {
        return None;
    }
    let params = scalar
        .params()
        .iter()
        .map(|p| match p {
            Type::Primitive(element) => Some(Type::vector(*element, size)),
            _                        => None,
        })
        .collect::<Option<SmallVec<[Type; 4]>>>()?;
    Some(TypedFunction {
        name: scalar.name().to_string(),
        params,
        return_type: Type::BOOL,
        body: FunctionBody::Vectorized { inner: Arc::clone(scalar), size },
    })
}

pub(super) fn invoke(inner: &TypedFunction, size: u8, args: &[Value], out: &mut FunctionReturn) {
    for lane in 0..size as usize {
        let lanes: SmallVec<[Value; 4]> = args.iter().map(|a| a.component(lane)).collect();
        inner.invoke(&lanes, out);
        if !out.get::<bool>() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting_eq(args: &[Value], out: &mut FunctionReturn) {
        CALLS.fetch_add(1, Ordering::SeqCst);
        out.set(args[0] == args[1]);
    }

    fn eq3() -> TypedFunction {
        let scalar = Arc::new(TypedFunction::native("==", &[Type::FLOAT, Type::FLOAT], Type::BOOL, counting_eq));
        vectorize(&scalar, 3).unwrap()
    }

    #[test]
    fn signature_is_lifted() {
        let f = eq3();
        assert_eq!(f.params(), &[Type::vec(3), Type::vec(3)]);
        assert_eq!(f.return_type(), Type::BOOL);
        assert_eq!(f.name(), "==");
    }

    #[test]
    fn stops_at_first_false_lane() {
        let f = eq3();
        let mut out = FunctionReturn::new();

        CALLS.store(0, Ordering::SeqCst);
        f.invoke(&[Value::Vec3([1.0, 2.0, 3.0]), Value::Vec3([1.0, 9.0, 3.0])], &mut out);
        assert!(!out.get::<bool>());
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);

        CALLS.store(0, Ordering::SeqCst);
        f.invoke(&[Value::Vec3([1.0, 2.0, 3.0]), Value::Vec3([1.0, 2.0, 3.0])], &mut out);
        assert!(out.get::<bool>());
        assert_eq!(CALLS.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn rejects_non_scalar_signatures() {
        let over_vectors = Arc::new(TypedFunction::native("==", &[Type::vec(3), Type::vec(3)], Type::BOOL, counting_eq));
        assert!(vectorize(&over_vectors, 2).is_none());

        let not_predicate = Arc::new(TypedFunction::native("+", &[Type::FLOAT, Type::FLOAT], Type::FLOAT, counting_eq));
        assert!(vectorize(&not_predicate, 3).is_none());
    }
}
