//! Operator table: arithmetic, comparison, logic and `if`.
//!
//! Operators are registered under their source spelling (`+`, `==`, …);
//! unary minus is `-` with one parameter.

use crate::runtime::FunctionReturn;
use crate::runtime::value::{Payload, Value};
use crate::types::mat;
use crate::types::Type;
use super::{arg, FunctionRegistry, TypedFunction};

// ─── Lane traits ──────────────────────────────────────────────────────────────

/// Scalars and vectors seen as a run of lanes sharing one scalar type.
pub(crate) trait Lanes: Payload {
    type Lane: Payload;
    fn map(self, f: impl Fn(Self::Lane) -> Self::Lane) -> Self;
    fn zip(self, other: Self, f: impl Fn(Self::Lane, Self::Lane) -> Self::Lane) -> Self;
    fn splat(lane: Self::Lane) -> Self;
}

macro_rules! scalar_lanes {
    ($($t:ty),*) => {$(
        impl Lanes for $t {
            type Lane = $t;
            fn map(self, f: impl Fn($t) -> $t) -> Self { f(self) }
            fn zip(self, other: Self, f: impl Fn($t, $t) -> $t) -> Self { f(self, other) }
            fn splat(lane: $t) -> Self { lane }
        }
    )*};
}

scalar_lanes!(bool, i32, f32);

impl<T: Payload, const N: usize> Lanes for [T; N]
where
    [T; N]: Payload,
{
    type Lane = T;
    fn map(self, f: impl Fn(T) -> T) -> Self { std::array::from_fn(|i| f(self[i])) }
    fn zip(self, other: Self, f: impl Fn(T, T) -> T) -> Self { std::array::from_fn(|i| f(self[i], other[i])) }
    fn splat(lane: T) -> Self { [lane; N] }
}

/// Lane arithmetic. Integer ops wrap, and integer division or remainder by
/// zero yields 0 so evaluation cannot panic.
pub(crate) trait Arith: Payload {
    fn add(a: Self, b: Self) -> Self;
    fn sub(a: Self, b: Self) -> Self;
    fn mul(a: Self, b: Self) -> Self;
    fn div(a: Self, b: Self) -> Self;
    fn rem(a: Self, b: Self) -> Self;
    fn neg(a: Self) -> Self;
}

impl Arith for f32 {
    fn add(a: f32, b: f32) -> f32 { a + b }
    fn sub(a: f32, b: f32) -> f32 { a - b }
    fn mul(a: f32, b: f32) -> f32 { a * b }
    fn div(a: f32, b: f32) -> f32 { a / b }
    fn rem(a: f32, b: f32) -> f32 { a % b }
    fn neg(a: f32) -> f32 { -a }
}

impl Arith for i32 {
    fn add(a: i32, b: i32) -> i32 { a.wrapping_add(b) }
    fn sub(a: i32, b: i32) -> i32 { a.wrapping_sub(b) }
    fn mul(a: i32, b: i32) -> i32 { a.wrapping_mul(b) }
    fn div(a: i32, b: i32) -> i32 { a.checked_div(b).unwrap_or(0) }
    fn rem(a: i32, b: i32) -> i32 { a.checked_rem(b).unwrap_or(0) }
    fn neg(a: i32) -> i32 { a.wrapping_neg() }
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

macro_rules! lanewise {
    ($($name:ident => $op:ident;)*) => {$(
        fn $name<T: Lanes>(args: &[Value], out: &mut FunctionReturn)
        where
            T::Lane: Arith,
        {
            out.set(arg::<T>(args, 0).zip(arg(args, 1), <T::Lane as Arith>::$op));
        }
    )*};
}

lanewise! {
    add => add;
    sub => sub;
    mul => mul;
    div => div;
    rem => rem;
}

fn neg<T: Lanes>(args: &[Value], out: &mut FunctionReturn)
where
    T::Lane: Arith,
{
    out.set(arg::<T>(args, 0).map(<T::Lane as Arith>::neg));
}

fn mul_vs<T: Lanes>(args: &[Value], out: &mut FunctionReturn) where T::Lane: Arith {
    out.set(arg::<T>(args, 0).zip(T::splat(arg(args, 1)), <T::Lane as Arith>::mul));
}

fn mul_sv<T: Lanes>(args: &[Value], out: &mut FunctionReturn) where T::Lane: Arith {
    out.set(T::splat(arg(args, 0)).zip(arg(args, 1), <T::Lane as Arith>::mul));
}

fn div_vs<T: Lanes>(args: &[Value], out: &mut FunctionReturn) where T::Lane: Arith {
    out.set(arg::<T>(args, 0).zip(T::splat(arg(args, 1)), <T::Lane as Arith>::div));
}

fn div_sv<T: Lanes>(args: &[Value], out: &mut FunctionReturn) where T::Lane: Arith {
    out.set(T::splat(arg(args, 0)).zip(arg(args, 1), <T::Lane as Arith>::div));
}

fn register_arith<T: Lanes>(r: &mut FunctionRegistry)
where
    T::Lane: Arith,
{
    let t = T::TYPE;
    r.add(TypedFunction::native("+", &[t, t], t, add::<T>));
    r.add(TypedFunction::native("-", &[t, t], t, sub::<T>));
    r.add(TypedFunction::native("*", &[t, t], t, mul::<T>));
    r.add(TypedFunction::native("/", &[t, t], t, div::<T>));
    r.add(TypedFunction::native("%", &[t, t], t, rem::<T>));
    r.add(TypedFunction::native("-", &[t], t, neg::<T>));
}

/// `v * s`, `s * v`, `v / s`, `s / v` for a vector type and its lane type.
fn register_broadcast<T: Lanes>(r: &mut FunctionRegistry)
where
    T::Lane: Arith,
{
    let (v, s) = (T::TYPE, <T::Lane as Payload>::TYPE);
    r.add(TypedFunction::native("*", &[v, s], v, mul_vs::<T>));
    r.add(TypedFunction::native("*", &[s, v], v, mul_sv::<T>));
    r.add(TypedFunction::native("/", &[v, s], v, div_vs::<T>));
    r.add(TypedFunction::native("/", &[s, v], v, div_sv::<T>));
}

// ─── Matrices ─────────────────────────────────────────────────────────────────

fn mat_add<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::add(&arg::<[[f32; N]; N]>(args, 0), &arg(args, 1)));
}

fn mat_sub<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::sub(&arg::<[[f32; N]; N]>(args, 0), &arg(args, 1)));
}

fn mat_mul<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::mul(&arg::<[[f32; N]; N]>(args, 0), &arg(args, 1)));
}

fn mat_mul_vec<const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [[f32; N]; N]: Payload,
    [f32; N]: Payload,
{
    out.set(mat::mul_vec(&arg::<[[f32; N]; N]>(args, 0), &arg(args, 1)));
}

fn mat_scale<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::scale(&arg::<[[f32; N]; N]>(args, 0), arg(args, 1)));
}

fn scale_mat<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::scale(&arg::<[[f32; N]; N]>(args, 1), arg(args, 0)));
}

fn mat_neg<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::scale(&arg::<[[f32; N]; N]>(args, 0), -1.0));
}

fn register_matrix<const N: usize>(r: &mut FunctionRegistry)
where
    [[f32; N]; N]: Payload,
    [f32; N]: Payload,
{
    let m = <[[f32; N]; N]>::TYPE;
    let v = <[f32; N]>::TYPE;
    let f = Type::FLOAT;
    r.add(TypedFunction::native("+", &[m, m], m, mat_add::<N>));
    r.add(TypedFunction::native("-", &[m, m], m, mat_sub::<N>));
    r.add(TypedFunction::native("*", &[m, m], m, mat_mul::<N>));
    r.add(TypedFunction::native("*", &[m, v], v, mat_mul_vec::<N>));
    r.add(TypedFunction::native("*", &[m, f], m, mat_scale::<N>));
    r.add(TypedFunction::native("*", &[f, m], m, scale_mat::<N>));
    r.add(TypedFunction::native("-", &[m], m, mat_neg::<N>));
}

// ─── Comparison ───────────────────────────────────────────────────────────────

fn lt<T: Payload + PartialOrd>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) <  arg::<T>(args, 1)); }
fn le<T: Payload + PartialOrd>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) <= arg::<T>(args, 1)); }
fn gt<T: Payload + PartialOrd>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) >  arg::<T>(args, 1)); }
fn ge<T: Payload + PartialOrd>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) >= arg::<T>(args, 1)); }
fn eq<T: Payload>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) == arg::<T>(args, 1)); }
fn ne<T: Payload>(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<T>(args, 0) != arg::<T>(args, 1)); }

fn register_ordering<T: Payload + PartialOrd>(r: &mut FunctionRegistry) {
    let t = T::TYPE;
    r.add(TypedFunction::native("<",  &[t, t], Type::BOOL, lt::<T>));
    r.add(TypedFunction::native("<=", &[t, t], Type::BOOL, le::<T>));
    r.add(TypedFunction::native(">",  &[t, t], Type::BOOL, gt::<T>));
    r.add(TypedFunction::native(">=", &[t, t], Type::BOOL, ge::<T>));
}

/// Scalar `==` / `!=`, plus the vector forms: `==` holds when every lane is
/// equal (vectorized scalar `==`), `!=` is its negation.
fn register_equality<T: Payload>(r: &mut FunctionRegistry)
where
    [T; 2]: Payload,
    [T; 3]: Payload,
    [T; 4]: Payload,
{
    let t = T::TYPE;
    let scalar_eq = r.add(TypedFunction::native("==", &[t, t], Type::BOOL, eq::<T>));
    r.add(TypedFunction::native("!=", &[t, t], Type::BOOL, ne::<T>));
    for size in 2..=4 {
        r.add_vectorized(&scalar_eq, size);
    }
    r.add(TypedFunction::native("!=", &[<[T; 2]>::TYPE; 2], Type::BOOL, ne::<[T; 2]>));
    r.add(TypedFunction::native("!=", &[<[T; 3]>::TYPE; 2], Type::BOOL, ne::<[T; 3]>));
    r.add(TypedFunction::native("!=", &[<[T; 4]>::TYPE; 2], Type::BOOL, ne::<[T; 4]>));
}

// ─── Logic ────────────────────────────────────────────────────────────────────

fn and(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<bool>(args, 0) && arg::<bool>(args, 1)); }
fn or(args: &[Value], out: &mut FunctionReturn)  { out.set(arg::<bool>(args, 0) || arg::<bool>(args, 1)); }
fn not(args: &[Value], out: &mut FunctionReturn) { out.set(!arg::<bool>(args, 0)); }

/// `if(cond, a, b)`. Both branches are already evaluated; this only picks.
fn select(args: &[Value], out: &mut FunctionReturn) {
    out.set_value(if arg::<bool>(args, 0) { args[1] } else { args[2] });
}

// ─── Registration ─────────────────────────────────────────────────────────────

pub fn register(r: &mut FunctionRegistry) {
    register_arith::<i32>(r);
    register_arith::<f32>(r);
    register_arith::<[i32; 2]>(r);
    register_arith::<[i32; 3]>(r);
    register_arith::<[i32; 4]>(r);
    register_arith::<[f32; 2]>(r);
    register_arith::<[f32; 3]>(r);
    register_arith::<[f32; 4]>(r);

    register_broadcast::<[i32; 2]>(r);
    register_broadcast::<[i32; 3]>(r);
    register_broadcast::<[i32; 4]>(r);
    register_broadcast::<[f32; 2]>(r);
    register_broadcast::<[f32; 3]>(r);
    register_broadcast::<[f32; 4]>(r);

    register_matrix::<2>(r);
    register_matrix::<3>(r);
    register_matrix::<4>(r);

    register_ordering::<i32>(r);
    register_ordering::<f32>(r);

    register_equality::<i32>(r);
    register_equality::<f32>(r);
    register_equality::<bool>(r);

    let b = Type::BOOL;
    r.add(TypedFunction::native("&&", &[b, b], b, and));
    r.add(TypedFunction::native("||", &[b, b], b, or));
    r.add(TypedFunction::native("!",  &[b], b, not));

    for t in Type::all() {
        r.add(TypedFunction::native("if", &[b, t, t], t, select));
    }
}
