//! Constructors, vector/matrix helpers, component access and implicit casts.

use crate::runtime::FunctionReturn;
use crate::runtime::value::{Payload, Value};
use crate::types::mat;
use crate::types::Type;
use super::{access_name, arg, FunctionRegistry, NativeFn, TypedFunction, CAST};

// ─── Constructors ─────────────────────────────────────────────────────────────

/// `vec3(x, y, z)`, `ivec2(a, b)`, `bvec4(…)`: one argument per lane.
fn vector<L: Payload, const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [L; N]: Payload,
{
    out.set(std::array::from_fn::<L, N, _>(|i| arg(args, i)));
}

/// `vec3(s)`: every lane set to `s`.
fn splat<L: Payload, const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [L; N]: Payload,
{
    out.set([arg::<L>(args, 0); N]);
}

/// `mat3(c0, c1, c2)`: one column vector per argument.
fn matrix<const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [[f32; N]; N]: Payload,
    [f32; N]: Payload,
{
    out.set(std::array::from_fn::<[f32; N], N, _>(|i| arg(args, i)));
}

/// `mat3(s)`: `s` on the diagonal.
fn diagonal<const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [[f32; N]; N]: Payload,
{
    out.set(mat::scale(&mat::identity::<N>(), arg(args, 0)));
}

fn register_vector<L: Payload, const N: usize>(r: &mut FunctionRegistry, with_splat: bool)
where
    [L; N]: Payload,
{
    let t = <[L; N]>::TYPE;
    let name = t.to_string();
    r.add(TypedFunction::native(name.as_str(), &[L::TYPE; N], t, vector::<L, N>));
    if with_splat {
        r.add(TypedFunction::native(name, &[L::TYPE], t, splat::<L, N>));
    }
}

fn register_matrix<const N: usize>(r: &mut FunctionRegistry)
where
    [[f32; N]; N]: Payload,
    [f32; N]: Payload,
{
    let t = <[[f32; N]; N]>::TYPE;
    let name = t.to_string();
    r.add(TypedFunction::native(name.as_str(), &[<[f32; N]>::TYPE; N], t, matrix::<N>));
    r.add(TypedFunction::native(name, &[Type::FLOAT], t, diagonal::<N>));
    r.add(TypedFunction::native("transpose", &[t], t, transpose::<N>));
}

// ─── Vector helpers ───────────────────────────────────────────────────────────

fn dot_of<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn length<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [f32; N]: Payload {
    let v: [f32; N] = arg(args, 0);
    out.set(dot_of(&v, &v).sqrt());
}

fn dot<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [f32; N]: Payload {
    out.set(dot_of::<N>(&arg(args, 0), &arg(args, 1)));
}

fn distance<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [f32; N]: Payload {
    let (a, b): ([f32; N], [f32; N]) = (arg(args, 0), arg(args, 1));
    let d: [f32; N] = std::array::from_fn(|i| a[i] - b[i]);
    out.set(dot_of(&d, &d).sqrt());
}

/// Zero-length input is returned unchanged.
fn normalize<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [f32; N]: Payload {
    let v: [f32; N] = arg(args, 0);
    let len = dot_of(&v, &v).sqrt();
    out.set(if len == 0.0 { v } else { v.map(|x| x / len) });
}

fn cross(args: &[Value], out: &mut FunctionReturn) {
    let ([ax, ay, az], [bx, by, bz]): ([f32; 3], [f32; 3]) = (arg(args, 0), arg(args, 1));
    out.set([
        ay * bz - az * by,
        az * bx - ax * bz,
        ax * by - ay * bx,
    ]);
}

fn register_vector_helpers<const N: usize>(r: &mut FunctionRegistry) where [f32; N]: Payload {
    let v = <[f32; N]>::TYPE;
    let f = Type::FLOAT;
    r.add(TypedFunction::native("length",    &[v], f, length::<N>));
    r.add(TypedFunction::native("dot",       &[v, v], f, dot::<N>));
    r.add(TypedFunction::native("distance",  &[v, v], f, distance::<N>));
    r.add(TypedFunction::native("normalize", &[v], v, normalize::<N>));
}

// ─── Matrix helpers ───────────────────────────────────────────────────────────

fn transpose<const N: usize>(args: &[Value], out: &mut FunctionReturn) where [[f32; N]; N]: Payload {
    out.set(mat::transpose(&arg::<[[f32; N]; N]>(args, 0)));
}

fn det2(args: &[Value], out: &mut FunctionReturn) { out.set(mat::m2_det(&arg(args, 0))); }
fn det3(args: &[Value], out: &mut FunctionReturn) { out.set(mat::m3_det(&arg(args, 0))); }
fn det4(args: &[Value], out: &mut FunctionReturn) { out.set(mat::m4_det(&arg(args, 0))); }

// ─── Component access ─────────────────────────────────────────────────────────

fn access<const I: usize>(args: &[Value], out: &mut FunctionReturn) {
    out.set_value(args[0].component(I));
}

fn register_access(r: &mut FunctionRegistry) {
    for ty in Type::all() {
        let Some(component) = ty.component_type() else { continue };
        for index in 0..ty.component_count() {
            let f: NativeFn = match index {
                0 => access::<0>,
                1 => access::<1>,
                2 => access::<2>,
                _ => access::<3>,
            };
            r.add(TypedFunction::native(access_name(index), &[ty], component, f));
        }
    }
}

// ─── Implicit casts ───────────────────────────────────────────────────────────

fn int_to_float(args: &[Value], out: &mut FunctionReturn) {
    out.set(arg::<i32>(args, 0) as f32);
}

fn ivec_to_vec<const N: usize>(args: &[Value], out: &mut FunctionReturn)
where
    [i32; N]: Payload,
    [f32; N]: Payload,
{
    out.set(arg::<[i32; N]>(args, 0).map(|x| x as f32));
}

/// Widening only: the cast graph must stay acyclic.
fn register_casts(r: &mut FunctionRegistry) {
    r.add(TypedFunction::native(CAST, &[Type::INT], Type::FLOAT, int_to_float));
    r.add(TypedFunction::native(CAST, &[Type::ivec(2)], Type::vec(2), ivec_to_vec::<2>));
    r.add(TypedFunction::native(CAST, &[Type::ivec(3)], Type::vec(3), ivec_to_vec::<3>));
    r.add(TypedFunction::native(CAST, &[Type::ivec(4)], Type::vec(4), ivec_to_vec::<4>));
}

// ─── Registration ─────────────────────────────────────────────────────────────

pub fn register(r: &mut FunctionRegistry) {
    register_vector::<f32, 2>(r, true);
    register_vector::<f32, 3>(r, true);
    register_vector::<f32, 4>(r, true);
    register_vector::<i32, 2>(r, true);
    register_vector::<i32, 3>(r, true);
    register_vector::<i32, 4>(r, true);
    register_vector::<bool, 2>(r, false);
    register_vector::<bool, 3>(r, false);
    register_vector::<bool, 4>(r, false);

    register_matrix::<2>(r);
    register_matrix::<3>(r);
    register_matrix::<4>(r);

    register_vector_helpers::<2>(r);
    register_vector_helpers::<3>(r);
    register_vector_helpers::<4>(r);
    r.add(TypedFunction::native("cross", &[Type::vec(3), Type::vec(3)], Type::vec(3), cross));

    let f = Type::FLOAT;
    r.add(TypedFunction::native("determinant", &[Type::matrix(2)], f, det2));
    r.add(TypedFunction::native("determinant", &[Type::matrix(3)], f, det3));
    r.add(TypedFunction::native("determinant", &[Type::matrix(4)], f, det4));

    register_access(r);
    register_casts(r);
}
