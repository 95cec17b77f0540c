//! Math built-ins.
//! Float functions apply to `float` and lane-wise to `vec2`..`vec4`.
//! `abs`, `min`, `max`, `clamp` and `signum` also exist for `int`.

use crate::runtime::FunctionReturn;
use crate::runtime::value::{Payload, Value};
use crate::types::Type;
use super::operators::Lanes;
use super::{arg, FunctionRegistry, TypedFunction};

// ─── Float lane functions ─────────────────────────────────────────────────────

fn signum(x: f32) -> f32 {
    // 0 and NaN pass through unchanged.
    if x > 0.0 { 1.0 } else if x < 0.0 { -1.0 } else { x }
}

fn frac(x: f32) -> f32 { x - x.floor() }

/// Floored modulo, sign follows the divisor.
fn fmod(x: f32, y: f32) -> f32 { x - y * (x / y).floor() }

macro_rules! float_unary {
    ($($name:literal => $fn_name:ident = $body:expr;)*) => {
        $(
            fn $fn_name<T: Lanes<Lane = f32>>(args: &[Value], out: &mut FunctionReturn) {
                let f: fn(f32) -> f32 = $body;
                out.set(arg::<T>(args, 0).map(f));
            }
        )*

        fn register_float_unary<T: Lanes<Lane = f32>>(r: &mut FunctionRegistry) {
            let t = T::TYPE;
            $( r.add(TypedFunction::native($name, &[t], t, $fn_name::<T>)); )*
        }
    };
}

float_unary! {
    "sin"    => sin    = f32::sin;
    "cos"    => cos    = f32::cos;
    "tan"    => tan    = f32::tan;
    "asin"   => asin   = f32::asin;
    "acos"   => acos   = f32::acos;
    "atan"   => atan   = f32::atan;
    "torad"  => torad  = f32::to_radians;
    "todeg"  => todeg  = f32::to_degrees;
    "exp"    => exp    = f32::exp;
    "exp2"   => exp2   = f32::exp2;
    "log"    => log    = f32::ln;
    "log2"   => log2   = f32::log2;
    "sqrt"   => sqrt   = f32::sqrt;
    "abs"    => abs    = f32::abs;
    "signum" => sign   = signum;
    "floor"  => floor  = f32::floor;
    "ceil"   => ceil   = f32::ceil;
    "frac"   => fract  = frac;
}

macro_rules! float_binary {
    ($($name:literal => $fn_name:ident = $body:expr;)*) => {
        $(
            fn $fn_name<T: Lanes<Lane = f32>>(args: &[Value], out: &mut FunctionReturn) {
                let f: fn(f32, f32) -> f32 = $body;
                out.set(arg::<T>(args, 0).zip(arg(args, 1), f));
            }
        )*

        fn register_float_binary<T: Lanes<Lane = f32>>(r: &mut FunctionRegistry) {
            let t = T::TYPE;
            $( r.add(TypedFunction::native($name, &[t, t], t, $fn_name::<T>)); )*
        }
    };
}

float_binary! {
    "atan2" => atan2 = f32::atan2;
    "pow"   => pow   = f32::powf;
    "min"   => min   = f32::min;
    "max"   => max   = f32::max;
    "fmod"  => modulo = fmod;
}

fn clamp<T: Lanes>(args: &[Value], out: &mut FunctionReturn)
where
    T::Lane: PartialOrd,
{
    let lo: T = arg(args, 1);
    let hi: T = arg(args, 2);
    let x = arg::<T>(args, 0).zip(lo, |x, lo| if x < lo { lo } else { x });
    out.set(x.zip(hi, |x, hi| if x > hi { hi } else { x }));
}

// ─── Int ──────────────────────────────────────────────────────────────────────

fn iabs(args: &[Value], out: &mut FunctionReturn)    { out.set(arg::<i32>(args, 0).wrapping_abs()); }
fn isignum(args: &[Value], out: &mut FunctionReturn) { out.set(arg::<i32>(args, 0).signum()); }
fn imin(args: &[Value], out: &mut FunctionReturn)    { out.set(arg::<i32>(args, 0).min(arg(args, 1))); }
fn imax(args: &[Value], out: &mut FunctionReturn)    { out.set(arg::<i32>(args, 0).max(arg(args, 1))); }

// ─── Predicates ───────────────────────────────────────────────────────────────

/// `between(x, lo, hi)`: inclusive range check.
fn between<T: Payload + PartialOrd>(args: &[Value], out: &mut FunctionReturn) {
    let x: T = arg(args, 0);
    out.set(arg::<T>(args, 1) <= x && x <= arg::<T>(args, 2));
}

/// `equals(a, b, epsilon)`: `|a - b| <= epsilon`.
fn equals(args: &[Value], out: &mut FunctionReturn) {
    let (a, b, eps): (f32, f32, f32) = (arg(args, 0), arg(args, 1), arg(args, 2));
    out.set((a - b).abs() <= eps);
}

// ─── Registration ─────────────────────────────────────────────────────────────

fn register_float<T: Lanes<Lane = f32>>(r: &mut FunctionRegistry) {
    register_float_unary::<T>(r);
    register_float_binary::<T>(r);
    let t = T::TYPE;
    r.add(TypedFunction::native("clamp", &[t, t, t], t, clamp::<T>));
}

pub fn register(r: &mut FunctionRegistry) {
    register_float::<f32>(r);
    register_float::<[f32; 2]>(r);
    register_float::<[f32; 3]>(r);
    register_float::<[f32; 4]>(r);

    let i = Type::INT;
    r.add(TypedFunction::native("abs",    &[i], i, iabs));
    r.add(TypedFunction::native("signum", &[i], i, isignum));
    r.add(TypedFunction::native("min",    &[i, i], i, imin));
    r.add(TypedFunction::native("max",    &[i, i], i, imax));
    r.add(TypedFunction::native("clamp",  &[i, i, i], i, clamp::<i32>));

    let b = Type::BOOL;
    let f = Type::FLOAT;
    r.add(TypedFunction::native("between", &[i, i, i], b, between::<i32>));
    r.add(TypedFunction::native("between", &[f, f, f], b, between::<f32>));

    let scalar_equals = r.add(TypedFunction::native("equals", &[f, f, f], b, equals));
    for size in 2..=4 {
        r.add_vectorized(&scalar_equals, size);
    }
}
