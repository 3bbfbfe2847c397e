//! Static function and constant registry.
//!
//! The table is fixed at compile time; payoff expressions can only ever call
//! what is listed here. Most entries mirror the host `math` module and are
//! also reachable as `math.<name>`; `abs`, `min`, `max`, `sum` and `len` are
//! builtins and only resolve as bare names.

use std::f64::consts;

use statrs::function::erf;
use statrs::function::gamma;

/// Registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Function {
    Exp,
    Exp2,
    Expm1,
    Log,
    Log2,
    Log10,
    Log1p,
    Sqrt,
    Cbrt,
    Pow,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Hypot,
    Fabs,
    Abs,
    Floor,
    Ceil,
    Trunc,
    Copysign,
    Fmod,
    Remainder,
    Degrees,
    Radians,
    Erf,
    Erfc,
    Gamma,
    Lgamma,
    IsFinite,
    IsInf,
    IsNan,
    Min,
    Max,
    Fsum,
    Prod,
    Sum,
    Len,
}

/// Accepted argument shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` numbers.
    Exact(usize),
    /// Between `min` and `max` numbers inclusive.
    Range(usize, usize),
    /// Any count of numbers, at least `n`.
    AtLeast(usize),
    /// One sequence, or two or more numbers.
    Extremum,
    /// Exactly one sequence.
    Sequence,
}

impl Function {
    /// Registered name.
    pub fn name(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|r| r.entry == Entry::Function(self))
            .map_or("?", |r| r.name)
    }

    /// Accepted argument shape.
    pub fn arity(self) -> Arity {
        use Function::*;
        match self {
            Atan2 | Copysign | Fmod | Remainder | Pow => Arity::Exact(2),
            Log => Arity::Range(1, 2),
            Hypot => Arity::AtLeast(0),
            Min | Max => Arity::Extremum,
            Fsum | Prod | Sum | Len => Arity::Sequence,
            _ => Arity::Exact(1),
        }
    }

    /// Applies the function to numeric arguments. Argument counts are checked
    /// when the expression is compiled; a missing argument reads as `NaN`.
    pub fn apply(self, args: &[f64]) -> f64 {
        use Function::*;
        let x = arg(args, 0);
        let y = arg(args, 1);
        match self {
            Exp => x.exp(),
            Exp2 => x.exp2(),
            Expm1 => x.exp_m1(),
            Log if args.len() == 2 => x.ln() / y.ln(),
            Log => x.ln(),
            Log2 => x.log2(),
            Log10 => x.log10(),
            Log1p => x.ln_1p(),
            Sqrt => x.sqrt(),
            Cbrt => x.cbrt(),
            Pow => x.powf(y),
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Asin => x.asin(),
            Acos => x.acos(),
            Atan => x.atan(),
            Atan2 => x.atan2(y),
            Sinh => x.sinh(),
            Cosh => x.cosh(),
            Tanh => x.tanh(),
            Asinh => x.asinh(),
            Acosh => x.acosh(),
            Atanh => x.atanh(),
            Hypot => args.iter().fold(0.0, |acc: f64, v| acc.hypot(*v)),
            Fabs | Abs => x.abs(),
            Floor => x.floor(),
            Ceil => x.ceil(),
            Trunc => x.trunc(),
            Copysign => x.copysign(y),
            Fmod => x % y,
            Remainder => ieee_remainder(x, y),
            Degrees => x.to_degrees(),
            Radians => x.to_radians(),
            Erf => erf::erf(x),
            Erfc => erf::erfc(x),
            Gamma => gamma_fn(x),
            Lgamma => log_abs_gamma(x),
            IsFinite => indicator(x.is_finite()),
            IsInf => indicator(x.is_infinite()),
            IsNan => indicator(x.is_nan()),
            Min | Max | Fsum | Prod | Sum | Len => self.reduce(args),
        }
    }

    /// Applies a sequence-consuming function (`min`, `max`, `fsum`, `prod`,
    /// `sum`, `len`) to the elements of a sequence. `min`/`max` of an empty
    /// sequence is `NaN`.
    pub fn reduce(self, values: &[f64]) -> f64 {
        match self {
            Function::Min => extremum(values, |candidate, best| candidate < best),
            Function::Max => extremum(values, |candidate, best| candidate > best),
            Function::Fsum => exact_sum(values),
            Function::Prod => values.iter().product(),
            Function::Sum => values.iter().sum(),
            Function::Len => values.len() as f64,
            other => other.apply(values),
        }
    }
}

/// Registry lookup result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry {
    /// Callable function.
    Function(Function),
    /// Named constant.
    Constant(f64),
}

struct Registered {
    name: &'static str,
    entry: Entry,
    math_member: bool,
}

const fn math(name: &'static str, entry: Entry) -> Registered {
    Registered {
        name,
        entry,
        math_member: true,
    }
}

const fn builtin(name: &'static str, entry: Entry) -> Registered {
    Registered {
        name,
        entry,
        math_member: false,
    }
}

static REGISTRY: &[Registered] = &[
    math("exp", Entry::Function(Function::Exp)),
    math("exp2", Entry::Function(Function::Exp2)),
    math("expm1", Entry::Function(Function::Expm1)),
    math("log", Entry::Function(Function::Log)),
    math("log2", Entry::Function(Function::Log2)),
    math("log10", Entry::Function(Function::Log10)),
    math("log1p", Entry::Function(Function::Log1p)),
    math("sqrt", Entry::Function(Function::Sqrt)),
    math("cbrt", Entry::Function(Function::Cbrt)),
    math("pow", Entry::Function(Function::Pow)),
    math("sin", Entry::Function(Function::Sin)),
    math("cos", Entry::Function(Function::Cos)),
    math("tan", Entry::Function(Function::Tan)),
    math("asin", Entry::Function(Function::Asin)),
    math("acos", Entry::Function(Function::Acos)),
    math("atan", Entry::Function(Function::Atan)),
    math("atan2", Entry::Function(Function::Atan2)),
    math("sinh", Entry::Function(Function::Sinh)),
    math("cosh", Entry::Function(Function::Cosh)),
    math("tanh", Entry::Function(Function::Tanh)),
    math("asinh", Entry::Function(Function::Asinh)),
    math("acosh", Entry::Function(Function::Acosh)),
    math("atanh", Entry::Function(Function::Atanh)),
    math("hypot", Entry::Function(Function::Hypot)),
    math("fabs", Entry::Function(Function::Fabs)),
    math("floor", Entry::Function(Function::Floor)),
    math("ceil", Entry::Function(Function::Ceil)),
    math("trunc", Entry::Function(Function::Trunc)),
    math("copysign", Entry::Function(Function::Copysign)),
    math("fmod", Entry::Function(Function::Fmod)),
    math("remainder", Entry::Function(Function::Remainder)),
    math("degrees", Entry::Function(Function::Degrees)),
    math("radians", Entry::Function(Function::Radians)),
    math("erf", Entry::Function(Function::Erf)),
    math("erfc", Entry::Function(Function::Erfc)),
    math("gamma", Entry::Function(Function::Gamma)),
    math("lgamma", Entry::Function(Function::Lgamma)),
    math("isfinite", Entry::Function(Function::IsFinite)),
    math("isinf", Entry::Function(Function::IsInf)),
    math("isnan", Entry::Function(Function::IsNan)),
    math("fsum", Entry::Function(Function::Fsum)),
    math("prod", Entry::Function(Function::Prod)),
    builtin("abs", Entry::Function(Function::Abs)),
    builtin("min", Entry::Function(Function::Min)),
    builtin("max", Entry::Function(Function::Max)),
    builtin("sum", Entry::Function(Function::Sum)),
    builtin("len", Entry::Function(Function::Len)),
    math("pi", Entry::Constant(consts::PI)),
    math("e", Entry::Constant(consts::E)),
    math("tau", Entry::Constant(consts::TAU)),
    math("inf", Entry::Constant(f64::INFINITY)),
    math("nan", Entry::Constant(f64::NAN)),
];

/// Resolves a bare name.
pub fn lookup(name: &str) -> Option<Entry> {
    REGISTRY.iter().find(|r| r.name == name).map(|r| r.entry)
}

/// Resolves `math.<name>`.
pub fn lookup_math(name: &str) -> Option<Entry> {
    REGISTRY
        .iter()
        .find(|r| r.math_member && r.name == name)
        .map(|r| r.entry)
}

/// All registered names, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|r| r.name)
}

#[inline]
fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(f64::NAN)
}

#[inline]
fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// First element that beats every earlier one. Mirrors the host's
/// left-to-right scan, so `NaN` handling depends on position.
fn extremum(values: &[f64], beats: impl Fn(f64, f64) -> bool) -> f64 {
    let mut iter = values.iter().copied();
    let Some(mut best) = iter.next() else {
        return f64::NAN;
    };
    for candidate in iter {
        if beats(candidate, best) {
            best = candidate;
        }
    }
    best
}

/// `x - n*y` with `n` the integer nearest `x/y`, ties to even.
fn ieee_remainder(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() || x.is_infinite() || y == 0.0 {
        return f64::NAN;
    }
    if y.is_infinite() {
        return x;
    }
    let quotient = x / y;
    let mut n = quotient.round();
    if (quotient - quotient.trunc()).abs() == 0.5 && n % 2.0 != 0.0 {
        n -= quotient.signum();
    }
    x - n * y
}

/// Shewchuk's exactly rounded summation over a list of partial sums.
fn exact_sum(values: &[f64]) -> f64 {
    if values.iter().any(|v| !v.is_finite()) {
        return values.iter().sum();
    }

    let mut partials: Vec<f64> = Vec::new();
    for &value in values {
        let mut x = value;
        let mut kept = 0;
        for i in 0..partials.len() {
            let mut y = partials[i];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let high = x + y;
            let low = y - (high - x);
            if low != 0.0 {
                partials[kept] = low;
                kept += 1;
            }
            x = high;
        }
        partials.truncate(kept);
        partials.push(x);
    }
    partials.iter().sum()
}

fn gamma_fn(x: f64) -> f64 {
    if x <= 0.0 && x == x.floor() {
        return f64::NAN;
    }
    gamma::gamma(x)
}

/// `ln|Γ(x)|`, extended to negative non-integers by reflection.
fn log_abs_gamma(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 && x == x.floor() {
        return f64::INFINITY;
    }
    if x >= 0.5 {
        return gamma::ln_gamma(x);
    }
    let sin = (consts::PI * x).sin().abs();
    (consts::PI / sin).ln() - gamma::ln_gamma(1.0 - x)
}
