//! Evaluation of a typed expression tree.
//!
//! Evaluation is total: there is no error path. Domain errors surface as IEEE
//! `NaN`/`±Inf` values, and out-of-range or non-integral subscripts read as
//! `NaN`.

use std::borrow::Cow;

use super::tree::{BinaryOp, CompareOp, LogicalOp, NumExpr, SeqExpr, UnaryOp};

/// Bindings visible to a payoff: the terminal price and the path. Nothing
/// else is in scope apart from the static function registry.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    price: f64,
    path: &'a [f64],
}

impl<'a> Environment<'a> {
    /// Binds `price` and `path`.
    pub fn new(price: f64, path: &'a [f64]) -> Self {
        Self { price, path }
    }

    /// Bound terminal price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Bound path.
    pub fn path(&self) -> &'a [f64] {
        self.path
    }
}

#[inline]
fn truthy(value: f64) -> bool {
    value != 0.0
}

#[inline]
fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

impl NumExpr {
    /// Evaluates the expression in `env`.
    pub fn evaluate(&self, env: &Environment<'_>) -> f64 {
        match self {
            NumExpr::Literal(value) => *value,
            NumExpr::Price => env.price,
            NumExpr::Unary { op, operand } => {
                let value = operand.evaluate(env);
                match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Minus => -value,
                }
            }
            NumExpr::Binary { op, lhs, rhs } => {
                let a = lhs.evaluate(env);
                let b = rhs.evaluate(env);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::FloorDiv => floor_div(a, b),
                    BinaryOp::Mod => floor_mod(a, b),
                    BinaryOp::Pow => a.powf(b),
                }
            }
            NumExpr::Compare { first, rest } => {
                let mut left = first.evaluate(env);
                for (op, operand) in rest {
                    let right = operand.evaluate(env);
                    if !op.holds(left, right) {
                        return 0.0;
                    }
                    left = right;
                }
                1.0
            }
            NumExpr::Logical { op, lhs, rhs } => {
                let left = lhs.evaluate(env);
                match (op, truthy(left)) {
                    (LogicalOp::And, false) | (LogicalOp::Or, true) => left,
                    _ => rhs.evaluate(env),
                }
            }
            NumExpr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if truthy(condition.evaluate(env)) {
                    then.evaluate(env)
                } else {
                    otherwise.evaluate(env)
                }
            }
            NumExpr::Index { sequence, index } => {
                let values = sequence.evaluate(env);
                let position = index.evaluate(env);
                element(&values, position)
            }
            NumExpr::Call { function, args } => match args.as_slice() {
                [] => function.apply(&[]),
                [x] => function.apply(&[x.evaluate(env)]),
                [x, y] => function.apply(&[x.evaluate(env), y.evaluate(env)]),
                _ => {
                    let values: Vec<f64> = args.iter().map(|a| a.evaluate(env)).collect();
                    function.apply(&values)
                }
            },
            NumExpr::Reduce { function, sequence } => function.reduce(&sequence.evaluate(env)),
        }
    }
}

impl SeqExpr {
    /// Evaluates the expression in `env`, borrowing from the bound path where
    /// possible.
    pub fn evaluate<'a>(&self, env: &Environment<'a>) -> Cow<'a, [f64]> {
        match self {
            SeqExpr::Path => Cow::Borrowed(env.path),
            SeqExpr::Literal(items) => Cow::Owned(items.iter().map(|e| e.evaluate(env)).collect()),
            SeqExpr::Slice {
                sequence,
                lower,
                upper,
                step,
            } => {
                let values = sequence.evaluate(env);
                let bound = |b: &Option<Box<NumExpr>>| b.as_ref().map(|e| e.evaluate(env));
                slice(values, bound(lower), bound(upper), bound(step))
            }
            SeqExpr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if truthy(condition.evaluate(env)) {
                    then.evaluate(env)
                } else {
                    otherwise.evaluate(env)
                }
            }
        }
    }
}

impl CompareOp {
    #[inline]
    fn holds(self, a: f64, b: f64) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::NotEq => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        }
    }
}

/// Converts an exact integer-valued float.
fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        // `as` saturates at the i64 range.
        Some(value as i64)
    } else {
        None
    }
}

fn element(values: &[f64], position: f64) -> f64 {
    let len = values.len() as i64;
    let Some(mut index) = integral(position) else {
        return f64::NAN;
    };
    if index < 0 {
        index = index.saturating_add(len);
    }
    if (0..len).contains(&index) {
        values[index as usize]
    } else {
        f64::NAN
    }
}

/// Host slice semantics: bounds clamp to the sequence, negative bounds count
/// from the end, a negative step walks backwards. A zero or non-integral
/// bound/step yields an empty sequence.
fn slice<'a>(
    values: Cow<'a, [f64]>,
    lower: Option<f64>,
    upper: Option<f64>,
    step: Option<f64>,
) -> Cow<'a, [f64]> {
    let empty = Cow::Owned(Vec::new());
    let to_index = |bound: Option<f64>| match bound {
        None => Some(None),
        Some(value) => integral(value).map(Some),
    };
    let (Some(lower), Some(upper), Some(step)) = (to_index(lower), to_index(upper), to_index(step))
    else {
        return empty;
    };
    let step = step.unwrap_or(1);
    if step == 0 {
        return empty;
    }

    let len = values.len() as i64;
    let (low, high) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: Option<i64>, default: i64| match bound {
        None => default,
        Some(mut index) => {
            if index < 0 {
                index = index.saturating_add(len);
            }
            index.clamp(low, high)
        }
    };
    let start = clamp(lower, if step > 0 { low } else { high });
    let stop = clamp(upper, if step > 0 { high } else { low });

    if step == 1 {
        let (start, stop) = (start as usize, stop.max(start) as usize);
        return match values {
            Cow::Borrowed(slice) => Cow::Borrowed(&slice[start..stop]),
            Cow::Owned(vec) => Cow::Owned(vec[start..stop].to_vec()),
        };
    }

    let mut out = Vec::new();
    let mut index = start;
    while (step > 0 && index < stop) || (step < 0 && index > stop) {
        out.push(values[index as usize]);
        match index.checked_add(step) {
            Some(next) => index = next,
            None => break,
        }
    }
    Cow::Owned(out)
}

/// Floor division with the host's float semantics: the quotient is rounded
/// towards negative infinity and pairs with [`floor_mod`].
fn floor_div(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return (a / b).floor();
    }
    let (div, _) = div_mod(a, b);
    div
}

/// Remainder taking the sign of the divisor.
fn floor_mod(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }
    let (_, rem) = div_mod(a, b);
    rem
}

fn div_mod(a: f64, b: f64) -> (f64, f64) {
    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 {
        if (b < 0.0) != (rem < 0.0) {
            rem += b;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(b);
    }

    let floor_div = if div != 0.0 {
        let floored = div.floor();
        if div - floored > 0.5 {
            floored + 1.0
        } else {
            floored
        }
    } else {
        0.0_f64.copysign(a / b)
    };
    (floor_div, rem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(floor_div(7.0, 2.0), 3.0);
        assert_eq!(floor_div(-7.0, 2.0), -4.0);
        assert_eq!(floor_div(7.0, -2.0), -4.0);
        assert_eq!(floor_mod(-7.0, 2.0), 1.0);
        assert_eq!(floor_mod(7.0, -2.0), -1.0);
        assert_eq!(floor_mod(5.5, 2.0), 1.5);
        assert_eq!(floor_div(-1.0, f64::INFINITY), -1.0);
        assert_eq!(floor_div(1.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn division_by_zero_is_ieee() {
        assert_eq!(floor_div(1.0, 0.0), f64::INFINITY);
        assert_eq!(floor_div(-1.0, 0.0), f64::NEG_INFINITY);
        assert!(floor_div(0.0, 0.0).is_nan());
        assert!(floor_mod(1.0, 0.0).is_nan());
    }

    #[test]
    fn element_lookup() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(element(&values, 0.0), 1.0);
        assert_eq!(element(&values, -1.0), 3.0);
        assert_eq!(element(&values, -3.0), 1.0);
        assert!(element(&values, 3.0).is_nan());
        assert!(element(&values, -4.0).is_nan());
        assert!(element(&values, 0.5).is_nan());
        assert!(element(&values, f64::NAN).is_nan());
        assert!(element(&values, 1e300).is_nan());
    }

    fn sliced(lower: Option<f64>, upper: Option<f64>, step: Option<f64>) -> Vec<f64> {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        slice(Cow::Borrowed(&values), lower, upper, step).into_owned()
    }

    #[test]
    fn slice_semantics() {
        assert_eq!(sliced(Some(1.0), None, None), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(sliced(None, Some(-1.0), None), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(sliced(None, None, Some(2.0)), vec![0.0, 2.0, 4.0]);
        assert_eq!(sliced(None, None, Some(-1.0)), vec![4.0, 3.0, 2.0, 1.0, 0.0]);
        assert_eq!(sliced(Some(3.0), Some(0.0), Some(-2.0)), vec![3.0, 1.0]);
        assert_eq!(sliced(Some(-100.0), Some(100.0), None).len(), 5);
        assert!(sliced(Some(4.0), Some(1.0), None).is_empty());
        assert!(sliced(None, None, Some(0.0)).is_empty());
        assert!(sliced(Some(0.5), None, None).is_empty());
    }

    #[test]
    fn slice_with_huge_step_takes_one_element() {
        assert_eq!(sliced(Some(1.0), None, Some(1e300)), vec![1.0]);
        assert_eq!(sliced(None, None, Some(-1e300)), vec![4.0]);
        assert_eq!(sliced(Some(-1.0), None, Some(i64::MAX as f64)), vec![4.0]);
        assert_eq!(sliced(None, None, Some(i64::MIN as f64)), vec![4.0]);
    }

    #[test]
    fn unit_step_slice_of_path_borrows() {
        let values = [0.0, 1.0, 2.0];
        let out = slice(Cow::Borrowed(&values), Some(1.0), None, None);
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}
