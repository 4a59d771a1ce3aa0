use std::fmt;

use log::{debug, trace};

use crate::ast::{BinOp, Expr, ExprKind};
use crate::interval::Interval;
use crate::types::{Int, Slot};

/// Error type for evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EvalError {
    /// A variable's value lies outside its declared bounds.
    OutOfRange { slot: Slot, value: Int, bounds: Interval },
    /// A divisor evaluated to zero.
    DivisionByZero,
    /// The number of inputs does not match the number of variables.
    ArgumentCountMismatch { expected: usize, actual: usize },
    /// The concrete result does not fit in [`Int`].
    Overflow { op: BinOp, lhs: Int, rhs: Int },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::OutOfRange { slot, value, bounds } => {
                write!(f, "value {} for {} is outside of the allowed range {}", value, slot, bounds)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::ArgumentCountMismatch { expected, actual } => {
                write!(f, "expected {} inputs, got {}", expected, actual)
            }
            EvalError::Overflow { op, lhs, rhs } => {
                write!(f, "integer overflow in {} {} {}", lhs, op, rhs)
            }
        }
    }
}

impl std::error::Error for EvalError {}

impl BinOp {
    /// Concrete semantics: checked arithmetic, division truncating toward zero.
    pub fn apply(self, lhs: Int, rhs: Int) -> Result<Int, EvalError> {
        let result = match self {
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div => {
                if rhs == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs.checked_div(rhs)
            }
        };
        result.ok_or(EvalError::Overflow { op: self, lhs, rhs })
    }
}

fn check_bounds(slot: Slot, value: Int, bounds: Interval) -> Result<Int, EvalError> {
    if bounds.contains(value) {
        Ok(value)
    } else {
        Err(EvalError::OutOfRange { slot, value, bounds })
    }
}

impl Expr {
    /// Evaluates the expression, binding `inputs[i]` to the `i`-th variable leaf
    /// in left-to-right, depth-first order.
    ///
    /// Fails on the first error encountered, left subtree before right subtree.
    pub fn eval(&self, inputs: &[Int]) -> Result<Int, EvalError> {
        debug!("eval(inputs = {:?})", inputs);
        self.eval_at(inputs, Slot::new(0))
    }

    fn eval_at(&self, inputs: &[Int], base: Slot) -> Result<Int, EvalError> {
        if inputs.len() != self.variable_count() {
            return Err(EvalError::ArgumentCountMismatch {
                expected: self.variable_count(),
                actual: inputs.len(),
            });
        }
        match self.kind() {
            ExprKind::Lit(n) => Ok(*n),
            ExprKind::Var(bounds) => check_bounds(base, inputs[0], *bounds),
            ExprKind::Binary(op, lhs, rhs) => {
                let (left, right) = inputs.split_at(lhs.variable_count());
                let a = lhs.eval_at(left, base)?;
                let b = rhs.eval_at(right, base.offset(left.len()))?;
                let res = op.apply(a, b)?;
                trace!("{} {} {} = {}", a, op, b, res);
                Ok(res)
            }
        }
    }

    /// Evaluates the expression with the same `value` bound to every variable leaf.
    ///
    /// Each leaf still checks `value` against its own bounds.
    pub fn eval_uniform(&self, value: Int) -> Result<Int, EvalError> {
        debug!("eval_uniform(value = {})", value);
        let mut next = Slot::new(0);
        self.fold(|layer: ExprKind<Result<Int, EvalError>>| match layer {
            ExprKind::Lit(n) => Ok(n),
            ExprKind::Var(bounds) => {
                let slot = next;
                next = next.offset(1);
                check_bounds(slot, value, bounds)
            }
            ExprKind::Binary(op, lhs, rhs) => op.apply(lhs?, rhs?),
        })
    }
}

/// Evaluates `expr` against `inputs`. See [`Expr::eval`].
pub fn evaluate(expr: &Expr, inputs: &[Int]) -> Result<Int, EvalError> {
    expr.eval(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_eval_lit() {
        for n in [0, 1, -1, 42, Int::MIN, Int::MAX] {
            assert_eq!(evaluate(&Expr::lit(n), &[]), Ok(n));
        }
    }

    #[test]
    fn test_eval_var_bounds_inclusive() {
        let x = Expr::var(0, 10);
        assert_eq!(x.eval(&[0]), Ok(0));
        assert_eq!(x.eval(&[10]), Ok(10));
        assert_eq!(
            x.eval(&[11]),
            Err(EvalError::OutOfRange {
                slot: Slot::new(0),
                value: 11,
                bounds: Interval::new(0, 10),
            })
        );
        assert!(matches!(x.eval(&[-1]), Err(EvalError::OutOfRange { value: -1, .. })));
    }

    #[test]
    fn test_eval_division_by_zero() {
        let e = Expr::lit(5) / Expr::lit(0);
        assert_eq!(e.eval(&[]), Err(EvalError::DivisionByZero));
        let e = Expr::lit(5) / Expr::var(-1, 1);
        assert_eq!(e.eval(&[0]), Err(EvalError::DivisionByZero));
        assert_eq!(e.eval(&[-1]), Ok(-5));
    }

    #[test]
    fn test_eval_truncating_division() {
        assert_eq!((Expr::lit(-7) / Expr::lit(2)).eval(&[]), Ok(-3));
        assert_eq!((Expr::lit(7) / Expr::lit(-2)).eval(&[]), Ok(-3));
        assert_eq!((Expr::lit(7) / Expr::lit(2)).eval(&[]), Ok(3));
    }

    #[test]
    fn test_eval_argument_count() {
        let e = Expr::var(0, 9) + Expr::var(0, 9) * Expr::var(0, 9);
        assert_eq!(
            e.eval(&[1, 2]),
            Err(EvalError::ArgumentCountMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            e.eval(&[1, 2, 3, 4]),
            Err(EvalError::ArgumentCountMismatch { expected: 3, actual: 4 })
        );
        assert_eq!(
            Expr::lit(1).eval(&[1]),
            Err(EvalError::ArgumentCountMismatch { expected: 0, actual: 1 })
        );
        assert_eq!(e.eval(&[1, 2, 3]), Ok(7));
    }

    #[test]
    fn test_eval_positional_binding() {
        // Variables are bound in depth-first order, regardless of nesting.
        let e = (Expr::var(0, 100) - Expr::var(0, 100)) * (Expr::lit(10) - Expr::var(0, 100));
        assert_eq!(e.eval(&[9, 4, 3]), Ok((9 - 4) * (10 - 3)));
    }

    #[test]
    fn test_eval_out_of_range_slot() {
        let e = Expr::var(0, 1) + (Expr::lit(3) * Expr::var(0, 1) - Expr::var(5, 6));
        assert_eq!(
            e.eval(&[1, 1, 7]),
            Err(EvalError::OutOfRange {
                slot: Slot::new(2),
                value: 7,
                bounds: Interval::new(5, 6),
            })
        );
    }

    #[test]
    fn test_eval_left_error_first() {
        let e = Expr::var(0, 1) / (Expr::var(0, 1) - Expr::var(0, 1));
        assert!(matches!(e.eval(&[2, 9, 9]), Err(EvalError::OutOfRange { slot, .. }) if slot == Slot::new(0)));
        assert!(matches!(e.eval(&[1, 9, 9]), Err(EvalError::OutOfRange { slot, .. }) if slot == Slot::new(1)));
        assert_eq!(e.eval(&[1, 1, 1]), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_eval_overflow() {
        let e = Expr::lit(Int::MAX) + Expr::lit(1);
        assert_eq!(e.bounds(), Interval::singleton(Int::MAX));
        assert_eq!(
            e.eval(&[]),
            Err(EvalError::Overflow {
                op: BinOp::Add,
                lhs: Int::MAX,
                rhs: 1,
            })
        );
        let e = Expr::lit(Int::MIN) / Expr::lit(-1);
        assert!(matches!(e.eval(&[]), Err(EvalError::Overflow { op: BinOp::Div, .. })));
    }

    #[test]
    fn test_eval_uniform() {
        let x = || Expr::var(0, 10);
        let e = x() + x() * Expr::lit(2);
        assert_eq!(e.eval_uniform(5), Ok(15));
        assert_eq!(e.eval_uniform(10), Ok(30));
        assert!(matches!(e.eval_uniform(11), Err(EvalError::OutOfRange { value: 11, .. })));
    }

    #[test]
    fn test_eval_uniform_reports_slot() {
        let e = Expr::var(0, 10) - Expr::var(0, 3);
        assert_eq!(
            e.eval_uniform(5),
            Err(EvalError::OutOfRange {
                slot: Slot::new(1),
                value: 5,
                bounds: Interval::new(0, 3),
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = EvalError::OutOfRange {
            slot: Slot::new(1),
            value: 11,
            bounds: Interval::new(0, 10),
        };
        assert_eq!(err.to_string(), "value 11 for x1 is outside of the allowed range [0, 10]");
        assert_eq!(EvalError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            EvalError::ArgumentCountMismatch { expected: 3, actual: 2 }.to_string(),
            "expected 3 inputs, got 2"
        );
    }
}
