//! Expression trees over integer literals and bounded variables.
//!
//! A tree is split into two layers, in the style of recursion schemes
//! (see <https://recursion.wtf/posts/rust_schemes/>):
//!
//! - [`ExprKind<A>`] is a single node whose children have type `A`.
//! - [`Expr`] ties the knot with `ExprKind<Box<Expr>>` and caches two attributes per node:
//!   its inferred [`Interval`] and the number of variable leaves below it.
//!
//! Both attributes are computed from the children's cached values when the node is built,
//! so querying them is O(1). Trees are immutable afterwards and can be shared across threads.
//!
//! [`Expr::fold`] collapses a tree bottom-up. Children are always visited left to right,
//! which is the order that assigns input slots to variable leaves.

use std::cmp::max;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use log::debug;

use crate::interval::{Interval, IntervalError};
use crate::types::{Int, Slot};

/// Binary arithmetic operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Abstract transfer function: the interval enclosing `lhs <op> rhs`.
    pub fn apply_interval(self, lhs: Interval, rhs: Interval) -> Interval {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One layer of an expression, with children of type `A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind<A> {
    /// Integer literal.
    Lit(Int),
    /// Variable leaf, legal within the given bounds.
    Var(Interval),
    /// Binary operation: `lhs <op> rhs`.
    Binary(BinOp, A, A),
}

impl<A> ExprKind<A> {
    #[inline(always)]
    pub fn fmap<B, F>(self, mut f: F) -> ExprKind<B>
    where
        F: FnMut(A) -> B,
    {
        match self {
            ExprKind::Lit(n) => ExprKind::Lit(n),
            ExprKind::Var(bounds) => ExprKind::Var(bounds),
            ExprKind::Binary(op, a, b) => {
                let a = f(a);
                let b = f(b);
                ExprKind::Binary(op, a, b)
            }
        }
    }

    #[inline(always)]
    pub fn fmap_ref<B, F>(&self, mut f: F) -> ExprKind<B>
    where
        F: FnMut(&A) -> B,
    {
        match self {
            ExprKind::Lit(n) => ExprKind::Lit(*n),
            ExprKind::Var(bounds) => ExprKind::Var(*bounds),
            ExprKind::Binary(op, a, b) => {
                let a = f(a);
                let b = f(b);
                ExprKind::Binary(*op, a, b)
            }
        }
    }
}

/// Bounds of a node, given the bounds of its children.
fn infer_layer(layer: ExprKind<Interval>) -> Interval {
    match layer {
        ExprKind::Lit(n) => Interval::singleton(n),
        ExprKind::Var(bounds) => bounds,
        ExprKind::Binary(op, lhs, rhs) => op.apply_interval(lhs, rhs),
    }
}

/// Variable leaves below a node, given the counts of its children.
fn count_layer(layer: ExprKind<usize>) -> usize {
    match layer {
        ExprKind::Lit(_) => 0,
        ExprKind::Var(_) => 1,
        ExprKind::Binary(_, lhs, rhs) => lhs + rhs,
    }
}

/// Immutable expression tree with cached bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    kind: ExprKind<Box<Expr>>,
    bounds: Interval,
    variables: usize,
}

impl Expr {
    fn mk(kind: ExprKind<Box<Expr>>) -> Self {
        let bounds = infer_layer(kind.fmap_ref(|child| child.bounds));
        let variables = count_layer(kind.fmap_ref(|child| child.variables));
        debug!("mk({:?}) -> bounds = {}, vars = {}", kind.fmap_ref(|child| child.bounds), bounds, variables);
        Self { kind, bounds, variables }
    }

    pub fn lit(value: Int) -> Self {
        Self::mk(ExprKind::Lit(value))
    }

    /// Creates a variable legal within `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`. Use [`Expr::try_var`] for the fallible form.
    pub fn var(lower: Int, upper: Int) -> Self {
        Self::var_in(Interval::new(lower, upper))
    }

    pub fn try_var(lower: Int, upper: Int) -> Result<Self, IntervalError> {
        Ok(Self::var_in(Interval::try_new(lower, upper)?))
    }

    pub fn var_in(bounds: Interval) -> Self {
        Self::mk(ExprKind::Var(bounds))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::mk(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    pub fn kind(&self) -> &ExprKind<Box<Expr>> {
        &self.kind
    }

    /// Returns `(lhs, rhs)` for a binary node.
    pub fn children(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Binary(_, lhs, rhs) => Some((&**lhs, &**rhs)),
            _ => None,
        }
    }

    /// Statically inferred bounds on every value [`Expr::eval`] can return
    /// for inputs within the declared variable bounds.
    pub fn bounds(&self) -> Interval {
        self.bounds
    }

    /// Number of variable leaves, which is the required length of the input slice.
    pub fn variable_count(&self) -> usize {
        self.variables
    }

    /// Collapses the tree bottom-up.
    ///
    /// `f` receives each node with its children already replaced by their results.
    /// Nodes are visited in post-order, left subtree before right subtree.
    pub fn fold<R, F>(&self, mut f: F) -> R
    where
        F: FnMut(ExprKind<R>) -> R,
    {
        self.fold_with(&mut f)
    }

    fn fold_with<R, F>(&self, f: &mut F) -> R
    where
        F: FnMut(ExprKind<R>) -> R,
    {
        let layer = self.kind.fmap_ref(|child| child.fold_with(&mut *f));
        f(layer)
    }

    /// Recomputes the bounds of the whole tree, ignoring the cache.
    pub fn infer_bounds(&self) -> Interval {
        self.fold(infer_layer)
    }

    /// Recounts the variable leaves of the whole tree, ignoring the cache.
    pub fn count_variables(&self) -> usize {
        self.fold(count_layer)
    }

    pub fn depth(&self) -> usize {
        self.fold(|layer: ExprKind<usize>| match layer {
            ExprKind::Binary(_, lhs, rhs) => 1 + max(lhs, rhs),
            _ => 1,
        })
    }

    /// Declared bounds of every variable leaf, indexed by [`Slot`].
    pub fn variable_bounds(&self) -> Vec<Interval> {
        self.fold(|layer: ExprKind<Vec<Interval>>| match layer {
            ExprKind::Lit(_) => Vec::new(),
            ExprKind::Var(bounds) => vec![bounds],
            ExprKind::Binary(_, mut lhs, rhs) => {
                lhs.extend(rhs);
                lhs
            }
        })
    }
}

/// Bounds of the whole tree as `(lower, upper)`.
pub fn bounds(expr: &Expr) -> (Int, Int) {
    expr.bounds().into()
}

/// Number of inputs [`Expr::eval`] expects.
pub fn variable_count(expr: &Expr) -> usize {
    expr.variable_count()
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut next = Slot::new(0);
        let s = self.fold(|layer: ExprKind<String>| match layer {
            ExprKind::Lit(n) => n.to_string(),
            ExprKind::Var(_) => {
                let slot = next;
                next = next.offset(1);
                slot.to_string()
            }
            ExprKind::Binary(op, lhs, rhs) => format!("({} {} {})", lhs, op, rhs),
        });
        f.write_str(&s)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Self) -> Self::Output {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

impl_binop!(Add, add, BinOp::Add);
impl_binop!(Sub, sub, BinOp::Sub);
impl_binop!(Mul, mul, BinOp::Mul);
impl_binop!(Div, div, BinOp::Div);

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    /// `(x + (y - 2) * (z - 3)) / 2`
    fn formula() -> Expr {
        let x = Expr::var(-5, 5);
        let y = Expr::var(10, 30);
        let z = Expr::var(45, 65);
        (x + (y - Expr::lit(2)) * (z - Expr::lit(3))) / Expr::lit(2)
    }

    #[test]
    fn test_leaf_bounds() {
        assert_eq!(Expr::lit(7).bounds(), Interval::singleton(7));
        assert_eq!(Expr::var(-1, 4).bounds(), Interval::new(-1, 4));
        assert_eq!(bounds(&Expr::lit(-3)), (-3, -3));
    }

    #[test]
    fn test_variable_count() {
        assert_eq!(Expr::lit(1).variable_count(), 0);
        assert_eq!(Expr::var(0, 1).variable_count(), 1);
        assert_eq!(variable_count(&formula()), 3);
        let e = (Expr::lit(1) + Expr::var(0, 1)) * (Expr::var(0, 1) - Expr::var(0, 1));
        assert_eq!(e.variable_count(), 3);
        assert_eq!(e.children().map(|(l, r)| (l.variable_count(), r.variable_count())), Some((1, 2)));
    }

    #[test]
    fn test_formula_bounds() {
        // x + (y-2)*(z-3) in [-5 + 8*42, 5 + 28*62] = [331, 1741], halved
        let e = formula();
        assert_eq!(e.bounds(), Interval::new(165, 870));
    }

    #[test]
    fn test_cache_matches_fold() {
        let e = formula();
        assert_eq!(e.infer_bounds(), e.bounds());
        assert_eq!(e.count_variables(), e.variable_count());
        let (lhs, rhs) = e.children().unwrap();
        assert_eq!(lhs.infer_bounds(), lhs.bounds());
        assert_eq!(rhs.bounds(), Interval::singleton(2));
    }

    #[test]
    fn test_uncorrelated_operands() {
        let x = Expr::var(0, 10);
        let e = x.clone() - x;
        assert_eq!(e.bounds(), Interval::new(-10, 10));
    }

    #[test]
    fn test_div_bounds_by_case() {
        let a = || Expr::var(1, 10);
        assert_eq!((a() / Expr::var(2, 5)).bounds(), Interval::new(0, 5));
        assert_eq!((a() / Expr::var(-5, 0)).bounds(), Interval::new(Int::MIN, 0));
        assert_eq!((a() / Expr::var(0, 5)).bounds(), Interval::new(0, Int::MAX));
        assert_eq!((a() / Expr::var(-3, 4)).bounds(), Interval::full());
    }

    #[test]
    fn test_depth() {
        assert_eq!(Expr::lit(1).depth(), 1);
        assert_eq!(formula().depth(), 5);
    }

    #[test]
    fn test_variable_bounds_order() {
        let got = formula().variable_bounds();
        let expected = vec![Interval::new(-5, 5), Interval::new(10, 30), Interval::new(45, 65)];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(formula().to_string(), "((x0 + ((x1 - 2) * (x2 - 3))) / 2)");
        assert_eq!(Expr::lit(-4).to_string(), "-4");
    }

    #[test]
    fn test_try_var() {
        assert!(Expr::try_var(0, 0).is_ok());
        assert_eq!(Expr::try_var(5, 4), Err(IntervalError::Inverted { lower: 5, upper: 4 }));
    }

    #[test]
    fn test_fmap() {
        let layer: ExprKind<u8> = ExprKind::Binary(BinOp::Mul, 2, 3);
        assert_eq!(layer.fmap(|n| n as u32 * 10), ExprKind::Binary(BinOp::Mul, 20, 30));
        let leaf: ExprKind<u8> = ExprKind::Lit(9);
        assert_eq!(leaf.fmap_ref(|n| *n as u32), ExprKind::Lit(9));
    }

    #[test]
    fn test_expr_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expr>();
    }
}
