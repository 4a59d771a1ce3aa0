//! Scalar types shared across the crate.
//!
//! The engine works over a single fixed-width signed integer type, [`Int`].
//! Variable leaves are bound positionally, and [`Slot`] names such a position.
use std::fmt;

/// The integer type every literal, variable value and bound is expressed in.
///
/// Division truncates toward zero, as Rust's `/` does for primitive integers.
pub type Int = i32;

/// A positional input slot (0-indexed).
///
/// Slots are not stored on the tree. The slot of a variable leaf is its rank among
/// all variable leaves in left-to-right, depth-first order.
///
/// # Invariants
///
/// - Slot `i` corresponds to `inputs[i]` in a call to [`Expr::eval`][crate::ast::Expr::eval]
/// - Slots of one tree are dense: `0..variable_count`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Slot(usize);

impl Slot {
    /// Creates a slot with the given index.
    pub fn new(index: usize) -> Self {
        Slot(index)
    }

    /// Returns the raw slot index as a `usize`.
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns the slot `n` positions further right.
    pub fn offset(self, n: usize) -> Self {
        Slot(self.0 + n)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Slot> for usize {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl From<usize> for Slot {
    fn from(index: usize) -> Self {
        Slot(index)
    }
}
