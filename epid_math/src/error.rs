// TODO: At some point this should be replaced with crates anyhow and thiserror but thiserror is no_std compatible at the moment.

use core::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// A length, count or degree argument is outside the supported range
    BadArg,
    /// Subtraction produced a negative value
    Underflow,
    /// A result does not fit the destination's declared byte width
    Overflow,
    DivideByZero,
    /// An operand belongs to a different field or group than the operation expects
    MismatchedStructure,
    /// Inversion of the additive identity
    NotInvertible,
    /// The bounded retry budget of a randomized search was exhausted
    RandMaxIter,
    /// A byte string does not decode to a group element
    NotOnCurve,
}
