//! Overflow detection shared by the arithmetic instructions.
//!
//! Each arithmetic opcode computes its result with wrapping arithmetic and hands the operands and
//! the wrapped result to [check_overflow] together with an [OverflowPredicate] that knows how to
//! recognize a wrapped value for that particular operation.

use std::fmt;

use crate::error::OverflowError;
use crate::instruction::{OpCode, Register};

/// Decides whether `result` is the wrapped outcome of an operation on `a` and `b` rather than
/// the mathematically correct one.
pub type OverflowPredicate = fn(a: i32, b: i32, result: i32) -> bool;

/// Addition overflows iff both operands share a sign that differs from the sign of the result.
pub fn add_overflows(a: i32, b: i32, result: i32) -> bool {
    ((a ^ result) & (b ^ result)) < 0
}

/// Subtraction overflows iff the operands differ in sign and the result differs from `a`.
pub fn sub_overflows(a: i32, b: i32, result: i32) -> bool {
    ((a ^ b) & (a ^ result)) < 0
}

/// Multiplication overflows iff the truncated product differs from the double width product.
pub fn mul_overflows(a: i32, b: i32, result: i32) -> bool {
    i64::from(result) != i64::from(a) * i64::from(b)
}

/// The signed 32-bit limit that an arithmetic operation crossed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The result was larger than `i32::MAX`.
    Maximum,

    /// The result was smaller than `i32::MIN`.
    Minimum,
}

impl Bound {
    pub fn value(&self) -> i32 {
        match self {
            Bound::Maximum => i32::MAX,
            Bound::Minimum => i32::MIN,
        }
    }

    /// `"overflow"` or `"underflow"`.
    pub fn direction(&self) -> &'static str {
        match self {
            Bound::Maximum => "overflow",
            Bound::Minimum => "underflow",
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bound::Maximum => write!(f, "2,147,483,647"),
            Bound::Minimum => write!(f, "-2,147,483,648"),
        }
    }
}

/// Runs `overflows` against the operands and the wrapped `value`.
///
/// # Parameters
/// - `opcode`: The operation that produced `value`.
/// - `result`: The result register and its value before the operation.
/// - `source`: The source register and its value.
/// - `value`: The wrapped result of the operation.
/// - `overflows`: The predicate for `opcode`.
///
/// # Errors
/// An [OverflowError] naming both registers, their values, the opcode and the crossed [Bound].
pub fn check_overflow(
    opcode: OpCode,
    result: (Register, i32),
    source: (Register, i32),
    value: i32,
    overflows: OverflowPredicate,
) -> Result<(), OverflowError> {
    let (result, value1) = result;
    let (source, value2) = source;

    if !overflows(value1, value2, value) {
        return Ok(());
    }

    // The sign of the exact result follows from the operands alone.
    let positive = match opcode {
        OpCode::Multiply => (value1 < 0) == (value2 < 0),
        _ => value1 >= 0,
    };

    let bound = match positive {
        true => Bound::Maximum,
        false => Bound::Minimum,
    };

    Err(OverflowError {
        opcode,
        result,
        source,
        value1,
        value2,
        bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [i32; 11] = [
        i32::MIN,
        i32::MIN + 1,
        -65536,
        -46341,
        -2,
        -1,
        0,
        1,
        2,
        46341,
        i32::MAX,
    ];

    fn check(opcode: OpCode, a: i32, b: i32, overflows: OverflowPredicate, wrapping: fn(i32, i32) -> i32) -> Result<(), OverflowError> {
        check_overflow(opcode, (Register::EAX, a), (Register::EBX, b), wrapping(a, b), overflows)
    }

    #[test]
    fn test_predicates_match_checked_arithmetic() {
        for &a in EDGES.iter() {
            for &b in EDGES.iter() {
                assert_eq!(add_overflows(a, b, a.wrapping_add(b)), a.checked_add(b).is_none(), "{} + {}", a, b);
                assert_eq!(sub_overflows(a, b, a.wrapping_sub(b)), a.checked_sub(b).is_none(), "{} - {}", a, b);
                assert_eq!(mul_overflows(a, b, a.wrapping_mul(b)), a.checked_mul(b).is_none(), "{} * {}", a, b);
            }
        }
    }

    #[test]
    fn test_bound_follows_exact_result() {
        for &a in EDGES.iter() {
            for &b in EDGES.iter() {
                let cases: [(OpCode, OverflowPredicate, fn(i32, i32) -> i32, i64); 3] = [
                    (OpCode::Add, add_overflows, i32::wrapping_add, i64::from(a) + i64::from(b)),
                    (OpCode::Subtract, sub_overflows, i32::wrapping_sub, i64::from(a) - i64::from(b)),
                    (OpCode::Multiply, mul_overflows, i32::wrapping_mul, i64::from(a) * i64::from(b)),
                ];

                for &(opcode, predicate, wrapping, exact) in cases.iter() {
                    let expected = if exact > i64::from(i32::MAX) {
                        Some(Bound::Maximum)
                    } else if exact < i64::from(i32::MIN) {
                        Some(Bound::Minimum)
                    } else {
                        None
                    };

                    let got = check(opcode, a, b, predicate, wrapping).err().map(|err| err.bound);
                    assert_eq!(got, expected, "{} {} {}", opcode, a, b);
                }
            }
        }
    }

    #[test]
    fn test_error_names_operands() {
        let err = check(OpCode::Multiply, i32::MAX, 2, mul_overflows, i32::wrapping_mul).unwrap_err();

        assert_eq!(err.value1, i32::MAX);
        assert_eq!(err.value2, 2);
        assert_eq!(err.result, Register::EAX);
        assert_eq!(err.source, Register::EBX);
        assert_eq!(err.bound, Bound::Maximum);
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(Bound::Maximum.to_string(), "2,147,483,647");
        assert_eq!(Bound::Minimum.to_string(), "-2,147,483,648");
        assert_eq!(Bound::Minimum.value(), i32::MIN);
        assert_eq!(Bound::Maximum.direction(), "overflow");
    }
}
