use crate::error::Result;
use crate::util::{bool_to_double, double_to_bool, require_int};

/// The highest priority in the catalogue; operators at this priority are
/// folded eagerly while the chain is still being built.
pub const HIGHEST_PRIORITY: u8 = Operator::Power.priority();

/// The binary operator catalogue.
///
/// Every operator is binary and left-associative under the chain's
/// tie-break rule, *including* [`Operator::Power`]: `2^3^2` evaluates as
/// `(2^3)^2 = 64`, not the conventional right-associative `512`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Power,
    Multiplication,
    Division,
    Modulo,
    Addition,
    Subtraction,
    LeftShift,
    RightShift,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Equals,
    NotEquals,
    BitwiseAnd,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,
}

impl Operator {
    /// Priority of this operator, between 19 and [`HIGHEST_PRIORITY`];
    /// higher binds tighter.
    pub const fn priority(self) -> u8 {
        match self {
            Operator::Power => 32,
            Operator::Multiplication | Operator::Division | Operator::Modulo => 29,
            Operator::Addition | Operator::Subtraction => 28,
            Operator::LeftShift | Operator::RightShift => 27,
            Operator::LessThan
            | Operator::GreaterThan
            | Operator::LessThanOrEqual
            | Operator::GreaterThanOrEqual => 25,
            Operator::Equals | Operator::NotEquals => 24,
            Operator::BitwiseAnd => 23,
            Operator::BitwiseOr => 21,
            Operator::LogicalAnd => 20,
            Operator::LogicalOr => 19,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Power => "^",
            Operator::Multiplication => "*",
            Operator::Division => "/",
            Operator::Modulo => "%",
            Operator::Addition => "+",
            Operator::Subtraction => "-",
            Operator::LeftShift => "<<",
            Operator::RightShift => ">>",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::BitwiseAnd => "&",
            Operator::BitwiseOr => "|",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
        }
    }

    /// Applies the operator's semantic function.
    ///
    /// Bit operators coerce both sides to exact 32-bit signed integers and
    /// fail otherwise; shifts mask the shift distance like 32-bit shifts do.
    /// Division and modulo follow IEEE 754 (no division-by-zero error, sign
    /// of `%` follows the dividend).
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        Ok(match self {
            Operator::Power => a.powf(b),
            Operator::Multiplication => a * b,
            Operator::Division => a / b,
            Operator::Modulo => a % b,
            Operator::Addition => a + b,
            Operator::Subtraction => a - b,
            Operator::LeftShift => require_int(a)?.wrapping_shl(require_int(b)? as u32) as f64,
            Operator::RightShift => require_int(a)?.wrapping_shr(require_int(b)? as u32) as f64,
            Operator::LessThan => bool_to_double(a < b),
            Operator::GreaterThan => bool_to_double(a > b),
            Operator::LessThanOrEqual => bool_to_double(a <= b),
            Operator::GreaterThanOrEqual => bool_to_double(a >= b),
            Operator::Equals => bool_to_double(a == b),
            Operator::NotEquals => bool_to_double(a != b),
            Operator::BitwiseAnd => (require_int(a)? & require_int(b)?) as f64,
            Operator::BitwiseOr => (require_int(a)? | require_int(b)?) as f64,
            Operator::LogicalAnd => bool_to_double(double_to_bool(a) && double_to_bool(b)),
            Operator::LogicalOr => bool_to_double(double_to_bool(a) || double_to_bool(b)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_priorities() {
        assert_eq!(Operator::Power.priority(), HIGHEST_PRIORITY);
        assert!(Operator::Multiplication.priority() > Operator::Addition.priority());
        assert!(Operator::Addition.priority() > Operator::LeftShift.priority());
        assert!(Operator::LeftShift.priority() > Operator::LessThan.priority());
        assert!(Operator::LessThan.priority() > Operator::Equals.priority());
        assert!(Operator::Equals.priority() > Operator::BitwiseAnd.priority());
        assert!(Operator::BitwiseAnd.priority() > Operator::BitwiseOr.priority());
        assert!(Operator::BitwiseOr.priority() > Operator::LogicalAnd.priority());
        assert!(Operator::LogicalAnd.priority() > Operator::LogicalOr.priority());
    }

    #[test]
    fn test_modulo_sign_follows_dividend() {
        assert_eq!(Operator::Modulo.apply(-16.0, 12.0), Ok(-4.0));
        assert_eq!(Operator::Modulo.apply(16.0, -12.0), Ok(4.0));
    }

    #[test]
    fn test_division_is_ieee() {
        assert_eq!(Operator::Division.apply(1.0, 0.0), Ok(f64::INFINITY));
    }

    #[test]
    fn test_shifts_require_integers() {
        assert_eq!(Operator::LeftShift.apply(1.0, 3.0), Ok(8.0));
        assert_eq!(Operator::RightShift.apply(-8.0, 1.0), Ok(-4.0));
        assert_eq!(
            Operator::LeftShift.apply(1.5, 3.0),
            Err(Error::IntegerRequired(1.5))
        );
        // shift distance masked to 5 bits, like 32-bit shifts
        assert_eq!(Operator::LeftShift.apply(1.0, 33.0), Ok(2.0));
    }

    #[test]
    fn test_comparisons_yield_zero_or_one() {
        assert_eq!(Operator::LessThan.apply(1.0, 2.0), Ok(1.0));
        assert_eq!(Operator::GreaterThanOrEqual.apply(1.0, 2.0), Ok(0.0));
        assert_eq!(Operator::Equals.apply(2.0, 2.0), Ok(1.0));
        assert_eq!(Operator::LogicalAnd.apply(0.5, 2.0), Ok(1.0));
        assert_eq!(Operator::LogicalOr.apply(0.0, 0.0), Ok(0.0));
    }
}
