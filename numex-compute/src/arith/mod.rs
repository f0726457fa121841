mod decimal;
mod int;
mod real;

pub use decimal::*;
pub use int::*;
pub use real::*;

use numex_datatype::Decimal;
use numex_expr::{Diagnostic, Expr, FuncKind, Session};
use thiserror::Error;

/// Type whose range is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowKind {
    BigInt,
    BigIntUnsigned,
    Double,
    Decimal,
}

impl OverflowKind {
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            OverflowKind::BigInt => "BIGINT",
            OverflowKind::BigIntUnsigned => "BIGINT UNSIGNED",
            OverflowKind::Double => "DOUBLE",
            OverflowKind::Decimal => "DECIMAL",
        }
    }

    /// Integer overflow kind of a node with given signedness.
    #[inline]
    pub fn int(unsigned: bool) -> Self {
        if unsigned {
            OverflowKind::BigIntUnsigned
        } else {
            OverflowKind::BigInt
        }
    }
}

/// Data-dependent conditions of arithmetic.
/// The node evaluates to NULL when any of them is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithError {
    #[error("{} value is out of range", .0.type_name())]
    Overflow(OverflowKind),
    #[error("Division by 0")]
    DivisionByZero,
    #[error("Invalid argument for {0}")]
    DomainError(&'static str),
    #[error("Data truncated")]
    Truncated,
    #[error("Bad number")]
    BadNumber,
}

pub type ArithResult<T> = std::result::Result<T, ArithError>;

impl ArithError {
    /// Converts the condition raised by given expression to diagnostic.
    /// Returns None if the session keeps it silent.
    pub fn to_diagnostic(&self, e: &Expr, session: &Session) -> Option<Diagnostic> {
        match self {
            ArithError::Overflow(kind) => {
                Some(Diagnostic::out_of_range(kind.type_name(), &e.to_string()))
            }
            ArithError::DivisionByZero => {
                session.strict_division_warning().then(Diagnostic::division_by_zero)
            }
            ArithError::DomainError(func) => session
                .strict_division_warning()
                .then(|| Diagnostic::invalid_argument(func)),
            ArithError::Truncated => None,
            ArithError::BadNumber => Some(Diagnostic::truncated("DECIMAL", &e.to_string())),
        }
    }
}

/// Integer operand with its signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntArg {
    pub value: i64,
    pub unsigned: bool,
}

impl IntArg {
    #[inline]
    pub fn new(value: i64, unsigned: bool) -> Self {
        IntArg { value, unsigned }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        !self.unsigned && self.value < 0
    }

    /// Absolute value as unsigned.
    #[inline]
    pub fn magnitude(&self) -> u64 {
        if self.unsigned {
            self.value as u64
        } else {
            self.value.unsigned_abs()
        }
    }

    #[inline]
    pub fn to_i128(&self) -> i128 {
        if self.unsigned {
            self.value as u64 as i128
        } else {
            self.value as i128
        }
    }
}

/// Integer operation. The flag is the signedness of the result node.
pub type IntOp = fn(IntArg, IntArg, bool) -> ArithResult<i64>;
pub type RealOp = fn(f64, f64) -> ArithResult<f64>;
/// Decimal operation. The scale is the resolved scale of the result node.
pub type DecimalOp = fn(&Decimal, &Decimal, u8) -> ArithResult<Decimal>;

/// Domain functions of one arithmetic operator.
pub struct ArithOps {
    /// Division never runs in integer domain.
    pub int: Option<IntOp>,
    pub real: RealOp,
    pub decimal: DecimalOp,
}

/// Kinds of arithmetic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

static ADD_OPS: ArithOps = ArithOps {
    int: Some(int_add),
    real: real_add,
    decimal: decimal_add,
};

static SUB_OPS: ArithOps = ArithOps {
    int: Some(int_sub),
    real: real_sub,
    decimal: decimal_sub,
};

static MUL_OPS: ArithOps = ArithOps {
    int: Some(int_mul),
    real: real_mul,
    decimal: decimal_mul,
};

static DIV_OPS: ArithOps = ArithOps {
    int: None,
    real: real_div,
    decimal: decimal_div,
};

static MOD_OPS: ArithOps = ArithOps {
    int: Some(int_mod),
    real: real_mod,
    decimal: decimal_mod,
};

impl ArithKind {
    #[inline]
    pub fn from_func(kind: FuncKind) -> Option<Self> {
        let res = match kind {
            FuncKind::Add => ArithKind::Add,
            FuncKind::Sub => ArithKind::Sub,
            FuncKind::Mul => ArithKind::Mul,
            FuncKind::Div => ArithKind::Div,
            FuncKind::Mod => ArithKind::Mod,
            _ => return None,
        };
        Some(res)
    }

    #[inline]
    pub fn ops(&self) -> &'static ArithOps {
        match self {
            ArithKind::Add => &ADD_OPS,
            ArithKind::Sub => &SUB_OPS,
            ArithKind::Mul => &MUL_OPS,
            ArithKind::Div => &DIV_OPS,
            ArithKind::Mod => &MOD_OPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numex_expr::{DiagCode, SqlMode};

    #[test]
    fn test_arith_ops_table() {
        let ops = ArithKind::Add.ops();
        let res = (ops.int.unwrap())(IntArg::new(1, false), IntArg::new(2, false), false);
        assert_eq!(Ok(3), res);
        assert_eq!(Ok(1.5), (ops.real)(1.0, 0.5));
        assert!(ArithKind::Div.ops().int.is_none());
        assert_eq!(
            Err(ArithError::DivisionByZero),
            (ArithKind::Mod.ops().real)(1.0, 0.0)
        );
        assert_eq!(None, ArithKind::from_func(FuncKind::IntDiv));
    }

    #[test]
    fn test_arith_error_diagnostic() {
        let e = Expr::add(Expr::const_i64(i64::MAX), Expr::const_i64(1));
        let strict = Session::default();
        let loose = Session::default().with_sql_mode(SqlMode::empty());
        let d = ArithError::Overflow(OverflowKind::BigInt)
            .to_diagnostic(&e, &loose)
            .unwrap();
        assert_eq!(DiagCode::DataOutOfRange, d.code);
        assert_eq!(
            "BIGINT value is out of range in '(9223372036854775807 + 1)'",
            d.message
        );
        assert!(ArithError::DivisionByZero.to_diagnostic(&e, &strict).is_some());
        assert!(ArithError::DivisionByZero.to_diagnostic(&e, &loose).is_none());
        assert!(ArithError::DomainError("sqrt").to_diagnostic(&e, &loose).is_none());
        assert!(ArithError::Truncated.to_diagnostic(&e, &strict).is_none());
    }

    #[test]
    fn test_int_arg() {
        assert!(IntArg::new(-1, false).is_negative());
        assert!(!IntArg::new(-1, true).is_negative());
        assert_eq!(1u64 << 63, IntArg::new(i64::MIN, false).magnitude());
        assert_eq!(u64::MAX as i128, IntArg::new(-1, true).to_i128());
    }
}
