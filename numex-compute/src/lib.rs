pub mod arith;
pub mod convert;
pub mod error;
pub mod eval;
pub mod minmax;
pub mod round;

pub use crate::eval::Evaluator;

use crate::error::Result;
use numex_datatype::Value;
use numex_expr::{DiagnosticSink, PreparedExpr, Session};

/// Evaluation of prepared expression against single row.
pub trait RowEval {
    fn row_eval(
        &self,
        session: &Session,
        row: &[Value],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Value>;
}

impl RowEval for PreparedExpr {
    #[inline]
    fn row_eval(
        &self,
        session: &Session,
        row: &[Value],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Value> {
        Evaluator::new(session, sink).eval(self.expr(), row)
    }
}
