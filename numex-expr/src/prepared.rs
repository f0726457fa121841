use crate::error::Result;
use crate::resolve::resolve;
use crate::session::Session;
use crate::Expr;
use numex_datatype::TypeAttr;

/// Expression resolved once and evaluated many times.
///
/// The type attributes are fixed at preparation, so later changes of
/// session settings only affect evaluation-time behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedExpr(Expr);

impl PreparedExpr {
    #[inline]
    pub fn prepare(mut e: Expr, session: &Session) -> Result<Self> {
        resolve(&mut e, session)?;
        Ok(PreparedExpr(e))
    }

    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.0
    }

    #[inline]
    pub fn attr(&self) -> &TypeAttr {
        &self.0.attr
    }

    #[inline]
    pub fn into_inner(self) -> Expr {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::SqlMode;
    use numex_datatype::ResultType;

    #[test]
    fn test_prepare_captures_session() {
        let session = Session::default().with_sql_mode(SqlMode::NO_UNSIGNED_SUBTRACTION);
        let e = Expr::sub(Expr::const_u64(1), Expr::const_u64(2));
        let prepared = PreparedExpr::prepare(e, &session).unwrap();
        assert_eq!(ResultType::Integer, prepared.attr().result_type);
        assert!(!prepared.attr().unsigned);
        assert!(prepared.expr().is_fully_fixed());
        let e = prepared.into_inner();
        assert_eq!(
            Err(Error::AlreadyResolved),
            PreparedExpr::prepare(e, &Session::default())
        );
    }
}
