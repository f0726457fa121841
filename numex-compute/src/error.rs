use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Expression not resolved")]
    Unresolved,
    #[error("Row expression can not be evaluated as scalar")]
    RowNotSupported,
    #[error("Column index {0} out of range")]
    ColumnOutOfRange(usize),
    #[error("Unsupported evaluation of {0}")]
    UnsupportedEval(&'static str),
    #[error(transparent)]
    Expr(#[from] numex_expr::error::Error),
}
