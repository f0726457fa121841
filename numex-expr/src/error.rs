use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Expression already resolved")]
    AlreadyResolved,
    #[error("Argument of {0} not resolved")]
    UnresolvedArgument(&'static str),
    #[error("Incorrect parameter count in the call to native function '{0}': {1}")]
    InvalidArgCount(&'static str, usize),
    #[error("Operand should contain 1 column(s)")]
    RowOperand,
    #[error("Invalid cast of {0}")]
    InvalidCast(String),
}
