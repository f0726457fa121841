pub mod diag;
pub mod error;
pub mod expr;
pub mod fold;
pub mod func;
pub mod prepared;
pub mod resolve;
pub mod session;

pub use crate::diag::*;
pub use crate::expr::*;
pub use crate::func::*;
pub use crate::prepared::PreparedExpr;
pub use crate::resolve::{resolve, resolve_node};
pub use crate::session::{Session, SqlMode};

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_size_of_expr() {
        println!("size of Expr {}", std::mem::size_of::<Expr>());
        println!("size of Value {}", std::mem::size_of::<Value>());
        println!("size of Col {}", std::mem::size_of::<Col>());
    }
}
