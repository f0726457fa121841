use crate::func::{CastType, FuncKind};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::ops::{ControlFlow, Deref};
use std::sync::Arc;

pub use numex_datatype::{Value, ValidF64};
use numex_datatype::{Decimal, PreciseType, Temporal, TypeAttr};

/// Expression node. Owns its arguments.
///
/// Type attributes are assigned once by the resolver, after that
/// only operand values change between evaluations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub(crate) attr: TypeAttr,
    fixed: bool,
}

impl Expr {
    #[inline]
    pub fn new(e: ExprKind) -> Self {
        Expr {
            kind: e,
            attr: TypeAttr::default(),
            fixed: false,
        }
    }

    #[inline]
    pub fn new_const(c: Value) -> Self {
        Expr::new(ExprKind::Const(c))
    }

    #[inline]
    pub fn const_null() -> Self {
        Expr::new_const(Value::Null)
    }

    #[inline]
    pub fn const_i64(i: i64) -> Self {
        Expr::new_const(Value::I64(i))
    }

    #[inline]
    pub fn const_u64(u: u64) -> Self {
        Expr::new_const(Value::U64(u))
    }

    /// Non-finite input becomes NULL.
    #[inline]
    pub fn const_f64(f: f64) -> Self {
        Expr::new_const(Value::new_f64(f).unwrap_or_default())
    }

    #[inline]
    pub fn const_decimal(d: Decimal) -> Self {
        Expr::new_const(Value::Decimal(d))
    }

    #[inline]
    pub fn const_str(s: &str) -> Self {
        Expr::new_const(Value::str(s))
    }

    #[inline]
    pub fn const_bytes(bs: &[u8]) -> Self {
        Expr::new_const(Value::bytes(bs))
    }

    #[inline]
    pub fn const_temporal(t: Temporal) -> Self {
        Expr::new_const(Value::Temporal(t))
    }

    /// Column at given position of the input row.
    #[inline]
    pub fn col(idx: u32, name: &str, pty: PreciseType, nullable: bool) -> Self {
        Expr::new(ExprKind::Col(Col {
            idx: ColIndex::from(idx),
            name: Arc::from(name),
            pty,
            nullable,
        }))
    }

    #[inline]
    pub fn func(kind: FuncKind, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Func { kind, args })
    }

    #[inline]
    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::Add, vec![lhs, rhs])
    }

    #[inline]
    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::Sub, vec![lhs, rhs])
    }

    #[inline]
    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::Mul, vec![lhs, rhs])
    }

    #[inline]
    pub fn div(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::Div, vec![lhs, rhs])
    }

    #[inline]
    pub fn int_div(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::IntDiv, vec![lhs, rhs])
    }

    #[inline]
    pub fn modulo(lhs: Expr, rhs: Expr) -> Self {
        Expr::func(FuncKind::Mod, vec![lhs, rhs])
    }

    #[inline]
    pub fn neg(arg: Expr) -> Self {
        Expr::func(FuncKind::Neg, vec![arg])
    }

    #[inline]
    pub fn abs(arg: Expr) -> Self {
        Expr::func(FuncKind::Abs, vec![arg])
    }

    #[inline]
    pub fn round(arg: Expr, digits: Option<Expr>) -> Self {
        let mut args = vec![arg];
        args.extend(digits);
        Expr::func(FuncKind::Round, args)
    }

    #[inline]
    pub fn truncate(arg: Expr, digits: Expr) -> Self {
        Expr::func(FuncKind::Truncate, vec![arg, digits])
    }

    #[inline]
    pub fn ceiling(arg: Expr) -> Self {
        Expr::func(FuncKind::Ceiling, vec![arg])
    }

    #[inline]
    pub fn floor(arg: Expr) -> Self {
        Expr::func(FuncKind::Floor, vec![arg])
    }

    #[inline]
    pub fn least(args: Vec<Expr>) -> Self {
        Expr::func(FuncKind::Least, args)
    }

    #[inline]
    pub fn greatest(args: Vec<Expr>) -> Self {
        Expr::func(FuncKind::Greatest, args)
    }

    #[inline]
    pub fn field(needle: Expr, haystack: Vec<Expr>) -> Self {
        let mut args = Vec::with_capacity(haystack.len() + 1);
        args.push(needle);
        args.extend(haystack);
        Expr::func(FuncKind::Field, args)
    }

    #[inline]
    pub fn find_in_set(needle: Expr, list: Expr) -> Self {
        Expr::func(FuncKind::FindInSet, vec![needle, list])
    }

    #[inline]
    pub fn cast(arg: Expr, ty: CastType) -> Self {
        Expr::new(ExprKind::Cast {
            arg: Box::new(arg),
            ty,
        })
    }

    #[inline]
    pub fn row(exprs: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Row(exprs))
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        matches!(self.kind, ExprKind::Const(_))
    }

    /// Whether type resolution of this node is done.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Resolved type attributes. Default until the node is fixed.
    #[inline]
    pub fn attr(&self) -> &TypeAttr {
        &self.attr
    }

    #[inline]
    pub(crate) fn set_fixed(&mut self, attr: TypeAttr) {
        self.attr = attr;
        self.fixed = true;
    }

    #[inline]
    pub fn n_args(&self) -> usize {
        match &self.kind {
            ExprKind::Const(_) | ExprKind::Col(_) => 0,
            ExprKind::Cast { .. } => 1,
            ExprKind::Func { args, .. } => args.len(),
            ExprKind::Row(es) => es.len(),
        }
    }

    /// Return arguments of current expression.
    /// Many expressions has two arguments so we use SmallVec<[&Expr; 2]>.
    #[inline]
    pub fn args(&self) -> SmallVec<[&Expr; 2]> {
        match &self.kind {
            ExprKind::Const(_) | ExprKind::Col(_) => smallvec![],
            ExprKind::Cast { arg, .. } => smallvec![arg.as_ref()],
            ExprKind::Func { args, .. } => args.iter().collect(),
            ExprKind::Row(es) => SmallVec::from_iter(es.iter()),
        }
    }

    /// Returns mutable arguments of current expression.
    #[inline]
    pub fn args_mut(&mut self) -> SmallVec<[&mut Expr; 2]> {
        match &mut self.kind {
            ExprKind::Const(_) | ExprKind::Col(_) => smallvec![],
            ExprKind::Cast { arg, .. } => smallvec![arg.as_mut()],
            ExprKind::Func { args, .. } => args.iter_mut().collect(),
            ExprKind::Row(es) => SmallVec::from_iter(es.iter_mut()),
        }
    }

    pub fn walk<'a, V: ExprVisitor<'a>>(
        &'a self,
        visitor: &mut V,
    ) -> ControlFlow<V::Break, V::Cont> {
        let mut eff = visitor.enter(self)?;
        for c in self.args() {
            eff.merge(c.walk(visitor)?)
        }
        eff.merge(visitor.leave(self)?);
        ControlFlow::Continue(eff)
    }

    pub fn walk_mut<V: ExprMutVisitor>(
        &mut self,
        visitor: &mut V,
    ) -> ControlFlow<V::Break, V::Cont> {
        let mut eff = visitor.enter(self)?;
        for c in self.args_mut() {
            eff.merge(c.walk_mut(visitor)?)
        }
        eff.merge(visitor.leave(self)?);
        ControlFlow::Continue(eff)
    }

    /// Whether every node of this tree has been resolved.
    #[inline]
    pub fn is_fully_fixed(&self) -> bool {
        struct AllFixed;
        impl<'a> ExprVisitor<'a> for AllFixed {
            type Cont = ();
            type Break = ();
            #[inline]
            fn enter(&mut self, e: &'a Expr) -> ControlFlow<()> {
                if e.is_fixed() {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
        }
        self.walk(&mut AllFixed).is_continue()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Const(Value),
    Col(Col),
    Func {
        kind: FuncKind,
        args: Vec<Expr>,
    },
    Cast {
        arg: Box<Expr>,
        ty: CastType,
    },
    /// Row constructor, only valid as operand of row comparison.
    Row(Vec<Expr>),
}

impl Default for ExprKind {
    fn default() -> Self {
        ExprKind::Const(Value::Null)
    }
}

/// Column of the input row, with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Col {
    pub idx: ColIndex,
    pub name: Arc<str>,
    pub pty: PreciseType,
    pub nullable: bool,
}

/// ColIndex wraps u32 to be the index of column in input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColIndex(u32);

impl ColIndex {
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ColIndex {
    fn from(src: u32) -> Self {
        ColIndex(src)
    }
}

impl Deref for ColIndex {
    type Target = u32;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ColIndex {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Const(Value::Str(s, _)) => {
                write!(f, "'{}'", String::from_utf8_lossy(s).replace('\'', "''"))
            }
            ExprKind::Const(Value::Temporal(t)) => write!(f, "'{}'", t),
            ExprKind::Const(c) => write!(f, "{}", c),
            ExprKind::Col(c) => write!(f, "`{}`", c.name),
            ExprKind::Func { kind, args } => {
                if let (Some(op), [lhs, rhs]) = (kind.infix(), args.as_slice()) {
                    return write!(f, "({} {} {})", lhs, op, rhs);
                }
                if *kind == FuncKind::Neg {
                    return write!(f, "-({})", args[0]);
                }
                if *kind == FuncKind::BitInv {
                    return write!(f, "~({})", args[0]);
                }
                write!(f, "{}(", kind.to_lower())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", a)?;
                }
                f.write_str(")")
            }
            ExprKind::Cast { arg, ty } => write!(f, "cast({} as {})", arg, ty.to_lower()),
            ExprKind::Row(es) => {
                f.write_str("(")?;
                for (i, e) in es.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", e)?;
                }
                f.write_str(")")
            }
        }
    }
}

pub trait Effect: Default {
    fn merge(&mut self, other: Self);
}

impl Effect for () {
    #[inline]
    fn merge(&mut self, _other: Self) {}
}

pub trait ExprVisitor<'a>: Sized {
    type Cont: Effect;
    type Break;
    /// Returns true if continue
    #[inline]
    fn enter(&mut self, _e: &'a Expr) -> ControlFlow<Self::Break, Self::Cont> {
        ControlFlow::Continue(Self::Cont::default())
    }

    /// Returns true if continue
    #[inline]
    fn leave(&mut self, _e: &'a Expr) -> ControlFlow<Self::Break, Self::Cont> {
        ControlFlow::Continue(Self::Cont::default())
    }
}

pub trait ExprMutVisitor {
    type Cont: Effect;
    type Break;
    /// Returns true if continue
    #[inline]
    fn enter(&mut self, _e: &mut Expr) -> ControlFlow<Self::Break, Self::Cont> {
        ControlFlow::Continue(Self::Cont::default())
    }

    /// Returns true if continue
    #[inline]
    fn leave(&mut self, _e: &mut Expr) -> ControlFlow<Self::Break, Self::Cont> {
        ControlFlow::Continue(Self::Cont::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_display() {
        let e = Expr::add(
            Expr::col(0, "a", PreciseType::i64(), true),
            Expr::const_i64(1),
        );
        assert_eq!("(`a` + 1)", e.to_string());
        let e = Expr::round(Expr::const_str("it's"), Some(Expr::const_i64(2)));
        assert_eq!("round('it''s',2)", e.to_string());
        let e = Expr::neg(Expr::const_u64(9223372036854775808));
        assert_eq!("-(9223372036854775808)", e.to_string());
        let e = Expr::cast(Expr::const_f64(2.5), CastType::Decimal(2, 0));
        assert_eq!("cast(2.5 as decimal(2,0))", e.to_string());
        let e = Expr::field(Expr::const_str("b"), vec![Expr::const_str("a")]);
        assert_eq!("field('b','a')", e.to_string());
    }

    #[test]
    fn test_expr_args() {
        let mut e = Expr::least(vec![
            Expr::const_i64(1),
            Expr::const_i64(2),
            Expr::const_null(),
        ]);
        assert_eq!(3, e.n_args());
        assert_eq!(3, e.args().len());
        for a in e.args_mut() {
            assert!(!a.is_fixed());
        }
        assert!(!e.is_fully_fixed());
        assert_eq!(Expr::const_null(), Expr::const_f64(f64::NAN));
    }

    #[test]
    fn test_expr_attr_set_once_fixed() {
        let mut e = Expr::const_i64(1);
        assert_eq!(&TypeAttr::default(), e.attr());
        let attr = TypeAttr {
            unsigned: true,
            ..TypeAttr::default()
        };
        e.set_fixed(attr);
        assert!(e.is_fixed());
        assert_eq!(&attr, e.attr());
    }

    #[test]
    fn test_size_of_smallvec_expr_ref() {
        use std::mem::size_of;
        println!("size of Expr is {}", size_of::<Expr>());
        println!("size of ExprKind is {}", size_of::<ExprKind>());
    }
}
