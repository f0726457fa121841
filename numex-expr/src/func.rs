#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuncKind {
    /// Unary operators: 1 arg
    // Negate
    Neg,
    Abs,
    // Bit inverse
    BitInv,
    BitCount,
    Sign,
    Ceiling,
    Floor,
    Ln,
    Log2,
    Log10,
    Exp,
    Sqrt,
    Acos,
    Asin,
    Cos,
    Sin,
    Tan,
    Cot,
    Degrees,
    Radians,
    /// Binary operators: 2 args
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
    FindInSet,
    Truncate,
    /// SQL builtin functions: variable args
    // round: [arg, digits?]
    Round,
    // log: [base?, arg]
    Log,
    // atan: [arg] or [y, x]
    Atan,
    Least,
    Greatest,
    // field: [needle, haystack...]
    Field,
}

impl FuncKind {
    #[inline]
    pub fn to_lower(&self) -> &'static str {
        match self {
            FuncKind::Neg => "neg",
            FuncKind::Abs => "abs",
            FuncKind::BitInv => "bitinv",
            FuncKind::BitCount => "bit_count",
            FuncKind::Sign => "sign",
            FuncKind::Ceiling => "ceiling",
            FuncKind::Floor => "floor",
            FuncKind::Ln => "ln",
            FuncKind::Log2 => "log2",
            FuncKind::Log10 => "log10",
            FuncKind::Exp => "exp",
            FuncKind::Sqrt => "sqrt",
            FuncKind::Acos => "acos",
            FuncKind::Asin => "asin",
            FuncKind::Cos => "cos",
            FuncKind::Sin => "sin",
            FuncKind::Tan => "tan",
            FuncKind::Cot => "cot",
            FuncKind::Degrees => "degrees",
            FuncKind::Radians => "radians",
            FuncKind::Add => "add",
            FuncKind::Sub => "sub",
            FuncKind::Mul => "mul",
            FuncKind::Div => "div",
            FuncKind::IntDiv => "intdiv",
            FuncKind::Mod => "mod",
            FuncKind::Pow => "pow",
            FuncKind::BitAnd => "bitand",
            FuncKind::BitOr => "bitor",
            FuncKind::BitXor => "bitxor",
            FuncKind::BitShl => "bitshl",
            FuncKind::BitShr => "bitshr",
            FuncKind::FindInSet => "find_in_set",
            FuncKind::Truncate => "truncate",
            FuncKind::Round => "round",
            FuncKind::Log => "log",
            FuncKind::Atan => "atan",
            FuncKind::Least => "least",
            FuncKind::Greatest => "greatest",
            FuncKind::Field => "field",
        }
    }

    /// Operator symbol if this function is written infix.
    #[inline]
    pub fn infix(&self) -> Option<&'static str> {
        let op = match self {
            FuncKind::Add => "+",
            FuncKind::Sub => "-",
            FuncKind::Mul => "*",
            FuncKind::Div => "/",
            FuncKind::IntDiv => "DIV",
            FuncKind::Mod => "%",
            FuncKind::BitAnd => "&",
            FuncKind::BitOr => "|",
            FuncKind::BitXor => "^",
            FuncKind::BitShl => "<<",
            FuncKind::BitShr => ">>",
            _ => return None,
        };
        Some(op)
    }

    /// Returns minimum and maximum argument numbers of this function.
    /// if maximum number is None, the function can accept arbitrary number
    /// of arguments.
    #[inline]
    pub fn n_args(&self) -> (usize, Option<usize>) {
        use FuncKind::*;
        match self {
            Neg | Abs | BitInv | BitCount | Sign | Ceiling | Floor | Ln | Log2 | Log10 | Exp
            | Sqrt | Acos | Asin | Cos | Sin | Tan | Cot | Degrees | Radians => (1, Some(1)),
            Add | Sub | Mul | Div | IntDiv | Mod | Pow | BitAnd | BitOr | BitXor | BitShl
            | BitShr | FindInSet | Truncate => (2, Some(2)),
            Round | Log | Atan => (1, Some(2)),
            Least | Greatest | Field => (2, None),
        }
    }

    /// Whether the function is one of `+ - * / %`.
    #[inline]
    pub fn is_arith(&self) -> bool {
        matches!(
            self,
            FuncKind::Add | FuncKind::Sub | FuncKind::Mul | FuncKind::Div | FuncKind::Mod
        )
    }

    /// Whether the function always returns a double.
    #[inline]
    pub fn is_real_func(&self) -> bool {
        use FuncKind::*;
        matches!(
            self,
            Ln | Log
                | Log2
                | Log10
                | Exp
                | Sqrt
                | Pow
                | Acos
                | Asin
                | Atan
                | Cos
                | Sin
                | Tan
                | Cot
                | Degrees
                | Radians
        )
    }

    #[inline]
    pub fn is_bit_func(&self) -> bool {
        use FuncKind::*;
        matches!(
            self,
            BitInv | BitAnd | BitOr | BitXor | BitShl | BitShr | BitCount
        )
    }
}

/// Target type of explicit cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Signed,
    Unsigned,
    /// Precision and scale.
    Decimal(u8, u8),
    Double,
}

impl CastType {
    #[inline]
    pub fn to_lower(&self) -> String {
        match self {
            CastType::Signed => "signed".to_string(),
            CastType::Unsigned => "unsigned".to_string(),
            CastType::Decimal(prec, frac) => format!("decimal({},{})", prec, frac),
            CastType::Double => "double".to_string(),
        }
    }
}
