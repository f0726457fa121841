use bitflags::bitflags;

bitflags! {
    /// SQL mode flags affecting arithmetic.
    pub struct SqlMode: u32 {
        const NO_UNSIGNED_SUBTRACTION    = 1 << 0;
        const ERROR_FOR_DIVISION_BY_ZERO = 1 << 1;
    }
}

impl Default for SqlMode {
    fn default() -> Self {
        SqlMode::ERROR_FOR_DIVISION_BY_ZERO
    }
}

/// Default digits added to the scale of division result.
pub const DEFAULT_DIV_PRECISION_INCREMENT: u8 = 4;
/// Upper bound of div_precision_increment.
pub const MAX_DIV_PRECISION_INCREMENT: u8 = 30;

/// Session settings read by resolution and evaluation.
///
/// Resolution captures `div_precision_increment` and
/// `NO_UNSIGNED_SUBTRACTION` into the node attributes, so changing
/// them later does not affect already resolved expressions.
/// `ERROR_FOR_DIVISION_BY_ZERO` is read each time a row is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub sql_mode: SqlMode,
    pub div_precision_increment: u8,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            sql_mode: SqlMode::default(),
            div_precision_increment: DEFAULT_DIV_PRECISION_INCREMENT,
        }
    }
}

impl Session {
    #[inline]
    pub fn with_sql_mode(mut self, sql_mode: SqlMode) -> Self {
        self.sql_mode = sql_mode;
        self
    }

    /// The increment is capped to [`MAX_DIV_PRECISION_INCREMENT`].
    #[inline]
    pub fn with_div_precision_increment(mut self, incr: u8) -> Self {
        self.div_precision_increment = incr.min(MAX_DIV_PRECISION_INCREMENT);
        self
    }

    #[inline]
    pub fn precision_increment(&self) -> u8 {
        self.div_precision_increment.min(MAX_DIV_PRECISION_INCREMENT)
    }

    /// Whether division by zero and invalid arguments raise warnings.
    #[inline]
    pub fn strict_division_warning(&self) -> bool {
        self.sql_mode.contains(SqlMode::ERROR_FOR_DIVISION_BY_ZERO)
    }

    #[inline]
    pub fn unsigned_subtraction_mode(&self) -> bool {
        self.sql_mode.contains(SqlMode::NO_UNSIGNED_SUBTRACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let s = Session::default();
        assert_eq!(4, s.precision_increment());
        assert!(s.strict_division_warning());
        assert!(!s.unsigned_subtraction_mode());
        let s = s
            .with_sql_mode(SqlMode::NO_UNSIGNED_SUBTRACTION)
            .with_div_precision_increment(100);
        assert_eq!(30, s.precision_increment());
        assert!(!s.strict_division_warning());
        assert!(s.unsigned_subtraction_mode());
    }
}
