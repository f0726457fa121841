use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Severity {
    #[inline]
    pub fn to_lower(&self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Diagnostic codes raised during evaluation, numbered as MySQL does.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagCode {
    UnknownError = 1105,
    WarnDataOutOfRange = 1264,
    TruncatedWrongValue = 1292,
    DivisionByZero = 1365,
    DataOutOfRange = 1690,
    InvalidArgument = 3020,
}

impl DiagCode {
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagCode,
    pub message: String,
}

impl Diagnostic {
    #[inline]
    pub fn new(severity: Severity, code: DiagCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            code,
            message: message.into(),
        }
    }

    /// `ty` is upper case type name such as "BIGINT", `expr` is the
    /// rendered expression that overflowed.
    #[inline]
    pub fn out_of_range(ty: &str, expr: &str) -> Self {
        Diagnostic::new(
            Severity::Warning,
            DiagCode::DataOutOfRange,
            format!("{} value is out of range in '{}'", ty, expr),
        )
    }

    #[inline]
    pub fn division_by_zero() -> Self {
        Diagnostic::new(Severity::Warning, DiagCode::DivisionByZero, "Division by 0")
    }

    #[inline]
    pub fn invalid_argument(func: &str) -> Self {
        Diagnostic::new(
            Severity::Warning,
            DiagCode::InvalidArgument,
            format!("Invalid argument for {}", func),
        )
    }

    #[inline]
    pub fn truncated(ty: &str, text: &str) -> Self {
        Diagnostic::new(
            Severity::Warning,
            DiagCode::TruncatedWrongValue,
            format!("Truncated incorrect {} value: '{}'", ty, text),
        )
    }

    #[inline]
    pub fn cast_out_of_range(col: &str) -> Self {
        Diagnostic::new(
            Severity::Warning,
            DiagCode::WarnDataOutOfRange,
            format!("Out of range value for column '{}' at row 1", col),
        )
    }

    #[inline]
    pub fn cast_to_unsigned() -> Self {
        Diagnostic::new(
            Severity::Note,
            DiagCode::UnknownError,
            "Cast to unsigned converted negative integer to it's positive complement",
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.severity.to_lower(),
            self.code.code(),
            self.message
        )
    }
}

/// Receiver of diagnostics raised by evaluation. Pushing never fails.
pub trait DiagnosticSink {
    fn push(&mut self, diag: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    #[inline]
    fn push(&mut self, diag: Diagnostic) {
        Vec::push(self, diag)
    }
}

/// Default maximum number of kept diagnostics, same as
/// MySQL's max_error_count.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 1024;

/// Bounded diagnostics area of one statement.
/// Diagnostics beyond capacity are only counted.
#[derive(Debug, Clone)]
pub struct DiagnosticArea {
    diags: Vec<Diagnostic>,
    max: usize,
    total: usize,
}

impl Default for DiagnosticArea {
    fn default() -> Self {
        DiagnosticArea::with_capacity(DEFAULT_MAX_DIAGNOSTICS)
    }
}

impl DiagnosticArea {
    #[inline]
    pub fn with_capacity(max: usize) -> Self {
        DiagnosticArea {
            diags: vec![],
            max,
            total: 0,
        }
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diags
    }

    /// Number of all pushed diagnostics, including dropped ones.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.diags
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
            .count()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.diags.clear();
        self.total = 0;
    }
}

impl DiagnosticSink for DiagnosticArea {
    #[inline]
    fn push(&mut self, diag: Diagnostic) {
        log::debug!("diagnostic raised: {}", diag);
        self.total += 1;
        if self.diags.len() < self.max {
            self.diags.push(diag);
        }
    }
}
