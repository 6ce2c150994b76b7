use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Redefinition,
    Undefined,
    ParameterCountMismatch,
    ParameterTypeMismatch,
    IllegalConditionType,
    ReturnInVoidFunction,
    MissingOrWrongReturn,
    IllegalArrayIndex,
    AssignToConst,
    MissingSemicolon,
    MissingClosingParen,
    MissingClosingBracket,
    MissingWhileInDoWhile,
    InvalidConstDefinition,
}

impl DiagnosticKind {
    /// Letter used for this kind in graded error listings.
    pub fn code(&self) -> char {
        match self {
            DiagnosticKind::Redefinition => 'b',
            DiagnosticKind::Undefined => 'c',
            DiagnosticKind::ParameterCountMismatch => 'd',
            DiagnosticKind::ParameterTypeMismatch => 'e',
            DiagnosticKind::IllegalConditionType => 'f',
            DiagnosticKind::ReturnInVoidFunction => 'g',
            DiagnosticKind::MissingOrWrongReturn => 'h',
            DiagnosticKind::IllegalArrayIndex => 'i',
            DiagnosticKind::AssignToConst => 'j',
            DiagnosticKind::MissingSemicolon => 'k',
            DiagnosticKind::MissingClosingParen => 'l',
            DiagnosticKind::MissingClosingBracket => 'm',
            DiagnosticKind::MissingWhileInDoWhile => 'n',
            DiagnosticKind::InvalidConstDefinition => 'o',
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::Redefinition => "name redefined in the same scope",
            DiagnosticKind::Undefined => "undefined name",
            DiagnosticKind::ParameterCountMismatch => "wrong number of arguments",
            DiagnosticKind::ParameterTypeMismatch => "argument type does not match parameter",
            DiagnosticKind::IllegalConditionType => "condition operand must be int",
            DiagnosticKind::ReturnInVoidFunction => "void function returns a value",
            DiagnosticKind::MissingOrWrongReturn => "missing or mistyped return value",
            DiagnosticKind::IllegalArrayIndex => "array index must be int",
            DiagnosticKind::AssignToConst => "assignment to a constant",
            DiagnosticKind::MissingSemicolon => "missing `;`",
            DiagnosticKind::MissingClosingParen => "missing `)`",
            DiagnosticKind::MissingClosingBracket => "missing `]`",
            DiagnosticKind::MissingWhileInDoWhile => "missing `while` after `do` body",
            DiagnosticKind::InvalidConstDefinition => "constant initialiser has the wrong type",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.line, self.kind.code())
    }
}

/// Append-only diagnostic sink. Recording never fails and never stops
/// the analysis.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: usize, kind: DiagnosticKind) {
        self.entries.push(Diagnostic::new(line, kind));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
