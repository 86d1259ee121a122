use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::PathBuf;

use base::prelude::{Address, OperandRef};

/// Line numbers count from 1, as in an editor.
pub type LineNumber = usize;

/// Failures of the two macro-processor passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    /// A definition has no header, a broken header, or no
    /// terminator.
    MalformedDefinition { line: LineNumber, msg: String },
    /// A macro is listed in the MNT but its definition cannot be
    /// found in the other tables.
    UnknownMacroReference { line: LineNumber, name: String },
    /// A call supplies fewer actual arguments than the macro needs.
    ArgumentCountMismatch {
        line: LineNumber,
        name: String,
        needed: usize,
        supplied: usize,
    },
    /// A second definition of an existing macro, when duplicates are
    /// rejected.
    DuplicateMacro {
        line: LineNumber,
        name: String,
        first_line: LineNumber,
    },
}

impl Display for MacroError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            MacroError::MalformedDefinition { line, msg } => {
                write!(f, "line {line}: malformed macro definition: {msg}")
            }
            MacroError::UnknownMacroReference { line, name } => {
                write!(
                    f,
                    "line {line}: macro {name} is in the name table but its definition is missing or incomplete"
                )
            }
            MacroError::ArgumentCountMismatch {
                line,
                name,
                needed,
                supplied,
            } => {
                write!(
                    f,
                    "line {line}: call of macro {name} needs {needed} argument(s) but {supplied} were supplied"
                )
            }
            MacroError::DuplicateMacro {
                line,
                name,
                first_line,
            } => {
                write!(
                    f,
                    "line {line}: macro {name} was already defined at line {first_line}"
                )
            }
        }
    }
}

impl Error for MacroError {}

/// Failures of the code generator.  `statement` counts the tagged
/// statements from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    UnresolvedOperandIndex {
        statement: usize,
        operand: OperandRef,
        table_len: usize,
    },
    UninitializedLocationCounter {
        statement: usize,
    },
    LocationCounterRegression {
        statement: usize,
        from: Address,
        to: Address,
    },
    AddressOverflow {
        statement: usize,
    },
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            CodegenError::UnresolvedOperandIndex {
                statement,
                operand,
                table_len,
            } => {
                let table = match operand {
                    OperandRef::Symbol(_) => "symbol",
                    OperandRef::Literal(_) => "literal",
                    OperandRef::Constant(_) => "constant",
                };
                write!(
                    f,
                    "statement {statement}: operand {operand} is outside the {table} table, which has {table_len} entries"
                )
            }
            CodegenError::UninitializedLocationCounter { statement } => {
                write!(
                    f,
                    "statement {statement}: the location counter has not been set (is START missing?)"
                )
            }
            CodegenError::LocationCounterRegression {
                statement,
                from,
                to,
            } => {
                write!(
                    f,
                    "statement {statement}: location counter would move backwards from {from} to {to}"
                )
            }
            CodegenError::AddressOverflow { statement } => {
                write!(
                    f,
                    "statement {statement}: location counter overflowed past {}",
                    Address::MAX
                )
            }
        }
    }
}

impl Error for CodegenError {}

/// A line of tagged intermediate code, or of a symbol or literal
/// table file, could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: LineNumber,
    pub msg: String,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "line {}: {}", self.line, self.msg)
    }
}

impl Error for SyntaxError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoTarget {
    File(PathBuf),
    Stdout,
}

#[derive(Debug)]
pub struct IoFailed {
    pub action: IoAction,
    pub target: IoTarget,
    pub error: IoError,
}

impl Display for IoFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let IoFailed {
            action,
            target,
            error,
        } = self;
        let (verb, prep) = match action {
            IoAction::Read => ("reading", "from"),
            IoAction::Write => ("writing", "to"),
        };
        match target {
            IoTarget::Stdout => write!(f, "I/O error {verb} {prep} stdout: {error}"),
            IoTarget::File(name) => {
                write!(f, "I/O error {verb} {prep} {}: {error}", name.display())
            }
        }
    }
}

#[derive(Debug)]
pub enum AssemblerFailure {
    Io(IoFailed),
    BadInput { file: PathBuf, error: SyntaxError },
    Macro { file: PathBuf, error: MacroError },
    Codegen(CodegenError),
}

impl Display for AssemblerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AssemblerFailure::Io(e) => e.fmt(f),
            AssemblerFailure::BadInput { file, error } => {
                write!(f, "{}: {error}", file.display())
            }
            AssemblerFailure::Macro { file, error } => {
                write!(f, "{}: {error}", file.display())
            }
            AssemblerFailure::Codegen(e) => e.fmt(f),
        }
    }
}

impl Error for AssemblerFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssemblerFailure::Io(e) => Some(&e.error),
            AssemblerFailure::BadInput { error, .. } => Some(error),
            AssemblerFailure::Macro { error, .. } => Some(error),
            AssemblerFailure::Codegen(e) => Some(e),
        }
    }
}

impl From<CodegenError> for AssemblerFailure {
    fn from(e: CodegenError) -> AssemblerFailure {
        AssemblerFailure::Codegen(e)
    }
}
