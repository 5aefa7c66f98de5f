use std::{io, path::PathBuf};

use thiserror::Error;

use crate::ast::Segment;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{unit}:{line}: {kind} in `{text}`")]
    Parse {
        unit: String,
        line: usize,
        text: String,
        kind: ParseErrorKind,
    },
    #[error("failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("no .vm files found in {}", .0.display())]
    NoSources(PathBuf),
    #[error("cannot derive a translation unit name from {}", .0.display())]
    UnitName(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single line of VM source was rejected.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseErrorKind {
    #[error("unsupported command '{0}'")]
    UnsupportedCommand(String),
    #[error("unsupported segment '{0}'")]
    UnsupportedSegment(String),
    #[error("`{command}` is missing its {operand} operand")]
    MissingOperand {
        command: String,
        operand: &'static str,
    },
    #[error("expected a number for {operand}, found '{found}'")]
    InvalidNumber { operand: &'static str, found: String },
    #[error("{operand} {found} exceeds {max}")]
    TooLarge {
        operand: &'static str,
        found: String,
        max: u16,
    },
    #[error("{segment} index {index} is out of range (max {max})")]
    IndexOutOfRange { segment: Segment, index: u16, max: u16 },
    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
    #[error("cannot pop into the constant segment")]
    PopConstant,
}
