use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading or interpreting a Brainfuck program.
///
/// Every variant is fatal. `ip` fields hold the byte offset of the offending
/// instruction in the program source.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// The program file could not be opened or read.
    #[error("cannot read program '{}': {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The initial tape could not be allocated.
    #[error("failed to allocate initial tape of {cells} cells")]
    AllocationFailure { cells: usize },

    /// `<` was executed while the pointer was at cell 0.
    #[error("pointer moved before the start of the tape at instruction {ip}")]
    TapeUnderflow { ip: usize },

    /// Growing the tape failed, either because the allocator refused or the
    /// configured ceiling was reached.
    #[error("out of tape memory at instruction {ip} (needed {requested} cells)")]
    OutOfMemory { ip: usize, requested: usize },

    /// `]` was executed with no open loop.
    #[error("unmatched bracket {} at instruction {ip}", BracketKind::Close)]
    UnmatchedCloseBracket { ip: usize },

    /// A `[` never found its `]`.
    #[error("unmatched bracket {} at instruction {ip}", BracketKind::Open)]
    UnmatchedOpenBracket { ip: usize },

    /// Reading program input or writing program output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("execution aborted: cancelled")]
    Canceled,
}

impl BrainfuckError {
    /// Byte offset of the instruction that failed, when the error has one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            BrainfuckError::TapeUnderflow { ip }
            | BrainfuckError::OutOfMemory { ip, .. }
            | BrainfuckError::UnmatchedCloseBracket { ip }
            | BrainfuckError::UnmatchedOpenBracket { ip }
            | BrainfuckError::Io { ip, .. } => Some(*ip),
            _ => None,
        }
    }

    /// Short name of the error kind, used as the diagnostic headline.
    pub fn kind(&self) -> &'static str {
        match self {
            BrainfuckError::SourceUnreadable { .. } => "source unreadable",
            BrainfuckError::AllocationFailure { .. } => "allocation failure",
            BrainfuckError::TapeUnderflow { .. } => "tape underflow",
            BrainfuckError::OutOfMemory { .. } => "out of memory",
            BrainfuckError::UnmatchedCloseBracket { .. } => "unmatched close bracket",
            BrainfuckError::UnmatchedOpenBracket { .. } => "unmatched open bracket",
            BrainfuckError::Io { .. } => "I/O error",
            BrainfuckError::StepLimitExceeded { .. } => "step limit exceeded",
            BrainfuckError::Canceled => "cancelled",
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}
