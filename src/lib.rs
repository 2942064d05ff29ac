//! A tiny streaming Brainfuck interpreter library.
//!
//! The interpreter reads the program one byte at a time from an in-memory
//! [`ProgramSource`] and executes it against a single growable tape.
//!
//! Features and behaviors:
//! - Memory tape of byte cells initialized to 0; values wrap modulo 256.
//! - Moving left from cell 0 is an error; moving right past the end doubles
//!   the tape (up to a configurable ceiling).
//! - Input `,` reads a single byte; on EOF the current cell is left unchanged.
//! - Output `.` writes the raw byte at the current cell.
//! - Loops re-enter by seeking back to the position recorded at `[`; a zero
//!   guard skips forward to the matching `]`.
//! - Any byte outside `><+-.,[]` is a comment.
//!
//! Quick start:
//!
//! ```no_run
//! use std::io;
//! use tapebf::{Engine, ProgramSource};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut engine = Engine::new().expect("tape allocation");
//! let mut source = ProgramSource::from(code);
//! engine.run(&mut source, io::stdin().lock(), io::stdout().lock()).expect("program should run");
//! ```

pub mod cli_util;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod tape;

pub use config::Settings;
pub use engine::{Engine, StepControl};
pub use error::{BracketKind, BrainfuckError};
pub use source::{Position, ProgramSource};
pub use tape::Tape;
