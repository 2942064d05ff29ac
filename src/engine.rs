//! The instruction dispatch loop.
//!
//! The engine pulls one byte at a time from a [`ProgramSource`] and applies
//! it to the tape. Loops are driven by a stack of re-entry positions rather
//! than a precomputed jump table: `[` pushes the position right after itself,
//! `]` seeks back to it while the current cell is non-zero.

use std::io::{self, Read, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::config::Settings;
use crate::source::{Position, ProgramSource};
use crate::tape::Tape;
use crate::BrainfuckError;

/// The eight meaningful bytes. Everything else is commentary.
const INSTRUCTIONS: &[u8] = b"+-<>[].,";

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// A Brainfuck execution engine.
///
/// The engine maintains:
/// - a growable tape of byte cells initialized to zero,
/// - a data pointer indexing into that tape,
/// - a stack of loop re-entry positions for the loops currently open.
pub struct Engine {
    tape: Tape,
    pointer: usize,
    loops: Vec<Position>,
    strict_loops: bool,
    control: Option<StepControl>,
    steps: usize,
}

impl Engine {
    /// Create an engine with default settings.
    pub fn new() -> Result<Self, BrainfuckError> {
        Self::with_settings(&Settings::default())
    }

    /// Create an engine whose tape and loop policy follow `settings`.
    pub fn with_settings(settings: &Settings) -> Result<Self, BrainfuckError> {
        Ok(Self {
            tape: Tape::new(settings.initial_tape_cells, settings.max_tape_cells)?,
            pointer: 0,
            loops: Vec::new(),
            strict_loops: settings.strict_loops,
            control: None,
            steps: 0,
        })
    }

    /// Attach cancellation and step limiting to subsequent runs.
    pub fn set_step_control(&mut self, control: StepControl) {
        self.control = Some(control);
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn tape(&self) -> &[u8] {
        self.tape.as_slice()
    }

    /// Number of instructions executed by the last run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Execute `source` until it is exhausted, reading `,` bytes from `input`
    /// and writing `.` bytes to `output`.
    ///
    /// Tape contents and pointer carry over between runs; the loop stack does not.
    pub fn run<R: Read, W: Write>(
        &mut self,
        source: &mut ProgramSource,
        input: R,
        output: W,
    ) -> Result<(), BrainfuckError> {
        self.execute(source, input, output, false)
    }

    /// Debug-run the program, writing a step-by-step table of operations to
    /// `output` instead of producing I/O side effects. The interpreter state
    /// advances exactly as it would during a real run, but:
    /// - '.' does not emit the byte; the action is logged instead
    /// - ',' does not read input; EOF is simulated and the cell is left as is
    pub fn run_debug<W: Write>(
        &mut self,
        source: &mut ProgramSource,
        output: W,
    ) -> Result<(), BrainfuckError> {
        self.execute(source, io::empty(), output, true)
    }

    fn execute<R: Read, W: Write>(
        &mut self,
        source: &mut ProgramSource,
        mut input: R,
        mut output: W,
        debug: bool,
    ) -> Result<(), BrainfuckError> {
        self.loops.clear();
        self.steps = 0;
        log::debug!("running {} byte program (debug={debug})", source.len());

        let result = self.dispatch(source, &mut input, &mut output, debug);
        // Flush even when the run failed so partial output is not lost.
        let flushed = output.flush();
        self.loops.clear();
        result?;
        flushed.map_err(|e| BrainfuckError::Io { ip: source.offset(), source: e })?;

        log::debug!("program finished after {} steps", self.steps);
        Ok(())
    }

    fn dispatch<R: Read, W: Write>(
        &mut self,
        source: &mut ProgramSource,
        input: &mut R,
        output: &mut W,
        debug: bool,
    ) -> Result<(), BrainfuckError> {
        let io_err = |ip: usize| move |e: io::Error| BrainfuckError::Io { ip, source: e };

        if debug {
            writeln!(output, "STEP | IP  | PTR | CELL | INSTR | ACTION").map_err(io_err(0))?;
            writeln!(
                output,
                "-----+-----+-----+------+-------+------------------------------------------------"
            )
            .map_err(io_err(0))?;
        }

        while let Some(instr) = source.next() {
            if !INSTRUCTIONS.contains(&instr) {
                continue;
            }
            let ip = source.offset() - 1;
            self.check_control()?;

            let (ptr_before, cell_before) = (self.pointer, self.tape.get(self.pointer));
            let mut action: Option<String> = debug.then(String::new);

            match instr {
                b'>' => {
                    let next = self.pointer + 1;
                    self.tape.ensure_index(next, ip)?;
                    self.pointer = next;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                b'<' => {
                    if self.pointer == 0 {
                        return Err(BrainfuckError::TapeUnderflow { ip });
                    }
                    self.pointer -= 1;
                    if let Some(a) = action.as_mut() { *a = format!("Moved pointer head to index {}", self.pointer); }
                }
                b'+' => {
                    let after = cell_before.wrapping_add(1);
                    *self.tape.get_mut(self.pointer) = after;
                    if let Some(a) = action.as_mut() { *a = format!("Increment cell[{}] from {} to {}", ptr_before, cell_before, after); }
                }
                b'-' => {
                    let after = cell_before.wrapping_sub(1);
                    *self.tape.get_mut(self.pointer) = after;
                    if let Some(a) = action.as_mut() { *a = format!("Decrement cell[{}] from {} to {}", ptr_before, cell_before, after); }
                }
                b'.' => {
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {} (suppressed in debug)", cell_before);
                    } else {
                        output.write_all(&[cell_before]).map_err(io_err(ip))?;
                    }
                }
                b',' => {
                    if let Some(a) = action.as_mut() {
                        *a = "Read byte -> simulated EOF (cell unchanged)".to_string();
                    } else {
                        // Whatever was printed so far should be visible before we block.
                        output.flush().map_err(io_err(ip))?;
                        if let Some(byte) = read_byte(input).map_err(io_err(ip))? {
                            *self.tape.get_mut(self.pointer) = byte;
                        }
                    }
                }
                b'[' => {
                    if cell_before == 0 {
                        let close = skip_loop(source, ip)?;
                        log::debug!("skipped loop {ip}..={close}");
                        if let Some(a) = action.as_mut() { *a = format!("Cell is 0; skip forward past matching ']' at IP {}", close); }
                    } else {
                        self.loops.push(source.mark_position());
                        if let Some(a) = action.as_mut() { *a = "Enter loop (cell != 0)".to_string(); }
                    }
                }
                b']' => {
                    let Some(&start) = self.loops.last() else {
                        return Err(BrainfuckError::UnmatchedCloseBracket { ip });
                    };
                    if cell_before != 0 {
                        log::trace!("re-entering loop at offset {}", start.offset());
                        source.seek(start);
                        if let Some(a) = action.as_mut() { *a = format!("Cell != 0; jump back to IP {}", start.offset()); }
                    } else {
                        self.loops.pop();
                        if let Some(a) = action.as_mut() { *a = "Exit loop (cell is 0)".to_string(); }
                    }
                }
                _ => {}
            }

            if let Some(action) = action {
                writeln!(
                    output,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    self.steps, ip, ptr_before, cell_before, instr as char, action
                )
                .map_err(io_err(ip))?;
            }

            self.steps += 1;
        }

        if let Some(open) = self.loops.last() {
            // Positions sit just after their '[', so step back one byte.
            let ip = open.offset() - 1;
            if self.strict_loops {
                return Err(BrainfuckError::UnmatchedOpenBracket { ip });
            }
            log::debug!("program ended with {} open loop(s), innermost at {ip}", self.loops.len());
        }

        Ok(())
    }

    fn check_control(&self) -> Result<(), BrainfuckError> {
        let Some(ctrl) = self.control.as_ref() else {
            return Ok(());
        };
        if ctrl.cancel_flag.load(Ordering::Relaxed) {
            return Err(BrainfuckError::Canceled);
        }
        if let Some(max) = ctrl.max_steps {
            if self.steps >= max {
                return Err(BrainfuckError::StepLimitExceeded { limit: max });
            }
        }
        Ok(())
    }
}

/// Scan forward past the `]` matching the `[` at `open_ip`.
///
/// Returns the offset of that `]`; the source cursor is left just after it.
fn skip_loop(source: &mut ProgramSource, open_ip: usize) -> Result<usize, BrainfuckError> {
    let mut depth = 1usize;
    while let Some(byte) = source.next() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(source.offset() - 1);
                }
            }
            _ => {}
        }
    }
    Err(BrainfuckError::UnmatchedOpenBracket { ip: open_ip })
}

/// Read exactly one byte, `None` on EOF.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
