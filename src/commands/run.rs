use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tapebf::cli_util::print_error;
use tapebf::{BrainfuckError, Engine, ProgramSource, Settings, StepControl};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Path to the Brainfuck program
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Run CODE given on the command line instead of a file
    #[arg(short = 'c', long = "code", value_name = "CODE")]
    pub code: Option<String>,

    /// Print a step-by-step table of operations instead of executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Fail when the program ends inside an open loop (fallback BF_STRICT)
    #[arg(long = "strict")]
    pub strict: bool,

    /// Initial tape length in cells (fallback BF_TAPE_CELLS; default 1024)
    #[arg(long = "tape-cells", value_name = "N")]
    pub tape_cells: Option<usize>,

    /// Largest tape the program may grow to (fallback BF_MAX_TAPE_CELLS)
    #[arg(long = "max-tape-cells", value_name = "N")]
    pub max_tape_cells: Option<usize>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        path,
        code,
        debug,
        strict,
        tape_cells,
        max_tape_cells,
        max_steps,
        timeout_ms,
        ..
    } = args;

    let source = match (path, code) {
        (Some(path), None) => match ProgramSource::from_path(&path) {
            Ok(source) => source,
            Err(err) => {
                print_error(Some(program), &[], &err);
                return 1;
            }
        },
        (None, Some(code)) => ProgramSource::from(code),
        (None, None) => usage_and_exit(program, 2),
        (Some(_), Some(_)) => {
            eprintln!("{program}: cannot use PATH together with --code");
            usage_and_exit(program, 2);
        }
    };

    // Resolve settings: flags -> env -> config file -> defaults
    let mut settings = Settings::load();
    if let Some(n) = tape_cells { settings.initial_tape_cells = n; }
    if let Some(n) = max_tape_cells { settings.max_tape_cells = n; }
    if let Some(n) = max_steps { settings.max_steps = Some(n); }
    if let Some(ms) = timeout_ms { settings.timeout_ms = Some(ms); }
    if strict { settings.strict_loops = true; }
    log::debug!("resolved settings: {settings:?}");

    let code_bytes = source.as_bytes().to_vec();

    // Execute on a worker thread with cooperative cancellation
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<(), BrainfuckError>>();
    let ctrl = StepControl::new(settings.max_steps, cancel.clone());
    let worker_settings = settings.clone();

    thread::spawn(move || {
        let res = execute(source, &worker_settings, ctrl, debug);
        let _ = tx.send(res);
    });

    let received = match settings.timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = report_outcome(
        program,
        received,
        &code_bytes,
        &cancel,
        settings.timeout_ms,
        &mut io::stderr(),
    );

    // stdout is flushed by the engine; the worker may still hold its lock after a timeout.
    let _ = io::stderr().flush();
    exit_code
}

/// Map the worker's result to an exit code, writing abort notices to `err_out`.
/// Engine errors go through [`print_error`] so they get the caret context.
fn report_outcome<W: Write>(
    program: &str,
    received: Result<Result<(), BrainfuckError>, mpsc::RecvTimeoutError>,
    code_bytes: &[u8],
    cancel: &AtomicBool,
    timeout_ms: Option<u64>,
    err_out: &mut W,
) -> i32 {
    match received {
        Ok(Ok(())) => 0,
        Ok(Err(BrainfuckError::Canceled)) => {
            let _ = writeln!(err_out, "{program}: execution aborted: cancelled");
            1
        }
        Ok(Err(err)) => {
            print_error(Some(program), code_bytes, &err);
            1
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            let _ = writeln!(
                err_out,
                "{program}: execution aborted: wall-clock timeout exceeded ({} ms)",
                timeout_ms.unwrap_or_default()
            );
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            let _ = writeln!(err_out, "{program}: error: interpreter thread stopped unexpectedly");
            1
        }
    }
}

fn execute(
    mut source: ProgramSource,
    settings: &Settings,
    ctrl: StepControl,
    debug: bool,
) -> Result<(), BrainfuckError> {
    let mut engine = Engine::with_settings(settings)?;
    engine.set_step_control(ctrl);

    let stdout = io::stdout();
    if debug {
        engine.run_debug(&mut source, stdout.lock())
    } else {
        let stdin = io::stdin();
        engine.run(&mut source, stdin.lock(), stdout.lock())
    }
}

pub fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <PATH>
  {0} [OPTIONS] --code "<code>"

Options:
  --code,  -c <CODE>     Run CODE instead of reading a program file
  --debug, -d            Print a step-by-step table of operations instead of executing
  --strict               Fail when the program ends inside an open '[' loop
  --tape-cells <N>       Initial tape length in cells (default 1024)
  --max-tape-cells <N>   Largest tape the program may grow to
  --max-steps <N>        Abort after N instructions
  --timeout <MS>         Abort after MS milliseconds of wall-clock time
  --help,  -h            Show this help

Notes:
- Input (`,`) reads a single byte from stdin; on EOF the current cell is left unchanged.
- Output (`.`) writes the raw cell byte to stdout.
- Characters outside of Brainfuck's ><+-.,[] are comments.
- Settings may also come from BF_* environment variables or the [interpreter]
  section of bf.toml in your config directory (override with BF_CONFIG).

Examples:
- Run a program file:
    {0} ./program.bf
- Read bytes from a file as stdin (`,` will consume file input):
    {0} --code ",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_that_dies_without_reporting_is_a_failure() {
        let (tx, rx) = mpsc::channel::<Result<(), BrainfuckError>>();
        let worker = thread::spawn(move || {
            let _tx = tx;
            panic!("interpreter crashed");
        });
        assert!(worker.join().is_err());

        let received = rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected);
        let cancel = AtomicBool::new(false);
        let mut err_out = Vec::new();
        let code = report_outcome("bf", received, b"", &cancel, None, &mut err_out);

        assert_eq!(code, 1);
        assert_eq!(
            String::from_utf8(err_out).unwrap(),
            "bf: error: interpreter thread stopped unexpectedly\n"
        );
    }

    #[test]
    fn timeout_raises_cancel_flag() {
        let cancel = AtomicBool::new(false);
        let mut err_out = Vec::new();
        let code = report_outcome(
            "bf",
            Err(mpsc::RecvTimeoutError::Timeout),
            b"+[]",
            &cancel,
            Some(50),
            &mut err_out,
        );

        assert_eq!(code, 1);
        assert!(cancel.load(Ordering::Relaxed));
        assert!(String::from_utf8(err_out).unwrap().contains("wall-clock timeout exceeded (50 ms)"));
    }

    #[test]
    fn successful_run_exits_zero_silently() {
        let cancel = AtomicBool::new(false);
        let mut err_out = Vec::new();
        let code = report_outcome("bf", Ok(Ok(())), b"+", &cancel, None, &mut err_out);
        assert_eq!(code, 0);
        assert!(err_out.is_empty());
    }
}
