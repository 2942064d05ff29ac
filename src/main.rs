mod commands;

use clap::Parser;
use std::env;
use std::io::{self, Write};

use commands::run::RunArgs;

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn init_logging() {
    // Program output owns stdout; logs go to stderr and stay quiet unless RUST_LOG asks.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

fn main() {
    init_logging();

    let program = env::args().next().unwrap_or_else(|| "bf".to_string());
    let program = std::path::Path::new(&program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bf")
        .to_string();

    // Install SIGINT (ctrl+c) handler to exit immediately. stdout is not touched
    // here: the worker may be blocked on stdin while holding its lock.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        log::warn!("failed to set ctrl+c handler: {e}");
    }

    let cli = Cli::parse();
    let code = commands::run::run(&program, cli.run);
    std::process::exit(code);
}
