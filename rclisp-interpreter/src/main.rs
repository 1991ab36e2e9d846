//!
//! This is the interpreter for rclisp.
//!
#![warn(missing_docs)]

use std::path::PathBuf;

use clap::Parser;
#[cfg(feature = "jemalloc")]
use jemallocator::Jemalloc;
use tracing_subscriber::EnvFilter;

mod shell;

use rclisp_interpreter::interpreter::Interpreter;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// The environment variable holding the logging filter directives.
const LOG_ENV: &str = "RCLISP_LOG";

#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(about, author, version)]
struct Options {
    /// Files to load before starting the shell (in order).
    #[clap(short, long, value_name = "FILE")]
    load: Vec<PathBuf>,

    /// Exit once the files are loaded, instead of starting the shell.
    #[clap(long)]
    batch: bool,

    /// Do not print the welcome banner.
    #[clap(short, long)]
    quiet: bool,

    /// Enable verbose output (with timing information).
    #[clap(short = 'v')]
    verbose: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = Options::parse();
    init_logging();

    let mut interpreter = Interpreter::new();

    for file in &opts.load {
        if let Err(err) = interpreter.load_file(file) {
            println!("ERROR: could not load '{}': {}", file.display(), err);
        }
    }

    if !opts.batch {
        if !opts.quiet {
            shell::welcome();
        }
        shell::interactive(&mut interpreter, opts.verbose)?;
    }

    let freed = interpreter.teardown();
    tracing::debug!(freed, "exiting");

    Ok(())
}
