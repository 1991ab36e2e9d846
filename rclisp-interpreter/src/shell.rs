use std::io::{self, Write};
use std::time::Instant;

use anyhow::Error;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use rclisp_interpreter::interpreter::Interpreter;
use rclisp_interpreter::reader::{needs_more_input, Reader};

/// Prints the welcome banner.
pub fn welcome() {
    println!("rclisp {}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl-C or Ctrl-D to exit.");
}

/// Launches an interactive Read-Eval-Print-Loop within the given interpreter.
///
/// Returns once the user interrupts the shell, or closes its input.
pub fn interactive(interpreter: &mut Interpreter, verbose: bool) -> Result<(), Error> {
    let mut editor = DefaultEditor::new()?;
    let stdout = io::stdout();

    let mut counter = 0;
    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            format!("({}) rclisp> ", counter)
        } else {
            String::from("... ")
        };

        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bye Bye!");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        buffer.push_str(&line);
        buffer.push('\n');
        if needs_more_input(&buffer) {
            continue;
        }

        let source = std::mem::take(&mut buffer);
        let source = source.trim();
        if source.is_empty() {
            continue;
        }
        editor.add_history_entry(source)?;

        let mut reader = Reader::new(source);
        while let Some(expr) = reader.read(&mut interpreter.heap) {
            let start = Instant::now();
            let env = interpreter.environment;
            let output = interpreter.evaluate(expr, env);
            let elapsed = start.elapsed();
            interpreter.flush_output()?;

            let mut stdout = stdout.lock();
            if verbose {
                writeln!(
                    &mut stdout,
                    "Execution time: {} ms ({} µs)",
                    elapsed.as_millis(),
                    elapsed.as_micros(),
                )?;
            }
            writeln!(&mut stdout, "=> {}", interpreter.display(output))?;

            interpreter.heap.release(output);
            interpreter.heap.release(expr);
        }
        counter += 1;
    }

    Ok(())
}
