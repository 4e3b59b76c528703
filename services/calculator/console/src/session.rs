use std::io::{BufRead, Write};

use calculator_engine::{CalculatorState, DisplayState};

use crate::config::Output;

/// Feeds whitespace separated tokens from `input` into the calculator,
/// writing the display after every line. Lines starting with `:` are
/// console commands.
pub fn run<R: BufRead, W: Write>(
    state: &mut CalculatorState,
    output: Output,
    input: R,
    mut out: W,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();

        match line {
            "" => continue,
            ":quit" => break,
            ":memory" => {
                writeln!(out, "memory = {}", state.memory())?;
                writeln!(out, "answer = {}", state.answer())?;
            }
            ":metrics" => out.write_all(telemetry::encode()?.as_bytes())?,
            command if command.starts_with(':') => {
                warn!("Unknown command {}", command);
                writeln!(out, "unknown command {}", command)?;
            }
            tokens => {
                let mut display = state.display();
                for token in tokens.split_whitespace() {
                    display = state.submit_token(token);
                }
                render(&display, output, &mut out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn render<W: Write>(
    display: &DisplayState,
    output: Output,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Output::Plain => writeln!(out, "{}", display.text)?,
        Output::Json => writeln!(out, "{}", serde_json::to_string(display)?)?,
    }
    Ok(())
}
