#[macro_use]
extern crate log;

use std::io;

use calculator_engine::CalculatorState;

mod config;
mod session;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config: config::Config = calculator_engine::figment().extract()?;
    debug!("Starting console session with {:?}", config);

    let mut state = CalculatorState::new(config.engine);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session::run(&mut state, config.output, stdin.lock(), stdout.lock())
}
