//! Expression evaluation and button state for a scientific calculator.
//!
//! Input text flows through [`tokenize`], [`parse`] and [`evaluate`]; only
//! the fixed set of functions and constants in [`expression`] is reachable.
//! [`CalculatorState`] layers the memory and answer registers and the edit
//! history on top, one button token at a time.

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

use telemetry::Measure;

pub use config::{figment, Config};
pub use error::{CalcError, DomainError, LexError, SyntaxError, SyntaxErrorKind};
pub use expression::{evaluate, parse, plain_number, tokenize, Expr, Token};
pub use format::format_number;
pub use state::{Button, CalculatorState, DisplayState};

mod config;
mod error;
pub mod expression;
mod format;
mod state;

lazy_static! {
    static ref EVALUATE_MEASURE: Measure = Measure::new("engine", "evaluate");
}

/// Runs `input` through the full pipeline
pub fn calculate(input: &str) -> Result<f64, CalcError> {
    EVALUATE_MEASURE.stats(|| -> Result<f64, CalcError> {
        let tokens = tokenize(input)?;
        let expr = parse(&tokens)?;
        Ok(evaluate(&expr)?)
    })
}
