use std::collections::VecDeque;
use std::mem;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

use crate::config::Config;
use crate::error::CalcError;
use crate::expression::{plain_number, Constant, Function};
use crate::format::format_number;

/// Control buttons with a dedicated effect on the calculator state. Any token
/// not recognised here, as a constant or as a function is appended to the
/// buffer verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum Button {
    #[strum(serialize = "CLR")]
    Clear,
    #[strum(serialize = "CE")]
    ClearEntry,
    #[strum(serialize = "=", serialize = "EXE")]
    Evaluate,
    #[strum(serialize = "ANS")]
    Answer,
    #[strum(serialize = "M")]
    MemoryStore,
    #[strum(serialize = "M+")]
    MemoryAdd,
    #[strum(serialize = "M-")]
    MemorySubtract,
    #[strum(serialize = "Neg")]
    Negate,
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input<'a> {
    Button(Button),
    Constant(Constant),
    Function(Function),
    Text(&'a str),
}

impl<'a> Input<'a> {
    fn classify(token: &'a str) -> Self {
        if let Ok(button) = Button::from_str(token) {
            Input::Button(button)
        } else if let Ok(constant) = Constant::from_str(token) {
            Input::Constant(constant)
        } else if let Ok(function) = Function::from_str(token) {
            Input::Function(function)
        } else {
            Input::Text(token)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    buffer: String,
    is_error: bool,
}

/// A calculator session: the display buffer with its undo/redo history and
/// the memory and answer registers.
#[derive(Debug, Clone)]
pub struct CalculatorState {
    config: Config,
    memory: f64,
    answer: f64,
    current: Snapshot,
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState::new(Config::default())
    }
}

impl CalculatorState {
    /// Starts a session. A `history_limit` below one is raised to one so
    /// the last edit can always be undone.
    pub fn new(mut config: Config) -> Self {
        config.history_limit = config.history_limit.max(1);
        CalculatorState {
            config,
            memory: 0.0,
            answer: 0.0,
            current: Snapshot::default(),
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn answer(&self) -> f64 {
        self.answer
    }

    pub fn display(&self) -> DisplayState {
        DisplayState {
            text: self.current.buffer.clone(),
            is_error: self.current.is_error,
        }
    }

    /// Applies one button press and returns what should now be displayed
    pub fn submit_token(&mut self, token: &str) -> DisplayState {
        let input = Input::classify(token);
        debug!("Token {:?} classified as {:?}", token, input);

        match input {
            Input::Button(Button::Clear) => self.edit(String::new(), false),
            Input::Button(Button::ClearEntry) => {
                let mut buffer = self.editable_buffer();
                buffer.pop();
                self.edit(buffer, false)
            }
            Input::Button(Button::Evaluate) => self.evaluate(None),
            Input::Button(Button::Answer) => self.append(&format_number(self.answer)),
            Input::Button(Button::MemoryStore) => self.update_memory(|_, v| v),
            Input::Button(Button::MemoryAdd) => self.update_memory(|m, v| m + v),
            Input::Button(Button::MemorySubtract) => self.update_memory(|m, v| m - v),
            Input::Button(Button::Negate) => {
                let buffer = self.editable_buffer();
                let toggled = match buffer.strip_prefix('-') {
                    Some(rest) => rest.to_string(),
                    None => format!("-{}", buffer),
                };
                self.edit(toggled, false)
            }
            Input::Button(Button::Undo) => self.undo(),
            Input::Button(Button::Redo) => self.redo(),
            Input::Constant(constant) => self.append(&format_number(constant.value())),
            Input::Function(function) => self.evaluate(Some(function)),
            Input::Text(text) => self.append(text),
        }

        self.display()
    }

    /// The buffer an edit starts from; an error marker is discarded
    fn editable_buffer(&self) -> String {
        if self.current.is_error {
            String::new()
        } else {
            self.current.buffer.clone()
        }
    }

    fn append(&mut self, text: &str) {
        let mut buffer = self.editable_buffer();
        buffer.push_str(text);
        self.edit(buffer, false)
    }

    /// Replaces the buffer, recording the previous one for undo. Every edit
    /// discards the redo history, but one that leaves the display unchanged
    /// adds no undo snapshot.
    fn edit(&mut self, buffer: String, is_error: bool) {
        self.redo.clear();

        let next = Snapshot { buffer, is_error };
        if next == self.current {
            return;
        }

        let previous = mem::replace(&mut self.current, next);
        self.record(previous);
    }

    fn record(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.config.history_limit {
            self.undo.pop_front();
        }
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo.pop_back() {
            let current = mem::replace(&mut self.current, previous);
            self.redo.push(current);
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo.pop() {
            let current = mem::replace(&mut self.current, next);
            self.record(current);
        }
    }

    fn update_memory<F: FnOnce(f64, f64) -> f64>(&mut self, update: F) {
        if self.current.is_error {
            return;
        }
        match plain_number(&self.current.buffer) {
            Some(value) => self.memory = update(self.memory, value),
            None => debug!("Ignoring memory update for {:?}", self.current.buffer),
        }
    }

    /// Evaluates the buffer, optionally applying `function` to the result
    fn evaluate(&mut self, function: Option<Function>) {
        if self.current.is_error {
            return;
        }

        let result = crate::calculate(&self.current.buffer).and_then(|value| match function {
            Some(function) => function.apply(&[value]).map_err(CalcError::from),
            None => Ok(value),
        });

        match result {
            Ok(value) => {
                debug!("Evaluated {:?} to {}", self.current.buffer, value);
                self.answer = value;
                self.edit(format_number(value), false);
            }
            Err(e) => {
                warn!("Failed to evaluate {:?}: {}", self.current.buffer, e);
                let marker = self.config.error_marker.clone();
                self.edit(marker, true);
            }
        }
    }
}
