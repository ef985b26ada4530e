#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that forwards player directions to the world.
//!
//! Input sources (window callbacks, terminal readers, test scripts) may live
//! on any thread. They hold an [`InputSender`] and push directions as they
//! arrive; the [`InputRelay`] drains them on the simulation thread and emits
//! one [`Command::QueueInput`] per direction in arrival order.

use std::sync::mpsc::{self, Receiver, Sender};

use stonefall_core::{Command, Input};
use thiserror::Error;

/// Cloneable handle that input sources use to submit directions.
#[derive(Clone, Debug)]
pub struct InputSender {
    sender: Sender<Input>,
}

impl InputSender {
    /// Submits a direction for the next tick.
    ///
    /// Returns `false` when the relay has been dropped and the input was lost.
    pub fn send(&self, input: Input) -> bool {
        self.sender.send(input).is_ok()
    }
}

/// Collects inputs from every sender and converts them into world commands.
#[derive(Debug)]
pub struct InputRelay {
    sender: Sender<Input>,
    receiver: Receiver<Input>,
}

impl Default for InputRelay {
    fn default() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }
}

impl InputRelay {
    /// Creates a relay with no pending inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new handle feeding this relay.
    #[must_use]
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Drains every pending input into `out`, oldest first.
    pub fn handle(&mut self, out: &mut Vec<Command>) {
        out.extend(
            self.receiver
                .try_iter()
                .map(|input| Command::QueueInput { input }),
        );
    }
}

/// Raised when a scripted input sequence contains an unknown direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unknown direction {found:?} at position {position} (expected one of U, D, L, R)")]
pub struct ScriptError {
    /// Character index of the offending symbol.
    pub position: usize,
    /// Offending symbol.
    pub found: char,
}

/// Parses a scripted input sequence such as `"RRD L"`.
///
/// Letters are case-insensitive; whitespace and commas separate nothing and
/// are skipped.
pub fn parse_script(script: &str) -> Result<Vec<Input>, ScriptError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_whitespace() && *symbol != ',')
        .map(|(position, symbol)| match symbol.to_ascii_uppercase() {
            'U' => Ok(Input::Up),
            'D' => Ok(Input::Down),
            'L' => Ok(Input::Left),
            'R' => Ok(Input::Right),
            found => Err(ScriptError { position, found }),
        })
        .collect()
}
