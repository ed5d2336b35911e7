//! The puzzle prompt the player types into

use ward_core::PuzzleId;

use crate::error::Result;
use crate::puzzle::{PuzzleBook, PuzzlePrompt, SubmitOutcome};

/// Shown after a correct answer
pub const SUCCESS_MESSAGE: &str = "Correct! Something clicked open.";
/// Shown after a wrong answer
pub const RETRY_MESSAGE: &str = "Wrong answer. Try again.";

/// The open prompt, if any
///
/// Tracks the text field and the status line; the puzzle itself lives in
/// the [`PuzzleBook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSession {
    puzzle: PuzzleId,
    prompt: PuzzlePrompt,
    input: String,
    input_enabled: bool,
    message: Option<&'static str>,
}

impl PromptSession {
    /// Open the prompt for a puzzle. `None` if the puzzle is unknown.
    pub fn open(book: &PuzzleBook, puzzle: &PuzzleId) -> Option<Self> {
        let entry = book.get(puzzle)?;
        Some(Self {
            puzzle: puzzle.clone(),
            prompt: entry.prompt.clone(),
            input: String::new(),
            input_enabled: !entry.is_solved(),
            message: None,
        })
    }

    /// Puzzle this prompt belongs to
    pub fn puzzle(&self) -> &PuzzleId {
        &self.puzzle
    }

    /// Text and image
    pub fn prompt(&self) -> &PuzzlePrompt {
        &self.prompt
    }

    /// Current text field contents
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the text field accepts typing and submission
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Status line
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Replace the text field contents (ignored once solved)
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.input_enabled {
            self.input = text.into();
        }
    }

    /// Submit the text field
    ///
    /// A correct answer disables the field; a wrong one clears it.
    pub fn submit(&mut self, book: &mut PuzzleBook) -> Result<SubmitOutcome> {
        if !self.input_enabled {
            return Ok(SubmitOutcome::AlreadySolved);
        }
        let outcome = book.submit(&self.puzzle, &self.input)?;
        match outcome {
            SubmitOutcome::Solved { .. } | SubmitOutcome::AlreadySolved => {
                self.input_enabled = false;
                self.message = Some(SUCCESS_MESSAGE);
            }
            SubmitOutcome::Mismatch => {
                self.input.clear();
                self.message = Some(RETRY_MESSAGE);
            }
        }
        Ok(outcome)
    }
}
