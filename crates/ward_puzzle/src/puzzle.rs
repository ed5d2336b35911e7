//! Prompt/answer puzzles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ward_core::{ItemKind, LockableId, PuzzleId};

use crate::error::{PuzzleError, Result};

/// What solving a puzzle gives the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "item")]
pub enum Reward {
    /// Put an item straight into the inventory
    Grant(ItemKind),
    /// Make a hidden item pickup visible
    Reveal(ItemKind),
    /// Unlocking the lockable is the whole reward
    Nothing,
}

/// What the player sees when the puzzle opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePrompt {
    /// Riddle text
    pub text: String,
    /// Reference image path shown beside the text
    pub image: Option<String>,
}

/// Result of evaluating a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First correct answer: apply these effects
    Solved {
        reward: Reward,
        unlock: Option<LockableId>,
    },
    /// Already solved earlier; nothing changes
    AlreadySolved,
    /// Wrong answer; nothing changes
    Mismatch,
}

/// A single puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub prompt: PuzzlePrompt,
    /// Expected answer, compared exactly
    answer: String,
    /// Lockable opened by solving
    pub lockable: Option<LockableId>,
    pub reward: Reward,
    solved: bool,
}

impl Puzzle {
    /// Create an unsolved puzzle
    pub fn new(id: PuzzleId, text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            prompt: PuzzlePrompt {
                text: text.into(),
                image: None,
            },
            answer: answer.into(),
            lockable: None,
            reward: Reward::Nothing,
            solved: false,
        }
    }

    /// Set the reference image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.prompt.image = Some(image.into());
        self
    }

    /// Set the lockable this puzzle unlocks
    pub fn unlocks(mut self, lockable: LockableId) -> Self {
        self.lockable = Some(lockable);
        self
    }

    /// Set the reward
    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = reward;
        self
    }

    /// Whether the puzzle has been solved
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Evaluate a submission
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        if self.solved {
            return SubmitOutcome::AlreadySolved;
        }
        if input != self.answer {
            return SubmitOutcome::Mismatch;
        }
        self.solved = true;
        SubmitOutcome::Solved {
            reward: self.reward,
            unlock: self.lockable.clone(),
        }
    }

    /// Forget the solution (restart)
    pub fn reset(&mut self) {
        self.solved = false;
    }
}

/// All puzzles in the scene
#[derive(Debug, Clone, Default)]
pub struct PuzzleBook {
    puzzles: BTreeMap<PuzzleId, Puzzle>,
}

impl PuzzleBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a puzzle
    pub fn insert(&mut self, puzzle: Puzzle) -> Result<()> {
        if self.puzzles.contains_key(&puzzle.id) {
            return Err(PuzzleError::DuplicatePuzzle(puzzle.id));
        }
        self.puzzles.insert(puzzle.id.clone(), puzzle);
        Ok(())
    }

    /// Look up a puzzle
    pub fn get(&self, id: &PuzzleId) -> Option<&Puzzle> {
        self.puzzles.get(id)
    }

    /// Number of puzzles
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Number solved so far
    pub fn solved_count(&self) -> usize {
        self.puzzles.values().filter(|p| p.is_solved()).count()
    }

    /// Evaluate a submission for a puzzle
    pub fn submit(&mut self, id: &PuzzleId, input: &str) -> Result<SubmitOutcome> {
        let puzzle = self
            .puzzles
            .get_mut(id)
            .ok_or_else(|| PuzzleError::UnknownPuzzle(id.clone()))?;
        let outcome = puzzle.submit(input);
        match &outcome {
            SubmitOutcome::Solved { .. } => log::info!("Puzzle {} solved", id),
            SubmitOutcome::Mismatch => log::debug!("Puzzle {}: wrong answer", id),
            SubmitOutcome::AlreadySolved => log::debug!("Puzzle {}: already solved", id),
        }
        Ok(outcome)
    }

    /// Reset every puzzle
    pub fn reset(&mut self) {
        for puzzle in self.puzzles.values_mut() {
            puzzle.reset();
        }
    }
}
