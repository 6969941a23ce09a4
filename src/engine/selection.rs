use serde::{Deserialize, Serialize};

use crate::models::{MAX_ANSWER, MIN_ANSWER};

/// Maximum number of answers a user can hold for one question.
pub const MAX_SELECTIONS: usize = 4;

/// What a toggle did to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The set was full or the value is not a valid answer number.
    Ignored,
}

impl ToggleOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, ToggleOutcome::Ignored)
    }
}

/// Answers picked for one question, in the order they were entered.
///
/// Never holds more than [`MAX_SELECTIONS`] values and never holds a value
/// twice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    values: Vec<u8>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `value` if present, otherwise append it when there is room.
    pub fn toggle(&mut self, value: u8) -> ToggleOutcome {
        if let Some(pos) = self.values.iter().position(|v| *v == value) {
            self.values.remove(pos);
            return ToggleOutcome::Removed;
        }

        if !(MIN_ANSWER..=MAX_ANSWER).contains(&value) || self.is_full() {
            return ToggleOutcome::Ignored;
        }

        self.values.push(value);
        ToggleOutcome::Added
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= MAX_SELECTIONS
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.values.clone()
    }
}
