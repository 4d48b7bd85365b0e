// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transcript entries and the streaming reducer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Where a streamed fragment landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPlacement {
    /// A new assistant turn was opened at this index
    Opened(usize),
    /// The fragment was appended to the assistant turn at this index
    Extended(usize),
}

/// Ordered, append-only list of turns
///
/// The only in-place mutation allowed is extending the trailing assistant
/// turn with streamed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript opened with a system instruction and an assistant greeting
    pub fn seeded(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt), Turn::assistant(greeting)],
        }
    }

    /// Append a turn and return its index
    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Fold one streamed fragment into the transcript
    ///
    /// Extends the last turn when it is an assistant turn, otherwise opens a
    /// new assistant turn. Empty fragments change nothing.
    pub fn push_fragment(&mut self, fragment: &str) -> Option<FragmentPlacement> {
        if fragment.is_empty() {
            return None;
        }

        match self.turns.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.push_str(fragment);
                Some(FragmentPlacement::Extended(self.turns.len() - 1))
            }
            _ => Some(FragmentPlacement::Opened(self.push(Turn::assistant(fragment)))),
        }
    }

    /// Pure form of [`Transcript::push_fragment`]
    pub fn accumulate(mut self, fragment: &str) -> Self {
        self.push_fragment(fragment);
        self
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns a user is shown; system turns stay in the model context only
    pub fn visible(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role != Role::System)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
