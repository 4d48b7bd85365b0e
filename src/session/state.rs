// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session lifecycle
//!
//! ```text
//! Initializing ──► Ready ──► Generating ──► Ready
//!                    └────► FetchingUrl ──► Ready
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Backend is loading; `progress` is shown in place of the input
    Initializing { progress: String },
    Ready,
    Generating,
    FetchingUrl,
}

impl SessionState {
    /// Whether moving to `next` is a legal edge
    pub fn can_transition_to(&self, next: &SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Initializing { .. }, Initializing { .. })
                | (Initializing { .. }, Ready)
                | (Ready, Generating)
                | (Ready, FetchingUrl)
                | (Generating, Ready)
                | (FetchingUrl, Ready)
        )
    }

    /// New submissions are only accepted in `Ready`
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Generating | SessionState::FetchingUrl)
    }

    /// Human-readable status line
    pub fn describe(&self) -> &str {
        match self {
            SessionState::Initializing { progress } => progress,
            SessionState::Ready => "Ready.",
            SessionState::Generating => "Generating…",
            SessionState::FetchingUrl => "Fetching URL…",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Backend has not finished loading
    #[error("session is not ready: {0}")]
    NotReady(String),

    /// A generation or fetch is already in flight
    #[error("a request is already in flight")]
    Busy,

    #[error("session is already initialized")]
    AlreadyInitialized,

    /// Teardown was signalled during initialization
    #[error("session was torn down")]
    TornDown,

    #[error("illegal state transition from {from:?} to {to:?}")]
    IllegalTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("backend failed to load: {0}")]
    Backend(#[from] BackendError),
}
