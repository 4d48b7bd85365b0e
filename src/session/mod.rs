// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat session: transcript, input grammar, lifecycle and the controller
//! that ties them to a generation backend and the URL fetch proxy.

pub mod command;
pub mod controller;
pub mod fetch_client;
pub mod state;
pub mod turn;

pub use command::{ChatInput, FETCH_PREFIX};
pub use controller::{
    ChatSession, InitOutcome, SessionEvent, SubmitOutcome, INVALID_URL_MESSAGE,
};
pub use fetch_client::{FetchFailure, ProxyClient, UrlFetcher};
pub use state::{SessionError, SessionState};
pub use turn::{FragmentPlacement, Role, Transcript, Turn};
