// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod session;
pub mod version;

pub use api::{create_app, start_server, AppState};
pub use backend::{BackendError, BackendLoader, GenerationBackend, OpenAiCompatLoader};
pub use config::{ChatConfig, ServerConfig};
pub use extraction::{ContentFetcher, ExtractionConfig, ExtractionError, ExtractionResult};
pub use session::{ChatSession, SessionEvent, SessionState, SubmitOutcome, Turn};
