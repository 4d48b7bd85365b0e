// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat session controller
//!
//! Owns the transcript and the single in-flight slot. `submit` takes
//! `&mut self`, so a second submission cannot start while one is running;
//! the explicit [`SessionState`] tells observers what is in flight.

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::command::ChatInput;
use super::fetch_client::{FetchFailure, UrlFetcher};
use super::state::{SessionError, SessionState};
use super::turn::{FragmentPlacement, Transcript, Turn};
use crate::backend::{BackendError, BackendLoader, CompletionRequest, GenerationBackend};
use crate::config::ChatConfig;
use crate::extraction::is_http_url;

pub const INVALID_URL_MESSAGE: &str = "Invalid URL. Use an http(s) link.";
const INITIAL_PROGRESS: &str = "Initializing model…";
const LOADING_PROGRESS: &str = "Loading AI engine…";

/// Notifications for whatever renders the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    TurnAppended { index: usize, turn: Turn },
    TurnExtended { index: usize, delta: String },
}

/// Result of a call to [`ChatSession::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Ready,
    /// Session was torn down while the backend loaded
    Cancelled,
}

/// What a submission did to the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// `/fetch` with a non-http(s) URL
    InvalidUrl,
    Fetched { url: String, chars: usize },
    FetchFailed(FetchFailure),
    Completed { chars: usize },
    GenerationFailed(String),
}

pub struct ChatSession {
    id: Uuid,
    transcript: Transcript,
    state: SessionState,
    backend: Option<Arc<dyn GenerationBackend>>,
    fetcher: Arc<dyn UrlFetcher>,
    temperature: f32,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    torn_down: bool,
}

impl ChatSession {
    /// New session seeded with the system instruction and greeting
    pub fn new(config: &ChatConfig, fetcher: Arc<dyn UrlFetcher>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript::seeded(config.system_prompt.clone(), config.greeting.clone()),
            state: SessionState::Initializing {
                progress: INITIAL_PROGRESS.to_string(),
            },
            backend: None,
            fetcher,
            temperature: config.temperature,
            events: None,
            torn_down: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Progress text while initializing, a short status otherwise
    pub fn status_text(&self) -> &str {
        self.state.describe()
    }

    pub fn can_submit(&self) -> bool {
        self.state.accepts_input()
    }

    /// Receive every subsequent [`SessionEvent`]; replaces any prior subscriber
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Load the generation backend
    ///
    /// Progress reports replace the `Initializing` status as they arrive.
    /// `teardown` is checked once loading completes; a torn-down session
    /// discards the backend, is left as it was and cannot be initialized
    /// again.
    pub async fn initialize<L>(
        &mut self,
        loader: &L,
        teardown: &CancellationToken,
    ) -> Result<InitOutcome, SessionError>
    where
        L: BackendLoader + ?Sized,
    {
        if self.torn_down {
            return Err(SessionError::TornDown);
        }
        if !matches!(self.state, SessionState::Initializing { .. }) || self.backend.is_some() {
            return Err(SessionError::AlreadyInitialized);
        }

        self.set_progress(LOADING_PROGRESS.to_string())?;

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let load = loader.load(progress_tx);
        tokio::pin!(load);

        let loaded = loop {
            tokio::select! {
                result = &mut load => break result,
                Some(report) = progress_rx.recv() => self.set_progress(report.describe())?,
            }
        };
        while let Ok(report) = progress_rx.try_recv() {
            self.set_progress(report.describe())?;
        }

        if teardown.is_cancelled() {
            self.torn_down = true;
            debug!("Session {} torn down during initialization", self.id);
            return Ok(InitOutcome::Cancelled);
        }

        match loaded {
            Ok(backend) => {
                info!("Session {} ready with backend '{}'", self.id, backend.name());
                self.backend = Some(backend);
                self.transition(SessionState::Ready)?;
                Ok(InitOutcome::Ready)
            }
            Err(e) => {
                warn!("Session {} failed to load backend: {}", self.id, e);
                self.set_progress(format!("Failed to load model: {}", e))?;
                Err(SessionError::Backend(e))
            }
        }
    }

    /// Handle one user submission
    pub async fn submit(&mut self, raw: &str) -> Result<SubmitOutcome, SessionError> {
        let Some(input) = ChatInput::parse(raw) else {
            return Ok(SubmitOutcome::Ignored);
        };

        // `&mut self` already serializes submissions; the busy arm only
        // guards against a state left behind by a dropped submit future.
        let backend = match (&self.state, &self.backend) {
            (SessionState::Ready, Some(backend)) => backend.clone(),
            (state, _) if state.is_busy() => return Err(SessionError::Busy),
            (state, _) => return Err(SessionError::NotReady(state.describe().to_string())),
        };

        match input {
            ChatInput::Fetch { url } => self.run_fetch(raw.trim(), url).await,
            ChatInput::Plain(text) => self.run_generation(backend, text).await,
        }
    }

    async fn run_fetch(&mut self, content: &str, url: String) -> Result<SubmitOutcome, SessionError> {
        if !is_http_url(&url) {
            debug!("Session {} rejected fetch of '{}'", self.id, url);
            self.append(Turn::assistant(INVALID_URL_MESSAGE));
            return Ok(SubmitOutcome::InvalidUrl);
        }

        self.transition(SessionState::FetchingUrl)?;

        let outcome = match self.fetcher.fetch(&url).await {
            Ok(result) => {
                let chars = result.text.chars().count();
                self.append(Turn::user(content));
                self.append(Turn::system(format!(
                    "Content fetched from {} (truncated):\n\n{}",
                    url, result.text
                )));
                info!("Session {} added {} chars from {}", self.id, chars, url);
                SubmitOutcome::Fetched { url, chars }
            }
            Err(failure) => {
                warn!("Session {} fetch of {} failed: {}", self.id, url, failure);
                let message = match &failure {
                    FetchFailure::Rejected(error) => format!("Fetch error: {}", error),
                    FetchFailure::Transport(error) => format!("Fetch failed: {}", error),
                };
                self.append(Turn::assistant(message));
                SubmitOutcome::FetchFailed(failure)
            }
        };

        self.transition(SessionState::Ready)?;
        Ok(outcome)
    }

    async fn run_generation(
        &mut self,
        backend: Arc<dyn GenerationBackend>,
        text: String,
    ) -> Result<SubmitOutcome, SessionError> {
        self.append(Turn::user(text));
        self.transition(SessionState::Generating)?;

        let request = CompletionRequest {
            messages: self.transcript.turns().to_vec(),
            temperature: self.temperature,
        };

        let mut chars = 0usize;
        let failure: Option<BackendError> = match backend.stream_chat(request).await {
            Ok(mut stream) => loop {
                match stream.next().await {
                    Some(Ok(fragment)) => {
                        chars += fragment.chars().count();
                        self.apply_fragment(&fragment);
                    }
                    Some(Err(e)) => break Some(e),
                    None => break None,
                }
            },
            Err(e) => Some(e),
        };

        let outcome = match failure {
            None => {
                debug!("Session {} generated {} chars", self.id, chars);
                SubmitOutcome::Completed { chars }
            }
            Some(e) => {
                warn!("Session {} generation failed: {}", self.id, e);
                self.append(Turn::assistant(format!("Generation error: {}", e)));
                SubmitOutcome::GenerationFailed(e.to_string())
            }
        };

        self.transition(SessionState::Ready)?;
        Ok(outcome)
    }

    fn apply_fragment(&mut self, fragment: &str) {
        match self.transcript.push_fragment(fragment) {
            Some(FragmentPlacement::Opened(index)) => {
                let turn = self.transcript.turns()[index].clone();
                self.emit(SessionEvent::TurnAppended { index, turn });
            }
            Some(FragmentPlacement::Extended(index)) => self.emit(SessionEvent::TurnExtended {
                index,
                delta: fragment.to_string(),
            }),
            None => {}
        }
    }

    fn append(&mut self, turn: Turn) {
        let index = self.transcript.push(turn.clone());
        self.emit(SessionEvent::TurnAppended { index, turn });
    }

    fn set_progress(&mut self, progress: String) -> Result<(), SessionError> {
        self.transition(SessionState::Initializing { progress })
    }

    fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(&next) {
            return Err(SessionError::IllegalTransition {
                from: self.state.clone(),
                to: next,
            });
        }
        self.state = next;
        self.emit(SessionEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is rendering.
            let _ = tx.send(event);
        }
    }
}
