// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backend::OpenAiCompatLoader;
use crate::config::ChatConfig;
use crate::extraction::{ContentFetcher, ExtractionConfig};
use crate::session::{
    ChatSession, InitOutcome, ProxyClient, Role, SessionEvent, SessionState, UrlFetcher,
};

const QUIT_COMMAND: &str = "/quit";

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Base URL of an OpenAI-compatible completion server
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Model identifier to request
    #[arg(long, env = "MODEL_ID")]
    pub model: Option<String>,

    /// Base URL of the extraction service
    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Fetch URLs in-process instead of through the extraction service
    #[arg(long)]
    pub local_fetch: bool,
}

impl ChatArgs {
    pub fn apply(&self, mut config: ChatConfig) -> ChatConfig {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model_id = model.clone();
        }
        if let Some(url) = &self.proxy_url {
            config.proxy_url = url.clone();
        }
        config
    }
}

pub async fn run(args: ChatArgs) -> Result<()> {
    let config = args.apply(ChatConfig::from_env());
    config.validate().map_err(|e| anyhow!("Invalid chat configuration: {}", e))?;

    let fetcher: Arc<dyn UrlFetcher> = if args.local_fetch {
        Arc::new(ContentFetcher::new(ExtractionConfig::from_env())?)
    } else {
        Arc::new(ProxyClient::new(&config.proxy_url)?)
    };

    let mut session = ChatSession::new(&config, fetcher);
    let events = session.subscribe();
    let printer = tokio::spawn(render_events(events));

    for turn in session.transcript().visible() {
        println!("{}", format_turn(turn.role, &turn.content));
    }

    let teardown = CancellationToken::new();
    let on_interrupt = teardown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let loader = OpenAiCompatLoader::new(config.clone());
    match session.initialize(&loader, &teardown).await {
        Ok(InitOutcome::Ready) => info!("Chat session {} started", session.id()),
        Ok(InitOutcome::Cancelled) => return Ok(()),
        Err(e) => {
            eprintln!("[{}]", session.status_text());
            return Err(e.into());
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = teardown.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim() == QUIT_COMMAND {
            break;
        }

        if let Err(e) = session.submit(&line).await {
            warn!("Submission rejected: {}", e);
            eprintln!("{}", e);
            prompt();
        }
    }

    drop(session);
    let _ = printer.await;
    Ok(())
}

fn format_turn(role: Role, content: &str) -> String {
    match role {
        Role::Assistant => format!("assistant> {}", content),
        Role::User => format!("you> {}", content),
        Role::System => String::new(),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn render_events(mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    let mut streaming = false;
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::StateChanged(SessionState::Initializing { progress }) => {
                println!("[{}]", progress);
            }
            SessionEvent::StateChanged(SessionState::Ready) => {
                if streaming {
                    println!();
                    streaming = false;
                }
                prompt();
            }
            SessionEvent::StateChanged(state) => println!("[{}]", state.describe()),
            // The user already sees what they typed; system turns stay hidden.
            SessionEvent::TurnAppended { turn, .. } if turn.role != Role::Assistant => {}
            SessionEvent::TurnAppended { turn, .. } => {
                if streaming {
                    println!();
                }
                print!("{}", format_turn(turn.role, &turn.content));
                streaming = true;
            }
            SessionEvent::TurnExtended { delta, .. } => print!("{}", delta),
        }
        let _ = std::io::stdout().flush();
    }
}
