// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ChatSession end to end: extraction service, proxy client and a local
//! OpenAI-compatible model server.

use agentic_assistant::backend::OpenAiCompatLoader;
use agentic_assistant::config::ChatConfig;
use agentic_assistant::session::{
    ChatSession, InitOutcome, ProxyClient, Role, SessionError, SessionEvent, SessionState,
    SubmitOutcome, Turn, INVALID_URL_MESSAGE,
};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

use crate::support::{
    spawn_extraction_service, spawn_failing_model_server, spawn_model_server, spawn_upstream,
    SAMPLE_HTML_TEXT,
};

async fn ready_session(backend_url: String, proxy_url: String) -> ChatSession {
    let config = ChatConfig {
        backend_url,
        proxy_url,
        ..Default::default()
    };
    let fetcher = Arc::new(ProxyClient::new(&config.proxy_url).unwrap());
    let mut session = ChatSession::new(&config, fetcher);

    let loader = OpenAiCompatLoader::new(config.clone());
    let outcome = assert_ok!(session.initialize(&loader, &CancellationToken::new()).await);
    assert_eq!(outcome, InitOutcome::Ready);
    session
}

#[tokio::test]
async fn test_new_session_is_seeded() {
    let (model, _) = spawn_model_server("phi3:mini", &[]).await;
    let session = ready_session(model, "http://127.0.0.1:9".to_string()).await;

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::System);
    assert_eq!(turns[1].role, Role::Assistant);

    let visible: Vec<_> = session.transcript().visible().collect();
    assert_eq!(visible.len(), 1);
    assert_eq!(session.status_text(), "Ready.");
}

#[tokio::test]
async fn test_fetch_then_generate_carries_page_into_context() {
    let upstream = spawn_upstream().await;
    let proxy = spawn_extraction_service().await;
    let (model, recorded) = spawn_model_server("phi3:mini", &["Bon", "jour"]).await;
    let mut session = ready_session(model, proxy).await;

    let page = format!("{}/page.html", upstream);
    let fetched = assert_ok!(session.submit(&format!("/fetch {}", page)).await);
    assert_eq!(
        fetched,
        SubmitOutcome::Fetched {
            url: page.clone(),
            chars: SAMPLE_HTML_TEXT.chars().count()
        }
    );

    let completed = assert_ok!(session.submit("Summarize it").await);
    assert_eq!(completed, SubmitOutcome::Completed { chars: 7 });

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 6);
    assert_eq!(turns[2], Turn::user(format!("/fetch {}", page)));
    assert_eq!(
        turns[3],
        Turn::system(format!(
            "Content fetched from {} (truncated):\n\n{}",
            page, SAMPLE_HTML_TEXT
        ))
    );
    assert_eq!(turns[4], Turn::user("Summarize it"));
    assert_eq!(turns[5], Turn::assistant("Bonjour"));

    // The model saw the whole transcript, system turns included.
    let requests = recorded.lock().unwrap();
    let messages = requests[0]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[3]["role"], "system");
    assert!(messages[3]["content"].as_str().unwrap().contains(SAMPLE_HTML_TEXT));
    assert!((requests[0]["temperature"].as_f64().unwrap() - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn test_invalid_fetch_url_adds_one_turn() {
    let (model, _) = spawn_model_server("phi3:mini", &[]).await;
    // Nothing listens on the proxy address; a network call would fail loudly.
    let mut session = ready_session(model, "http://127.0.0.1:9".to_string()).await;

    let outcome = assert_ok!(session.submit("/fetch not-a-url").await);
    assert_eq!(outcome, SubmitOutcome::InvalidUrl);
    assert_eq!(session.transcript().len(), 3);
    assert_eq!(
        session.transcript().last(),
        Some(&Turn::assistant(INVALID_URL_MESSAGE))
    );
}

#[tokio::test]
async fn test_upstream_error_is_shown_as_assistant_turn() {
    let upstream = spawn_upstream().await;
    let proxy = spawn_extraction_service().await;
    let (model, _) = spawn_model_server("phi3:mini", &[]).await;
    let mut session = ready_session(model, proxy).await;

    assert_ok!(session.submit(&format!("/fetch {}/missing", upstream)).await);
    assert_eq!(
        session.transcript().last(),
        Some(&Turn::assistant("Fetch error: Upstream 404"))
    );
    assert!(session.can_submit());
}

#[tokio::test]
async fn test_unreachable_proxy_is_fetch_failure() {
    let (model, _) = spawn_model_server("phi3:mini", &[]).await;
    let mut session = ready_session(model, "http://127.0.0.1:9".to_string()).await;

    let outcome = assert_ok!(session.submit("/fetch https://example.com").await);
    assert!(matches!(outcome, SubmitOutcome::FetchFailed(_)));

    let last = session.transcript().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.starts_with("Fetch failed: "));
    assert_eq!(session.transcript().len(), 3);
}

#[tokio::test]
async fn test_generation_failure_returns_to_ready() {
    let model = spawn_failing_model_server("phi3:mini").await;
    let mut session = ready_session(model, "http://127.0.0.1:9".to_string()).await;

    let outcome = assert_ok!(session.submit("hello").await);
    assert!(matches!(outcome, SubmitOutcome::GenerationFailed(_)));

    let last = session.transcript().last().unwrap();
    assert!(last.content.starts_with("Generation error: "));
    assert!(last.content.contains("503"));
    assert_eq!(session.state(), &SessionState::Ready);
}

#[tokio::test]
async fn test_events_follow_the_stream() {
    let (model, _) = spawn_model_server("phi3:mini", &["Bon", "jour"]).await;
    let mut session = ready_session(model, "http://127.0.0.1:9".to_string()).await;
    let mut events = session.subscribe();

    assert_ok!(session.submit("Say hi").await);
    drop(session);

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            SessionEvent::TurnAppended {
                index: 2,
                turn: Turn::user("Say hi")
            },
            SessionEvent::StateChanged(SessionState::Generating),
            SessionEvent::TurnAppended {
                index: 3,
                turn: Turn::assistant("Bon")
            },
            SessionEvent::TurnExtended {
                index: 3,
                delta: "jour".to_string()
            },
            SessionEvent::StateChanged(SessionState::Ready),
        ]
    );
}

#[tokio::test]
async fn test_failed_load_stays_initializing() {
    let (model, _) = spawn_model_server("llama3:8b", &[]).await;
    let config = ChatConfig {
        backend_url: model,
        ..Default::default()
    };
    let fetcher = Arc::new(ProxyClient::new(&config.proxy_url).unwrap());
    let mut session = ChatSession::new(&config, fetcher);

    let loader = OpenAiCompatLoader::new(config.clone());
    let error = assert_err!(session.initialize(&loader, &CancellationToken::new()).await);
    assert!(matches!(error, SessionError::Backend(_)));

    assert!(session.status_text().starts_with("Failed to load model: "));
    assert!(!session.can_submit());
    assert!(matches!(
        assert_err!(session.submit("hello").await),
        SessionError::NotReady(_)
    ));
}

#[tokio::test]
async fn test_torn_down_session_discards_backend() {
    let (model, _) = spawn_model_server("phi3:mini", &[]).await;
    let config = ChatConfig {
        backend_url: model,
        ..Default::default()
    };
    let fetcher = Arc::new(ProxyClient::new(&config.proxy_url).unwrap());
    let mut session = ChatSession::new(&config, fetcher);

    let teardown = CancellationToken::new();
    teardown.cancel();

    let loader = OpenAiCompatLoader::new(config.clone());
    let outcome = assert_ok!(session.initialize(&loader, &teardown).await);
    assert_eq!(outcome, InitOutcome::Cancelled);
    assert!(matches!(session.state(), SessionState::Initializing { .. }));
    assert!(!session.can_submit());
}
