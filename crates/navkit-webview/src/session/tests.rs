use std::sync::{Arc, Mutex};
use std::time::Duration;

use navkit_common::{SearchEngine, WebViewError};
use navkit_config::NavkitConfig;
use url::Url;

use super::*;
use crate::adapter::FoldOutcome;
use crate::bridge::{DispatchOutcome, JavaScriptMessage, MessageBody};
use crate::decision::NavigationPolicy;
use crate::events::{
    event_channel, FrameInfo, NavigationEnvelope, NavigationEvent, NavigationToken,
};
use crate::renderer::{RecordingRenderer, RendererCommand};

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn controller() -> SessionController<RecordingRenderer> {
    SessionController::new(RecordingRenderer::new(), NavigationPolicy::default())
}

fn blocking(domains: &[&str]) -> SessionController<RecordingRenderer> {
    let policy = NavigationPolicy::new(domains.iter().map(|d| d.to_string()).collect());
    SessionController::new(RecordingRenderer::new(), policy)
}

/// Drive a load to completion the way a renderer would report it.
fn complete(
    session: &mut SessionController<RecordingRenderer>,
    token: NavigationToken,
    to: &str,
    title: &str,
) {
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started { url: url(to) },
    ));
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Finished {
            url: url(to),
            title: title.into(),
            can_go_back: false,
            can_go_forward: false,
        },
    ));
}

// -- navigate --

#[test]
fn navigate_issues_token_and_loads() {
    let mut session = controller();
    let token = session.navigate("apple.com").unwrap();

    assert_eq!(token, NavigationToken::new(1));
    assert_eq!(session.current_token(), token);
    assert_eq!(session.history(), [url("https://apple.com")]);
    assert_eq!(
        session.renderer().commands(),
        vec![RendererCommand::Load {
            url: url("https://apple.com"),
            token
        }]
    );
    // The state waits for lifecycle events.
    assert!(!session.state().is_loading());
    assert!(session.state().current_url().is_none());
}

#[test]
fn history_collapses_adjacent_repeats_only() {
    let mut session = controller();
    session.navigate("a.com").unwrap();
    session.navigate("a.com").unwrap();
    assert_eq!(session.history().len(), 1);

    session.navigate("b.com").unwrap();
    session.navigate("a.com").unwrap();
    assert_eq!(
        session.history(),
        [url("https://a.com"), url("https://b.com"), url("https://a.com")]
    );
}

#[test]
fn invalid_input_sets_error_and_leaves_history() {
    let mut session = controller();
    session.navigate("a.com").unwrap();

    assert_eq!(session.navigate(""), Err(WebViewError::InvalidUrl));
    assert_eq!(session.state().last_error(), Some(&WebViewError::InvalidUrl));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.renderer().commands().len(), 1);
}

#[test]
fn invalid_input_during_load_settles_state() {
    let mut session = controller();
    let token = session.navigate("a.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));

    assert!(session.navigate("").is_err());
    assert!(!session.state().is_loading());
    assert!(session.state().is_consistent());
}

#[test]
fn blocked_url_is_rejected() {
    let mut session = blocking(&["blocked.com"]);

    for target in ["blocked.com", "www.blocked.com", "https://sub.blocked.com/x"] {
        assert_eq!(session.navigate(target), Err(WebViewError::ContentBlocked));
    }
    assert_eq!(
        session.state().last_error(),
        Some(&WebViewError::ContentBlocked)
    );
    assert!(session.history().is_empty());
    assert!(session.renderer().commands().is_empty());

    assert!(session.navigate("apple.com").is_ok());
}

#[test]
fn navigate_input_searches_free_text() {
    let mut session = controller().with_search_engine(SearchEngine::DuckDuckGo);
    session.navigate_input("rust webview").unwrap();
    assert_eq!(
        session.renderer().last_loaded(),
        Some(url("https://duckduckgo.com/?q=rust%20webview"))
    );

    session.navigate_input("apple.com").unwrap();
    assert_eq!(session.renderer().last_loaded(), Some(url("https://apple.com")));

    assert_eq!(session.navigate_input("   "), Err(WebViewError::InvalidUrl));
}

// -- renderer events --

#[test]
fn lifecycle_events_update_state() {
    let mut session = controller();
    let token = session.navigate("a.com").unwrap();
    complete(&mut session, token, "https://a.com", "A");

    let state = session.state();
    assert_eq!(state.current_url(), Some(&url("https://a.com")));
    assert_eq!(state.title(), "A");
    assert_eq!(state.loading_progress(), 1.0);
}

#[test]
fn stale_finish_does_not_regress_newer_load() {
    let mut session = controller();
    let a = session.navigate("a.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        a,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));
    let b = session.navigate("b.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        b,
        NavigationEvent::Started {
            url: url("https://b.com"),
        },
    ));

    let outcome = session.handle_event(&NavigationEnvelope::main(
        a,
        NavigationEvent::Finished {
            url: url("https://a.com"),
            title: "A".into(),
            can_go_back: false,
            can_go_forward: false,
        },
    ));

    assert!(matches!(outcome, FoldOutcome::Stale { .. }));
    assert!(session.state().is_loading());
    assert_ne!(session.state().current_url(), Some(&url("https://a.com")));
}

#[test]
fn drain_events_applies_queued_events() {
    let mut session = controller();
    let token = session.navigate("a.com").unwrap();
    let (tx, mut rx) = event_channel();
    tx.send(NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ))
    .unwrap();
    tx.send(NavigationEnvelope::main(
        NavigationToken::INITIAL,
        NavigationEvent::Progress { progress: 0.9 },
    ))
    .unwrap();
    tx.send(NavigationEnvelope::main(
        token,
        NavigationEvent::Progress { progress: 0.5 },
    ))
    .unwrap();

    assert_eq!(session.drain_events(&mut rx), 2);
    assert_eq!(session.state().loading_progress(), 0.5);
    assert_eq!(session.drain_events(&mut rx), 0);
}

// -- renderer commands --

#[test]
fn back_forward_follow_state_flags() {
    let mut session = controller();
    assert_eq!(session.go_back(), Ok(None));
    assert_eq!(session.go_forward(), Ok(None));
    assert_eq!(session.reload(), Ok(None));

    let token = session.navigate("a.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Finished {
            url: url("https://a.com"),
            title: "A".into(),
            can_go_back: true,
            can_go_forward: false,
        },
    ));

    let back = session.go_back().unwrap().unwrap();
    assert!(back > token);
    assert_eq!(session.go_forward(), Ok(None));
    let reload = session.reload().unwrap().unwrap();
    assert!(reload > back);
    assert_eq!(
        session.renderer().commands()[1..],
        [
            RendererCommand::GoBack { token: back },
            RendererCommand::Reload { token: reload }
        ]
    );
}

#[test]
fn stop_loading_settles_and_supersedes() {
    let mut session = controller();
    let token = session.navigate("a.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));

    let stop = session.stop_loading().unwrap();
    assert!(stop > token);
    assert!(!session.state().is_loading());
    assert_eq!(session.state().loading_progress(), 0.0);

    let late = session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Finished {
            url: url("https://a.com"),
            title: "A".into(),
            can_go_back: false,
            can_go_forward: false,
        },
    ));
    assert!(matches!(late, FoldOutcome::Stale { .. }));
    assert_eq!(
        session.renderer().commands().last(),
        Some(&RendererCommand::StopLoading { token: stop })
    );
}

#[test]
fn page_events_after_stop_are_accepted() {
    let mut session = controller();
    let token = session.navigate("a.com").unwrap();
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));
    let stop = session.stop_loading().unwrap();
    assert_eq!(session.current_token(), stop);

    // A link clicked in the stopped page is stamped by the renderer with
    // the stop token, not the superseded navigation's.
    let started = session.handle_event(&NavigationEnvelope::main(
        stop,
        NavigationEvent::Started {
            url: url("https://a.com/next"),
        },
    ));
    assert_eq!(started, FoldOutcome::Applied);
    let finished = session.handle_event(&NavigationEnvelope::main(
        stop,
        NavigationEvent::Finished {
            url: url("https://a.com/next"),
            title: "Next".into(),
            can_go_back: true,
            can_go_forward: false,
        },
    ));
    assert_eq!(finished, FoldOutcome::Applied);
    assert_eq!(
        session.state().current_url().map(Url::as_str),
        Some("https://a.com/next")
    );
}

#[test]
fn stop_while_idle_still_hands_the_renderer_a_token() {
    let mut session = controller();
    let before = session.state().clone();
    let stop = session.stop_loading().unwrap();

    assert_eq!(session.state(), &before);
    assert_eq!(
        session.renderer().commands(),
        vec![RendererCommand::StopLoading { token: stop }]
    );
}

#[test]
fn load_html_skips_history() {
    let mut session = controller();
    let base = url("https://example.com/");
    let token = session.load_html("<h1>Hi</h1>", Some(&base)).unwrap();

    assert!(session.history().is_empty());
    assert_eq!(
        session.renderer().commands(),
        vec![RendererCommand::LoadHtml {
            html: "<h1>Hi</h1>".into(),
            base_url: Some(base),
            token
        }]
    );
}

// -- bookmarks --

#[test]
fn add_bookmark_needs_a_page() {
    let mut session = controller();
    assert_eq!(session.add_bookmark(), None);
    assert!(session.bookmarks().is_empty());
}

#[test]
fn bookmarks_are_unique_by_url() {
    let mut session = controller();
    let token = session.navigate("apple.com").unwrap();
    complete(&mut session, token, "https://apple.com", "Apple");

    let id = session.add_bookmark().unwrap();
    assert_eq!(session.add_bookmark(), None);
    assert_eq!(session.bookmarks().len(), 1);
    assert_eq!(session.bookmarks()[0].title, "Apple");

    assert!(session.remove_bookmark(&id));
    assert!(!session.remove_bookmark(&id));
    assert!(session.bookmarks().is_empty());
}

#[test]
fn bookmark_title_falls_back_to_host() {
    let mut session = controller();
    let token = session.navigate("www.example.com").unwrap();
    complete(&mut session, token, "https://www.example.com", "");

    session.add_bookmark().unwrap();
    assert_eq!(session.bookmarks()[0].title, "www.example.com");
}

#[test]
fn clear_history_empties() {
    let mut session = controller();
    session.navigate("a.com").unwrap();
    session.navigate("b.com").unwrap();
    session.clear_history();
    assert!(session.history().is_empty());
}

// -- observers --

#[test]
fn observers_receive_session_events() {
    let mut session = controller();
    let mut rx = session.subscribe();

    let token = session.navigate("a.com").unwrap();
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::HistoryChanged { len: 1 });

    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));
    match rx.try_recv().unwrap() {
        SessionEvent::StateChanged(state) => assert!(state.is_loading()),
        other => panic!("unexpected event: {other:?}"),
    }

    // Unchanged state publishes nothing.
    session.handle_event(&NavigationEnvelope::main(
        token,
        NavigationEvent::Started {
            url: url("https://a.com"),
        },
    ));
    assert!(rx.try_recv().is_err());
}

// -- configuration --

#[test]
fn from_config_applies_browser_and_scripting() {
    let mut config = NavkitConfig::default();
    config.browser.search_engine = SearchEngine::Bing;
    config.browser.blocked_domains = vec!["ads.example".into()];
    config.scripting.evaluation_timeout_ms = 250;

    let mut session = SessionController::from_config(RecordingRenderer::new(), &config);
    assert_eq!(session.search_engine(), SearchEngine::Bing);
    assert_eq!(session.script_timeout(), Duration::from_millis(250));
    assert_eq!(
        session.navigate("https://ads.example/banner"),
        Err(WebViewError::ContentBlocked)
    );
}

#[test]
fn open_home_loads_configured_home_page() {
    let mut config = NavkitConfig::default();
    config.browser.home_page = "https://example.org/start".into();

    let mut session = SessionController::from_config(RecordingRenderer::new(), &config);
    assert_eq!(session.home_page(), Some("https://example.org/start"));

    let token = session.open_home().unwrap();
    assert_eq!(token, Some(session.current_token()));
    assert_eq!(
        session.renderer().last_loaded(),
        Some(url("https://example.org/start"))
    );
    assert_eq!(session.history(), [url("https://example.org/start")]);
}

#[test]
fn open_home_without_home_page_does_nothing() {
    let mut session = controller();
    assert_eq!(session.open_home(), Ok(None));
    assert!(session.renderer().commands().is_empty());
}

#[test]
fn blocked_home_page_is_rejected() {
    let mut config = NavkitConfig::default();
    config.browser.home_page = "https://ads.example/".into();
    config.browser.blocked_domains = vec!["ads.example".into()];

    let mut session = SessionController::from_config(RecordingRenderer::new(), &config);
    assert_eq!(session.open_home(), Err(WebViewError::ContentBlocked));
    assert!(session.history().is_empty());
}

// -- JavaScript --

#[tokio::test]
async fn evaluate_javascript_returns_result() {
    let renderer = RecordingRenderer::new()
        .with_script_result("document.title", MessageBody::Text("Demo".into()));
    let session = SessionController::new(renderer, NavigationPolicy::default());

    assert_eq!(
        session.evaluate_javascript("document.title").await,
        Ok(MessageBody::Text("Demo".into()))
    );
}

#[tokio::test]
async fn evaluate_javascript_times_out() {
    let renderer = RecordingRenderer::new().with_script_delay(Duration::from_secs(30));
    let session = SessionController::new(renderer, NavigationPolicy::default())
        .with_script_timeout(Duration::from_millis(20));

    assert_eq!(
        session.evaluate_javascript("while (true) {}").await,
        Err(WebViewError::Timeout)
    );
}

#[tokio::test]
async fn post_message_evaluates_dispatch_call() {
    let session = controller();
    session
        .post_message("greet", &serde_json::json!({"text": "hi"}))
        .await
        .unwrap();
    assert_eq!(
        session.renderer().commands(),
        vec![RendererCommand::EvaluateJavaScript {
            script: r#"window.navkit._dispatch("greet", {"text":"hi"});"#.into()
        }]
    );
}

#[test]
fn message_handlers_register_once_with_renderer() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut session = controller();

    session
        .register_message_handler(
            "nativeHandler",
            Box::new(move |msg: &JavaScriptMessage| sink.lock().unwrap().push(msg.name.clone())),
        )
        .unwrap();
    session
        .register_message_handler("nativeHandler", Box::new(|_: &JavaScriptMessage| {}))
        .unwrap();

    assert_eq!(
        session.renderer().commands(),
        vec![RendererCommand::RegisterMessageHandler {
            name: "nativeHandler".into()
        }]
    );

    // The replacement handler receives the message, not the first one.
    let outcome = session.dispatch_message(
        r#"{"name":"nativeHandler","body":{"action":"buttonClicked"}}"#,
        FrameInfo::main(),
    );
    assert!(matches!(outcome, DispatchOutcome::Delivered(_)));
    assert!(seen.lock().unwrap().is_empty());
}
