use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::StatusCode;
use readme_gen::config::SuggestionConfig;
use readme_gen::engine::{EngineHandle, Request, SessionEngine};
use readme_gen::form::{GENERIC_FAILURE, ViewState};
use readme_gen::service::{Backend, ServiceError};
use readme_gen::types::{FormInput, PrNumber, RepoKey};

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Search(String),
    ListPrs(String),
    Generate(String, u64),
}

type GenerateResult = Result<String, (StatusCode, Option<String>)>;

#[derive(Default)]
struct Script {
    repos: HashMap<String, Vec<String>>,
    repo_delays: HashMap<String, Duration>,
    prs: HashMap<String, Vec<String>>,
    pr_delays: HashMap<String, Duration>,
    generate: Option<GenerateResult>,
    generate_delay: Duration,
}

#[derive(Clone, Default)]
struct ScriptedBackend {
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for ScriptedBackend {
    async fn search_repos(&self, query: &str) -> Result<Vec<String>, ServiceError> {
        self.record(Call::Search(query.to_owned()));
        if let Some(delay) = self.script.repo_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        match self.script.repos.get(query) {
            Some(items) => Ok(items.clone()),
            None => Err(ServiceError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                detail: None,
            }),
        }
    }

    async fn list_prs(&self, repo: &RepoKey) -> Result<Vec<String>, ServiceError> {
        self.record(Call::ListPrs(repo.full_name()));
        if let Some(delay) = self.script.pr_delays.get(&repo.full_name()) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self
            .script
            .prs
            .get(&repo.full_name())
            .cloned()
            .unwrap_or_default())
    }

    async fn generate(&self, repo_url: &str, pr_number: PrNumber) -> Result<String, ServiceError> {
        self.record(Call::Generate(repo_url.to_owned(), pr_number.get()));
        tokio::time::sleep(self.script.generate_delay).await;
        match self.script.generate.clone() {
            Some(Ok(artifact)) => Ok(artifact),
            Some(Err((status, detail))) => Err(ServiceError::Status { status, detail }),
            None => Err(ServiceError::Decode("no script".to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn start(backend: &ScriptedBackend) -> EngineHandle {
    SessionEngine::new(backend.clone(), SuggestionConfig::default()).spawn()
}

/// Let the engine drain its queues. Time is paused, so this also fires any
/// debounce timer and scripted delay that falls inside the window.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}

async fn wait_for(handle: &EngineHandle, pred: impl FnMut(&ViewState) -> bool) -> ViewState {
    let mut rx = handle.subscribe();
    let view = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(pred))
        .await
        .expect("view never reached the expected state")
        .expect("engine stopped");
    view.clone()
}

fn type_repo(handle: &EngineHandle, text: &str) {
    handle.send(Request::SetRepoInput(text.to_owned()));
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn short_queries_issue_no_search() {
    let backend = ScriptedBackend::default();
    let handle = start(&backend);

    for text in ["o", "oc"] {
        type_repo(&handle, text);
        settle().await;
    }

    assert!(backend.calls().is_empty(), "got {:?}", backend.calls());
    assert!(handle.state().repo_suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn burst_issues_single_search_for_final_value() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([("octo".to_owned(), strings(&["octocat/Hello-World"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    for text in ["o", "oc", "oct", "octo"] {
        type_repo(&handle, text);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    settle().await;

    assert_eq!(backend.calls(), [Call::Search("octo".to_owned())]);
    assert_eq!(handle.state().repo_suggestions, ["octocat/Hello-World"]);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_one() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([
            ("oct".to_owned(), strings(&["octave/octave"])),
            ("octo".to_owned(), strings(&["octocat/Hello-World"])),
        ]),
        repo_delays: HashMap::from([
            ("oct".to_owned(), Duration::from_millis(1000)),
            ("octo".to_owned(), Duration::from_millis(10)),
        ]),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "oct");
    // Past the debounce delay: the slow "oct" search is now in flight.
    tokio::time::sleep(Duration::from_millis(400)).await;
    type_repo(&handle, "octo");

    let view = wait_for(&handle, |v| !v.repo_suggestions.is_empty()).await;
    assert_eq!(view.repo_suggestions, ["octocat/Hello-World"]);

    settle().await;
    assert_eq!(
        backend.calls(),
        [Call::Search("oct".to_owned()), Call::Search("octo".to_owned())]
    );
    assert_eq!(handle.state().repo_suggestions, ["octocat/Hello-World"]);
    assert!(!handle.state().repo_loading);
}

#[tokio::test(start_paused = true)]
async fn failed_search_keeps_previous_suggestions() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([("octo".to_owned(), strings(&["octocat/Hello-World"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "octo");
    settle().await;
    // No script entry: the backend fails this one.
    type_repo(&handle, "octox");
    settle().await;

    let view = handle.state();
    assert_eq!(view.repo_suggestions, ["octocat/Hello-World"]);
    assert_eq!(view.error, None, "lookup failures are not surfaced");
}

#[tokio::test(start_paused = true)]
async fn clearing_the_field_drops_both_lists_immediately() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([("foo/bar".to_owned(), strings(&["foo/bar"]))]),
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["1", "2"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    settle().await;
    assert_eq!(handle.state().pr_suggestions, ["1", "2"]);

    type_repo(&handle, "");
    tokio::time::sleep(Duration::from_millis(1)).await;
    let view = handle.state();
    assert!(view.repo_suggestions.is_empty());
    assert!(view.pr_suggestions.is_empty());
}

// ---------------------------------------------------------------------------
// Dependent PR lookup
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn pr_lookup_fires_for_owner_repo_only() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["3", "4"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    settle().await;
    assert!(backend.calls().contains(&Call::ListPrs("foo/bar".to_owned())));
    assert_eq!(handle.state().pr_suggestions, ["3", "4"]);

    for text in ["foo", "foo/"] {
        type_repo(&handle, "foo/bar");
        settle().await;
        type_repo(&handle, text);
        settle().await;
        assert!(
            handle.state().pr_suggestions.is_empty(),
            "{text:?} must clear PR suggestions"
        );
    }

    let pr_calls = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::ListPrs(_)))
        .count();
    // The second "foo/bar" in the first round is unchanged; only the one
    // following a clear fires again.
    assert_eq!(pr_calls, 2);
}

#[tokio::test(start_paused = true)]
async fn slow_pr_list_for_previous_repo_is_discarded() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([
            ("foo/bar".to_owned(), strings(&["1", "2"])),
            ("foo/baz".to_owned(), strings(&["9"])),
        ]),
        pr_delays: HashMap::from([
            ("foo/bar".to_owned(), Duration::from_millis(1000)),
            ("foo/baz".to_owned(), Duration::from_millis(10)),
        ]),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    // Past the debounce delay: the slow "foo/bar" PR lookup is in flight.
    tokio::time::sleep(Duration::from_millis(400)).await;
    type_repo(&handle, "foo/baz");

    let view = wait_for(&handle, |v| !v.pr_suggestions.is_empty()).await;
    assert_eq!(view.pr_suggestions, ["9"]);

    settle().await;
    let pr_calls: Vec<Call> = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::ListPrs(_)))
        .collect();
    assert_eq!(
        pr_calls,
        [
            Call::ListPrs("foo/bar".to_owned()),
            Call::ListPrs("foo/baz".to_owned())
        ]
    );
    assert_eq!(handle.state().pr_suggestions, ["9"]);
    assert!(!handle.state().pr_loading);
}

#[tokio::test(start_paused = true)]
async fn typing_past_repo_name_does_not_refire() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["3"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    for text in ["foo/bar", "foo/bar/", "foo/bar/x"] {
        type_repo(&handle, text);
        settle().await;
    }

    let pr_calls: Vec<Call> = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::ListPrs(_)))
        .collect();
    assert_eq!(pr_calls, [Call::ListPrs("foo/bar".to_owned())]);
    assert_eq!(handle.state().pr_suggestions, ["3"]);
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn submit_is_a_no_op_without_valid_input() {
    let backend = ScriptedBackend::default();
    let handle = start(&backend);

    handle.send(Request::Submit);
    handle.send(Request::SetPrInput("5".to_owned()));
    handle.send(Request::Submit);
    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("0".to_owned()));
    handle.send(Request::Submit);
    settle().await;

    let view = handle.state();
    assert!(!view.loading);
    assert!(!view.can_submit);
    assert_eq!(view.error, None);
    assert!(
        !backend.calls().iter().any(|c| matches!(c, Call::Generate(..))),
        "no generate call expected"
    );
}

#[tokio::test(start_paused = true)]
async fn octocat_end_to_end() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([("octo".to_owned(), strings(&["octocat/Hello-World"]))]),
        prs: HashMap::from([("octocat/Hello-World".to_owned(), strings(&["5"]))]),
        generate: Some(Ok("# Hello".to_owned())),
        generate_delay: Duration::from_millis(500),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "octo");
    let view = wait_for(&handle, |v| !v.repo_suggestions.is_empty()).await;
    assert_eq!(view.repo_suggestions, ["octocat/Hello-World"]);
    assert_eq!(backend.calls(), [Call::Search("octo".to_owned())]);

    handle.send(Request::SelectRepoSuggestion(view.repo_suggestions[0].clone()));
    let view = wait_for(&handle, |v| !v.pr_suggestions.is_empty()).await;
    assert_eq!(view.repo_input, "octocat/Hello-World");
    assert_eq!(view.pr_suggestions, ["5"]);

    handle.send(Request::SetPrInput("5".to_owned()));
    handle.send(Request::Submit);
    let view = wait_for(&handle, |v| v.loading).await;
    assert_eq!(view.button_label, "Generating...");
    assert!(!view.can_submit);

    let view = wait_for(&handle, |v| !v.loading).await;
    assert_eq!(view.artifact.as_deref(), Some("# Hello"));
    assert_eq!(view.error, None);
    assert_eq!(view.button_label, "Generate Updated README");
    assert!(backend
        .calls()
        .contains(&Call::Generate("octocat/Hello-World".to_owned(), 5)));
}

#[tokio::test(start_paused = true)]
async fn resubmit_while_pending_sends_one_request() {
    let backend = ScriptedBackend::new(Script {
        generate: Some(Ok("done".to_owned())),
        generate_delay: Duration::from_secs(2),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("1".to_owned()));
    handle.send(Request::Submit);
    handle.send(Request::Submit);
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.send(Request::Submit);
    settle().await;

    let generates = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Generate(..)))
        .count();
    assert_eq!(generates, 1);
    assert_eq!(handle.state().artifact.as_deref(), Some("done"));
}

#[tokio::test(start_paused = true)]
async fn failure_surfaces_service_detail() {
    let backend = ScriptedBackend::new(Script {
        generate: Some(Err((
            StatusCode::NOT_FOUND,
            Some("Pull request not found".to_owned()),
        ))),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("9".to_owned()));
    handle.send(Request::Submit);

    let view = wait_for(&handle, |v| v.error.is_some()).await;
    assert_eq!(view.error.as_deref(), Some("Pull request not found"));
    assert_eq!(view.artifact, None);
    assert!(view.can_reset);
}

#[tokio::test(start_paused = true)]
async fn failure_without_detail_uses_generic_message() {
    let backend = ScriptedBackend::new(Script {
        generate: Some(Err((StatusCode::INTERNAL_SERVER_ERROR, None))),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("9".to_owned()));
    handle.send(Request::Submit);

    let view = wait_for(&handle, |v| v.error.is_some()).await;
    assert_eq!(view.error.as_deref(), Some(GENERIC_FAILURE));
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_empty_idle_form() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["1"]))]),
        generate: Some(Ok("# Foo".to_owned())),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("1".to_owned()));
    settle().await;
    handle.send(Request::Submit);
    wait_for(&handle, |v| v.artifact.is_some()).await;

    handle.send(Request::Reset);
    let view = wait_for(&handle, |v| v.artifact.is_none()).await;
    assert_eq!(view.repo_input, "");
    assert_eq!(view.pr_input, "");
    assert_eq!(view.error, None);
    assert!(view.pr_suggestions.is_empty());
    assert!(!view.can_reset);
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn reset_after_failure_returns_to_empty_idle_form() {
    let backend = ScriptedBackend::new(Script {
        repos: HashMap::from([("foo/bar".to_owned(), strings(&["foo/bar"]))]),
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["1"]))]),
        generate: Some(Err((
            StatusCode::NOT_FOUND,
            Some("Pull request not found".to_owned()),
        ))),
        ..Script::default()
    });
    let handle = start(&backend);

    type_repo(&handle, "foo/bar");
    handle.send(Request::SetPrInput("1".to_owned()));
    settle().await;
    assert_eq!(handle.state().repo_suggestions, ["foo/bar"]);
    assert_eq!(handle.state().pr_suggestions, ["1"]);

    handle.send(Request::Submit);
    let view = wait_for(&handle, |v| v.error.is_some()).await;
    assert!(view.can_reset);

    handle.send(Request::Reset);
    let view = wait_for(&handle, |v| v.error.is_none()).await;
    assert_eq!(view.repo_input, "");
    assert_eq!(view.pr_input, "");
    assert_eq!(view.artifact, None);
    assert!(view.repo_suggestions.is_empty());
    assert!(view.pr_suggestions.is_empty());
    assert!(!view.can_reset);
    assert!(!view.can_submit);
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn initial_input_is_looked_up() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["11"]))]),
        ..Script::default()
    });
    let handle = SessionEngine::new(backend.clone(), SuggestionConfig::default())
        .with_initial_input(FormInput::new("foo/bar", "11"))
        .spawn();

    let view = wait_for(&handle, |v| !v.pr_suggestions.is_empty()).await;
    assert_eq!(view.repo_input, "foo/bar");
    assert_eq!(view.pr_input, "11");
    assert_eq!(view.pr_suggestions, ["11"]);
    assert!(view.can_submit);
}

#[tokio::test(start_paused = true)]
async fn selecting_repo_suggestion_skips_debounce() {
    let backend = ScriptedBackend::new(Script {
        prs: HashMap::from([("foo/bar".to_owned(), strings(&["2"]))]),
        ..Script::default()
    });
    let handle = start(&backend);

    handle.send(Request::SelectRepoSuggestion("foo/bar".to_owned()));
    // Well under the 300ms debounce delay.
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(backend.calls(), [Call::ListPrs("foo/bar".to_owned())]);
    assert_eq!(handle.state().pr_suggestions, ["2"]);

    handle.send(Request::SelectPrSuggestion("2".to_owned()));
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(handle.state().pr_input, "2");
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop() {
    let backend = ScriptedBackend::default();
    let handle = start(&backend);
    let mut rx = handle.subscribe();

    handle.send(Request::Shutdown);
    // The sender side is dropped with the session, which closes the channel.
    let closed = tokio::time::timeout(Duration::from_secs(1), rx.changed()).await;
    assert!(matches!(closed, Ok(Err(_))));
}
