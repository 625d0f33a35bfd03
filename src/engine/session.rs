use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

use crate::config::SuggestionConfig;
use crate::form::{
    Debouncer, GenerateTicket, GenerationController, PrLookup, PrLookupSequencer, StreamKind,
    SuggestionStream, Ticket, ViewState,
};
use crate::service::{Backend, ServiceError};
use crate::types::FormInput;

use super::interface::{Engine, EngineHandle, Request};

/// Runs one form session.
///
/// The loop owns every piece of form state and is its only writer. Lookups and
/// generation run as spawned tasks whose results come back through the loop,
/// so a late response can only ever be applied or discarded there, never raced.
pub struct SessionEngine<B> {
    backend: Arc<B>,
    config: SuggestionConfig,
    initial: FormInput,
}

impl<B: Backend> SessionEngine<B> {
    pub fn new(backend: B, config: SuggestionConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
            initial: FormInput::default(),
        }
    }

    /// Pre-fill the form as if the user had typed `initial`.
    pub fn with_initial_input(mut self, initial: FormInput) -> Self {
        self.initial = initial;
        self
    }

    /// Run the loop as a task on the current tokio runtime.
    pub fn spawn(self) -> EngineHandle {
        let (session, inbox, handle) = self.build();
        tokio::spawn(session.run_loop(inbox));
        handle
    }

    fn build(self) -> (Session<B>, Inbox, EngineHandle) {
        let (tx, requests) = mpsc::unbounded_channel::<Request>();
        let (done_tx, completions) = mpsc::unbounded_channel::<Completion>();
        let session = Session::new(self.backend, &self.config, done_tx);
        let handle = EngineHandle::new(tx, session.state_tx.subscribe());
        let inbox = Inbox {
            requests,
            completions,
            initial: self.initial,
        };
        (session, inbox, handle)
    }
}

impl<B: Backend> Engine for SessionEngine<B> {
    /// Run the loop on a dedicated thread with its own tokio runtime, for
    /// callers (like the terminal UI) that live on a different executor.
    fn start(self) -> EngineHandle {
        let (session, inbox, handle) = self.build();
        let _ = std::thread::Builder::new()
            .name("readme-gen-engine".to_owned())
            .spawn(move || {
                let rt = tokio::runtime::Runtime::new().expect("tokio runtime init");
                rt.block_on(session.run_loop(inbox));
            });
        handle
    }
}

struct Inbox {
    requests: UnboundedReceiver<Request>,
    completions: UnboundedReceiver<Completion>,
    initial: FormInput,
}

/// A finished remote call, routed back into the loop.
enum Completion {
    Lookup(Ticket, Result<Vec<String>, ServiceError>),
    Generated(GenerateTicket, Result<String, ServiceError>),
}

struct Session<B> {
    backend: Arc<B>,
    min_query_len: usize,
    form: FormInput,
    repo_debounce: Debouncer<String>,
    repos: SuggestionStream,
    prs: SuggestionStream,
    sequencer: PrLookupSequencer,
    generation: GenerationController,
    done_tx: UnboundedSender<Completion>,
    state_tx: watch::Sender<ViewState>,
}

impl<B: Backend> Session<B> {
    fn new(backend: Arc<B>, config: &SuggestionConfig, done_tx: UnboundedSender<Completion>) -> Self {
        let form = FormInput::default();
        let repos = SuggestionStream::new(StreamKind::Repos, config.max_items);
        let prs = SuggestionStream::new(StreamKind::Prs, config.max_items);
        let generation = GenerationController::new();
        let (state_tx, _) = watch::channel(ViewState::project(&form, &repos, &prs, &generation));
        Self {
            backend,
            min_query_len: config.min_query_len,
            form,
            repo_debounce: Debouncer::new(config.debounce()),
            repos,
            prs,
            sequencer: PrLookupSequencer::new(),
            generation,
            done_tx,
            state_tx,
        }
    }

    async fn run_loop(mut self, inbox: Inbox) {
        let Inbox {
            mut requests,
            mut completions,
            initial,
        } = inbox;

        self.form.pr = initial.pr;
        if !initial.repo.trim().is_empty() {
            self.set_repo_input(initial.repo);
        }
        self.publish();

        loop {
            tokio::select! {
                biased;
                maybe_req = requests.recv() => {
                    match maybe_req {
                        None | Some(Request::Shutdown) => {
                            tracing::debug!("engine: shutting down");
                            break;
                        }
                        Some(req) => self.handle_request(req),
                    }
                }
                Some(done) = completions.recv() => self.handle_completion(done),
                query = self.repo_debounce.settled() => self.on_repo_settled(&query),
            }
            self.publish();
        }
    }

    // -----------------------------------------------------------------------
    // Request dispatch
    // -----------------------------------------------------------------------

    fn handle_request(&mut self, req: Request) {
        tracing::debug!("engine: received {req:?}");
        match req {
            Request::SetRepoInput(text) => self.set_repo_input(text),
            Request::SetPrInput(text) => self.form.pr = text,
            Request::SelectRepoSuggestion(repo) => {
                self.repo_debounce.cancel();
                self.observe_repo_key(&repo);
                self.form.repo = repo;
            }
            Request::SelectPrSuggestion(pr) => self.form.pr = pr,
            Request::Submit => self.submit(),
            Request::Reset => self.reset(),
            Request::Shutdown => {}
        }
    }

    fn set_repo_input(&mut self, text: String) {
        if text.trim().is_empty() {
            self.repo_debounce.cancel();
            self.on_repo_settled(&text);
            self.form.repo = text;
        } else {
            self.form.repo.clone_from(&text);
            self.repo_debounce.push(text);
        }
    }

    fn submit(&mut self) {
        let Some(ticket) = self.generation.submit(&self.form) else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = backend.generate(&ticket.repo_url, ticket.pr_number).await;
            let _ = tx.send(Completion::Generated(ticket, result));
        });
    }

    fn reset(&mut self) {
        if !self.generation.reset() {
            tracing::debug!("engine: reset ignored in {:?}", self.generation.state());
            return;
        }
        self.form.clear();
        self.repo_debounce.cancel();
        self.repos.clear();
        self.prs.clear();
        self.sequencer.reset();
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// The repository query has been stable for the debounce delay (or is
    /// empty or a picked suggestion). Refresh repository suggestions and the dependent PR lookup.
    fn on_repo_settled(&mut self, query: &str) {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            self.repos.clear();
        } else {
            let ticket = self.repos.begin(query);
            let backend = Arc::clone(&self.backend);
            let q = ticket.query.clone();
            self.spawn_lookup(ticket, async move { backend.search_repos(&q).await });
        }
        self.observe_repo_key(query);
    }

    fn observe_repo_key(&mut self, query: &str) {
        match self.sequencer.observe(query) {
            PrLookup::Fetch(key) => {
                let ticket = self.prs.begin(key.full_name());
                let backend = Arc::clone(&self.backend);
                self.spawn_lookup(ticket, async move { backend.list_prs(&key).await });
            }
            PrLookup::Clear => self.prs.clear(),
            PrLookup::Unchanged => {}
        }
    }

    fn spawn_lookup<F>(&self, ticket: Ticket, fetch: F)
    where
        F: Future<Output = Result<Vec<String>, ServiceError>> + Send + 'static,
    {
        tracing::debug!(
            "engine: lookup[{}] {:?} epoch={}",
            ticket.kind.label(),
            ticket.query,
            ticket.epoch
        );
        let tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = fetch.await;
            let _ = tx.send(Completion::Lookup(ticket, result));
        });
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Lookup(ticket, result) => {
                let stream = match ticket.kind {
                    StreamKind::Repos => &mut self.repos,
                    StreamKind::Prs => &mut self.prs,
                };
                let resolution = stream.resolve(&ticket, result);
                tracing::debug!(
                    "engine: lookup[{}] {:?} -> {resolution:?}",
                    ticket.kind.label(),
                    ticket.query
                );
            }
            Completion::Generated(ticket, result) => {
                self.generation.complete(&ticket, result);
            }
        }
    }

    fn publish(&self) {
        let next = ViewState::project(&self.form, &self.repos, &self.prs, &self.generation);
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
