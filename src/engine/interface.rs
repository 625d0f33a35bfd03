use tokio::sync::{mpsc, watch};

use crate::form::ViewState;

/// Handle to the session engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Request>,
    state: watch::Receiver<ViewState>,
}

impl EngineHandle {
    pub(super) fn new(tx: mpsc::UnboundedSender<Request>, state: watch::Receiver<ViewState>) -> Self {
        Self { tx, state }
    }

    /// Send a request to the engine. Non-blocking; returns immediately.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }

    /// The most recently published view.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified every time the view changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }
}

/// Implemented by every way of running a session.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// Everything the UI layer can ask of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------
    /// The repository field changed; carries the whole field.
    SetRepoInput(String),
    SetPrInput(String),
    /// A repository suggestion was accepted. Unlike typing, this looks up its
    /// PRs without waiting for the debounce delay.
    SelectRepoSuggestion(String),
    SelectPrSuggestion(String),

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------
    Submit,
    Reset,

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------
    Shutdown,
}
