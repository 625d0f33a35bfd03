use crate::service::ServiceError;
use crate::types::{FormInput, PrNumber};

/// Shown when a generation fails without a message from the service.
pub const GENERIC_FAILURE: &str = "An error occurred while generating the response.";

/// Lifecycle of the single generate request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending,
    Succeeded {
        artifact: String,
    },
    Failed {
        message: String,
    },
}

/// Everything needed to issue one generate call and route its outcome back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTicket {
    pub request_id: u64,
    pub repo_url: String,
    pub pr_number: PrNumber,
}

/// Owns [`GenerationState`] and enforces its transitions: submit only from a
/// non-pending state with valid input, complete only the request in flight,
/// reset only from a finished state.
#[derive(Debug, Default)]
pub struct GenerationController {
    state: GenerationState,
    request_id: u64,
}

impl GenerationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, GenerationState::Pending)
    }

    pub fn artifact(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Succeeded { artifact } => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn can_submit(&self, input: &FormInput) -> bool {
        !self.is_pending() && input.submission().is_some()
    }

    pub fn can_reset(&self) -> bool {
        matches!(
            self.state,
            GenerationState::Succeeded { .. } | GenerationState::Failed { .. }
        )
    }

    /// Enter `Pending` and hand out the request to issue. Returns `None`
    /// (leaving the state untouched) while a request is in flight or when
    /// the input does not form a valid submission.
    pub fn submit(&mut self, input: &FormInput) -> Option<GenerateTicket> {
        if self.is_pending() {
            tracing::debug!("generation: submit ignored, request {} in flight", self.request_id);
            return None;
        }
        let (repo_url, pr_number) = input.submission()?;
        self.request_id = self.request_id.wrapping_add(1);
        self.state = GenerationState::Pending;
        tracing::debug!(
            "generation: request {} for {repo_url}#{pr_number}",
            self.request_id
        );
        Some(GenerateTicket {
            request_id: self.request_id,
            repo_url,
            pr_number,
        })
    }

    /// Resolve the in-flight request. Returns `false` if `ticket` is not the
    /// request currently pending.
    pub fn complete(&mut self, ticket: &GenerateTicket, result: Result<String, ServiceError>) -> bool {
        if !self.is_pending() || ticket.request_id != self.request_id {
            tracing::debug!(
                "generation: ignoring completion of request {}",
                ticket.request_id
            );
            return false;
        }
        self.state = match result {
            Ok(artifact) => GenerationState::Succeeded { artifact },
            Err(e) => {
                tracing::debug!("generation: request {} failed: {e}", ticket.request_id);
                GenerationState::Failed {
                    message: failure_message(&e),
                }
            }
        };
        true
    }

    /// Return to `Idle` from `Succeeded` or `Failed`.
    pub fn reset(&mut self) -> bool {
        if !self.can_reset() {
            return false;
        }
        self.state = GenerationState::Idle;
        true
    }
}

/// The message to show for a failed generation: the service's own `detail`
/// when it sent one, the generic fallback otherwise.
pub fn failure_message(err: &ServiceError) -> String {
    err.detail().map_or_else(|| GENERIC_FAILURE.to_owned(), ToOwned::to_owned)
}
