use super::generation::{GenerationController, GenerationState};
use super::suggest::SuggestionStream;
use crate::types::FormInput;

pub const SUBMIT_LABEL: &str = "Generate Updated README";
pub const PENDING_LABEL: &str = "Generating...";

/// Snapshot of everything the form renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub repo_input: String,
    pub pr_input: String,
    pub repo_suggestions: Vec<String>,
    pub pr_suggestions: Vec<String>,
    pub repo_loading: bool,
    pub pr_loading: bool,
    pub can_submit: bool,
    pub loading: bool,
    pub button_label: &'static str,
    pub error: Option<String>,
    pub artifact: Option<String>,
    pub can_reset: bool,
}

impl ViewState {
    pub fn project(
        form: &FormInput,
        repos: &SuggestionStream,
        prs: &SuggestionStream,
        generation: &GenerationController,
    ) -> Self {
        let loading = generation.is_pending();
        let (error, artifact) = match generation.state() {
            GenerationState::Succeeded { artifact } => (None, Some(artifact.clone())),
            GenerationState::Failed { message } => (Some(message.clone()), None),
            GenerationState::Idle | GenerationState::Pending => (None, None),
        };
        Self {
            repo_input: form.repo.clone(),
            pr_input: form.pr.clone(),
            repo_suggestions: repos.items().to_vec(),
            pr_suggestions: prs.items().to_vec(),
            repo_loading: repos.in_flight(),
            pr_loading: prs.in_flight(),
            can_submit: generation.can_submit(form),
            loading,
            button_label: if loading { PENDING_LABEL } else { SUBMIT_LABEL },
            error,
            artifact,
            can_reset: generation.can_reset(),
        }
    }
}
