use iocraft::prelude::*;

use crate::actions::clipboard;
use crate::components::artifact_view::{ArtifactView, RenderedArtifact, clamp_scroll};
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::text_input::{RenderedTextInput, TextInput};
use crate::engine::{EngineHandle, Request};
use crate::form::ViewState;
use crate::types::FormInput;
use crate::url::parse_pr_url;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Repo,
    Pr,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Repo => Self::Pr,
            Self::Pr => Self::Repo,
        }
    }
}

/// Move a suggestion cursor by one step. `Up` from the first item leaves the
/// list; `Down` past the last item stays on it.
pub fn step_cursor(cursor: Option<usize>, len: usize, down: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (cursor, down) {
        (None, true) => Some(0),
        (None, false) | (Some(0), false) => None,
        (Some(i), true) => Some((i + 1).min(len - 1)),
        (Some(i), false) => Some(i - 1),
    }
}

/// Scroll offset after one page up or down through `total` artifact lines,
/// kept within the range the artifact pane can actually show.
pub fn page_scroll(offset: usize, total: usize, page: usize, down: bool) -> usize {
    let offset = clamp_scroll(offset, total, page);
    if down {
        clamp_scroll(offset + page, total, page)
    } else {
        offset.saturating_sub(page)
    }
}

// Rows taken by everything except the artifact text.
const CHROME_ROWS: u16 = 22;

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub engine: Option<&'a EngineHandle>,
    pub initial: Option<&'a FormInput>,
    pub server: String,
}

#[component]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let mut should_exit = hooks.use_state(|| false);

    let engine = props.engine.cloned();
    let initial = props.initial.cloned().unwrap_or_default();
    let initial_view = engine.as_ref().map(EngineHandle::state).unwrap_or_default();

    // The text fields are edited locally and mirrored to the engine on every
    // change; the engine's snapshot drives everything else.
    let mut repo_text = hooks.use_state({
        let repo = initial.repo.clone();
        move || repo
    });
    let mut pr_text = hooks.use_state(move || initial.pr);
    let mut view = hooks.use_state(move || initial_view);
    let mut focus = hooks.use_state(|| Focus::Repo);
    let mut cursor = hooks.use_state(|| Option::<usize>::None);
    let mut scroll = hooks.use_state(|| 0usize);
    let mut status = hooks.use_state(|| Option::<String>::None);

    // Follow the engine's published state.
    let state_rx = engine.as_ref().map(EngineHandle::subscribe);
    hooks.use_future(async move {
        let Some(mut rx) = state_rx else {
            return;
        };
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            if next.artifact != view.read().artifact {
                scroll.set(0);
            }
            view.set(next);
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let page = usize::from(height.saturating_sub(CHROME_ROWS).max(1));

    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let Some(engine) = engine.as_ref() else {
                    return;
                };
                let ctrl = modifiers.contains(KeyModifiers::CONTROL);
                let current = view.read().clone();
                let suggestions = match focus.get() {
                    Focus::Repo => &current.repo_suggestions,
                    Focus::Pr => &current.pr_suggestions,
                };

                match code {
                    KeyCode::Esc => should_exit.set(true),
                    KeyCode::Char('c') if ctrl => should_exit.set(true),
                    KeyCode::Tab | KeyCode::BackTab => {
                        focus.set(focus.get().toggle());
                        cursor.set(None);
                    }
                    KeyCode::Down => {
                        cursor.set(step_cursor(cursor.get(), suggestions.len(), true));
                    }
                    KeyCode::Up => {
                        cursor.set(step_cursor(cursor.get(), suggestions.len(), false));
                    }
                    KeyCode::PageDown | KeyCode::PageUp => {
                        let total = current.artifact.as_deref().map_or(0, |a| a.lines().count());
                        scroll.set(page_scroll(scroll.get(), total, page, code == KeyCode::PageDown));
                    }
                    KeyCode::Enter => {
                        if let Some(choice) = cursor.get().and_then(|i| suggestions.get(i)).cloned() {
                            cursor.set(None);
                            match focus.get() {
                                Focus::Repo => {
                                    repo_text.set(choice.clone());
                                    engine.send(Request::SelectRepoSuggestion(choice));
                                    focus.set(Focus::Pr);
                                }
                                Focus::Pr => {
                                    pr_text.set(choice.clone());
                                    engine.send(Request::SelectPrSuggestion(choice));
                                }
                            }
                            return;
                        }
                        let repo = repo_text.read().clone();
                        if focus.get() == Focus::Repo {
                            if let Some((key, number)) = parse_pr_url(&repo) {
                                repo_text.set(key.full_name());
                                pr_text.set(number.to_string());
                                engine.send(Request::SelectRepoSuggestion(key.full_name()));
                                engine.send(Request::SetPrInput(number.to_string()));
                            }
                            focus.set(Focus::Pr);
                            return;
                        }
                        if current.can_submit {
                            status.set(None);
                            engine.send(Request::Submit);
                        }
                    }
                    KeyCode::Char('r') if ctrl => {
                        if current.can_reset {
                            repo_text.set(String::new());
                            pr_text.set(String::new());
                            cursor.set(None);
                            status.set(None);
                            focus.set(Focus::Repo);
                            engine.send(Request::Reset);
                        }
                    }
                    KeyCode::Char('y') if ctrl => {
                        if let Some(artifact) = current.artifact.as_deref() {
                            status.set(Some(match clipboard::copy_to_clipboard(artifact) {
                                Ok(()) => "Copied README to clipboard".to_owned(),
                                Err(e) => format!("Copy failed: {e}"),
                            }));
                        }
                    }
                    KeyCode::Char('u') if ctrl => {
                        cursor.set(None);
                        match focus.get() {
                            Focus::Repo => {
                                repo_text.set(String::new());
                                engine.send(Request::SetRepoInput(String::new()));
                            }
                            Focus::Pr => {
                                pr_text.set(String::new());
                                engine.send(Request::SetPrInput(String::new()));
                            }
                        }
                    }
                    KeyCode::Backspace | KeyCode::Char(_) if !ctrl => {
                        cursor.set(None);
                        let mut field = match focus.get() {
                            Focus::Repo => repo_text,
                            Focus::Pr => pr_text,
                        };
                        let mut text = field.read().clone();
                        match code {
                            KeyCode::Char(ch) => text.push(ch),
                            _ => {
                                text.pop();
                            }
                        }
                        field.set(text.clone());
                        engine.send(match focus.get() {
                            Focus::Repo => Request::SetRepoInput(text),
                            Focus::Pr => Request::SetPrInput(text),
                        });
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    });

    // -----------------------------------------------------------------------
    // Render
    // -----------------------------------------------------------------------

    let v = view.read().clone();
    let repo_input = RenderedTextInput::build(
        "Repository",
        &repo_text.read(),
        focus.get() == Focus::Repo,
        v.repo_loading,
        &v.repo_suggestions,
        cursor.get().filter(|_| focus.get() == Focus::Repo),
    );
    let pr_input = RenderedTextInput::build(
        "PR number ",
        &pr_text.read(),
        focus.get() == Focus::Pr,
        v.pr_loading,
        &v.pr_suggestions,
        cursor.get().filter(|_| focus.get() == Focus::Pr),
    );

    let button_fg = if v.loading {
        Color::Yellow
    } else if v.can_submit {
        Color::Green
    } else {
        Color::DarkGrey
    };
    let artifact = v
        .artifact
        .as_deref()
        .map(|text| RenderedArtifact::build(text, scroll.get(), page));
    let footer = RenderedFooter::build(
        v.can_reset,
        v.artifact.is_some(),
        status.read().as_deref(),
        &props.server,
    );

    element! {
        View(width: u32::from(width), height: u32::from(height), flex_direction: FlexDirection::Column) {
            View(padding_left: 1) {
                Text(content: "README generator", color: Color::Cyan, weight: Weight::Bold)
            }
            TextInput(input: Some(repo_input))
            TextInput(input: Some(pr_input))
            View(padding_left: 1, padding_top: 1) {
                Text(
                    content: format!("[ {} ]", v.button_label),
                    color: button_fg,
                    weight: Weight::Bold,
                )
            }
            #(v.error.map(|message| element! {
                View(padding_left: 1) {
                    Text(content: format!("Error: {message}"), color: Color::Red)
                }
            }))
            View(flex_grow: 1.0, flex_direction: FlexDirection::Column) {
                ArtifactView(artifact: artifact)
            }
            Footer(footer: Some(footer))
        }
    }
}
