use iocraft::prelude::*;

// ---------------------------------------------------------------------------
// Pre-rendered form field
// ---------------------------------------------------------------------------

pub struct RenderedTextInput {
    pub label: String,
    pub text: String,
    pub hint: String,
    pub label_fg: Color,
    pub text_fg: Color,
    pub hint_fg: Color,
    pub border_fg: Color,
    pub suggestions: Vec<RenderedSuggestion>,
}

pub struct RenderedSuggestion {
    pub text: String,
    pub is_selected: bool,
    pub fg: Color,
}

impl RenderedTextInput {
    /// Build a labelled field. Suggestions are only listed while the field
    /// has focus; `loading` shows a hint next to the text.
    pub fn build(
        label: &str,
        text: &str,
        focused: bool,
        loading: bool,
        suggestions: &[String],
        selected_index: Option<usize>,
    ) -> Self {
        let (label_fg, border_fg) = if focused {
            (Color::Cyan, Color::Cyan)
        } else {
            (Color::DarkGrey, Color::DarkGrey)
        };

        let suggestions = if focused {
            suggestions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let is_selected = selected_index == Some(i);
                    RenderedSuggestion {
                        text: s.clone(),
                        is_selected,
                        fg: if is_selected { Color::Cyan } else { Color::White },
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            label: label.to_owned(),
            // Full block cursor on the focused field.
            text: if focused {
                format!("{text}\u{2588}")
            } else {
                text.to_owned()
            },
            hint: if loading {
                "searching\u{2026}".to_owned()
            } else {
                String::new()
            },
            label_fg,
            text_fg: Color::White,
            hint_fg: Color::DarkGrey,
            border_fg,
            suggestions,
        }
    }
}

// ---------------------------------------------------------------------------
// TextInput component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct TextInputProps {
    pub input: Option<RenderedTextInput>,
}

#[component]
pub fn TextInput(props: &mut TextInputProps) -> impl Into<AnyElement<'static>> {
    let Some(input) = props.input.take() else {
        return element! { View }.into_any();
    };

    let suggestion_elements: Vec<_> = input
        .suggestions
        .into_iter()
        .map(|s| {
            let prefix = if s.is_selected { "> " } else { "  " };
            (format!("{prefix}{}", s.text), s.fg)
        })
        .collect();

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: input.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: input.label, color: input.label_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
                Text(content: " ", color: input.text_fg)
                View(flex_grow: 1.0) {
                    Text(content: input.text, color: input.text_fg, wrap: TextWrap::NoWrap)
                }
                Text(content: input.hint, color: input.hint_fg, wrap: TextWrap::NoWrap)
            }
            #(suggestion_elements.into_iter().enumerate().map(|(i, (text, fg))| {
                element! {
                    Text(key: i, content: text, color: fg, wrap: TextWrap::NoWrap)
                }
            }))
        }
    }
    .into_any()
}
