use iocraft::prelude::*;

// ---------------------------------------------------------------------------
// Footer component: key hints and status line
// ---------------------------------------------------------------------------

pub struct RenderedFooter {
    pub hints: Vec<(String, String)>,
    pub status: String,
    pub server: String,
    pub key_fg: Color,
    pub text_fg: Color,
    pub status_fg: Color,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(can_reset: bool, has_artifact: bool, status: Option<&str>, server: &str) -> Self {
        let mut hints = vec![
            ("Tab", "field"),
            ("\u{2191}\u{2193}", "choose"),
            ("Enter", "select/submit"),
        ];
        if can_reset {
            hints.push(("^R", "reset"));
        }
        if has_artifact {
            hints.push(("^Y", "copy"));
            hints.push(("PgUp/PgDn", "scroll"));
        }
        hints.push(("Esc", "quit"));

        Self {
            hints: hints
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            status: status.unwrap_or_default().to_owned(),
            server: server.to_owned(),
            key_fg: Color::Cyan,
            text_fg: Color::DarkGrey,
            status_fg: Color::Yellow,
            border_fg: Color::DarkGrey,
        }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let mut hint_contents = Vec::new();
    for (i, (key, label)) in f.hints.iter().enumerate() {
        if i > 0 {
            hint_contents.push(MixedTextContent::new("  ").color(f.text_fg));
        }
        hint_contents.push(MixedTextContent::new(key).color(f.key_fg));
        hint_contents.push(MixedTextContent::new(format!(" {label}")).color(f.text_fg));
    }

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_grow: 1.0) {
                MixedText(contents: hint_contents, wrap: TextWrap::NoWrap)
            }
            Text(content: f.status, color: f.status_fg, wrap: TextWrap::NoWrap)
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            Text(content: f.server, color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
