use iocraft::prelude::*;

// ---------------------------------------------------------------------------
// Pre-rendered artifact window
// ---------------------------------------------------------------------------

/// The visible slice of the generated README, shown as plain text.
pub struct RenderedArtifact {
    pub lines: Vec<(usize, String)>,
    pub position: String,
    pub border_fg: Color,
    pub text_fg: Color,
}

impl RenderedArtifact {
    pub fn build(text: &str, scroll_offset: usize, visible_lines: usize) -> Self {
        let all: Vec<&str> = text.lines().collect();
        let total = all.len();
        let start = clamp_scroll(scroll_offset, total, visible_lines);
        let end = (start + visible_lines).min(total);

        let lines = all[start..end]
            .iter()
            .enumerate()
            .map(|(i, line)| (start + i, (*line).to_owned()))
            .collect();
        let position = if total > visible_lines {
            format!("lines {}-{end} of {total}", start + 1)
        } else {
            String::new()
        };

        Self {
            lines,
            position,
            border_fg: Color::Green,
            text_fg: Color::White,
        }
    }
}

/// Largest useful scroll offset for `total` lines in a window of `visible`.
pub fn clamp_scroll(offset: usize, total: usize, visible: usize) -> usize {
    offset.min(total.saturating_sub(visible))
}

#[derive(Default, Props)]
pub struct ArtifactViewProps {
    pub artifact: Option<RenderedArtifact>,
}

#[component]
pub fn ArtifactView(props: &mut ArtifactViewProps) -> impl Into<AnyElement<'static>> {
    let Some(a) = props.artifact.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(
            flex_direction: FlexDirection::Column,
            flex_grow: 1.0,
            border_style: BorderStyle::Single,
            border_color: a.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row) {
                View(flex_grow: 1.0) {
                    Text(content: "Updated README", color: a.border_fg, weight: Weight::Bold)
                }
                Text(content: a.position, color: Color::DarkGrey, wrap: TextWrap::NoWrap)
            }
            #(a.lines.into_iter().map(|(key, line)| {
                element! {
                    Text(key: key, content: line, color: a.text_fg, wrap: TextWrap::NoWrap)
                }
            }))
        }
    }
    .into_any()
}
