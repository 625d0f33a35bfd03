use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard tool found (tried {0})")]
    Unavailable(String),
    #[error("{tool} exited with {status}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
    },
}

/// Clipboard commands to try in order, as `(program, args)`.
#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(not(target_os = "macos"))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copy text (the generated README) to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    copy_with(CANDIDATES, text)
}

/// Pipe `text` to each candidate in turn until one exits successfully. A tool
/// that is installed but fails (`wl-copy` outside Wayland) does not stop the
/// search; the last such failure is reported if nothing works.
fn copy_with(
    candidates: &'static [(&'static str, &'static [&'static str])],
    text: &str,
) -> Result<(), ClipboardError> {
    let mut failed = None;
    for &(tool, args) in candidates {
        match pipe_to(tool, args, text) {
            Ok(status) if status.success() => {
                tracing::debug!("clipboard: copied {} bytes via {tool}", text.len());
                return Ok(());
            }
            Ok(status) => {
                tracing::debug!("clipboard: {tool} exited with {status}");
                failed = Some(ClipboardError::Failed { tool, status });
            }
            Err(e) => tracing::debug!("clipboard: {tool}: {e}"),
        }
    }
    Err(failed.unwrap_or_else(|| {
        let tried: Vec<&str> = candidates.iter().map(|(tool, _)| *tool).collect();
        ClipboardError::Unavailable(tried.join(", "))
    }))
}

fn pipe_to(tool: &str, args: &[&str], text: &str) -> std::io::Result<std::process::ExitStatus> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    // stdin is dropped after the write so the tool sees EOF. Reap the child
    // even when the write failed.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    Ok(status)
}
