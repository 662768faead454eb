//! Per-command tracing spans.

use tracing::Span;

use crate::init::build_sha;

/// Top-level span wrapping one CLI command invocation.
#[must_use]
pub fn command_span(command: &str, trace_id: &str) -> Span {
    tracing::info_span!(
        "command",
        command = %command,
        trace_id = %trace_id,
        build_sha = %build_sha()
    )
}
