//! Output renderers and formatting helpers for CLI commands.

use std::io::Write;

use anyhow::anyhow;
use nodecfg_config::{ApplyResult, ConfigDocument, ProfileRegistry, Redactor};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const DRY_RUN_NOTICE: &str = "This is a dry run; the configuration was not changed.";

fn write_failed(err: &std::io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

fn pretty(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Strings print bare; everything else prints as indented JSON.
pub(crate) fn render_value(out: &mut dyn Write, value: &Value) -> CliResult<()> {
    let text = match value {
        Value::String(text) => text.clone(),
        other => pretty(other)?,
    };
    writeln!(out, "{text}").map_err(|err| write_failed(&err))
}

pub(crate) fn render_document(out: &mut dyn Write, document: &ConfigDocument) -> CliResult<()> {
    let text = document.to_pretty_json()?;
    writeln!(out, "{text}").map_err(|err| write_failed(&err))
}

pub(crate) fn render_profile_list(
    out: &mut dyn Write,
    registry: &ProfileRegistry,
) -> CliResult<()> {
    for profile in registry.iter() {
        writeln!(out, "{}:\n  {}", profile.name, profile.description)
            .map_err(|err| write_failed(&err))?;
    }
    Ok(())
}

/// Print both snapshots of a profile run, redacted, plus a notice for dry runs.
pub(crate) fn render_apply_result(
    out: &mut dyn Write,
    result: &ApplyResult,
    redactor: &Redactor,
) -> CliResult<()> {
    writeln!(out, "Original config:").map_err(|err| write_failed(&err))?;
    render_document(out, &redactor.redact(&result.original))?;
    writeln!(out, "\nUpdated config:").map_err(|err| write_failed(&err))?;
    render_document(out, &redactor.redact(&result.updated))?;
    if !result.applied {
        writeln!(out, "\n{DRY_RUN_NOTICE}").map_err(|err| write_failed(&err))?;
    }
    Ok(())
}

pub(crate) fn render_resolved(
    out: &mut dyn Write,
    resolved: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let text = match format {
        OutputFormat::Text => resolved.to_string(),
        OutputFormat::Json => pretty(&json!({ "Path": resolved }))?,
    };
    writeln!(out, "{text}").map_err(|err| write_failed(&err))
}
