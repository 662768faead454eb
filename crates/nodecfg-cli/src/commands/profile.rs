use std::io::Write;

use nodecfg_config::{ApplyOptions, ProfileRegistry, Redactor};

use crate::cli::{ProfileApplyArgs, ProfileRevertArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{render_apply_result, render_profile_list};

pub(crate) fn handle_profile_list(out: &mut dyn Write) -> CliResult<()> {
    render_profile_list(out, &ProfileRegistry::builtin())
}

pub(crate) async fn handle_profile_apply(
    ctx: &AppContext,
    args: ProfileApplyArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let options = ApplyOptions {
        dry_run: args.dry_run,
    };
    let result = ctx
        .profile_engine()
        .apply_profiles(&args.names, options)
        .await?;
    render_apply_result(out, &result, &Redactor::default())
}

pub(crate) async fn handle_profile_revert(
    ctx: &AppContext,
    args: ProfileRevertArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let options = ApplyOptions {
        dry_run: args.dry_run,
    };
    let result = ctx
        .profile_engine()
        .revert_profile(&args.name, options)
        .await?;
    render_apply_result(out, &result, &Redactor::default())
}
