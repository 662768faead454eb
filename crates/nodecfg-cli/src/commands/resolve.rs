use std::io::Write;

use nodecfg_resolver::ResolveOptions;

use crate::cli::ResolveArgs;
use crate::client::{AppContext, CliResult};
use crate::output::render_resolved;

pub(crate) async fn handle_resolve(
    ctx: &AppContext,
    args: ResolveArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let options = ResolveOptions {
        recursive: args.recursive,
        timeout: ctx.timeout,
    };
    let resolved = ctx.resolver().resolve(&args.address, options).await?;
    render_resolved(out, &resolved, args.format)
}
