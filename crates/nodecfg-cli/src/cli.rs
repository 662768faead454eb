//! Argument parsing, logging setup, and command dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use nodecfg_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging};
use reqwest::Url;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::config::{handle_config_key, handle_config_replace, handle_config_show};
use crate::commands::profile::{
    handle_profile_apply, handle_profile_list, handle_profile_revert,
};
use crate::commands::resolve::handle_resolve;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:5002";

/// Parses CLI arguments, installs logging, and executes the requested command.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let log_format = cli.log_format.unwrap_or_else(LogFormat::infer);
    if let Err(err) = init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: log_format,
        build_sha: option_env!("NODECFG_BUILD_SHA").unwrap_or("dev"),
    }) {
        eprintln!("warning: {err:#}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let span = command_span(command_label(&cli.command), &trace_id);
    let result = execute(cli, &trace_id).instrument(span).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli, trace_id)?;
    let mut out = io::stdout();
    dispatch(cli.command, &ctx, &mut out).await
}

pub(crate) async fn dispatch(
    command: Command,
    ctx: &AppContext,
    out: &mut dyn Write,
) -> CliResult<()> {
    match command {
        Command::Config(config) => match config.command {
            Some(ConfigCommand::Show) => handle_config_show(ctx, out).await,
            Some(ConfigCommand::Replace(args)) => handle_config_replace(ctx, args).await,
            Some(ConfigCommand::Profile(profile)) => match profile {
                ProfileCommand::Ls => handle_profile_list(out),
                ProfileCommand::Apply(args) => handle_profile_apply(ctx, args, out).await,
                ProfileCommand::Revert(args) => handle_profile_revert(ctx, args, out).await,
            },
            None => handle_config_key(ctx, config.key, out).await,
        },
        Command::Resolve(args) => handle_resolve(ctx, args, out).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Config(config) => match &config.command {
            Some(ConfigCommand::Show) => "config show",
            Some(ConfigCommand::Replace(_)) => "config replace",
            Some(ConfigCommand::Profile(ProfileCommand::Ls)) => "config profile ls",
            Some(ConfigCommand::Profile(ProfileCommand::Apply(_))) => "config profile apply",
            Some(ConfigCommand::Profile(ProfileCommand::Revert(_))) => "config profile revert",
            None => "config",
        },
        Command::Resolve(_) => "resolve",
    }
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse()
}

#[derive(Parser)]
#[command(
    name = "nodecfg",
    version,
    about = "Inspect and reshape a node's configuration repository"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "NODECFG_REPO",
        help = "Repository directory holding the config file (defaults to ~/.nodecfg)"
    )]
    pub(crate) repo: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "NODECFG_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "NODECFG_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(long, global = true, env = "NODECFG_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[arg(long, global = true, env = "NODECFG_LOG_FORMAT", value_parser = parse_log_format)]
    pub(crate) log_format: Option<LogFormat>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Get and set configuration values.
    Config(ConfigArgs),
    /// Resolve a dnsaddr multiaddress through the node API.
    Resolve(ResolveArgs),
}

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub(crate) struct ConfigArgs {
    #[command(subcommand)]
    pub(crate) command: Option<ConfigCommand>,
    #[command(flatten)]
    pub(crate) key: ConfigKeyArgs,
}

#[derive(Args, Default)]
pub(crate) struct ConfigKeyArgs {
    #[arg(help = "Dotted key path, e.g. Discovery.MDNS.Enabled")]
    pub(crate) key: Option<String>,
    #[arg(help = "Value to store at the key")]
    pub(crate) value: Option<String>,
    #[arg(long = "bool", help = "Parse the value as a boolean")]
    pub(crate) as_bool: bool,
    #[arg(
        long = "json",
        conflicts_with = "as_bool",
        help = "Parse the value as JSON"
    )]
    pub(crate) as_json: bool,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the whole configuration with secrets removed.
    Show,
    /// Replace the configuration with the contents of a file.
    Replace(ConfigReplaceArgs),
    /// List, apply, or revert configuration profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Args)]
pub(crate) struct ConfigReplaceArgs {
    #[arg(help = "Path to a JSON configuration document")]
    pub(crate) file: PathBuf,
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    /// List available profiles.
    Ls,
    /// Apply one or more profiles in order.
    Apply(ProfileApplyArgs),
    /// Revert a profile.
    Revert(ProfileRevertArgs),
}

#[derive(Args)]
pub(crate) struct ProfileApplyArgs {
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Print the resulting configuration without writing it"
    )]
    pub(crate) dry_run: bool,
    #[arg(required = true, num_args = 1.., help = "Profile names, applied left to right")]
    pub(crate) names: Vec<String>,
}

#[derive(Args)]
pub(crate) struct ProfileRevertArgs {
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Print the resulting configuration without writing it"
    )]
    pub(crate) dry_run: bool,
    #[arg(help = "Profile name")]
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[arg(help = "Multiaddress to resolve")]
    pub(crate) address: String,
    #[arg(
        short = 'r',
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        help = "Resolve until the result is not a DNS link"
    )]
    pub(crate) recursive: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}
