//! Shared context, error types, and error mapping for the CLI.

use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use nodecfg_config::{ConfigError, ConfigService, FileConfigStore, ProfileEngine};
use nodecfg_resolver::{AddressResolver, HttpDnsLookup, ResolveError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};

use crate::cli::Cli;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const DEFAULT_REPO_DIR: &str = ".nodecfg";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        if error.is_user_error() {
            Self::validation(error.to_string())
        } else {
            Self::failure(error)
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(error: ResolveError) -> Self {
        Self::failure(error)
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) repo: PathBuf,
    pub(crate) client: Client,
    pub(crate) api_url: Url,
    pub(crate) timeout: Duration,
}

impl AppContext {
    /// Build the context from parsed flags, tagging HTTP requests with `trace_id`.
    pub(crate) fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let repo = match &cli.repo {
            Some(repo) => repo.clone(),
            None => default_repo_path()?,
        };

        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let timeout = Duration::from_secs(cli.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            repo,
            client,
            api_url: cli.api_url.clone(),
            timeout,
        })
    }

    pub(crate) fn store(&self) -> FileConfigStore {
        FileConfigStore::in_repo(&self.repo)
    }

    pub(crate) fn config_service(&self) -> ConfigService<FileConfigStore> {
        ConfigService::new(self.store())
    }

    pub(crate) fn profile_engine(&self) -> ProfileEngine<FileConfigStore> {
        ProfileEngine::new(self.store())
    }

    pub(crate) fn resolver(&self) -> AddressResolver<HttpDnsLookup> {
        AddressResolver::new(HttpDnsLookup::new(
            self.client.clone(),
            self.api_url.clone(),
        ))
    }
}

fn default_repo_path() -> CliResult<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(DEFAULT_REPO_DIR))
        .ok_or_else(|| {
            CliError::validation("cannot locate the repository; pass --repo or set NODECFG_REPO")
        })
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nodecfg_resolver::LookupError;

    #[test]
    fn exit_codes_split_validation_from_failure() {
        let validation = CliError::validation("bad input");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "bad input");

        let failure = CliError::failure(anyhow!("disk gone"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "disk gone");
        assert_eq!(failure.to_string(), "cli error");
    }

    #[test]
    fn config_errors_map_by_kind() {
        let unknown: CliError = ConfigError::UnknownProfile {
            name: "turbo".into(),
        }
        .into();
        assert_eq!(unknown.exit_code(), 2);
        assert_eq!(unknown.display_message(), "unknown profile 'turbo'");

        let drift: CliError = ConfigError::ScopeViolation {
            profile: "server".into(),
            path: "Bootstrap".into(),
        }
        .into();
        assert_eq!(drift.exit_code(), 3);
    }

    #[test]
    fn resolve_errors_include_source_chain() {
        let err: CliError = ResolveError::ResolutionFailed {
            address: "/dnsaddr/a.example".into(),
            source: LookupError::NotFound {
                name: "/dnsaddr/a.example".into(),
            },
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        let message = err.display_message();
        assert!(message.contains("failed to resolve '/dnsaddr/a.example'"));
        assert!(message.contains("no DNS link record"));
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("http://127.0.0.1:5002").is_ok());
        let err = parse_url("not a url").expect_err("invalid");
        assert!(err.contains("invalid URL 'not a url'"));
    }

    #[test]
    fn context_prefers_explicit_repo() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "nodecfg",
            "--repo",
            "/srv/node",
            "--timeout",
            "4",
            "config",
            "show",
        ])?;
        let ctx = AppContext::from_cli(&cli, "trace-123").map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(ctx.repo, PathBuf::from("/srv/node"));
        assert_eq!(ctx.timeout, Duration::from_secs(4));
        assert_eq!(ctx.store().path(), PathBuf::from("/srv/node/config").as_path());
        Ok(())
    }
}
