use std::io::Write;

use anyhow::Context;
use nodecfg_config::{ConfigDocument, ConfigValue, ValueHint};

use crate::cli::{ConfigKeyArgs, ConfigReplaceArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_document, render_value};

pub(crate) async fn handle_config_key(
    ctx: &AppContext,
    args: ConfigKeyArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let key = args.key.ok_or_else(|| {
        CliError::validation("not enough arguments: a config key is required")
    })?;
    let service = ctx.config_service();

    let Some(raw) = args.value else {
        let value = service.get_key(&key).await?;
        return render_value(out, &value);
    };

    let hint = if args.as_json {
        ValueHint::Json
    } else if args.as_bool {
        ValueHint::Bool
    } else {
        ValueHint::Plain
    };
    let value = ConfigValue::parse(&key, &raw, hint)?;
    service.set_key(&key, value).await?;
    Ok(())
}

pub(crate) async fn handle_config_show(ctx: &AppContext, out: &mut dyn Write) -> CliResult<()> {
    let document = ctx.config_service().show().await?;
    render_document(out, &document)
}

pub(crate) async fn handle_config_replace(
    ctx: &AppContext,
    args: ConfigReplaceArgs,
) -> CliResult<()> {
    let payload = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))
        .map_err(CliError::failure)?;
    let document = ConfigDocument::from_json_str(&payload).map_err(|err| {
        CliError::validation(format!(
            "{} is not a valid configuration document: {err}",
            args.file.display()
        ))
    })?;
    ctx.config_service().replace(document).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use nodecfg_test_support::fixtures::{SAMPLE_PEER_ID, SAMPLE_PRIVATE_KEY, sample_config};
    use nodecfg_test_support::repo::TempRepo;
    use reqwest::Client;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn context_for(repo: &TempRepo) -> Result<AppContext> {
        Ok(AppContext {
            repo: repo.path().to_path_buf(),
            client: Client::new(),
            api_url: "http://127.0.0.1:5002"
                .parse()
                .map_err(|_| anyhow!("valid URL"))?,
            timeout: Duration::from_secs(1),
        })
    }

    fn key_args(key: &str, value: Option<&str>) -> ConfigKeyArgs {
        ConfigKeyArgs {
            key: Some(key.to_string()),
            value: value.map(ToString::to_string),
            ..ConfigKeyArgs::default()
        }
    }

    async fn set(ctx: &AppContext, args: ConfigKeyArgs) -> Result<()> {
        handle_config_key(ctx, args, &mut Vec::new())
            .await
            .map_err(|err| anyhow!(err.display_message()))
    }

    #[tokio::test]
    async fn set_key_honours_type_flags() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let ctx = context_for(&repo)?;

        set(&ctx, key_args("foo", Some("bar"))).await?;
        assert_eq!(repo.read_config()?["foo"], json!("bar"));

        let mut as_bool = key_args("foo", Some("true"));
        as_bool.as_bool = true;
        set(&ctx, as_bool).await?;
        assert_eq!(repo.read_config()?["foo"], json!(true));

        let mut as_null = key_args("foo", Some("null"));
        as_null.as_json = true;
        set(&ctx, as_null).await?;
        assert_eq!(repo.read_config()?["foo"], Value::Null);

        let mut as_json = key_args("foo", Some("{\"bar\":0}"));
        as_json.as_json = true;
        set(&ctx, as_json).await?;
        assert_eq!(repo.read_config()?["foo"], json!({ "bar": 0 }));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_json_is_a_validation_error() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let before = repo.config_bytes()?;
        let mut args = key_args("foo", Some("{\"bar:0}"));
        args.as_json = true;

        let err = handle_config_key(&context_for(&repo)?, args, &mut Vec::new())
            .await
            .expect_err("malformed json");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(repo.config_bytes()?, before);
        Ok(())
    }

    #[tokio::test]
    async fn get_key_prints_value() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let mut out = Vec::new();
        handle_config_key(&context_for(&repo)?, key_args("Identity.PeerID", None), &mut out)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(String::from_utf8(out)?, format!("{SAMPLE_PEER_ID}\n"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_argument_is_rejected() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let err = handle_config_key(&context_for(&repo)?, ConfigKeyArgs::default(), &mut Vec::new())
            .await
            .expect_err("no key");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("config key is required"));
        Ok(())
    }

    #[tokio::test]
    async fn private_key_cannot_be_read() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let mut out = Vec::new();
        let err = handle_config_key(&context_for(&repo)?, key_args("Identity.PrivKey", None), &mut out)
            .await
            .expect_err("sensitive key");
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn identity_section_prints_without_private_key() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let mut out = Vec::new();
        handle_config_key(&context_for(&repo)?, key_args("Identity", None), &mut out)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        let text = String::from_utf8(out)?;
        assert!(text.contains(SAMPLE_PEER_ID));
        assert!(!text.contains("PrivKey"));
        assert!(!text.contains(SAMPLE_PRIVATE_KEY));
        Ok(())
    }

    #[tokio::test]
    async fn identity_section_cannot_be_overwritten() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let before = repo.config_bytes()?;
        let mut args = key_args("Identity", Some(r#"{"PeerID":"QmX"}"#));
        args.as_json = true;

        let err = handle_config_key(&context_for(&repo)?, args, &mut Vec::new())
            .await
            .expect_err("parent of private key");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(repo.config_bytes()?, before);
        Ok(())
    }

    #[tokio::test]
    async fn show_prints_redacted_config() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let mut out = Vec::new();
        handle_config_show(&context_for(&repo)?, &mut out)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        let text = String::from_utf8(out)?;
        assert!(!text.contains(SAMPLE_PRIVATE_KEY));

        let mut expected = repo.read_config()?;
        if let Some(identity) = expected["Identity"].as_object_mut() {
            identity.remove("PrivKey");
        }
        assert_eq!(serde_json::from_str::<Value>(&text)?, expected);
        Ok(())
    }

    #[tokio::test]
    async fn replace_reads_file_and_keeps_private_key() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let replacement = repo.path().join("otherconfig");
        std::fs::write(&replacement, r#"{ "Identity": { "PeerID": "QmOther" }, "Bootstrap": [] }"#)?;

        handle_config_replace(&context_for(&repo)?, ConfigReplaceArgs { file: replacement })
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        let config = repo.read_config()?;
        assert_eq!(config["Identity"]["PeerID"], json!("QmOther"));
        assert_eq!(config["Identity"]["PrivKey"], json!(SAMPLE_PRIVATE_KEY));
        assert_eq!(config["Bootstrap"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn replace_rejects_non_object_documents() -> Result<()> {
        let repo = TempRepo::with_config(&sample_config())?;
        let replacement = repo.path().join("bad");
        std::fs::write(&replacement, "[1, 2, 3]")?;

        let err = handle_config_replace(&context_for(&repo)?, ConfigReplaceArgs { file: replacement })
            .await
            .expect_err("array root");
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }
}
