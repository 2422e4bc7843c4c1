//! CLI command implementations.

pub mod config;
pub mod docbase;
pub mod github;
pub mod qiita;
pub mod services;
pub mod slack;
pub mod zenn;

use std::sync::Arc;

use anyhow::Result;
use gleaner_config::Config;
use gleaner_core::ServiceKind;
use gleaner_fetch::{HttpRequestClient, RequestClient};
use gleaner_providers::Adapters;
use serde::Serialize;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Builds the shared HTTP client from the timeout and retry settings.
pub fn request_client(config: &Config) -> Result<Arc<dyn RequestClient>> {
    let client = HttpRequestClient::with_timeout(config.general.timeout())?
        .with_retry_config(config.retry.to_retry_config());
    Ok(Arc::new(client))
}

/// Builds every adapter, applying base URL overrides from the config.
pub fn adapters(config: &Config) -> Result<Adapters> {
    let mut adapters = Adapters::new(request_client(config)?);

    if let Some(url) = config.base_url(ServiceKind::Docbase) {
        adapters.docbase = adapters.docbase.with_base_url(url);
    }
    if let Some(url) = config.base_url(ServiceKind::Slack) {
        adapters.slack = adapters.slack.with_base_url(url);
    }
    if let Some(url) = config.base_url(ServiceKind::GitHub) {
        adapters.github = adapters.github.with_base_url(url);
    }
    if let Some(url) = config.base_url(ServiceKind::Qiita) {
        adapters.qiita = adapters.qiita.with_base_url(url);
    }

    Ok(adapters)
}

/// Prints `data` as JSON, or the text rendering produced by `text`.
pub fn emit<T, F>(cli: &Cli, data: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&TextFormatter) -> String,
{
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", text(&formatter));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(data)?);
        }
    }
    Ok(())
}
