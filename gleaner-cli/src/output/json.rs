//! JSON output formatting.

use anyhow::Result;
use gleaner_config::Config;
use gleaner_core::ServiceKind;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Service info output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoOutput {
    pub id: String,
    pub display_name: String,
    pub api_host: String,
    pub requires_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    pub token_set: bool,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(output)
    }

    /// Formats the supported service list.
    pub fn format_services(&self, config: &Config) -> Result<String> {
        let services: Vec<ServiceInfoOutput> = ServiceKind::all()
            .iter()
            .map(|kind| ServiceInfoOutput {
                id: kind.cli_name().to_string(),
                display_name: kind.display_name().to_string(),
                api_host: kind.api_host().to_string(),
                requires_token: kind.requires_token(),
                token_env: config.token_env(*kind).map(str::to_string),
                token_set: config.optional_token(*kind).is_some(),
            })
            .collect();

        self.format(&services)
    }
}
