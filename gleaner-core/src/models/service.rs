//! Supported upstream services.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Knowledge-sharing services Gleaner can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Docbase team wiki.
    Docbase,
    /// Slack workspace messages.
    Slack,
    /// GitHub issues and pull requests.
    GitHub,
    /// Qiita articles.
    Qiita,
    /// Zenn articles.
    Zenn,
}

impl ServiceKind {
    /// Returns the display name for this service.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Docbase => "Docbase",
            Self::Slack => "Slack",
            Self::GitHub => "GitHub",
            Self::Qiita => "Qiita",
            Self::Zenn => "Zenn",
        }
    }

    /// Returns the lowercase name used on the command line and in config.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Docbase => "docbase",
            Self::Slack => "slack",
            Self::GitHub => "github",
            Self::Qiita => "qiita",
            Self::Zenn => "zenn",
        }
    }

    /// Returns the API host for this service.
    pub fn api_host(&self) -> &'static str {
        match self {
            Self::Docbase => "api.docbase.io",
            Self::Slack => "slack.com",
            Self::GitHub => "api.github.com",
            Self::Qiita => "qiita.com",
            Self::Zenn => "zenn.dev",
        }
    }

    /// Environment variable consulted for this service's token by default.
    ///
    /// Zenn's public API needs no credential.
    pub fn default_token_env(&self) -> Option<&'static str> {
        match self {
            Self::Docbase => Some("DOCBASE_TOKEN"),
            Self::Slack => Some("SLACK_TOKEN"),
            Self::GitHub => Some("GITHUB_TOKEN"),
            Self::Qiita => Some("QIITA_TOKEN"),
            Self::Zenn => None,
        }
    }

    /// Returns true if every call requires a token.
    pub fn requires_token(&self) -> bool {
        matches!(self, Self::Docbase | Self::Slack)
    }

    /// Returns all services.
    pub fn all() -> &'static [ServiceKind] {
        &[
            Self::Docbase,
            Self::Slack,
            Self::GitHub,
            Self::Qiita,
            Self::Zenn,
        ]
    }

    /// Looks up a service by its CLI name (case-insensitive).
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|s| s.cli_name() == name)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_name_lookup() {
        assert_eq!(ServiceKind::from_cli_name("GitHub"), Some(ServiceKind::GitHub));
        assert_eq!(ServiceKind::from_cli_name(" zenn "), Some(ServiceKind::Zenn));
        assert_eq!(ServiceKind::from_cli_name("notion"), None);
    }

    #[test]
    fn test_token_requirements() {
        assert!(ServiceKind::Slack.requires_token());
        assert!(!ServiceKind::GitHub.requires_token());
        assert_eq!(ServiceKind::Zenn.default_token_env(), None);
    }
}
