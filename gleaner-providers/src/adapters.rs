//! One adapter per service, all sharing a single request client.

use std::sync::Arc;

use gleaner_fetch::RequestClient;

use crate::docbase::DocbaseClient;
use crate::github::GitHubClient;
use crate::qiita::QiitaClient;
use crate::slack::{SlackClient, SlackThreadCollector};
use crate::zenn::ZennClient;

/// Every service adapter, built over one injected [`RequestClient`].
#[derive(Debug, Clone)]
pub struct Adapters {
    /// Docbase.
    pub docbase: DocbaseClient,
    /// Slack.
    pub slack: SlackClient,
    /// GitHub.
    pub github: GitHubClient,
    /// Qiita.
    pub qiita: QiitaClient,
    /// Zenn.
    pub zenn: ZennClient,
}

impl Adapters {
    /// Builds all adapters over `client`.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            docbase: DocbaseClient::new(Arc::clone(&client)),
            slack: SlackClient::new(Arc::clone(&client)),
            github: GitHubClient::new(Arc::clone(&client)),
            qiita: QiitaClient::new(Arc::clone(&client)),
            zenn: ZennClient::new(client),
        }
    }

    /// Returns a thread collector over the Slack adapter.
    pub fn slack_collector(&self) -> SlackThreadCollector {
        SlackThreadCollector::new(self.slack.clone())
    }
}
