//! Domain models for Gleaner.
//!
//! Each upstream service gets its own submodule with the typed results its
//! adapter returns. Field names follow the upstream JSON so the types can be
//! deserialized directly where the payload is trusted.
//!
//! ## Submodules
//!
//! - [`service`] - Service identifiers (ServiceKind)
//! - [`docbase`] - Docbase posts
//! - [`slack`] - Slack messages, threads and users
//! - [`github`] - GitHub issues and comments
//! - [`qiita`] - Qiita items
//! - [`zenn`] - Zenn articles

mod docbase;
mod github;
mod qiita;
mod service;
mod slack;
mod zenn;

pub use docbase::{DocbaseGroup, DocbasePost, DocbaseTag, DocbaseUser};
pub use github::{GitHubComment, GitHubIssue, GitHubLabel, GitHubUser};
pub use qiita::{QiitaItem, QiitaTag, QiitaUser};
pub use service::ServiceKind;
pub use slack::{
    parse_slack_ts, SlackChannel, SlackMessage, SlackSearchMatch, SlackSearchPage, SlackThread,
    SlackUser,
};
pub use zenn::{ZennArticle, ZennUser};

#[cfg(test)]
mod serde_tests;
