// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Gleaner` Core
//!
//! Core types shared by every `Gleaner` crate:
//!
//! - The error taxonomy every adapter reports failures in
//! - Service identifiers
//! - Typed results for each upstream service
//!
//! ## Key Types
//!
//! ### Errors
//! - [`ApiError`] - Closed set of failure variants, each with a message and optional cause
//! - [`ApiErrorKind`] - Fieldless tag of an [`ApiError`] variant
//!
//! ### Services
//! - [`ServiceKind`] - Docbase, Slack, GitHub, Qiita, Zenn
//!
//! ### Results
//! - [`DocbasePost`], [`SlackThread`], [`SlackUser`], [`GitHubIssue`],
//!   [`QiitaItem`], [`ZennArticle`] and friends

pub mod error;
pub mod models;

// Re-export error types
pub use error::{ApiError, ApiErrorKind, ErrorCause};

// Re-export all model types
pub use models::{
    // Services
    ServiceKind,
    // Docbase
    DocbaseGroup,
    DocbasePost,
    DocbaseTag,
    DocbaseUser,
    // Slack
    parse_slack_ts,
    SlackChannel,
    SlackMessage,
    SlackSearchMatch,
    SlackSearchPage,
    SlackThread,
    SlackUser,
    // GitHub
    GitHubComment,
    GitHubIssue,
    GitHubLabel,
    GitHubUser,
    // Qiita
    QiitaItem,
    QiitaTag,
    QiitaUser,
    // Zenn
    ZennArticle,
    ZennUser,
};
