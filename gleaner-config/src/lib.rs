// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Gleaner Config
//!
//! Preferences file and credential lookup.
//!
//! - **Config**: JSON file at `<config dir>/gleaner/config.json`, every field
//!   optional
//! - **Credentials**: tokens are read from environment variables named by
//!   the config, never from the file itself
//!
//! ## Usage
//!
//! ```ignore
//! use gleaner_config::Config;
//! use gleaner_core::ServiceKind;
//!
//! let config = Config::load()?;
//! let retry = config.retry.to_retry_config();
//! let token = config.token_for(ServiceKind::Slack)?;
//! ```

pub mod config;
pub mod error;

pub use config::{
    Config, DocbaseSettings, GeneralConfig, RetrySettings, ServiceSettings, SlackSettings,
};
pub use error::ConfigError;
