//! Shopify Theme Actions - per-PR theme lifecycle automation.
//!
//! Given a validated action (`DEPLOYMENT_PREVIEW`, `DEPLOY` or
//! `REMOVE_DEPLOYMENT_PREVIEW_THEME`) this crate sequences three components:
//!
//! - the theme registry ([`registry`]) - idempotent create-or-find over the
//!   store's eventually-consistent theme catalog
//! - the deploy guard ([`deploy`]) - refuses to overwrite the live theme
//!   unless explicitly overridden, and clones live content into fresh
//!   preview themes
//! - the comment tracker ([`comments`]) - persists the preview theme id in
//!   a hidden marker comment on the pull request
//!
//! All remote interaction goes through the [`backend::ActionBackend`] seam,
//! implemented for production by [`backend::LiveBackend`] (Shopify Admin
//! REST + Theme Kit + GitHub REST).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod comments;
pub mod config;
pub mod deploy;
pub mod error;
pub mod github;
pub mod outputs;
pub mod registry;
pub mod shopify;
pub mod themekit;
pub mod workflow;

pub use backend::{ActionBackend, LiveBackend};
pub use config::ActionConfig;
pub use error::ActionError;
pub use workflow::{ActionOutputs, run};
