//! Shopify Theme Actions core - shared types library.
//!
//! This crate provides the common types used by the action crate:
//!
//! - [`types::id`] - Newtype wrappers for theme and comment ids
//! - [`types::theme`] - Shopify theme wire types (`themes.json`)
//! - [`types::marker`] - The hidden marker-comment codec that persists a
//!   preview theme id inside a pull-request comment
//! - [`types::action`] - The action selector enum
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no process
//! spawning. All remote interaction lives in the `theme-actions` crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
