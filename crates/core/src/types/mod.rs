//! Core types for Shopify Theme Actions.

pub mod action;
pub mod id;
pub mod marker;
pub mod theme;

pub use action::{ActionKind, ActionKindParseError};
pub use id::{CommentId, ThemeId};
pub use marker::{contains_marker, encode_marker_comment, extract_theme_id};
pub use theme::{Theme, ThemeRole};
