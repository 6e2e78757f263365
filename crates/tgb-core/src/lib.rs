//! Typed object models for the Telegram Bot API.
//!
//! Objects are immutable values built from raw API mappings. The HTTP transport
//! lives behind the [`bot::Bot`] port and is implemented outside this crate.

pub mod bot;
pub mod constants;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod object;
pub mod types;
pub mod utf16;

pub use errors::{Error, Result};
pub use object::{JsonMap, TelegramObject};
pub use types::{EntityType, MessageEntity, User};
