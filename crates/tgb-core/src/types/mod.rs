//! Bot API object models.

pub mod message_entity;
pub mod user;

pub use message_entity::{EntityType, MessageEntity};
pub use user::User;
