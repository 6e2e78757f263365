//! Identifier newtypes shared by the object models and the [`crate::bot::Bot`] port.
//!
//! On the wire every id is a bare JSON integer; `User.id` decodes into [`UserId`]
//! and shortcut methods address chats with [`ChatId`].

use serde::{Deserialize, Serialize};

/// Id of a [`crate::User`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric). Private chats share the id of the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

/// What the [`crate::bot::Bot`] port returns for a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl From<UserId> for ChatId {
    fn from(id: UserId) -> Self {
        ChatId(id.0)
    }
}
