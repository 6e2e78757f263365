use std::{fmt, ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    types::MessageEntity,
    Result,
};

/// Port to the Bot API transport.
///
/// Implemented outside this crate (HTTP client, test doubles). Objects decoded
/// with a handle keep it so shortcut methods like [`crate::User::send_message`]
/// can reach the API.
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        entities: &[MessageEntity],
    ) -> Result<MessageRef>;
}

/// Shared handle to a [`Bot`]. Never part of equality, hashing or serialization.
#[derive(Clone)]
pub struct BotHandle(Arc<dyn Bot>);

impl BotHandle {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self(bot)
    }

    pub fn from_bot<B: Bot + 'static>(bot: B) -> Self {
        Self(Arc::new(bot))
    }

    /// Whether both handles point at the same bot instance.
    pub fn same_as(&self, other: &BotHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for BotHandle {
    type Target = dyn Bot;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for BotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotHandle(..)")
    }
}
