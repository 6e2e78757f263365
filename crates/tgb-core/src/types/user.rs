use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    bot::BotHandle,
    constants::MarkdownVersion,
    domain::{ChatId, MessageRef, UserId},
    errors::Error,
    formatting::{escape_html, escape_markdown},
    object::{self, put_opt, FieldReader, JsonMap, TelegramObject},
    types::MessageEntity,
    Result,
};

/// A Telegram user or bot.
///
/// Two users are equal when their ids are equal; the remaining attributes are a
/// snapshot of the profile at the time the server sent it.
#[derive(Clone, Debug)]
pub struct User {
    id: UserId,
    is_bot: bool,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
    language_code: Option<String>,
    is_premium: Option<bool>,
    added_to_attachment_menu: Option<bool>,
    can_join_groups: Option<bool>,
    can_read_all_group_messages: Option<bool>,
    supports_inline_queries: Option<bool>,
    can_connect_to_business: Option<bool>,
    has_main_web_app: Option<bool>,
    api_kwargs: JsonMap,
    bot: Option<BotHandle>,
}

impl User {
    pub fn new(id: UserId, first_name: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id,
            is_bot,
            first_name: first_name.into(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: None,
            added_to_attachment_menu: None,
            can_join_groups: None,
            can_read_all_group_messages: None,
            supports_inline_queries: None,
            can_connect_to_business: None,
            has_main_web_app: None,
            api_kwargs: JsonMap::new(),
            bot: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    pub fn with_is_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = Some(is_premium);
        self
    }

    pub fn with_bot(mut self, bot: BotHandle) -> Self {
        self.bot = Some(bot);
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn is_bot(&self) -> bool {
        self.is_bot
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    pub fn is_premium(&self) -> Option<bool> {
        self.is_premium
    }

    pub fn added_to_attachment_menu(&self) -> Option<bool> {
        self.added_to_attachment_menu
    }

    // Only returned by getMe.
    pub fn can_join_groups(&self) -> Option<bool> {
        self.can_join_groups
    }

    pub fn can_read_all_group_messages(&self) -> Option<bool> {
        self.can_read_all_group_messages
    }

    pub fn supports_inline_queries(&self) -> Option<bool> {
        self.supports_inline_queries
    }

    pub fn can_connect_to_business(&self) -> Option<bool> {
        self.can_connect_to_business
    }

    pub fn has_main_web_app(&self) -> Option<bool> {
        self.has_main_web_app
    }

    /// `first_name` followed by `last_name`, if any.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    /// `@username` when set, otherwise the full name.
    pub fn name(&self) -> String {
        match &self.username {
            Some(username) => format!("@{username}"),
            None => self.full_name(),
        }
    }

    /// Public `t.me` link, only for users with a username.
    pub fn link(&self) -> Option<String> {
        self.username
            .as_ref()
            .map(|username| format!("https://t.me/{username}"))
    }

    /// Inline mention usable with HTML parse mode. Defaults to the full name.
    pub fn mention_html(&self, name: Option<&str>) -> String {
        let label = name.map(str::to_string).unwrap_or_else(|| self.full_name());
        format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            self.id.0,
            escape_html(&label)
        )
    }

    /// Inline mention usable with MarkdownV2 parse mode. Defaults to the full name.
    pub fn mention_markdown_v2(&self, name: Option<&str>) -> String {
        let label = name.map(str::to_string).unwrap_or_else(|| self.full_name());
        format!(
            "[{}](tg://user?id={})",
            escape_markdown(&label, MarkdownVersion::V2, None),
            self.id.0
        )
    }

    pub fn get_bot(&self) -> Result<&BotHandle> {
        self.bot
            .as_ref()
            .ok_or(Error::BotNotSet { kind: Self::KIND })
    }

    /// Shortcut for sending a private message to this user.
    pub async fn send_message(&self, text: &str, entities: &[MessageEntity]) -> Result<MessageRef> {
        let bot = self.get_bot()?;
        bot.send_message(ChatId::from(self.id), text, entities).await
    }
}

impl TelegramObject for User {
    const KIND: &'static str = "User";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "is_bot",
        "first_name",
        "last_name",
        "username",
        "language_code",
        "is_premium",
        "added_to_attachment_menu",
        "can_join_groups",
        "can_read_all_group_messages",
        "supports_inline_queries",
        "can_connect_to_business",
        "has_main_web_app",
    ];
    const REQUIRED: &'static [&'static str] = &["id", "is_bot", "first_name"];

    fn from_fields(fields: &mut FieldReader, bot: Option<&BotHandle>) -> Result<Self> {
        Ok(Self {
            id: fields.required("id")?,
            is_bot: fields.required("is_bot")?,
            first_name: fields.required("first_name")?,
            last_name: fields.optional("last_name")?,
            username: fields.optional("username")?,
            language_code: fields.optional("language_code")?,
            is_premium: fields.optional("is_premium")?,
            added_to_attachment_menu: fields.optional("added_to_attachment_menu")?,
            can_join_groups: fields.optional("can_join_groups")?,
            can_read_all_group_messages: fields.optional("can_read_all_group_messages")?,
            supports_inline_queries: fields.optional("supports_inline_queries")?,
            can_connect_to_business: fields.optional("can_connect_to_business")?,
            has_main_web_app: fields.optional("has_main_web_app")?,
            api_kwargs: JsonMap::new(),
            bot: bot.cloned(),
        })
    }

    fn write_fields(&self, out: &mut JsonMap) {
        out.insert("id".to_string(), self.id.0.into());
        out.insert("is_bot".to_string(), self.is_bot.into());
        out.insert("first_name".to_string(), self.first_name.clone().into());
        put_opt(out, "last_name", &self.last_name);
        put_opt(out, "username", &self.username);
        put_opt(out, "language_code", &self.language_code);
        put_opt(out, "is_premium", &self.is_premium);
        put_opt(out, "added_to_attachment_menu", &self.added_to_attachment_menu);
        put_opt(out, "can_join_groups", &self.can_join_groups);
        put_opt(
            out,
            "can_read_all_group_messages",
            &self.can_read_all_group_messages,
        );
        put_opt(out, "supports_inline_queries", &self.supports_inline_queries);
        put_opt(out, "can_connect_to_business", &self.can_connect_to_business);
        put_opt(out, "has_main_web_app", &self.has_main_web_app);
    }

    fn api_kwargs(&self) -> &JsonMap {
        &self.api_kwargs
    }

    fn with_api_kwargs(mut self, api_kwargs: JsonMap) -> Self {
        self.api_kwargs = api_kwargs;
        self
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        object::serialize_object(self, serializer)
    }
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        object::deserialize_object(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::{bot::Bot, domain::MessageId};

    fn map(v: Value) -> JsonMap {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<(ChatId, String, usize)>>,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_message(
            &self,
            chat_id: ChatId,
            text: &str,
            entities: &[MessageEntity],
        ) -> Result<MessageRef> {
            let mut sent = self.sent.lock().unwrap();
            sent.push((chat_id, text.to_string(), entities.len()));
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(sent.len() as i32),
            })
        }
    }

    #[test]
    fn de_json_reads_every_declared_field() {
        let raw = json!({
            "id": 42,
            "is_bot": false,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "username": "ada",
            "language_code": "en",
            "is_premium": true,
            "added_to_attachment_menu": false,
            "can_join_groups": true,
            "can_read_all_group_messages": false,
            "supports_inline_queries": true,
            "can_connect_to_business": false,
            "has_main_web_app": true,
        });
        let user = User::de_json(Some(map(raw.clone())), None).unwrap().unwrap();

        assert_eq!(user.id(), UserId(42));
        assert!(!user.is_bot());
        assert_eq!(user.first_name(), "Ada");
        assert_eq!(user.last_name(), Some("Lovelace"));
        assert_eq!(user.username(), Some("ada"));
        assert_eq!(user.language_code(), Some("en"));
        assert_eq!(user.is_premium(), Some(true));
        assert_eq!(user.supports_inline_queries(), Some(true));
        assert!(user.api_kwargs().is_empty());

        assert_eq!(Value::Object(user.to_dict()), raw);
    }

    #[test]
    fn serialized_keys_are_exactly_the_declared_fields() {
        let raw = json!({
            "id": 1, "is_bot": true, "first_name": "b", "last_name": "c",
            "username": "d", "language_code": "e", "is_premium": true,
            "added_to_attachment_menu": true, "can_join_groups": true,
            "can_read_all_group_messages": true, "supports_inline_queries": true,
            "can_connect_to_business": true, "has_main_web_app": true,
        });
        let user = User::de_json(Some(map(raw)), None).unwrap().unwrap();
        let mut keys: Vec<_> = user.to_dict().keys().cloned().collect();
        let mut fields: Vec<_> = User::FIELDS.iter().map(|f| f.to_string()).collect();
        keys.sort();
        fields.sort();
        assert_eq!(keys, fields);

        let unique: HashSet<_> = User::FIELDS.iter().collect();
        assert_eq!(unique.len(), User::FIELDS.len(), "duplicate field");
    }

    #[test]
    fn missing_first_name_is_rejected() {
        let err = User::de_json(Some(map(json!({"id": 1, "is_bot": false}))), None).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                kind: "User",
                field: "first_name"
            }
        ));
    }

    #[test]
    fn unknown_fields_round_trip_through_api_kwargs() {
        let raw = json!({"id": 7, "is_bot": false, "first_name": "x", "new_flag": [1, 2]});
        let user = User::de_json(Some(map(raw.clone())), None).unwrap().unwrap();
        assert_eq!(user.api_kwargs()["new_flag"], json!([1, 2]));
        assert_eq!(Value::Object(user.to_dict()), raw);
    }

    #[test]
    fn equality_and_hash_follow_id() {
        let a = User::new(UserId(1), "a", false);
        let b = User::new(UserId(1), "renamed", false).with_username("b");
        let c = User::new(UserId(2), "a", false);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn names_and_links() {
        let plain = User::new(UserId(5), "Grace", false);
        assert_eq!(plain.full_name(), "Grace");
        assert_eq!(plain.name(), "Grace");
        assert_eq!(plain.link(), None);

        let full = plain.clone().with_last_name("Hopper").with_username("grace");
        assert_eq!(full.full_name(), "Grace Hopper");
        assert_eq!(full.name(), "@grace");
        assert_eq!(full.link().as_deref(), Some("https://t.me/grace"));
    }

    #[test]
    fn mentions_escape_the_label() {
        let user = User::new(UserId(9), "<Bob & Co>", false);
        assert_eq!(
            user.mention_html(None),
            "<a href=\"tg://user?id=9\">&lt;Bob &amp; Co&gt;</a>"
        );
        assert_eq!(
            user.mention_markdown_v2(Some("a.b")),
            "[a\\.b](tg://user?id=9)"
        );
    }

    #[tokio::test]
    async fn send_message_goes_through_the_bot() {
        let bot = Arc::new(RecordingBot::default());
        let handle = BotHandle::new(bot.clone());
        let raw = json!({"id": 77, "is_bot": false, "first_name": "u"});
        let user = User::de_json(Some(map(raw)), Some(&handle)).unwrap().unwrap();

        let entity = MessageEntity::new(crate::constants::MessageEntityType::Bold, 0, 2);
        let sent = user.send_message("hi", &[entity]).await.unwrap();

        assert_eq!(sent.chat_id, ChatId(77));
        let log = bot.sent.lock().unwrap();
        assert_eq!(log.as_slice(), &[(ChatId(77), "hi".to_string(), 1)]);
    }

    #[tokio::test]
    async fn send_message_without_bot_fails() {
        let user = User::new(UserId(1), "u", false);
        let err = user.send_message("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::BotNotSet { kind: "User" }));
    }

    #[test]
    fn serde_impls_use_the_object_contract() {
        let user: User = serde_json::from_value(json!({
            "id": 3, "is_bot": true, "first_name": "bot", "extra": 1
        }))
        .unwrap();
        assert!(user.is_bot());
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["extra"], json!(1));
        assert!(back.get("last_name").is_none());

        let err = serde_json::from_value::<User>(json!({"id": 3})).unwrap_err();
        assert!(err.to_string().contains("is_bot"));
    }
}
