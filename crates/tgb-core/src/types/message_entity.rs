//! Special spans of text in a message: hashtags, usernames, links, formatting.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    bot::BotHandle,
    constants::MessageEntityType,
    errors::Error,
    object::{self, put_opt, FieldReader, JsonMap, TelegramObject},
    types::User,
    utf16::{code_point_offsets, utf16_len, Utf16Text},
    Result,
};

/// The `type` of an entity.
///
/// Strings this library knows are normalized to [`MessageEntityType`]; anything
/// else is kept verbatim so newer servers don't break older clients. Equality
/// and hashing go through the wire string.
#[derive(Clone, Debug)]
pub enum EntityType {
    Known(MessageEntityType),
    Unknown(String),
}

impl EntityType {
    /// Lookup with fallback: never fails.
    pub fn parse(s: &str) -> Self {
        match MessageEntityType::parse(s) {
            Some(t) => EntityType::Known(t),
            None => EntityType::Unknown(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Known(t) => t.as_str(),
            EntityType::Unknown(s) => s,
        }
    }

    pub fn known(&self) -> Option<MessageEntityType> {
        match self {
            EntityType::Known(t) => Some(*t),
            EntityType::Unknown(s) => MessageEntityType::parse(s),
        }
    }
}

impl From<MessageEntityType> for EntityType {
    fn from(t: MessageEntityType) -> Self {
        EntityType::Known(t)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType::parse(s)
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match MessageEntityType::parse(&s) {
            Some(t) => EntityType::Known(t),
            None => EntityType::Unknown(s),
        }
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq<MessageEntityType> for EntityType {
    fn eq(&self, other: &MessageEntityType) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<str> for EntityType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EntityType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(EntityType::from)
    }
}

/// One special span of a message text.
///
/// `offset` and `length` are in UTF-16 code units. `url` belongs to
/// `text_link`, `user` to `text_mention`, `language` to `pre` and
/// `custom_emoji_id` to `custom_emoji`; raw server data is not cross-checked.
///
/// Values are immutable: the `with_*` builders consume the entity and return a
/// new one. Equality and hashing cover every declared attribute but not
/// `api_kwargs`.
#[derive(Clone, Debug)]
pub struct MessageEntity {
    kind: EntityType,
    offset: usize,
    length: usize,
    url: Option<String>,
    user: Option<Arc<User>>,
    language: Option<String>,
    custom_emoji_id: Option<String>,
    api_kwargs: JsonMap,
}

impl MessageEntity {
    pub fn new(kind: impl Into<EntityType>, offset: usize, length: usize) -> Self {
        Self {
            kind: kind.into(),
            offset,
            length,
            url: None,
            user: None,
            language: None,
            custom_emoji_id: None,
            api_kwargs: JsonMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<Arc<User>>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_custom_emoji_id(mut self, custom_emoji_id: impl Into<String>) -> Self {
        self.custom_emoji_id = Some(custom_emoji_id.into());
        self
    }

    pub fn kind(&self) -> &EntityType {
        &self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// First UTF-16 position after the span, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn custom_emoji_id(&self) -> Option<&str> {
        self.custom_emoji_id.as_deref()
    }

    /// The part of `text` this entity covers.
    ///
    /// `None` when the span does not fit `text` or splits a surrogate pair.
    pub fn extract(&self, text: &str) -> Option<String> {
        Utf16Text::new(text).slice(self.offset, self.length)
    }

    /// Pair every entity with the text it covers, keeping input order.
    ///
    /// `types` limits the result to those kinds; `None` keeps all, including
    /// unknown ones. Entities that don't fit `text` are skipped.
    pub fn parse_entities(
        text: &str,
        entities: &[MessageEntity],
        types: Option<&[MessageEntityType]>,
    ) -> Vec<(MessageEntity, String)> {
        let encoded = Utf16Text::new(text);
        entities
            .iter()
            .filter(|e| match types {
                None => true,
                Some(types) => e.kind.known().is_some_and(|k| types.contains(&k)),
            })
            .filter_map(|e| {
                encoded
                    .slice(e.offset, e.length)
                    .map(|covered| (e.clone(), covered))
            })
            .collect()
    }

    /// Move every entity by `by` UTF-16 units. Useful when prepending or
    /// stripping text in front of formatted content.
    pub fn shift_entities(by: i64, entities: &[MessageEntity]) -> Result<Vec<MessageEntity>> {
        entities
            .iter()
            .map(|e| -> Result<MessageEntity> {
                let shifted = i64::try_from(e.offset)
                    .ok()
                    .and_then(|offset| offset.checked_add(by))
                    .and_then(|offset| usize::try_from(offset).ok())
                    .ok_or_else(|| Error::InvalidField {
                        kind: Self::KIND,
                        field: "offset",
                        reason: format!("shifting offset {} by {by} leaves the text", e.offset),
                    })?;
                Ok(e.clone().at_offset(shifted))
            })
            .collect()
    }

    /// Join texts and their entities into one message.
    ///
    /// Entities of each part are moved past the UTF-16 length of everything
    /// before it. Plain text parts pass an empty slice. An offset that no
    /// longer fits in `usize` is `Error::InvalidField`.
    pub fn concatenate<'a, I>(parts: I) -> Result<(String, Vec<MessageEntity>)>
    where
        I: IntoIterator<Item = (&'a str, &'a [MessageEntity])>,
    {
        let mut text = String::new();
        let mut entities = Vec::new();
        let mut position = 0usize;

        for (part, part_entities) in parts {
            for e in part_entities {
                let offset = e.offset.checked_add(position).ok_or_else(|| Error::InvalidField {
                    kind: Self::KIND,
                    field: "offset",
                    reason: format!("offset {} past position {position} overflows", e.offset),
                })?;
                entities.push(e.clone().at_offset(offset));
            }
            text.push_str(part);
            position = position.saturating_add(utf16_len(part));
        }

        Ok((text, entities))
    }

    /// Convert entities whose offsets and lengths count code points into
    /// UTF-16 units, as the API expects. Spans past the end of `text` are
    /// clamped to it.
    pub fn adjust_message_entities_to_utf_16(
        text: &str,
        entities: &[MessageEntity],
    ) -> Vec<MessageEntity> {
        let offsets = code_point_offsets(text);
        let last = offsets.len() - 1;

        entities
            .iter()
            .map(|e| {
                let start = e.offset.min(last);
                let end = e.offset.saturating_add(e.length).min(last);
                let mut adjusted = e.clone().at_offset(offsets[start]);
                adjusted.length = offsets[end] - offsets[start];
                adjusted
            })
            .collect()
    }

    fn at_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl TelegramObject for MessageEntity {
    const KIND: &'static str = "MessageEntity";
    const FIELDS: &'static [&'static str] = &[
        "type",
        "offset",
        "length",
        "url",
        "user",
        "language",
        "custom_emoji_id",
    ];
    const REQUIRED: &'static [&'static str] = &["type", "offset", "length"];

    fn from_fields(fields: &mut FieldReader, bot: Option<&BotHandle>) -> Result<Self> {
        Ok(Self {
            kind: fields.required("type")?,
            offset: fields.required("offset")?,
            length: fields.required("length")?,
            url: fields.optional("url")?,
            user: fields.nested::<User>("user", bot)?.map(Arc::new),
            language: fields.optional("language")?,
            custom_emoji_id: fields.optional("custom_emoji_id")?,
            api_kwargs: JsonMap::new(),
        })
    }

    fn write_fields(&self, out: &mut JsonMap) {
        out.insert("type".to_string(), self.kind.as_str().into());
        out.insert("offset".to_string(), self.offset.into());
        out.insert("length".to_string(), self.length.into());
        put_opt(out, "url", &self.url);
        if let Some(user) = &self.user {
            out.insert("user".to_string(), user.to_dict().into());
        }
        put_opt(out, "language", &self.language);
        put_opt(out, "custom_emoji_id", &self.custom_emoji_id);
    }

    fn api_kwargs(&self) -> &JsonMap {
        &self.api_kwargs
    }

    fn with_api_kwargs(mut self, api_kwargs: JsonMap) -> Self {
        self.api_kwargs = api_kwargs;
        self
    }
}

impl PartialEq for MessageEntity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.offset == other.offset
            && self.length == other.length
            && self.url == other.url
            && self.user == other.user
            && self.language == other.language
            && self.custom_emoji_id == other.custom_emoji_id
    }
}

impl Eq for MessageEntity {}

impl Hash for MessageEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.offset.hash(state);
        self.length.hash(state);
        self.url.hash(state);
        self.user.hash(state);
        self.language.hash(state);
        self.custom_emoji_id.hash(state);
    }
}

impl Serialize for MessageEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        object::serialize_object(self, serializer)
    }
}

impl<'de> Deserialize<'de> for MessageEntity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        object::deserialize_object(deserializer)
    }
}
