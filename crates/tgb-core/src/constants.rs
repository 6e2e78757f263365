//! Wire-level constants of the Bot API.

use std::fmt;

/// Entity kinds known to this library.
///
/// The server may introduce new kinds at any time; those are carried as
/// [`crate::EntityType::Unknown`] instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageEntityType {
    Blockquote,
    Bold,
    BotCommand,
    Cashtag,
    Code,
    CustomEmoji,
    Email,
    ExpandableBlockquote,
    Hashtag,
    Italic,
    Mention,
    PhoneNumber,
    Pre,
    Spoiler,
    Strikethrough,
    TextLink,
    TextMention,
    Underline,
    Url,
}

impl MessageEntityType {
    pub const ALL: [MessageEntityType; 19] = [
        MessageEntityType::Blockquote,
        MessageEntityType::Bold,
        MessageEntityType::BotCommand,
        MessageEntityType::Cashtag,
        MessageEntityType::Code,
        MessageEntityType::CustomEmoji,
        MessageEntityType::Email,
        MessageEntityType::ExpandableBlockquote,
        MessageEntityType::Hashtag,
        MessageEntityType::Italic,
        MessageEntityType::Mention,
        MessageEntityType::PhoneNumber,
        MessageEntityType::Pre,
        MessageEntityType::Spoiler,
        MessageEntityType::Strikethrough,
        MessageEntityType::TextLink,
        MessageEntityType::TextMention,
        MessageEntityType::Underline,
        MessageEntityType::Url,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageEntityType::Blockquote => "blockquote",
            MessageEntityType::Bold => "bold",
            MessageEntityType::BotCommand => "bot_command",
            MessageEntityType::Cashtag => "cashtag",
            MessageEntityType::Code => "code",
            MessageEntityType::CustomEmoji => "custom_emoji",
            MessageEntityType::Email => "email",
            MessageEntityType::ExpandableBlockquote => "expandable_blockquote",
            MessageEntityType::Hashtag => "hashtag",
            MessageEntityType::Italic => "italic",
            MessageEntityType::Mention => "mention",
            MessageEntityType::PhoneNumber => "phone_number",
            MessageEntityType::Pre => "pre",
            MessageEntityType::Spoiler => "spoiler",
            MessageEntityType::Strikethrough => "strikethrough",
            MessageEntityType::TextLink => "text_link",
            MessageEntityType::TextMention => "text_mention",
            MessageEntityType::Underline => "underline",
            MessageEntityType::Url => "url",
        }
    }

    /// Exact lookup of a wire string. Returns `None` for kinds we don't know.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for MessageEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markdown dialects accepted by the `parse_mode` of send methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkdownVersion {
    V1,
    V2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_inverse_of_as_str() {
        for t in MessageEntityType::ALL {
            assert_eq!(MessageEntityType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_case_mismatch() {
        assert_eq!(MessageEntityType::parse("some_future_type"), None);
        assert_eq!(MessageEntityType::parse("BOLD"), None);
        assert_eq!(MessageEntityType::parse(""), None);
    }

    #[test]
    fn all_is_sorted_and_unique() {
        let mut sorted = MessageEntityType::ALL.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, MessageEntityType::ALL.to_vec());
    }
}
