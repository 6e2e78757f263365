//! Formatting utilities (escaping, message text + entities → Telegram HTML).

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    constants::{MarkdownVersion, MessageEntityType},
    types::MessageEntity,
    utf16::Utf16Text,
};

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape Telegram Markdown special characters.
///
/// For MarkdownV2 the set depends on where the text ends up: inside `pre`/`code`
/// only `\` and `` ` `` matter, inside a `text_link` URL or `custom_emoji` id
/// only `\` and `)`.
pub fn escape_markdown(
    text: &str,
    version: MarkdownVersion,
    entity_type: Option<MessageEntityType>,
) -> String {
    static V1: OnceLock<Regex> = OnceLock::new();
    static V2_CODE: OnceLock<Regex> = OnceLock::new();
    static V2_LINK: OnceLock<Regex> = OnceLock::new();
    static V2: OnceLock<Regex> = OnceLock::new();

    let (cell, special) = match version {
        MarkdownVersion::V1 => (&V1, r"_*`["),
        MarkdownVersion::V2 => match entity_type {
            Some(MessageEntityType::Pre | MessageEntityType::Code) => (&V2_CODE, r"\`"),
            Some(MessageEntityType::TextLink | MessageEntityType::CustomEmoji) => (&V2_LINK, r"\)"),
            _ => (&V2, r"\_*[]()~`>#+-=|{}.!"),
        },
    };

    let re = cell.get_or_init(|| {
        Regex::new(&format!("([{}])", regex::escape(special))).expect("valid regex")
    });
    re.replace_all(text, r"\$1").into_owned()
}

/// Render a message text and its entities as Telegram HTML.
///
/// Nested entities are rendered inside their parent. Entities that partially
/// overlap an already rendered one are dropped. Plain `url` entities become
/// links only when `urled` is set; unknown kinds keep their text unformatted.
pub fn render_html(text: &str, entities: &[MessageEntity], urled: bool) -> String {
    let encoded = Utf16Text::new(text);
    let mut sorted: Vec<&MessageEntity> = entities.iter().collect();
    sorted.sort_by_key(|e| (e.offset(), std::cmp::Reverse(e.length())));
    render_span(&encoded, &sorted, 0, encoded.len(), urled)
}

fn render_span(
    text: &Utf16Text,
    entities: &[&MessageEntity],
    start: usize,
    end: usize,
    urled: bool,
) -> String {
    let mut out = String::new();
    let mut cursor = start;
    let mut consumed = vec![false; entities.len()];

    for (i, entity) in entities.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        if entity.offset() < cursor || entity.offset() > end {
            continue;
        }

        let span_end = entity.end().min(end);
        let mut nested = Vec::new();
        for (j, other) in entities.iter().enumerate().skip(i + 1) {
            if consumed[j] || other.offset() < entity.offset() || other.end() > entity.end() {
                continue;
            }
            consumed[j] = true;
            // Exact duplicates collapse into the outer entity.
            if *other != *entity {
                nested.push(*other);
            }
        }

        out.push_str(&escape_html(&text.slice_lossy(cursor, entity.offset())));
        let raw = text.slice_lossy(entity.offset(), span_end);
        let inner = if nested.is_empty() {
            escape_html(&raw)
        } else {
            render_span(text, &nested, entity.offset(), span_end, urled)
        };
        out.push_str(&wrap_html(entity, &inner, &raw, urled));
        cursor = span_end;
    }

    if cursor < end {
        out.push_str(&escape_html(&text.slice_lossy(cursor, end)));
    }
    out
}

fn wrap_html(entity: &MessageEntity, inner: &str, raw: &str, urled: bool) -> String {
    let Some(kind) = entity.kind().known() else {
        return inner.to_string();
    };

    match kind {
        MessageEntityType::TextLink => match entity.url() {
            Some(url) => format!("<a href=\"{}\">{inner}</a>", escape_html(url)),
            None => inner.to_string(),
        },
        MessageEntityType::TextMention => match entity.user() {
            Some(user) => format!("<a href=\"tg://user?id={}\">{inner}</a>", user.id().0),
            None => inner.to_string(),
        },
        MessageEntityType::Url if urled => {
            format!("<a href=\"{}\">{inner}</a>", escape_html(raw))
        }
        MessageEntityType::Bold => format!("<b>{inner}</b>"),
        MessageEntityType::Italic => format!("<i>{inner}</i>"),
        MessageEntityType::Underline => format!("<u>{inner}</u>"),
        MessageEntityType::Strikethrough => format!("<s>{inner}</s>"),
        MessageEntityType::Spoiler => format!("<span class=\"tg-spoiler\">{inner}</span>"),
        MessageEntityType::Code => format!("<code>{inner}</code>"),
        MessageEntityType::Pre => match entity.language() {
            Some(lang) => format!(
                "<pre><code class=\"language-{}\">{inner}</code></pre>",
                escape_html(lang)
            ),
            None => format!("<pre>{inner}</pre>"),
        },
        MessageEntityType::CustomEmoji => match entity.custom_emoji_id() {
            Some(id) => format!("<tg-emoji emoji-id=\"{}\">{inner}</tg-emoji>", escape_html(id)),
            None => inner.to_string(),
        },
        MessageEntityType::Blockquote => format!("<blockquote>{inner}</blockquote>"),
        MessageEntityType::ExpandableBlockquote => {
            format!("<blockquote expandable>{inner}</blockquote>")
        }
        _ => inner.to_string(),
    }
}
