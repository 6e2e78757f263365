/// Core error type.
///
/// Construction errors carry the API object kind and the wire name of the
/// offending field so callers can report malformed server payloads precisely.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind}: missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{kind}: invalid field `{field}`: {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("{kind}: expected a JSON object")]
    NotAnObject { kind: &'static str },

    #[error("{kind}: no bot associated with this object, shortcuts cannot be used")]
    BotNotSet { kind: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
