//! The mapping-to-object contract shared by every API object kind.
//!
//! Objects are decoded field by field from a raw JSON mapping. Whatever is left
//! after the declared fields are taken becomes the object's `api_kwargs`, so
//! fields added by newer Bot API versions survive a read-modify-write cycle.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{bot::BotHandle, errors::Error, Result};

pub type JsonMap = serde_json::Map<String, Value>;

pub trait TelegramObject: Sized {
    /// Bot API type name, used in error messages.
    const KIND: &'static str;
    /// Wire names of every declared attribute.
    const FIELDS: &'static [&'static str];
    /// Subset of `FIELDS` that must be present in raw input.
    const REQUIRED: &'static [&'static str];

    /// Take the declared fields out of `fields`. Leftovers become `api_kwargs`.
    fn from_fields(fields: &mut FieldReader, bot: Option<&BotHandle>) -> Result<Self>;

    /// Write every present declared field. Absent optionals are skipped.
    fn write_fields(&self, out: &mut JsonMap);

    fn api_kwargs(&self) -> &JsonMap;

    fn with_api_kwargs(self, api_kwargs: JsonMap) -> Self;

    /// Build an object from a raw mapping. `None` in, `None` out.
    fn de_json(data: Option<JsonMap>, bot: Option<&BotHandle>) -> Result<Option<Self>> {
        let Some(data) = data else {
            return Ok(None);
        };

        let mut reader = FieldReader::new(Self::KIND, data);
        for &field in Self::REQUIRED {
            if !reader.has(field) {
                return Err(Error::MissingField {
                    kind: Self::KIND,
                    field,
                });
            }
        }

        let obj = Self::from_fields(&mut reader, bot)?;
        Ok(Some(obj.with_api_kwargs(reader.finish())))
    }

    /// Like [`TelegramObject::de_json`] but for an arbitrary JSON value.
    /// `null` is treated as absent.
    fn de_value(data: Value, bot: Option<&BotHandle>) -> Result<Option<Self>> {
        match data {
            Value::Null => Ok(None),
            Value::Object(map) => Self::de_json(Some(map), bot),
            _ => Err(Error::NotAnObject { kind: Self::KIND }),
        }
    }

    /// Decode a JSON array of objects, skipping `null` entries.
    fn de_list(data: Vec<Value>, bot: Option<&BotHandle>) -> Result<Vec<Self>> {
        let mut out = Vec::with_capacity(data.len());
        for item in data {
            if let Some(obj) = Self::de_value(item, bot)? {
                out.push(obj);
            }
        }
        Ok(out)
    }

    /// Raw mapping suitable for sending to the API.
    fn to_dict(&self) -> JsonMap {
        let mut out = JsonMap::new();
        self.write_fields(&mut out);
        for (k, v) in self.api_kwargs() {
            if !out.contains_key(k) && !Self::FIELDS.iter().any(|f| *f == k.as_str()) {
                out.insert(k.clone(), v.clone());
            }
        }
        out
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_dict())?)
    }
}

/// Typed access to the fields of a raw mapping.
///
/// Every accessor removes the field it reads; JSON `null` counts as absent.
#[derive(Debug)]
pub struct FieldReader {
    kind: &'static str,
    data: JsonMap,
}

impl FieldReader {
    pub fn new(kind: &'static str, data: JsonMap) -> Self {
        Self { kind, data }
    }

    pub fn has(&self, field: &str) -> bool {
        matches!(self.data.get(field), Some(v) if !v.is_null())
    }

    pub fn required<T: DeserializeOwned>(&mut self, field: &'static str) -> Result<T> {
        let Some(value) = self.take(field) else {
            return Err(Error::MissingField {
                kind: self.kind,
                field,
            });
        };
        self.decode(field, value)
    }

    pub fn optional<T: DeserializeOwned>(&mut self, field: &'static str) -> Result<Option<T>> {
        self.take(field)
            .map(|value| self.decode(field, value))
            .transpose()
    }

    /// Decode a nested API object, threading the same bot handle.
    pub fn nested<O: TelegramObject>(
        &mut self,
        field: &'static str,
        bot: Option<&BotHandle>,
    ) -> Result<Option<O>> {
        match self.take(field) {
            None => Ok(None),
            Some(Value::Object(map)) => O::de_json(Some(map), bot),
            Some(_) => Err(Error::InvalidField {
                kind: self.kind,
                field,
                reason: format!("expected a {} object", O::KIND),
            }),
        }
    }

    /// Hand back everything that was not read.
    pub fn finish(self) -> JsonMap {
        #[cfg(feature = "tracing")]
        if !self.data.is_empty() {
            tracing::debug!(
                kind = self.kind,
                fields = ?self.data.keys().collect::<Vec<_>>(),
                "keeping unrecognized fields in api_kwargs"
            );
        }
        self.data
    }

    fn take(&mut self, field: &str) -> Option<Value> {
        match self.data.remove(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn decode<T: DeserializeOwned>(&self, field: &'static str, value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Error::InvalidField {
            kind: self.kind,
            field,
            reason: e.to_string(),
        })
    }
}

/// Insert `value` under `field` when present.
pub fn put_opt<V>(out: &mut JsonMap, field: &str, value: &Option<V>)
where
    V: Clone + Into<Value>,
{
    if let Some(v) = value {
        out.insert(field.to_string(), v.clone().into());
    }
}

/// Helper for `impl Serialize`: serialize through [`TelegramObject::to_dict`].
pub fn serialize_object<T, S>(obj: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: TelegramObject,
    S: Serializer,
{
    obj.to_dict().serialize(serializer)
}

/// Helper for `impl Deserialize`: decode through [`TelegramObject::de_value`] without a bot.
pub fn deserialize_object<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: TelegramObject,
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = Value::deserialize(deserializer)?;
    T::de_value(value, None)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom(format!("{}: expected a JSON object, got null", T::KIND)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> JsonMap {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn reader_treats_null_as_absent() {
        let mut r = FieldReader::new("Thing", map(json!({"a": null, "b": 2})));
        assert!(!r.has("a"));
        assert!(r.has("b"));
        assert_eq!(r.optional::<i64>("a").unwrap(), None);
        assert_eq!(r.optional::<i64>("b").unwrap(), Some(2));
        assert!(r.finish().is_empty());
    }

    #[test]
    fn reader_reports_missing_and_invalid_fields() {
        let mut r = FieldReader::new("Thing", map(json!({"n": "not a number"})));
        match r.required::<String>("s") {
            Err(Error::MissingField { kind, field }) => {
                assert_eq!(kind, "Thing");
                assert_eq!(field, "s");
            }
            other => panic!("expected missing field, got {other:?}"),
        }
        match r.required::<u32>("n") {
            Err(Error::InvalidField { field, .. }) => assert_eq!(field, "n"),
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn reader_keeps_unread_fields() {
        let mut r = FieldReader::new("Thing", map(json!({"a": 1, "extra": {"x": true}})));
        let _: i64 = r.required("a").unwrap();
        let rest = r.finish();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["extra"], json!({"x": true}));
    }
}
