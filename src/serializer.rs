use bytes::Bytes;
use redis::{ErrorKind, FromRedisValue, RedisResult, RedisWrite, ToRedisArgs, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use tracing::warn;

/// Key under which the concrete type's registered tag is stored in the
/// encoded JSON object.
const TYPE_TAG: &str = "@type";
/// Key under which the value's own JSON representation is stored.
const VALUE_FIELD: &str = "@value";

/// An encoded value payload: UTF-8 JSON of the shape
/// `{"@type": "<tag>", "@value": ...}`, or zero bytes for an absent value.
///
/// Absent and zero-length are deliberately conflated: encoding `None` yields
/// an empty envelope and decoding an empty envelope yields `None`, so the
/// empty case round-trips but is lossy with respect to "empty blob".
///
/// Envelopes convert to and from Redis bulk strings, so they can be passed
/// as the value argument of any facade method and read back out of any
/// value-returning one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope(Bytes);

impl Envelope {
    pub fn empty() -> Envelope {
        Envelope(Bytes::new())
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> Envelope {
        Envelope(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ToRedisArgs for Envelope {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(&self.0);
    }
}

impl FromRedisValue for Envelope {
    fn from_redis_value(v: &Value) -> RedisResult<Envelope> {
        match v {
            // A missing key decodes as the empty envelope, matching the
            // absent/zero-length conflation above.
            Value::Nil => Ok(Envelope::empty()),
            Value::Data(bytes) => Ok(Envelope(Bytes::copy_from_slice(bytes))),
            other => Err((
                ErrorKind::TypeError,
                "expected a bulk string reply for an envelope",
                format!("{other:?}"),
            )
                .into()),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum SerializerError {
    #[error("type {type_name} is not registered; call TypeRegistry::register first")]
    UnregisteredType { type_name: &'static str },
    #[error("envelope carries unknown type tag {tag:?}")]
    UnknownTag { tag: String },
    #[error("envelope is missing the {TYPE_TAG} tag")]
    MissingTag,
    #[error("envelope is missing the {VALUE_FIELD} field")]
    MissingValue,
    #[error("malformed envelope: {0}")]
    Malformed(String),
    #[error("envelope tagged {tag:?} does not decode to the expected type {expected}")]
    TypeMismatch { tag: String, expected: &'static str },
}

type DecodeFn = Box<dyn Fn(serde_json::Value) -> Result<Box<dyn Any>, serde_json::Error> + Send + Sync>;

/// Encodes typed values into [`Envelope`]s and back, embedding the concrete
/// type of the encoded value so decoding can rebuild it without the caller
/// naming it on the wire.
///
/// Each storable type is registered once under a stable tag; the registry
/// keeps the tag for encoding and a decode function for the way back. The
/// tag is part of the stored data, so renaming a registered tag invalidates
/// previously written envelopes.
pub struct TypeRegistry {
    tags: HashMap<TypeId, &'static str>,
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry {
            tags: HashMap::new(),
            decoders: HashMap::new(),
        }
    }

    /// Registers `T` under `tag` for both directions. Re-registering a tag
    /// replaces the previous binding.
    pub fn register<T>(&mut self, tag: &'static str)
    where
        T: Serialize + DeserializeOwned + Any,
    {
        self.tags.insert(TypeId::of::<T>(), tag);
        self.decoders.insert(
            tag,
            Box::new(|value| serde_json::from_value::<T>(value).map(|v| Box::new(v) as Box<dyn Any>)),
        );
    }

    /// Encodes a value. `None` encodes to the empty envelope rather than an
    /// error; a `Some` of an unregistered type is an error, since its tag
    /// would be unreconstructible on the way back.
    pub fn encode<T>(&self, value: Option<&T>) -> crate::Result<Envelope>
    where
        T: Serialize + Any,
    {
        let Some(value) = value else {
            return Ok(Envelope::empty());
        };

        let tag = self
            .tags
            .get(&TypeId::of::<T>())
            .ok_or(SerializerError::UnregisteredType {
                type_name: std::any::type_name::<T>(),
            })?;

        let mut body = serde_json::Map::new();
        body.insert(TYPE_TAG.to_string(), serde_json::Value::String(tag.to_string()));
        body.insert(
            VALUE_FIELD.to_string(),
            serde_json::to_value(value).map_err(|e| SerializerError::Malformed(e.to_string()))?,
        );

        Ok(Envelope(Bytes::from(
            serde_json::Value::Object(body).to_string(),
        )))
    }

    /// Decodes an envelope back into the concrete type recorded at encoding
    /// time, returned as the caller's expected type `T`.
    ///
    /// An empty envelope decodes to `None`. Bytes that are not valid UTF-8
    /// also decode to `None`, with a warning, so a corrupt text encoding is
    /// indistinguishable from an absent value; structural problems (bad
    /// JSON, missing or unknown tag, a tag whose registered type is not `T`)
    /// are surfaced as errors.
    pub fn decode<T>(&self, envelope: &Envelope) -> crate::Result<Option<T>>
    where
        T: Any,
    {
        if envelope.is_empty() {
            return Ok(None);
        }

        let text = match std::str::from_utf8(envelope.as_bytes()) {
            Ok(text) => text,
            Err(e) => {
                warn!("dropping envelope with invalid UTF-8: {e}");
                return Ok(None);
            }
        };

        let mut body: serde_json::Value =
            serde_json::from_str(text).map_err(|e| SerializerError::Malformed(e.to_string()))?;

        let tag = body
            .get(TYPE_TAG)
            .and_then(|t| t.as_str())
            .ok_or(SerializerError::MissingTag)?
            .to_string();

        let decoder = self
            .decoders
            .get(tag.as_str())
            .ok_or_else(|| SerializerError::UnknownTag { tag: tag.clone() })?;

        let value = body
            .get_mut(VALUE_FIELD)
            .map(serde_json::Value::take)
            .ok_or(SerializerError::MissingValue)?;

        let decoded = decoder(value).map_err(|e| SerializerError::Malformed(e.to_string()))?;

        match decoded.downcast::<T>() {
            Ok(v) => Ok(Some(*v)),
            Err(_) => Err(SerializerError::TypeMismatch {
                tag,
                expected: std::any::type_name::<T>(),
            }
            .into()),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        token: String,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<User>("user");
        registry.register::<Session>("session");
        registry
    }

    fn downcast(err: crate::Error) -> SerializerError {
        *err.downcast::<SerializerError>().unwrap()
    }

    #[test]
    fn round_trip_identity() {
        let registry = registry();
        let user = User {
            name: "zhangsan".to_string(),
            age: 33,
        };

        let envelope = registry.encode(Some(&user)).unwrap();
        let decoded: Option<User> = registry.decode(&envelope).unwrap();

        assert_eq!(decoded, Some(user));
    }

    #[test]
    fn envelope_embeds_the_type_tag() {
        let registry = registry();
        let user = User {
            name: "lisi".to_string(),
            age: 41,
        };

        let envelope = registry.encode(Some(&user)).unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(envelope.as_bytes()).unwrap();

        assert_eq!(body["@type"], "user");
        assert_eq!(body["@value"]["name"], "lisi");
    }

    #[test]
    fn none_encodes_to_empty() {
        let registry = registry();
        let envelope = registry.encode::<User>(None).unwrap();
        assert!(envelope.is_empty());
    }

    #[test]
    fn empty_decodes_to_none() {
        let registry = registry();
        let decoded: Option<User> = registry.decode(&Envelope::empty()).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn invalid_utf8_decodes_to_none() {
        let registry = registry();
        let envelope = Envelope::from_bytes(&b"\xfe\xfe\xff\xff"[..]);
        let decoded: Option<User> = registry.decode(&envelope).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let registry = registry();
        let envelope = Envelope::from_bytes(&b"{not json"[..]);
        let err = registry.decode::<User>(&envelope).unwrap_err();
        assert!(matches!(downcast(err), SerializerError::Malformed(_)));
    }

    #[test]
    fn missing_tag_is_an_error() {
        let registry = registry();
        let envelope = Envelope::from_bytes(r#"{"@value":{"name":"x","age":1}}"#);
        let err = registry.decode::<User>(&envelope).unwrap_err();
        assert_eq!(downcast(err), SerializerError::MissingTag);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let registry = registry();
        let envelope =
            Envelope::from_bytes(r#"{"@type":"order","@value":{"name":"x","age":1}}"#);
        let err = registry.decode::<User>(&envelope).unwrap_err();
        assert_eq!(
            downcast(err),
            SerializerError::UnknownTag {
                tag: "order".to_string()
            }
        );
    }

    #[test]
    fn expected_type_mismatch_is_an_error() {
        let registry = registry();
        let user = User {
            name: "wangwu".to_string(),
            age: 27,
        };

        // Encoded as a user, read back expecting a session.
        let envelope = registry.encode(Some(&user)).unwrap();
        let err = registry.decode::<Session>(&envelope).unwrap_err();
        assert!(matches!(
            downcast(err),
            SerializerError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn unregistered_type_fails_to_encode() {
        #[derive(Serialize)]
        struct Unregistered;

        let registry = registry();
        let err = registry.encode(Some(&Unregistered)).unwrap_err();
        assert!(matches!(
            downcast(err),
            SerializerError::UnregisteredType { .. }
        ));
    }

    #[test]
    fn envelope_from_redis_nil_is_empty() {
        let envelope = Envelope::from_redis_value(&Value::Nil).unwrap();
        assert!(envelope.is_empty());
    }

    #[test]
    fn envelope_from_redis_data_keeps_bytes() {
        let envelope = Envelope::from_redis_value(&Value::Data(b"abc".to_vec())).unwrap();
        assert_eq!(envelope.as_bytes(), b"abc");
    }

    #[test]
    fn envelope_from_redis_integer_is_an_error() {
        assert!(Envelope::from_redis_value(&Value::Int(7)).is_err());
    }
}
