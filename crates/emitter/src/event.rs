//! Event identifiers
//!
//! Keys of different kinds (booleans, integers, characters, text) can live
//! side by side in one emitter. The error channel has its own key that no
//! caller value converts into.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifier of a notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey(Repr);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Error,
    Bool(bool),
    Int(i64),
    Char(char),
    Text(Arc<str>),
}

/// Reserved key of the error channel.
///
/// Listeners registered here receive the failure record of any listener that
/// fails during a regular dispatch, followed by the original arguments.
pub const ERROR: EventKey = EventKey(Repr::Error);

impl EventKey {
    pub fn is_error(&self) -> bool {
        matches!(self.0, Repr::Error)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Repr::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.0 {
            Repr::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.0 {
            Repr::Int(value) => Some(value),
            _ => None,
        }
    }

    /// JSON form of the key, as carried by failure records. The error
    /// channel maps to `null`, which no caller key produces.
    pub fn to_value(&self) -> Value {
        match &self.0 {
            Repr::Error => Value::Null,
            Repr::Bool(value) => Value::Bool(*value),
            Repr::Int(value) => Value::from(*value),
            Repr::Char(value) => Value::String(value.to_string()),
            Repr::Text(text) => Value::String(text.to_string()),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Error => write!(f, "<error>"),
            Repr::Bool(value) => write!(f, "{}", value),
            Repr::Int(value) => write!(f, "{}", value),
            Repr::Char(value) => write!(f, "{}", value),
            Repr::Text(text) => write!(f, "{}", text),
        }
    }
}

impl Serialize for EventKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Repr::Error => serializer.serialize_none(),
            Repr::Bool(value) => serializer.serialize_bool(*value),
            Repr::Int(value) => serializer.serialize_i64(*value),
            Repr::Char(value) => serializer.serialize_char(*value),
            Repr::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl From<bool> for EventKey {
    fn from(value: bool) -> Self {
        Self(Repr::Bool(value))
    }
}

impl From<i64> for EventKey {
    fn from(value: i64) -> Self {
        Self(Repr::Int(value))
    }
}

impl From<i32> for EventKey {
    fn from(value: i32) -> Self {
        Self(Repr::Int(value.into()))
    }
}

impl From<u32> for EventKey {
    fn from(value: u32) -> Self {
        Self(Repr::Int(value.into()))
    }
}

impl From<char> for EventKey {
    fn from(value: char) -> Self {
        Self(Repr::Char(value))
    }
}

impl From<&str> for EventKey {
    fn from(value: &str) -> Self {
        Self(Repr::Text(Arc::from(value)))
    }
}

impl From<String> for EventKey {
    fn from(value: String) -> Self {
        Self(Repr::Text(Arc::from(value)))
    }
}

/// Anything an emitter operation accepts as its event argument.
///
/// `None` stands for "no event": registration rejects it, emission ignores
/// it and removal treats it as "everything".
pub trait IntoEvent {
    fn into_event(self) -> Option<EventKey>;
}

impl IntoEvent for EventKey {
    fn into_event(self) -> Option<EventKey> {
        Some(self)
    }
}

impl IntoEvent for &EventKey {
    fn into_event(self) -> Option<EventKey> {
        Some(self.clone())
    }
}

impl IntoEvent for Option<EventKey> {
    fn into_event(self) -> Option<EventKey> {
        self
    }
}

macro_rules! impl_into_event {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoEvent for $ty {
                fn into_event(self) -> Option<EventKey> {
                    Some(EventKey::from(self))
                }
            }
        )*
    };
}

impl_into_event!(bool, i64, i32, u32, char, &str, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booleans_are_distinct_keys() {
        let t = EventKey::from(true);
        let f = EventKey::from(false);
        assert_ne!(t, f);
        assert_ne!(f, EventKey::from("false"));
        assert_ne!(f, EventKey::from(""));
        assert_ne!(f, EventKey::from(0));
    }

    #[test]
    fn test_text_keys_compare_by_value() {
        assert_eq!(EventKey::from("event"), EventKey::from("event".to_string()));
        assert_eq!(EventKey::from("event").as_str(), Some("event"));
    }

    #[test]
    fn test_error_key_is_reserved() {
        assert!(ERROR.is_error());
        assert_ne!(ERROR, EventKey::from("<error>"));
        assert!(!EventKey::from("<error>").is_error());
    }

    #[test]
    fn test_into_event() {
        assert_eq!("x".into_event(), Some(EventKey::from("x")));
        assert_eq!(false.into_event(), Some(EventKey::from(false)));
        assert_eq!(None::<EventKey>.into_event(), None);
        assert_eq!((&ERROR).into_event(), Some(ERROR));
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(ERROR.to_string(), "<error>");
        assert_eq!(EventKey::from(42).to_string(), "42");
        assert_eq!(serde_json::to_value(EventKey::from(true)).unwrap(), serde_json::json!(true));
        assert_eq!(serde_json::to_value(ERROR).unwrap(), Value::Null);
    }

    #[test]
    fn test_to_value_keeps_kinds_apart() {
        assert_eq!(EventKey::from(true).to_value(), serde_json::json!(true));
        assert_eq!(EventKey::from("true").to_value(), serde_json::json!("true"));
        assert_ne!(EventKey::from(1).to_value(), EventKey::from("1").to_value());
        assert_ne!(ERROR.to_value(), EventKey::from("<error>").to_value());
        assert_eq!(ERROR.to_value(), serde_json::to_value(ERROR).unwrap());
    }
}
