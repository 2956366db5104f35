//! Settings mappings exchanged over a relation.
//!
//! On the wire every value is a string ([`RawSettings`]). Readers see the decoded
//! form ([`Settings`]): each raw value is parsed as JSON when it can be, kept as a
//! plain string when it cannot, and an empty string reads as null.

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

pub use serde_json::Value;

/// Decoded settings: key -> JSON value.
pub type Settings = BTreeMap<String, Value>;

/// Wire-level settings: key -> raw string.
pub type RawSettings = BTreeMap<String, String>;

/// Decode one raw wire value.
pub fn decode_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Encode a value for the wire. Strings are JSON-quoted so they decode back unchanged.
pub fn encode_value(value: &Value) -> String {
    value.to_string()
}

/// Decode a whole raw mapping.
pub fn decode_all(raw: &RawSettings) -> Settings {
    raw.iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Whether a value carries meaning: non-empty string/array/object, `true`, non-zero number.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Pick `keys` out of `source`. Every requested key is present in the result;
/// missing ones map to null. Duplicate keys collapse to one entry.
pub fn select<'a, I>(source: &Settings, keys: I) -> Settings
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|k| (k.to_string(), source.get(k).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Deserialize a settings mapping into a typed struct.
pub fn decode<T: DeserializeOwned>(settings: &Settings) -> Result<T, SettingsError> {
    let object: serde_json::Map<String, Value> = settings
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    serde_json::from_value(Value::Object(object)).map_err(SettingsError::Decode)
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to decode settings: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Network settings as returned by `get_network_data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkData {
    pub network_manager: Option<String>,
    pub quantum_plugin: Option<String>,
    pub quantum_security_groups: Option<String>,
    pub quantum_url: Option<String>,
}

/// Serial console settings as returned by `get_console_data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleData {
    #[serde(default, deserialize_with = "deser_flag_opt")]
    pub enable_serial_console: Option<bool>,
    pub serial_console_base_url: Option<String>,
}

/// A boolean written either as JSON or as a string in any case (`"True"`, `"false"`).
fn deser_flag_opt<'de, D>(deser: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deser)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(de::Error::invalid_value(
            de::Unexpected::Other(&other.to_string()),
            &"a boolean or \"true\"/\"false\"",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_json_and_plain_strings() {
        assert_eq!(decode_value("true"), json!(true));
        assert_eq!(decode_value("\"cinder\""), json!("cinder"));
        assert_eq!(decode_value("{\"a\": 1}"), json!({"a": 1}));
        assert_eq!(decode_value("42"), json!(42));
        // Not JSON: kept verbatim.
        assert_eq!(decode_value("http://bob:345/dddd/"), json!("http://bob:345/dddd/"));
        assert_eq!(decode_value("a-uuid"), json!("a-uuid"));
        assert_eq!(decode_value(""), Value::Null);
    }

    #[test]
    fn encoded_values_decode_unchanged() {
        for v in [json!("vTRManager"), json!(true), json!(null), json!({"x": [1, 2]})] {
            assert_eq!(decode_value(&encode_value(&v)), v);
        }
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!("nm")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!(["x"])));
    }

    #[test]
    fn select_fills_missing_with_null() {
        let mut source = Settings::new();
        source.insert("key1".into(), json!("value1"));
        source.insert("key2".into(), json!("value2"));
        source.insert("key3".into(), json!("value3"));

        let out = select(&source, ["key1", "key3"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out["key1"], json!("value1"));
        assert_eq!(out["key3"], json!("value3"));

        let out = select(&source, ["key1", "nope", "key1"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out["nope"], Value::Null);

        assert!(select(&source, std::iter::empty::<&str>()).is_empty());
    }

    #[test]
    fn decode_typed() {
        let mut source = Settings::new();
        source.insert("enable_serial_console".into(), json!(true));
        source.insert("serial_console_base_url".into(), Value::Null);
        let console: ConsoleData = decode(&source).unwrap();
        assert_eq!(
            console,
            ConsoleData {
                enable_serial_console: Some(true),
                serial_console_base_url: None,
            }
        );

        for (written, expected) in [("True", true), ("False", false), ("TRUE", true), ("false", false)] {
            source.insert("enable_serial_console".into(), json!(written));
            let console: ConsoleData = decode(&source).unwrap();
            assert_eq!(console.enable_serial_console, Some(expected));
        }

        source.insert("enable_serial_console".into(), json!("maybe"));
        assert!(matches!(
            decode::<ConsoleData>(&source),
            Err(SettingsError::Decode(_))
        ));
    }
}
