//! API resource types

use std::fmt;

use clap::ValueEnum;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// The API is loose about scalar types: numbers and booleans arrive as
// strings ("2", "1"), and unset strings arrive as null.

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(u64),
    Text(String),
}

pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    match Option::<Loose>::deserialize(d)? {
        None => Ok(0),
        Some(Loose::Number(n)) => u32::try_from(n).map_err(de::Error::custom),
        Some(Loose::Text(s)) if s.is_empty() => Ok(0),
        Some(Loose::Text(s)) => s.parse().map_err(de::Error::custom),
        Some(Loose::Bool(b)) => Err(de::Error::custom(format!("expected a number, got {}", b))),
    }
}

pub(crate) fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    match Option::<Loose>::deserialize(d)? {
        None => Ok(false),
        Some(Loose::Bool(b)) => Ok(b),
        Some(Loose::Number(n)) => Ok(n != 0),
        Some(Loose::Text(s)) => match s.as_str() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(de::Error::custom(format!("expected a boolean, got '{}'", other))),
        },
    }
}

pub(crate) fn nullable_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub service_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    #[serde(deserialize_with = "lenient_u32")]
    pub number: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub locked: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub deployed: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub staging: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub testing: bool,
    #[serde(default, deserialize_with = "nullable_string")]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Version {
    /// Active and locked versions cannot be changed in place.
    pub fn is_editable(&self) -> bool {
        !(self.active || self.locked)
    }
}

/// Where in the generated VCL a snippet is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnippetType {
    Init,
    Recv,
    Hash,
    Hit,
    Miss,
    Pass,
    Fetch,
    Error,
    Deliver,
    Log,
    None,
}

impl SnippetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetType::Init => "init",
            SnippetType::Recv => "recv",
            SnippetType::Hash => "hash",
            SnippetType::Hit => "hit",
            SnippetType::Miss => "miss",
            SnippetType::Pass => "pass",
            SnippetType::Fetch => "fetch",
            SnippetType::Error => "error",
            SnippetType::Deliver => "deliver",
            SnippetType::Log => "log",
            SnippetType::None => "none",
        }
    }
}

impl fmt::Display for SnippetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A VCL snippet attached to a service version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default, deserialize_with = "nullable_string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(rename = "version", default, deserialize_with = "lenient_u32")]
    pub service_version: u32,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub snippet_type: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub priority: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub dynamic: bool,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
}

/// Content of a dynamic snippet, which lives outside any version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicSnippet {
    #[serde(rename = "snippet_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_editability() {
        let v: Version = serde_json::from_str(r#"{"number":3,"active":"0","locked":"1"}"#).unwrap();
        assert!(!v.is_editable());

        let v: Version = serde_json::from_str(r#"{"number":4,"active":null}"#).unwrap();
        assert!(v.is_editable());
    }

    #[test]
    fn snippet_accepts_string_numbers() {
        let s: Snippet = serde_json::from_str(
            r#"{"id":"abc","name":"geo","service_id":"svc","version":"2","type":"recv",
                "priority":"100","dynamic":"1","content":null}"#,
        )
        .unwrap();
        assert_eq!(s.service_version, 2);
        assert_eq!(s.priority, 100);
        assert!(s.dynamic);
        assert_eq!(s.content, "");
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = serde_json::from_str::<Version>(r#"{"number":"three"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid digit"));
    }
}
