//! Decoded node payloads.
//!
//! Node values are small serialized strings; each producer kind decodes
//! its value into a typed payload exactly once at this boundary. Every
//! decoder is parse-or-default: a malformed value yields the kind's
//! legacy/unparsed fallback variant, never an error, so resolution can't
//! fail on payload corruption.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ratio::AspectRatio;

/// One named entity held by a character node.
///
/// A node holds an ordered list of these; at most one may be marked
/// primary. Inactive records are excluded from default resolution but
/// stay addressable through indexed handles.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CharacterRecord {
    #[serde(default)]
    pub name: String,
    /// Short alias used in prompt references.
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub prompt: String,
    /// Free-text multi-section description (appearance/personality/clothing).
    #[serde(default)]
    pub description: String,
    /// Inline thumbnail references (data URIs) per aspect ratio.
    /// Full-resolution payloads live in the slot store, never here.
    #[serde(default)]
    pub thumbnails: BTreeMap<AspectRatio, String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Decoded value of a character node.
#[derive(Clone, Debug, PartialEq)]
pub enum CharacterValue {
    Roster(Vec<CharacterRecord>),
    /// Unparseable payload kept verbatim; resolves to an empty roster.
    Legacy(String),
}

#[derive(Deserialize)]
struct RosterWire {
    #[serde(default)]
    characters: Vec<CharacterRecord>,
}

impl CharacterValue {
    pub fn parse(raw: &str) -> Self {
        if let Ok(wire) = serde_json::from_str::<RosterWire>(raw) {
            return CharacterValue::Roster(wire.characters);
        }
        // Older payloads stored the record list as a bare array.
        if let Ok(records) = serde_json::from_str::<Vec<CharacterRecord>>(raw) {
            return CharacterValue::Roster(records);
        }
        if !raw.trim().is_empty() {
            warn!("Malformed character payload, resolving as empty roster");
        }
        CharacterValue::Legacy(raw.to_string())
    }

    pub fn records(&self) -> &[CharacterRecord] {
        match self {
            CharacterValue::Roster(records) => records,
            CharacterValue::Legacy(_) => &[],
        }
    }

    /// Active records, in roster order.
    pub fn active(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.records().iter().filter(|r| r.is_active)
    }

    /// The record default resolution treats as "the" character.
    ///
    /// A record explicitly marked primary wins, but only while active —
    /// an inactive primary yields nothing rather than silently promoting
    /// another record. With no primary marked, the first active record
    /// stands in.
    pub fn primary_active(&self) -> Option<&CharacterRecord> {
        match self.records().iter().find(|r| r.is_primary) {
            Some(primary) => primary.is_active.then_some(primary),
            None => self.active().next(),
        }
    }
}

/// Decoded value of an image node: generation prompt plus an optional
/// inline thumbnail reference.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageValue {
    Meta {
        prompt: String,
        thumbnail: Option<String>,
    },
    /// Unparseable payload: a bare data URI acts as the thumbnail, any
    /// other text acts as the prompt.
    Legacy(String),
}

#[derive(Deserialize)]
struct ImageWire {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    thumbnail: Option<String>,
}

impl ImageValue {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<ImageWire>(raw) {
            Ok(wire) => ImageValue::Meta {
                prompt: wire.prompt,
                thumbnail: wire.thumbnail,
            },
            Err(_) => ImageValue::Legacy(raw.to_string()),
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            ImageValue::Meta { prompt, .. } => Some(prompt.as_str()),
            ImageValue::Legacy(raw) if raw.starts_with("data:") => None,
            ImageValue::Legacy(raw) => Some(raw.as_str()),
        }
    }

    pub fn thumbnail(&self) -> Option<&str> {
        match self {
            ImageValue::Meta { thumbnail, .. } => thumbnail.as_deref(),
            ImageValue::Legacy(raw) if raw.starts_with("data:") => Some(raw.as_str()),
            ImageValue::Legacy(_) => None,
        }
    }
}

/// Decoded value of an analysis node: a flat map of named text fields,
/// one output handle per field.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisValue {
    Fields(Map<String, Value>),
    Legacy(String),
}

impl AnalysisValue {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => AnalysisValue::Fields(fields),
            _ => AnalysisValue::Legacy(raw.to_string()),
        }
    }

    /// Named field as text; the documented default for a missing or
    /// non-string field is the empty string.
    pub fn field(&self, name: &str) -> String {
        match self {
            AnalysisValue::Fields(fields) => fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            AnalysisValue::Legacy(_) => String::new(),
        }
    }
}
