//! Node model for the canvas graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a node, used as the key for connections, slot-store
/// addressing, and cache scoping.
pub type NodeId = Uuid;

/// Closed enumeration of node kinds on the canvas.
///
/// Producer kinds emit a value downstream; `Reroute` forwards whatever is
/// connected to it, and `Preview` only consumes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Plain text producer; the node value is the text itself.
    Text,
    /// Structured text producer exposing one output handle per field.
    Analysis,
    /// Image capture/generation node holding a prompt and a thumbnail.
    Image,
    /// Multi-entity character producer holding an ordered record list.
    Character,
    /// Video resource reference.
    Video,
    /// Audio resource reference.
    Audio,
    /// Transparent passthrough; relays its input unchanged and untyped.
    Reroute,
    /// Pure consumer; emits nothing.
    Preview,
}

/// A node on the canvas.
///
/// `value` is the small persisted payload: UTF-8 text or a JSON-encoded
/// structure depending on `kind`. Full-resolution binary payloads never
/// live here; they go through the slot store. Malformed values decode to
/// a per-kind default, never to a resolution failure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub value: String,
    /// Canvas layout position; irrelevant to resolution.
    #[serde(default)]
    pub position: (f32, f32),
}

impl Node {
    pub fn new(kind: NodeKind, value: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value: value.to_string(),
            position: (0.0, 0.0),
        }
    }

    pub fn new_with_id(id: NodeId, kind: NodeKind, value: &str) -> Self {
        Self {
            id,
            kind,
            value: value.to_string(),
            position: (0.0, 0.0),
        }
    }
}
