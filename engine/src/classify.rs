//! Output type classifier.
//!
//! Pure function of node kind and output handle — never inspects the node
//! value. The per-kind handle tables are the static registration point
//! for producer types; the resolver branches only on the classified type.

use crate::model::NodeKind;

/// Semantic type of what a node's output handle emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputType {
    Text,
    Image,
    CharacterData,
    Video,
    Audio,
    /// Emits nothing (consumers), or has no intrinsic type (reroute —
    /// the resolver defers to whatever feeds it).
    None,
}

/// Handles on a character node that carry structured record data.
pub const CHARACTER_DATA_HANDLES: &[&str] = &["primary_data", "all_data"];
/// Prefix for handles addressing a single record by roster index.
pub const CHARACTER_INDEX_PREFIX: &str = "character_";
/// Handles on a character node that carry extracted text.
pub const CHARACTER_TEXT_HANDLES: &[&str] = &["prompt", "appearance", "personality", "clothing"];

/// Classify what `kind` emits on `handle`.
pub fn classify(kind: NodeKind, handle: Option<&str>) -> OutputType {
    match kind {
        NodeKind::Text => OutputType::Text,
        // Every analysis field handle carries text.
        NodeKind::Analysis => OutputType::Text,
        NodeKind::Image => match handle {
            Some("text") => OutputType::Text,
            None | Some("image") => OutputType::Image,
            Some(_) => OutputType::None,
        },
        NodeKind::Character => match handle {
            None => OutputType::CharacterData,
            Some(h) if CHARACTER_DATA_HANDLES.contains(&h) => OutputType::CharacterData,
            Some(h) if h.starts_with(CHARACTER_INDEX_PREFIX) => OutputType::CharacterData,
            Some(h) if CHARACTER_TEXT_HANDLES.contains(&h) => OutputType::Text,
            Some("image") => OutputType::Image,
            Some(_) => OutputType::None,
        },
        NodeKind::Video => OutputType::Video,
        NodeKind::Audio => OutputType::Audio,
        NodeKind::Reroute | NodeKind::Preview => OutputType::None,
    }
}
