//! Value resolver — the recursive core of the engine.
//!
//! `resolve` walks the connections feeding a node's input handle, in
//! insertion order, dereferencing each source through the classifier and
//! the per-kind extraction rules. Reroute nodes are invisible: their
//! upstream contributions are spliced in place. A per-call visited set is
//! threaded through every recursive path (reroute splicing and image
//! lookup alike), so a user-made cycle terminates a branch with an empty
//! contribution instead of recursing forever.

pub mod character;
pub mod image;
pub mod rules;
pub mod sections;

use std::collections::HashSet;

use log::trace;

use crate::classify::{OutputType, classify};
use crate::model::{CharacterRecord, GraphSnapshot, NodeId, NodeKind};
use crate::store::{ImagePayload, SlotStore};

/// The value a single connection contributes to an input handle.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    Text(String),
    Image(ImagePayload),
    Character(CharacterRecord),
    CharacterList(Vec<CharacterRecord>),
    /// Opaque payload relayed for producers without an extraction rule
    /// (video/audio references).
    Raw(String),
}

impl ResolvedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImagePayload> {
        match self {
            ResolvedValue::Image(p) => Some(p),
            _ => None,
        }
    }

    /// Character records carried by this value, flattened.
    pub fn character_records(&self) -> &[CharacterRecord] {
        match self {
            ResolvedValue::Character(record) => std::slice::from_ref(record),
            ResolvedValue::CharacterList(records) => records,
            _ => &[],
        }
    }
}

/// Resolve the current value(s) reaching `target`'s input handle.
///
/// With `handle` set, only connections into that named handle are
/// considered; otherwise every connection into the node contributes.
/// Never fails: dangling connections are skipped, malformed payloads
/// decode to defaults, type mismatches contribute nothing.
pub fn resolve(
    graph: &GraphSnapshot,
    target: NodeId,
    handle: Option<&str>,
    slots: &SlotStore,
) -> Vec<ResolvedValue> {
    let mut visited = HashSet::new();
    resolve_guarded(graph, target, handle, slots, &mut visited)
}

/// Recursive worker carrying the path-scoped visited set.
pub(crate) fn resolve_guarded(
    graph: &GraphSnapshot,
    target: NodeId,
    handle: Option<&str>,
    slots: &SlotStore,
    visited: &mut HashSet<NodeId>,
) -> Vec<ResolvedValue> {
    if !visited.insert(target) {
        trace!("cycle at node {}, terminating branch", target);
        return Vec::new();
    }

    let mut values = Vec::new();
    for conn in graph.connections_into(target, handle) {
        let Some(source) = graph.node(conn.from_node) else {
            trace!("skipping dangling connection {}", conn.id);
            continue;
        };

        // Reroutes relay whatever feeds them; splice their results in place.
        if source.kind == NodeKind::Reroute {
            values.extend(resolve_guarded(graph, source.id, None, slots, visited));
            continue;
        }

        let source_handle = conn.from_handle.as_deref();
        match classify(source.kind, source_handle) {
            OutputType::Text => match rules::extract_text(source, source_handle) {
                Some(text) => values.push(ResolvedValue::Text(text)),
                None => {}
            },
            OutputType::Image => {
                match image::resolve_image_source(graph, source, source_handle, slots, visited) {
                    Some(payload) => values.push(ResolvedValue::Image(payload)),
                    None => {}
                }
            }
            OutputType::CharacterData => {
                values.extend(character::extract(source, source_handle));
            }
            OutputType::Video | OutputType::Audio => {
                values.push(ResolvedValue::Raw(source.value.clone()));
            }
            OutputType::None => {}
        }
    }

    visited.remove(&target);
    values
}
