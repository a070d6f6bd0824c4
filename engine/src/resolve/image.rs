//! Image source resolution.
//!
//! An image contribution is looked up in three steps: the slot store
//! (full-resolution payload at the source's computed slot), then the
//! inline thumbnail in the parsed node value, then — for nodes that pass
//! imagery through rather than owning it — the source's own upstream
//! connections, walked with the same cycle guard as the main resolver.

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use log::warn;

use crate::classify::{OutputType, classify};
use crate::error::EngineError;
use crate::model::{CharacterValue, GraphSnapshot, ImageValue, Node, NodeId, NodeKind};
use crate::store::{ImagePayload, RATIO_SLOTS_PER_ENTITY, SlotStore, slot_for};

use super::character::primary_active_index;

/// Resolve the image a source node emits, if any.
pub(crate) fn resolve_image_source(
    graph: &GraphSnapshot,
    source: &Node,
    handle: Option<&str>,
    slots: &SlotStore,
    visited: &mut HashSet<NodeId>,
) -> Option<ImagePayload> {
    if !visited.insert(source.id) {
        return None;
    }
    let result = resolve_unguarded(graph, source, handle, slots, visited);
    visited.remove(&source.id);
    result
}

// `_handle` only disambiguates multi-image producers; none of the current
// kinds expose more than one image output.
fn resolve_unguarded(
    graph: &GraphSnapshot,
    source: &Node,
    _handle: Option<&str>,
    slots: &SlotStore,
    visited: &mut HashSet<NodeId>,
) -> Option<ImagePayload> {
    match source.kind {
        NodeKind::Image => {
            if let Some(payload) = slots.get(source.id, 0) {
                return Some(payload.clone());
            }
            if let Some(uri) = ImageValue::parse(&source.value).thumbnail() {
                match decode_data_uri(uri) {
                    Ok(payload) => return Some(payload),
                    Err(e) => warn!("Unusable thumbnail on node {}: {}", source.id, e),
                }
            }
            // No payload of its own: relay whatever image feeds it.
            upstream_image(graph, source.id, slots, visited)
        }
        NodeKind::Character => {
            let value = CharacterValue::parse(&source.value);
            let index = primary_active_index(&value)?;
            let record = &value.records()[index];
            // Full-resolution lookup probes the record's own thumbnail
            // ratios first, then the rest of the entity's slot band — a
            // stored payload stays reachable even when the record carries
            // no thumbnail for its ratio.
            for ratio in record.thumbnails.keys() {
                if let Some(payload) = slots.get(source.id, slot_for(index, *ratio)) {
                    return Some(payload.clone());
                }
            }
            let base = index as u32 * RATIO_SLOTS_PER_ENTITY;
            for code in 0..RATIO_SLOTS_PER_ENTITY {
                if let Some(payload) = slots.get(source.id, base + code) {
                    return Some(payload.clone());
                }
            }
            let (_, uri) = record.thumbnails.iter().next()?;
            match decode_data_uri(uri) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!("Unusable thumbnail on node {}: {}", source.id, e);
                    None
                }
            }
        }
        NodeKind::Reroute => upstream_image(graph, source.id, slots, visited),
        _ => None,
    }
}

/// First image contributed by a node's incoming connections.
fn upstream_image(
    graph: &GraphSnapshot,
    node_id: NodeId,
    slots: &SlotStore,
    visited: &mut HashSet<NodeId>,
) -> Option<ImagePayload> {
    for conn in graph.connections_into(node_id, None) {
        let Some(upstream) = graph.node(conn.from_node) else {
            continue;
        };
        let handle = conn.from_handle.as_deref();
        let candidate = match upstream.kind {
            NodeKind::Reroute => resolve_image_source(graph, upstream, None, slots, visited),
            _ if classify(upstream.kind, handle) == OutputType::Image => {
                resolve_image_source(graph, upstream, handle, slots, visited)
            }
            _ => None,
        };
        if candidate.is_some() {
            return candidate;
        }
    }
    None
}

/// Decode a `data:` URI into bytes plus mime type.
pub fn decode_data_uri(uri: &str) -> Result<ImagePayload, EngineError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| EngineError::DataUri("missing data: prefix".to_string()))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| EngineError::DataUri("missing ',' separator".to_string()))?;

    let (mime, encoded) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let bytes = match encoded {
        true => BASE64_STANDARD.decode(data.as_bytes())?,
        false => data.as_bytes().to_vec(),
    };
    let mime = match mime.is_empty() {
        true => "image/png",
        false => mime,
    };
    Ok(ImagePayload {
        bytes,
        mime: mime.to_string(),
    })
}
