//! Slot store — out-of-band table for full-resolution binary payloads.
//!
//! The persisted node value only ever holds a lightweight reference or
//! thumbnail; the real bytes live here, keyed by `(node id, slot)`. For
//! multi-entity producers the slot is `entity_index * 10 + ratio code`,
//! one flat table addressing "entity N, ratio R" at the cost of a hard
//! ten-ratio cap per entity. The store never reindexes on its own: only
//! the owning node knows its addressing convention, so reorder/delete
//! shifts go through the explicit helpers below.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::model::{AspectRatio, NodeId};

/// Ratio slots reserved per entity in the flat addressing scheme.
pub const RATIO_SLOTS_PER_ENTITY: u32 = 10;

/// A full-resolution binary payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Slot for one entity/ratio pair. Single-entity producers use entity 0,
/// so their default slot is plain 0.
pub fn slot_for(entity_index: usize, ratio: AspectRatio) -> u32 {
    entity_index as u32 * RATIO_SLOTS_PER_ENTITY + ratio.code()
}

/// Addressable table of large payloads, decoupled from the graph model.
#[derive(Debug, Default)]
pub struct SlotStore {
    entries: HashMap<(NodeId, u32), ImagePayload>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: NodeId, slot: u32) -> Option<&ImagePayload> {
        self.entries.get(&(node_id, slot))
    }

    pub fn set(&mut self, node_id: NodeId, slot: u32, payload: ImagePayload) {
        trace!("slot store: set {}#{} ({} bytes)", node_id, slot, payload.bytes.len());
        self.entries.insert((node_id, slot), payload);
    }

    /// Drop every slot owned by `node_id`; other nodes' slots are untouched.
    pub fn clear(&mut self, node_id: NodeId) {
        self.entries.retain(|(id, _), _| *id != node_id);
    }

    /// Drop slots whose owner no longer exists in the graph.
    pub fn clear_unused(&mut self, live_ids: &HashSet<NodeId>) {
        let before = self.entries.len();
        self.entries.retain(|(id, _), _| live_ids.contains(id));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            trace!("slot store: pruned {} stale slots", dropped);
        }
    }

    /// Clear one entity's ten-slot ratio band.
    pub fn clear_entity(&mut self, node_id: NodeId, entity_index: usize) {
        let base = entity_index as u32 * RATIO_SLOTS_PER_ENTITY;
        self.entries
            .retain(|(id, slot), _| *id != node_id || *slot < base || *slot >= base + RATIO_SLOTS_PER_ENTITY);
    }

    /// Shift entity bands down after a record was removed from the roster,
    /// keeping `entity_index * 10 + ratio` addressing dense.
    ///
    /// `entity_count` is the roster length before removal. Called by the
    /// owning node on delete/reorder; nothing here happens automatically.
    pub fn shift_entities_after_removal(
        &mut self,
        node_id: NodeId,
        removed_index: usize,
        entity_count: usize,
    ) {
        self.clear_entity(node_id, removed_index);
        for index in removed_index + 1..entity_count {
            let from_base = index as u32 * RATIO_SLOTS_PER_ENTITY;
            let to_base = (index as u32 - 1) * RATIO_SLOTS_PER_ENTITY;
            for code in 0..RATIO_SLOTS_PER_ENTITY {
                match self.entries.remove(&(node_id, from_base + code)) {
                    Some(payload) => {
                        self.entries.insert((node_id, to_base + code), payload);
                    }
                    None => {}
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
