//! Session context — owns all engine state for one open document.
//!
//! One `Session` per open canvas/tab. It bundles the graph, the slot
//! store, and the resolution cache so cache lifetime is tied to the
//! session rather than the process; closing the document drops all three
//! together.

use crate::cache::{CacheStats, ResolutionCache};
use crate::model::{CharacterRecord, GraphSnapshot, NodeId};
use crate::resolve::{ResolvedValue, resolve};
use crate::store::{ImagePayload, SlotStore};

pub struct Session {
    pub graph: GraphSnapshot,
    pub slots: SlotStore,
    cache: ResolutionCache,
}

impl Session {
    pub fn new(graph: GraphSnapshot) -> Self {
        Self {
            graph,
            slots: SlotStore::new(),
            cache: ResolutionCache::new(),
        }
    }

    /// Resolve the values reaching a node's input handle (uncached).
    pub fn resolve_input(&self, node_id: NodeId, handle: Option<&str>) -> Vec<ResolvedValue> {
        resolve(&self.graph, node_id, handle, &self.slots)
    }

    /// Aggregated character records for a consuming node, via the cache.
    pub fn character_data(&mut self, node_id: NodeId) -> Vec<CharacterRecord> {
        self.cache.characters(&self.graph, node_id, &self.slots)
    }

    /// Aggregated image sources for a consuming node, via the cache.
    pub fn image_sources(&mut self, node_id: NodeId) -> Vec<ImagePayload> {
        self.cache.images(&self.graph, node_id, &self.slots)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Throw away all memoized aggregates.
    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }

    /// Drop slot-store payloads whose owning node left the graph.
    pub fn prune_slots(&mut self) {
        let live = self.graph.live_node_ids();
        self.slots.clear_unused(&live);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GraphSnapshot::new())
    }
}
