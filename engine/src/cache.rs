//! Signature-based memoization for the two hot aggregate queries.
//!
//! Aggregated character data and aggregated image sources both perform
//! nested graph walks and payload parsing, and the UI asks for them on
//! every update. Each is recomputed only when its signature — a fold of
//! `(connection id, source node id, content fingerprint)` over the
//! relevant connections — changes.
//!
//! The fingerprint samples the payload's length, head, and tail rather
//! than hashing the whole string. A change confined to the middle of a
//! very large payload can slip past it; structured payloads keep mutable
//! fields near the edges or change length, so this is an accepted
//! trade-off. Callers needing exactness call [`resolve`] directly.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use log::debug;

use crate::model::{CharacterRecord, GraphSnapshot, NodeId, NodeKind};
use crate::resolve::{ResolvedValue, resolve};
use crate::store::{ImagePayload, SlotStore};

/// Bytes sampled from each end of a payload by the fingerprint.
const FINGERPRINT_SAMPLE: usize = 64;

/// Hit/miss counters; a miss is exactly one resolver invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub character_hits: u64,
    pub character_misses: u64,
    pub image_hits: u64,
    pub image_misses: u64,
}

struct CacheEntry<T> {
    signature: String,
    value: T,
}

/// Per-session memoization of the two aggregate resolution results,
/// scoped by consuming-node id. No eviction: the key space is bounded by
/// the number of live nodes, and the whole cache is dropped with its
/// session.
#[derive(Default)]
pub struct ResolutionCache {
    characters: HashMap<NodeId, CacheEntry<Vec<CharacterRecord>>>,
    images: HashMap<NodeId, CacheEntry<Vec<ImagePayload>>>,
    stats: CacheStats,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregated character records reaching `node_id`, memoized.
    pub fn characters(
        &mut self,
        graph: &GraphSnapshot,
        node_id: NodeId,
        slots: &SlotStore,
    ) -> Vec<CharacterRecord> {
        let sig = signature(graph, node_id);
        if let Some(entry) = self.characters.get(&node_id) {
            if entry.signature == sig {
                self.stats.character_hits += 1;
                return entry.value.clone();
            }
        }
        self.stats.character_misses += 1;
        debug!("recomputing character aggregate for node {}", node_id);

        let records: Vec<CharacterRecord> = resolve(graph, node_id, None, slots)
            .iter()
            .flat_map(|v| v.character_records().iter().cloned())
            .collect();
        self.characters.insert(
            node_id,
            CacheEntry {
                signature: sig,
                value: records.clone(),
            },
        );
        records
    }

    /// Aggregated image sources reaching `node_id`, memoized.
    pub fn images(
        &mut self,
        graph: &GraphSnapshot,
        node_id: NodeId,
        slots: &SlotStore,
    ) -> Vec<ImagePayload> {
        let sig = signature(graph, node_id);
        if let Some(entry) = self.images.get(&node_id) {
            if entry.signature == sig {
                self.stats.image_hits += 1;
                return entry.value.clone();
            }
        }
        self.stats.image_misses += 1;
        debug!("recomputing image aggregate for node {}", node_id);

        let payloads: Vec<ImagePayload> = resolve(graph, node_id, None, slots)
            .into_iter()
            .filter_map(|v| match v {
                ResolvedValue::Image(payload) => Some(payload),
                _ => None,
            })
            .collect();
        self.images.insert(
            node_id,
            CacheEntry {
                signature: sig,
                value: payloads.clone(),
            },
        );
        payloads
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop all entries (session teardown / explicit invalidation).
    pub fn clear(&mut self) {
        self.characters.clear();
        self.images.clear();
    }
}

/// Signature of everything feeding `node_id`: each relevant connection's
/// id, source id, and source-value fingerprint, in connection order.
/// Reroute sources are followed so an edit behind a passthrough still
/// invalidates the consumer.
pub fn signature(graph: &GraphSnapshot, node_id: NodeId) -> String {
    let mut sig = String::new();
    let mut seen = HashSet::new();
    seen.insert(node_id);
    append_signature(graph, node_id, &mut sig, &mut seen);
    sig
}

fn append_signature(
    graph: &GraphSnapshot,
    node_id: NodeId,
    sig: &mut String,
    seen: &mut HashSet<NodeId>,
) {
    for conn in graph.connections_into(node_id, None) {
        let Some(source) = graph.node(conn.from_node) else {
            continue;
        };
        let _ = write!(
            sig,
            "{}:{}:{:016x};",
            conn.id,
            source.id,
            content_fingerprint(&source.value)
        );
        if source.kind == NodeKind::Reroute && seen.insert(source.id) {
            append_signature(graph, source.id, sig, seen);
        }
    }
}

/// Cheap content fingerprint: FNV-1a over the length plus bounded head
/// and tail samples of the payload.
pub fn content_fingerprint(value: &str) -> u64 {
    let bytes = value.as_bytes();
    let mut hash = fnv1a(FNV_OFFSET, &(bytes.len() as u64).to_le_bytes());
    hash = fnv1a(hash, &bytes[..bytes.len().min(FINGERPRINT_SAMPLE)]);
    if bytes.len() > FINGERPRINT_SAMPLE {
        hash = fnv1a(hash, &bytes[bytes.len() - FINGERPRINT_SAMPLE..]);
    }
    hash
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
