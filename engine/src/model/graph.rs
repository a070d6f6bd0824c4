//! Graph snapshot — the immutable-per-call substrate the resolver reads.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::connection::Connection;
use super::node::{Node, NodeId};
use crate::error::EngineError;

/// Snapshot of the canvas graph: nodes plus directed connections.
///
/// The session layer mutates this between resolution calls; the resolver
/// treats it as immutable for the duration of a call. Connection order is
/// insertion order and is the resolution order — nothing here sorts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(json_str: &str) -> Result<Self, EngineError> {
        let graph: GraphSnapshot = serde_json::from_str(json_str)?;
        Ok(graph)
    }

    pub fn save(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, id: NodeId) {
        self.nodes.retain(|n| n.id != id);
        self.connections
            .retain(|c| c.from_node != id && c.to_node != id);
    }

    pub fn add_connection(&mut self, connection: Connection) -> Uuid {
        let id = connection.id;
        self.connections.push(connection);
        id
    }

    pub fn remove_connection(&mut self, id: Uuid) {
        self.connections.retain(|c| c.id != id);
    }

    /// Connections targeting `node_id`, in insertion order.
    ///
    /// With a handle filter, only connections into that named handle are
    /// returned; without one, every connection into the node is.
    pub fn connections_into<'a>(
        &'a self,
        node_id: NodeId,
        handle: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| {
            c.to_node == node_id && handle.is_none_or(|h| c.to_handle.as_deref() == Some(h))
        })
    }

    /// Ids of all live nodes, for pruning the slot store.
    pub fn live_node_ids(&self) -> HashSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}
