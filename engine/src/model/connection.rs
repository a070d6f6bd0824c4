//! Connection model for the data-flow graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::NodeId;

/// A directed edge between two nodes.
///
/// Handles are optional names disambiguating multiple outputs/inputs on a
/// single node (e.g. a character node exposes one output per record
/// field). `None` addresses the node's default handle. Multiple
/// connections may target the same input handle; resolution follows
/// connection insertion order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub from_node: NodeId,
    #[serde(default)]
    pub from_handle: Option<String>,
    pub to_node: NodeId,
    #[serde(default)]
    pub to_handle: Option<String>,
}

impl Connection {
    /// Connection between two default handles.
    pub fn new(from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            from_handle: None,
            to_node,
            to_handle: None,
        }
    }

    /// Connection with named handles on either end.
    pub fn with_handles(
        from_node: NodeId,
        from_handle: Option<&str>,
        to_node: NodeId,
        to_handle: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_node,
            from_handle: from_handle.map(str::to_string),
            to_node,
            to_handle: to_handle.map(str::to_string),
        }
    }
}
