//! Persisted data model for the node graph.

pub mod connection;
pub mod graph;
pub mod node;
pub mod payload;
pub mod ratio;

pub use connection::Connection;
pub use graph::GraphSnapshot;
pub use node::{Node, NodeId, NodeKind};
pub use payload::{AnalysisValue, CharacterRecord, CharacterValue, ImageValue};
pub use ratio::AspectRatio;
