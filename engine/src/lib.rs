//! Dataflow resolution engine for the node canvas editor.
//!
//! Given a snapshot of the node graph (nodes + directed connections), the
//! engine computes the resolved value(s) flowing into any node's input
//! handle: text extraction per producer kind, image lookup through the
//! out-of-band slot store, multi-entity character aggregation, and
//! transparent resolution through reroute nodes. The signature cache
//! memoizes the two expensive aggregate queries between UI updates.
//!
//! The canvas, connection routing, AI clients, and persistence live
//! outside this crate; they hand a [`model::GraphSnapshot`] and a
//! [`store::SlotStore`] to the resolver on each update.

pub mod cache;
pub mod classify;
pub mod error;
pub mod model;
pub mod resolve;
pub mod session;
pub mod store;

pub use cache::{CacheStats, ResolutionCache};
pub use classify::{OutputType, classify};
pub use error::EngineError;
pub use model::{AspectRatio, CharacterRecord, Connection, GraphSnapshot, Node, NodeId, NodeKind};
pub use resolve::{ResolvedValue, resolve};
pub use session::Session;
pub use store::{ImagePayload, SlotStore};
