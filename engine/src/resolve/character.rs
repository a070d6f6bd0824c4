//! Multi-entity character extraction.

use crate::classify::CHARACTER_INDEX_PREFIX;
use crate::model::{CharacterValue, Node};

use super::ResolvedValue;

/// Extract record data from a character node for a data handle.
///
/// `all_data` (and the default handle) yields the active roster as one
/// list value; `primary_data` yields the primary active record;
/// `character_<n>` addresses record n explicitly and so bypasses the
/// active filter.
pub(crate) fn extract(source: &Node, handle: Option<&str>) -> Vec<ResolvedValue> {
    let value = CharacterValue::parse(&source.value);
    match handle {
        None | Some("all_data") => {
            let records: Vec<_> = value.active().cloned().collect();
            match records.is_empty() {
                true => Vec::new(),
                false => vec![ResolvedValue::CharacterList(records)],
            }
        }
        Some("primary_data") => value
            .primary_active()
            .cloned()
            .map(ResolvedValue::Character)
            .into_iter()
            .collect(),
        Some(handle) => match indexed_handle(handle) {
            Some(index) => value
                .records()
                .get(index)
                .cloned()
                .map(ResolvedValue::Character)
                .into_iter()
                .collect(),
            None => Vec::new(),
        },
    }
}

/// Roster index of the record default resolution treats as primary.
pub(crate) fn primary_active_index(value: &CharacterValue) -> Option<usize> {
    match value.records().iter().position(|r| r.is_primary) {
        Some(index) => value.records()[index].is_active.then_some(index),
        None => value.records().iter().position(|r| r.is_active),
    }
}

fn indexed_handle(handle: &str) -> Option<usize> {
    handle.strip_prefix(CHARACTER_INDEX_PREFIX)?.parse().ok()
}
