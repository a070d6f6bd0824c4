//! Per-kind text extraction rules.
//!
//! Table-driven so a new producer kind registers a row here without
//! touching the resolver. A kind with no row falls back to its raw value
//! string; a rule returning `None` contributes nothing for that
//! connection.

use crate::model::{AnalysisValue, CharacterValue, ImageValue, Node, NodeKind};

use super::sections;

/// One row of the extraction table.
pub struct ExtractionRule {
    pub kind: NodeKind,
    pub extract: fn(&Node, Option<&str>) -> Option<String>,
}

/// The registered rules. Order is irrelevant; kinds appear at most once.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        kind: NodeKind::Analysis,
        extract: analysis_field,
    },
    ExtractionRule {
        kind: NodeKind::Image,
        extract: image_prompt,
    },
    ExtractionRule {
        kind: NodeKind::Character,
        extract: character_text,
    },
];

/// Extract the text a `kind` node emits on `handle`.
pub fn extract_text(node: &Node, handle: Option<&str>) -> Option<String> {
    match EXTRACTION_RULES.iter().find(|r| r.kind == node.kind) {
        Some(rule) => (rule.extract)(node, handle),
        None => Some(node.value.clone()),
    }
}

/// Analysis node: a field handle returns the named field (empty string
/// when missing); the default handle relays the raw payload.
fn analysis_field(node: &Node, handle: Option<&str>) -> Option<String> {
    match handle {
        Some(field) => Some(AnalysisValue::parse(&node.value).field(field)),
        None => Some(node.value.clone()),
    }
}

/// Image node: the `text` handle carries the generation prompt.
fn image_prompt(node: &Node, handle: Option<&str>) -> Option<String> {
    match handle {
        Some("text") => ImageValue::parse(&node.value)
            .prompt()
            .map(str::to_string),
        _ => None,
    }
}

/// Character node text handles: `prompt` pulls the primary active
/// record's prompt; section handles pull the matching section of its
/// description.
fn character_text(node: &Node, handle: Option<&str>) -> Option<String> {
    let value = CharacterValue::parse(&node.value);
    let record = value.primary_active()?;
    match handle {
        Some("prompt") => Some(record.prompt.clone()),
        Some(section @ ("appearance" | "personality" | "clothing")) => {
            sections::extract_section(&record.description, section)
        }
        _ => None,
    }
}
