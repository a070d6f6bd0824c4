//! Aspect-ratio labels and their slot codes.

use serde::{Deserialize, Serialize};

/// Aspect ratios a producer can emit thumbnails/payloads for.
///
/// Each ratio maps to a fixed integer code 0–9 used in slot addressing
/// (`entity_index * 10 + code`). The flat encoding caps the set at ten
/// ratios per entity; that limit is deliberate and documented, not an
/// oversight.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "3:4")]
    ClassicPortrait,
    #[serde(rename = "21:9")]
    Wide,
}

impl AspectRatio {
    /// Slot code within an entity's ten-slot band.
    pub fn code(&self) -> u32 {
        match self {
            AspectRatio::Square => 0,
            AspectRatio::Landscape => 1,
            AspectRatio::Portrait => 2,
            AspectRatio::Classic => 3,
            AspectRatio::ClassicPortrait => 4,
            AspectRatio::Wide => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Classic => "4:3",
            AspectRatio::ClassicPortrait => "3:4",
            AspectRatio::Wide => "21:9",
        }
    }

    /// Parse a ratio label. Unknown labels fall back to `Square` so a
    /// stray label in a persisted payload never fails decoding.
    pub fn from_label(label: &str) -> Self {
        match label {
            "1:1" => AspectRatio::Square,
            "16:9" => AspectRatio::Landscape,
            "9:16" => AspectRatio::Portrait,
            "4:3" => AspectRatio::Classic,
            "3:4" => AspectRatio::ClassicPortrait,
            "21:9" => AspectRatio::Wide,
            other => {
                log::warn!("Unknown aspect ratio label '{}', using 1:1", other);
                AspectRatio::Square
            }
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
