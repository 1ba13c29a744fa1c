use serde::{Deserialize, Serialize};

/// Paint layers of a page, drawn bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Overlay,
    Axis,
}

impl CanvasLayerKind {
    /// Canonical bottom-to-top paint order.
    pub const CANONICAL_ORDER: [Self; 5] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Overlay,
        Self::Axis,
    ];

    #[must_use]
    pub fn paint_index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Grid => 1,
            Self::Series => 2,
            Self::Overlay => 3,
            Self::Axis => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CanvasLayerKind;

    #[test]
    fn paint_index_matches_canonical_order() {
        for (index, kind) in CanvasLayerKind::CANONICAL_ORDER.iter().enumerate() {
            assert_eq!(kind.paint_index(), index);
        }
    }
}
