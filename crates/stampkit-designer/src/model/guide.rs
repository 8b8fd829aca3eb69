use crate::geometry::Rect;

/// Non-user scene geometry: never selectable, serialized, exported or undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    /// White printable surface
    WorkArea,
    /// Dashed outline of the work area
    Border,
    /// Dashed outline of the safety zone
    Safety,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemGuide {
    pub kind: GuideKind,
    pub rect: Rect,
    pub visible: bool,
}

impl SystemGuide {
    pub fn new(kind: GuideKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            visible: true,
        }
    }
}
