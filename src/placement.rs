//! Anchor-based placement on a surface
//!
//! Positions live in a symmetric [-1, 1] x [-1, 1] plane (+y up). Anchors are
//! pulled inward by a margin, and repeated anchors on the same monitor fan
//! out diagonally toward the interior.

use crate::math3d::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Inward pull from the surface edge (~6% of the half-extent on each side)
pub const ANCHOR_MARGIN: f32 = 0.12;

/// Extra diagonal offset per previous occupant of the same anchor
pub const OVERLAP_STEP: f32 = 0.05;

/// Nine named placement points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::Center,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Configuration token
    pub fn name(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "TOP-LEFT",
            Anchor::TopCenter => "TOP-CENTER",
            Anchor::TopRight => "TOP-RIGHT",
            Anchor::CenterLeft => "CENTER-LEFT",
            Anchor::Center => "CENTER",
            Anchor::CenterRight => "CENTER-RIGHT",
            Anchor::BottomLeft => "BOTTOM-LEFT",
            Anchor::BottomCenter => "BOTTOM-CENTER",
            Anchor::BottomRight => "BOTTOM-RIGHT",
        }
    }

    /// Corner, edge midpoint, or center of the normalized plane
    pub fn base_point(&self) -> Vec2 {
        let (x, y) = match self {
            Anchor::TopLeft => (-1.0, 1.0),
            Anchor::TopCenter => (0.0, 1.0),
            Anchor::TopRight => (1.0, 1.0),
            Anchor::CenterLeft => (-1.0, 0.0),
            Anchor::Center => (0.0, 0.0),
            Anchor::CenterRight => (1.0, 0.0),
            Anchor::BottomLeft => (-1.0, -1.0),
            Anchor::BottomCenter => (0.0, -1.0),
            Anchor::BottomRight => (1.0, -1.0),
        };
        Vec2::new(x, y)
    }

    /// Base point pulled inward by `margin` on every non-zero axis
    pub fn with_margin(&self, margin: f32) -> Vec2 {
        let base = self.base_point();
        let pull = |c: f32| {
            if c > 0.0 {
                c - margin
            } else if c < 0.0 {
                c + margin
            } else {
                c
            }
        };
        Vec2::new(pull(base.x), pull(base.y))
    }

    /// Per-axis direction of the overlap fan-out.
    /// Positive and centered axes step negative, negative axes step positive.
    pub fn interior_sign(&self) -> Vec2 {
        let base = self.base_point();
        let sign = |c: f32| if c >= 0.0 { -1.0 } else { 1.0 };
        Vec2::new(sign(base.x), sign(base.y))
    }
}

impl FromStr for Anchor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Resolves anchor collisions by counting occupants per (monitor, anchor)
#[derive(Debug)]
pub struct Placer {
    margin: f32,
    occupants: HashMap<(usize, Anchor), u32>,
}

impl Placer {
    pub fn new(margin: f32) -> Self {
        Self {
            margin,
            occupants: HashMap::new(),
        }
    }

    /// Position for the next shape at `anchor` on `monitor`.
    /// The Nth occupant (from 0) is offset by `OVERLAP_STEP * N` per axis.
    pub fn place(&mut self, monitor: usize, anchor: Anchor) -> Vec2 {
        let count = self.occupants.entry((monitor, anchor)).or_insert(0);
        let n = *count;
        *count += 1;

        let off = OVERLAP_STEP * n as f32;
        let dir = anchor.interior_sign();
        anchor.with_margin(self.margin) + Vec2::new(dir.x * off, dir.y * off)
    }
}
