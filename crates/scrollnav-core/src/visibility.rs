#![forbid(unsafe_code)]

//! Visibility records produced by the viewport-intersection primitive.
//!
//! Two levels exist:
//! - [`VisibilityEntry`] is what the observer reports for a node.
//! - [`VisibilityEvent`] is the same record after the owning component has
//!   mapped the node back to its [`SectionId`].
//!
//! Both are ephemeral: they live for one reduction step.

use crate::geometry::{ClientRect, RootMargin};
use crate::section::{NodeId, SectionId};

/// One observer report for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityEntry {
    pub node: NodeId,
    pub is_intersecting: bool,
    /// Fraction of the node's area inside the (margin-adjusted) viewport.
    pub intersection_ratio: f64,
    /// Node bounds relative to the viewport at the time of the report.
    pub bounding_rect: ClientRect,
}

impl VisibilityEntry {
    /// Build an entry, sanitizing the ratio into `[0, 1]` (NaN becomes 0).
    pub fn new(
        node: NodeId,
        is_intersecting: bool,
        intersection_ratio: f64,
        bounding_rect: ClientRect,
    ) -> Self {
        Self {
            node,
            is_intersecting,
            intersection_ratio: clamp_ratio(intersection_ratio),
            bounding_rect,
        }
    }

    /// Signed distance from the viewport top to the node's top edge.
    #[inline]
    pub fn top_offset(&self) -> f64 {
        self.bounding_rect.top
    }

    /// Attach the section this node belongs to.
    pub fn into_event(self, section_id: SectionId) -> VisibilityEvent {
        VisibilityEvent {
            section_id,
            is_intersecting: self.is_intersecting,
            intersection_ratio: self.intersection_ratio,
            top_offset: self.top_offset(),
        }
    }
}

/// Section-level visibility record.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub section_id: SectionId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    /// Signed px from the viewport top.
    pub top_offset: f64,
}

/// Clamp a ratio into `[0, 1]`; NaN maps to 0.
#[inline]
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

/// Options for one observation: the ratio thresholds whose crossing
/// triggers a report, and the root margin applied to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    thresholds: Vec<f64>,
    pub root_margin: RootMargin,
}

impl ObserveOptions {
    /// Build options. Thresholds are clamped to `[0, 1]`, sorted and
    /// deduplicated; an empty list means `[0.0]`, as in the browser.
    pub fn new(thresholds: impl IntoIterator<Item = f64>, root_margin: RootMargin) -> Self {
        let mut thresholds: Vec<f64> = thresholds.into_iter().map(clamp_ratio).collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        if thresholds.is_empty() {
            thresholds.push(0.0);
        }
        Self {
            thresholds,
            root_margin,
        }
    }

    /// Single threshold, no root margin.
    pub fn threshold(threshold: f64) -> Self {
        Self::new([threshold], RootMargin::ZERO)
    }

    /// Sorted, deduplicated thresholds.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Replace the root margin (builder pattern).
    #[must_use]
    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    /// How many thresholds a ratio has reached.
    ///
    /// A zero threshold counts as reached only while the node is
    /// intersecting, so an edge-adjacent target still registers.
    pub fn crossed_index(&self, ratio: f64, is_intersecting: bool) -> usize {
        self.thresholds
            .iter()
            .filter(|&&t| if t == 0.0 { is_intersecting } else { ratio >= t })
            .count()
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self::new([0.0], RootMargin::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ratio_is_sanitized() {
        let rect = ClientRect::default();
        assert_eq!(VisibilityEntry::new(NodeId(1), true, 1.7, rect).intersection_ratio, 1.0);
        assert_eq!(VisibilityEntry::new(NodeId(1), true, -0.2, rect).intersection_ratio, 0.0);
        assert_eq!(VisibilityEntry::new(NodeId(1), true, f64::NAN, rect).intersection_ratio, 0.0);
    }

    #[test]
    fn into_event_carries_top_offset() {
        let entry = VisibilityEntry::new(
            NodeId(3),
            true,
            0.5,
            ClientRect::new(0.0, -42.0, 100.0, 100.0),
        );
        let event = entry.into_event(SectionId::new("platform"));
        assert_eq!(event.top_offset, -42.0);
        assert_eq!(event.section_id.as_str(), "platform");
        assert!(event.is_intersecting);
    }

    #[test]
    fn thresholds_sorted_and_deduped() {
        let opts = ObserveOptions::new([0.5, 0.3, 0.5, 2.0], RootMargin::ZERO);
        assert_eq!(opts.thresholds(), &[0.3, 0.5, 1.0]);
        assert_eq!(ObserveOptions::new([], RootMargin::ZERO).thresholds(), &[0.0]);
    }

    #[test]
    fn crossed_index_counts_reached_thresholds() {
        let opts = ObserveOptions::new([0.0, 0.3, 0.7], RootMargin::ZERO);
        assert_eq!(opts.crossed_index(0.0, false), 0);
        assert_eq!(opts.crossed_index(0.0, true), 1);
        assert_eq!(opts.crossed_index(0.3, true), 2);
        assert_eq!(opts.crossed_index(0.9, true), 3);
    }
}
