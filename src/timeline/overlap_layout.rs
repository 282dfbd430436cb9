//! Side-by-side column assignment for overlapping events.
//!
//! Each event's cluster is computed independently: the event plus every event
//! that strictly overlaps it. Chains where A overlaps B and B overlaps C (but
//! A does not overlap C) can therefore give B a different column count than A
//! and C. Layout order inside a cluster follows identifier ordering so that
//! identical start times still lay out deterministically.

use crate::models::event::TimedEvent;

/// An event reduced to its identifier and hour span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSpan<'a> {
    pub id: &'a str,
    pub start: f64,
    pub end: f64,
}

impl<'a> EventSpan<'a> {
    pub fn new(id: &'a str, start: f64, end: f64) -> Self {
        Self { id, start, end }
    }

    /// Span for a non-all-day event, `None` for all-day events.
    pub fn from_event(event: &'a TimedEvent) -> Option<Self> {
        event
            .hour_span()
            .map(|(start, end)| Self::new(&event.id, start, end))
    }

    /// Strict interval overlap; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &EventSpan<'_>) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Column position of one event within its overlap cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub column_index: usize,
    pub column_count: usize,
}

impl ColumnSlot {
    pub const SINGLE: ColumnSlot = ColumnSlot {
        column_index: 0,
        column_count: 1,
    };
}

pub struct OverlapLayout;

impl OverlapLayout {
    /// Indices of the cluster around `spans[index]`, in layout order.
    pub fn cluster(spans: &[EventSpan<'_>], index: usize) -> Vec<usize> {
        let Some(target) = spans.get(index) else {
            return Vec::new();
        };

        let mut members: Vec<usize> = spans
            .iter()
            .enumerate()
            .filter(|(other_index, other)| *other_index == index || target.overlaps(other))
            .map(|(other_index, _)| other_index)
            .collect();

        // Index breaks ties so duplicate ids still get distinct columns.
        members.sort_by(|a, b| spans[*a].id.cmp(spans[*b].id).then(a.cmp(b)));
        members
    }

    /// Identifiers of the cluster around `spans[index]`, in layout order.
    pub fn cluster_ids<'a>(spans: &[EventSpan<'a>], index: usize) -> Vec<&'a str> {
        Self::cluster(spans, index)
            .into_iter()
            .map(|member| spans[member].id)
            .collect()
    }

    /// Column slot for every span, parallel to the input.
    pub fn compute(spans: &[EventSpan<'_>]) -> Vec<ColumnSlot> {
        (0..spans.len())
            .map(|index| {
                let cluster = Self::cluster(spans, index);
                let column_index = cluster
                    .iter()
                    .position(|member| *member == index)
                    .unwrap_or(0);
                ColumnSlot {
                    column_index,
                    column_count: cluster.len().max(1),
                }
            })
            .collect()
    }
}
