// Property-based tests for timeline geometry and layout
// Checks the axis transform, snapping and column assignment with random inputs

use day_timeline::models::event::TimedEvent;
use day_timeline::services::category::CategoryPalette;
use day_timeline::timeline::{EventPositioner, EventSpan, OverlapLayout, TimeAxis};
use day_timeline::utils::date::time_from_hour;
use chrono::NaiveDate;
use proptest::prelude::*;

fn axis_strategy() -> impl Strategy<Value = TimeAxis> {
    (0u32..12, 1u32..=12, 10.0f64..200.0).prop_map(|(first, span, pixels_per_hour)| {
        TimeAxis::new(first, (first + span).min(24), pixels_per_hour)
    })
}

/// Spans on a quarter-hour grid, between 15 minutes and 4 hours long.
fn spans_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0u32..88, 1u32..=16), 1..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, length)| {
                let start = start as f64 / 4.0;
                (start, (start + length as f64 / 4.0).min(24.0))
            })
            .collect()
    })
}

fn ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("event-{:02}", i)).collect()
}

proptest! {
    /// Property: y_to_time undoes time_to_y for any axis
    #[test]
    fn prop_axis_transform_round_trips(axis in axis_strategy(), hour in 0.0f64..24.0) {
        let back = axis.y_to_time(axis.time_to_y(hour));
        prop_assert!((back - hour).abs() < 1e-9);
    }

    /// Property: snapping an already snapped hour changes nothing
    #[test]
    fn prop_snap_is_idempotent(hour in 0.0f64..24.0, minutes in prop::sample::select(vec![5u32, 10, 15, 30, 60])) {
        let once = TimeAxis::snap(hour, minutes);
        let twice = TimeAxis::snap(once, minutes);
        prop_assert!((once - twice).abs() < 1e-9);
        prop_assert!((once - hour).abs() <= minutes as f64 / 120.0 + 1e-9);
    }

    /// Property: a snapped pixel offset lands on a whole multiple of the step
    #[test]
    fn prop_snapped_pixels_on_grid(axis in axis_strategy(), y in -500.0f64..2000.0) {
        let step = axis.hours_to_pixels(15.0 / 60.0);
        let snapped = axis.snap_y(y, 15);
        let steps = snapped / step;
        prop_assert!((steps - steps.round()).abs() < 1e-6);
    }

    /// Property: time_from_hour never leaves the day
    #[test]
    fn prop_time_from_hour_stays_in_day(hour in -5.0f64..30.0) {
        let time = time_from_hour(hour);
        prop_assert!(time <= chrono::NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    /// Property: if A shares a column cluster with B, B shares one with A
    #[test]
    fn prop_overlap_clusters_are_symmetric(raw in spans_strategy()) {
        let ids = ids(raw.len());
        let spans: Vec<EventSpan<'_>> = raw
            .iter()
            .zip(&ids)
            .map(|((start, end), id)| EventSpan::new(id, *start, *end))
            .collect();

        for a in 0..spans.len() {
            for b in OverlapLayout::cluster(&spans, a) {
                prop_assert!(OverlapLayout::cluster(&spans, b).contains(&a));
            }
        }
    }

    /// Property: every slot index is inside its column count and isolated spans get one column
    #[test]
    fn prop_column_slots_are_consistent(raw in spans_strategy()) {
        let ids = ids(raw.len());
        let spans: Vec<EventSpan<'_>> = raw
            .iter()
            .zip(&ids)
            .map(|((start, end), id)| EventSpan::new(id, *start, *end))
            .collect();
        let slots = OverlapLayout::compute(&spans);

        prop_assert_eq!(slots.len(), spans.len());
        for (index, slot) in slots.iter().enumerate() {
            prop_assert!(slot.column_index < slot.column_count);
            let isolated = spans
                .iter()
                .enumerate()
                .all(|(other, span)| other == index || !span.overlaps(&spans[index]));
            if isolated {
                prop_assert_eq!(slot.column_count, 1);
            }
        }
    }

    /// Property: boxes stay inside the event area and keep their minimum height
    #[test]
    fn prop_boxes_fit_inside_canvas_width(raw in spans_strategy()) {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let events: Vec<TimedEvent> = raw
            .iter()
            .enumerate()
            .map(|(i, (start, end))| {
                TimedEvent::timed(
                    format!("event-{:02}", i),
                    "Busy",
                    day.and_time(time_from_hour(*start)),
                    day.and_time(time_from_hour(*end)),
                )
            })
            .collect();
        let axis = TimeAxis::new(0, 24, 48.0);
        let palette = CategoryPalette::default();
        let boxes = EventPositioner::new(&axis, &palette, 24.0).position(&events);

        for event_box in &boxes {
            prop_assert!(event_box.left_percent >= 0.0);
            prop_assert!(event_box.left_percent + event_box.width_percent <= 100.0 + 1e-9);
            prop_assert!(event_box.height >= 24.0);
        }
    }
}
