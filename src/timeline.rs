//! Attempt timelines
//!
//! Flattens every attempt into an interval on its process's lane and selects
//! the intervals a timeline chart should show. Two selections exist:
//!
//! - **Time window**: intervals overlapping `[min_x, max_x]`, where
//!   `x = (t - shift_x * scale) / scale` (scale is usually 1000 cycles).
//! - **Ordinal window**: per pid, the attempts whose 1-based ordinal `n`
//!   satisfies `first <= n < last`. The x range is derived from the selection.
//!
//! Each selected interval carries the line style for its attempt kind. Drawing
//! is left to the caller.

use crate::trace::{AttemptKind, AttemptTable, Pid};
use serde::Serialize;
use std::collections::HashMap;

/// Default timestamp scale (cycles per x unit)
pub const DEFAULT_SCALE: u64 = 1000;

/// Line style for one attempt kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    pub color: &'static str,
    pub width: u8,
}

/// Style a renderer should use for `kind`
pub fn style_for(kind: &AttemptKind) -> Style {
    match kind {
        AttemptKind::Abort => Style { color: "red", width: 1 },
        AttemptKind::Commit => Style { color: "blue", width: 1 },
        AttemptKind::LockQueued => Style { color: "grey", width: 1 },
        AttemptKind::Lock => Style { color: "black", width: 1 },
        AttemptKind::Other(_) => Style { color: "green", width: 2 },
    }
}

/// Which attempts to show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Scaled x range, inclusive on both ends
    Time { min_x: f64, max_x: f64 },
    /// Per-pid attempt ordinals `first..last` (1-based); `last` defaults to `first + 1`
    Ordinal { first: usize, last: Option<usize> },
}

/// Axis transform applied to raw timestamps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Timestamp units per x unit
    pub scale: u64,
    /// Offset subtracted before scaling, in x units
    pub shift_x: i64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            shift_x: 0,
        }
    }
}

impl Scale {
    /// Map a raw timestamp to x
    pub fn apply(&self, timestamp: u64) -> f64 {
        let scale = self.scale.max(1) as f64;
        (timestamp as f64 - self.shift_x as f64 * scale) / scale
    }
}

/// One attempt placed on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub pid: Pid,
    /// Vertical position (pid + 1), widened so `i64::MAX` still has a lane
    pub lane: i128,
    pub kind: AttemptKind,
    pub start_x: f64,
    pub end_x: f64,
    pub style: Style,
}

/// Selected segments plus the x range they span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub min_x: f64,
    pub max_x: f64,
    pub segments: Vec<Segment>,
}

impl Timeline {
    /// Select segments from every attempt in `table`
    ///
    /// # Example
    ///
    /// ```
    /// use txpar::timeline::{Scale, Timeline, Window};
    /// use txpar::trace::{Attempt, AttemptKind, AttemptTable, ProcessInstance};
    ///
    /// let attempts = vec![
    ///     Attempt::new(AttemptKind::Lock, 0, 2_000),
    ///     Attempt::new(AttemptKind::Commit, 2_000, 9_000),
    /// ];
    /// let table = AttemptTable::from_instances([ProcessInstance::new(0, 0, 9_000, attempts, [], [])]);
    ///
    /// let timeline = Timeline::select(&table, Window::Ordinal { first: 2, last: None }, Scale::default());
    /// assert_eq!(timeline.segments.len(), 1);
    /// assert_eq!(timeline.min_x, 2.0);
    /// assert_eq!(timeline.max_x, 9.0);
    /// ```
    pub fn select(table: &AttemptTable, window: Window, scale: Scale) -> Self {
        match window {
            Window::Time { min_x, max_x } => Self::select_time(table, min_x, max_x, scale),
            Window::Ordinal { first, last } => {
                let last = last.unwrap_or(first.saturating_add(1));
                Self::select_ordinal(table, first, last, scale)
            }
        }
    }

    fn select_time(table: &AttemptTable, min_x: f64, max_x: f64, scale: Scale) -> Self {
        let segments = segments(table, scale)
            .filter(|(_, seg)| seg.end_x >= min_x && seg.start_x <= max_x)
            .map(|(_, seg)| seg)
            .collect();

        Self {
            min_x,
            max_x,
            segments,
        }
    }

    fn select_ordinal(table: &AttemptTable, first: usize, last: usize, scale: Scale) -> Self {
        let segments: Vec<Segment> = segments(table, scale)
            .filter(|&(ordinal, _)| ordinal >= first && ordinal < last)
            .map(|(_, seg)| seg)
            .collect();

        let min_x = segments
            .iter()
            .map(|s| s.start_x)
            .reduce(f64::min)
            .unwrap_or(0.0);
        let max_x = segments
            .iter()
            .map(|s| s.end_x)
            .reduce(f64::max)
            .unwrap_or(0.0);

        Self {
            min_x,
            max_x,
            segments,
        }
    }

    /// Number of distinct lanes used by the selection
    pub fn lane_count(&self) -> usize {
        let mut lanes: Vec<i128> = self.segments.iter().map(|s| s.lane).collect();
        lanes.sort_unstable();
        lanes.dedup();
        lanes.len()
    }
}

/// Every attempt as a segment, paired with its 1-based per-pid ordinal
fn segments(table: &AttemptTable, scale: Scale) -> impl Iterator<Item = (usize, Segment)> + '_ {
    let mut ordinals: HashMap<Pid, usize> = HashMap::new();
    table.iter().flat_map(move |instance| {
        let pid = instance.pid();
        instance
            .attempts()
            .iter()
            .map(|attempt| {
                let ordinal = ordinals.entry(pid).or_default();
                *ordinal += 1;
                let seg = Segment {
                    pid,
                    lane: i128::from(pid) + 1,
                    kind: attempt.kind.clone(),
                    start_x: scale.apply(attempt.start_at),
                    end_x: scale.apply(attempt.end_at),
                    style: style_for(&attempt.kind),
                };
                (*ordinal, seg)
            })
            .collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Attempt, ProcessInstance};

    fn table() -> AttemptTable {
        AttemptTable::from_instances([
            ProcessInstance::new(
                0,
                0,
                5_000,
                vec![
                    Attempt::new(AttemptKind::Lock, 0, 1_000),
                    Attempt::new(AttemptKind::Abort, 1_000, 2_000),
                ],
                [],
                [],
            ),
            ProcessInstance::new(
                1,
                0,
                9_000,
                vec![Attempt::new(AttemptKind::LockQueued, 3_000, 9_000)],
                [],
                [],
            ),
            ProcessInstance::new(
                0,
                5_000,
                8_000,
                vec![Attempt::new(AttemptKind::Commit, 5_000, 8_000)],
                [],
                [],
            ),
        ])
    }

    #[test]
    fn test_styles_by_kind() {
        assert_eq!(style_for(&AttemptKind::Abort).color, "red");
        assert_eq!(style_for(&AttemptKind::Commit).color, "blue");
        assert_eq!(style_for(&AttemptKind::LockQueued).color, "grey");
        assert_eq!(style_for(&AttemptKind::Lock).color, "black");
        let other = style_for(&AttemptKind::Other("tx".to_string()));
        assert_eq!((other.color, other.width), ("green", 2));
    }

    #[test]
    fn test_scale_applies_shift() {
        let scale = Scale {
            scale: 1000,
            shift_x: 2,
        };
        assert_eq!(scale.apply(5_000), 3.0);
        assert_eq!(scale.apply(1_000), -1.0);
    }

    #[test]
    fn test_time_window_keeps_overlapping_segments() {
        let timeline = Timeline::select(
            &table(),
            Window::Time {
                min_x: 1.5,
                max_x: 4.0,
            },
            Scale::default(),
        );

        // abort [1,2] and lockQ [3,9] overlap; lock [0,1] and commit [5,8] do not
        let kinds: Vec<_> = timeline.segments.iter().map(|s| s.kind.clone()).collect();
        assert_eq!(kinds, vec![AttemptKind::Abort, AttemptKind::LockQueued]);
        assert_eq!(timeline.min_x, 1.5);
        assert_eq!(timeline.lane_count(), 2);
    }

    #[test]
    fn test_ordinal_window_counts_across_instances() {
        // pid 0's third attempt is the commit in its second instance
        let timeline = Timeline::select(
            &table(),
            Window::Ordinal {
                first: 3,
                last: None,
            },
            Scale::default(),
        );

        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].kind, AttemptKind::Commit);
        assert_eq!(timeline.segments[0].lane, 1);
        assert_eq!((timeline.min_x, timeline.max_x), (5.0, 8.0));
    }

    #[test]
    fn test_ordinal_range() {
        let timeline = Timeline::select(
            &table(),
            Window::Ordinal {
                first: 1,
                last: Some(3),
            },
            Scale::default(),
        );
        assert_eq!(timeline.segments.len(), 3);
        assert_eq!((timeline.min_x, timeline.max_x), (0.0, 9.0));
    }

    #[test]
    fn test_empty_selection() {
        let timeline = Timeline::select(
            &table(),
            Window::Ordinal {
                first: 10,
                last: None,
            },
            Scale::default(),
        );
        assert!(timeline.segments.is_empty());
        assert_eq!((timeline.min_x, timeline.max_x), (0.0, 0.0));
    }

    #[test]
    fn test_extreme_pids_get_distinct_lanes() {
        let table = AttemptTable::from_instances([
            ProcessInstance::new(
                i64::MAX,
                0,
                5_000,
                vec![Attempt::new(AttemptKind::Commit, 0, 5_000)],
                [],
                [],
            ),
            ProcessInstance::new(
                i64::MAX - 1,
                0,
                5_000,
                vec![Attempt::new(AttemptKind::Abort, 0, 5_000)],
                [],
                [],
            ),
        ]);
        let timeline = Timeline::select(
            &table,
            Window::Time {
                min_x: 0.0,
                max_x: 10.0,
            },
            Scale::default(),
        );

        assert_eq!(timeline.segments.len(), 2);
        assert_eq!(timeline.segments[1].lane, i128::from(i64::MAX) + 1);
        assert_eq!(timeline.lane_count(), 2);
    }

    #[test]
    fn test_unbounded_ordinal_start_selects_nothing() {
        let timeline = Timeline::select(
            &table(),
            Window::Ordinal {
                first: usize::MAX,
                last: None,
            },
            Scale::default(),
        );
        assert!(timeline.segments.is_empty());
    }
}
