use itertools::Itertools;
use rust_lapper::{
    Interval,
    Lapper,
};

use crate::data_structs::typedef::PosType;

/// Minimal sorted list of disjoint closed intervals.
///
/// Overlapping and adjacent input ranges are merged on construction, so
/// `[1, 4]` and `[5, 9]` become `[1, 9]`. Point lookups go through a
/// [`Lapper`] built over the merged ranges (stored half-open internally).
/// The half-open stop saturates at [`PosType::MAX`], so that single position
/// is answered from the merged ranges directly.
#[derive(Debug, Clone)]
pub struct CdsIntervalSet {
    intervals: Vec<(PosType, PosType)>,
    lapper:    Lapper<PosType, ()>,
}

impl Default for CdsIntervalSet {
    fn default() -> Self { Self::from_ranges(Vec::new()) }
}

impl PartialEq for CdsIntervalSet {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.intervals == other.intervals
    }
}

impl Eq for CdsIntervalSet {}

impl CdsIntervalSet {
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (PosType, PosType)>, {
        let mut merged: Vec<(PosType, PosType)> = Vec::new();
        for (start, end) in ranges
            .into_iter()
            .map(|(s, e)| (s.min(e), s.max(e)))
            .sorted_unstable()
        {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(end);
                },
                _ => merged.push((start, end)),
            }
        }

        let lapper = Lapper::new(
            merged
                .iter()
                .map(|&(start, end)| {
                    Interval {
                        start,
                        stop: end.saturating_add(1),
                        val: (),
                    }
                })
                .collect_vec(),
        );

        Self {
            intervals: merged,
            lapper,
        }
    }

    /// Closed-interval membership test.
    pub fn contains(
        &self,
        pos: PosType,
    ) -> bool {
        if pos == PosType::MAX {
            return self
                .intervals
                .last()
                .is_some_and(|&(_, end)| end == PosType::MAX);
        }
        self.lapper
            .find(pos, pos.saturating_add(1))
            .next()
            .is_some()
    }

    pub fn intervals(&self) -> &[(PosType, PosType)] { &self.intervals }

    pub fn is_empty(&self) -> bool { self.intervals.is_empty() }

    pub fn len(&self) -> usize { self.intervals.len() }

    /// Total number of covered positions.
    pub fn covered(&self) -> u64 {
        self.intervals
            .iter()
            .map(|(s, e)| (*e - *s) as u64 + 1)
            .sum()
    }
}
