//! Distribution of parallelism values over slots
//!
//! Summarizes a parallelism series as a histogram (how many slots reached each
//! value) and as a cumulative distribution in ascending value order, which is
//! what a CDF chart front end draws.

use serde::Serialize;
use std::collections::BTreeMap;

/// Number of slots with a given parallelism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub parallelism: usize,
    pub slots: usize,
}

/// One step of the cumulative distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub parallelism: usize,
    /// Fraction of slots with parallelism <= `parallelism`
    pub cumulative: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub total_slots: usize,
    /// Largest parallelism observed (0 for an empty series)
    pub max_parallelism: usize,
    pub histogram: Vec<Bucket>,
    pub cdf: Vec<CdfPoint>,
}

impl Distribution {
    /// Summarize a parallelism series
    ///
    /// # Example
    ///
    /// ```
    /// use txpar::distribution::Distribution;
    ///
    /// let dist = Distribution::from_series(&[1, 2, 2, 4]);
    /// assert_eq!(dist.max_parallelism, 4);
    /// assert_eq!(dist.histogram.len(), 3);
    /// assert_eq!(dist.cdf.last().unwrap().cumulative, 1.0);
    /// ```
    pub fn from_series(series: &[usize]) -> Self {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for &p in series {
            *counts.entry(p).or_default() += 1;
        }

        let total = series.len();
        let histogram: Vec<Bucket> = counts
            .iter()
            .map(|(&parallelism, &slots)| Bucket { parallelism, slots })
            .collect();

        let mut seen = 0;
        let cdf = histogram
            .iter()
            .map(|bucket| {
                seen += bucket.slots;
                CdfPoint {
                    parallelism: bucket.parallelism,
                    cumulative: seen as f64 / total as f64,
                }
            })
            .collect();

        Self {
            total_slots: total,
            max_parallelism: counts.keys().next_back().copied().unwrap_or(0),
            histogram,
            cdf,
        }
    }
}
