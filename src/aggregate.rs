//! The aggregation engine: filter, group, reduce, order.
//!
//! Reduces the live reading set under the current zip filter into one
//! [`AggregateCell`] per populated (zip code, time bucket) group. Cells are
//! recomputed from scratch on every call; nothing is cached across filter
//! changes.

use std::collections::BTreeMap;

use crate::filter::FilterState;
use crate::reading::{Reading, TimeBucket};

/// Which summary statistic a table displays. All three are computed per
/// cell; this only selects the rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Average,
    Minimum,
    Maximum,
}

impl Statistic {
    pub fn label(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Minimum => "Minimum",
            Statistic::Maximum => "Maximum",
        }
    }
}

/// Summary statistics for one (zip code, time bucket) group.
///
/// A cell exists only for groups with at least one reading, so `count >= 1`
/// and the statistics are always well defined.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCell {
    pub zip_code: String,
    pub bucket: TimeBucket,
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub count: usize,
}

impl AggregateCell {
    pub fn value(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::Average => self.average,
            Statistic::Minimum => self.minimum,
            Statistic::Maximum => self.maximum,
        }
    }
}

#[derive(Debug)]
struct Acc {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Acc {
    fn new(value: f64) -> Self {
        Acc {
            sum: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Reduces `readings` under `filter` into ordered aggregate cells.
///
/// Readings whose zip code is disabled are excluded before grouping. The
/// result is sorted by zip code ascending, then by the fixed bucket order;
/// an empty result (everything filtered out) is a value, not an error.
pub fn aggregate(readings: &[Reading], filter: &FilterState) -> Vec<AggregateCell> {
    // The BTreeMap key order is exactly the required output order.
    let mut groups: BTreeMap<(&str, TimeBucket), Acc> = BTreeMap::new();

    for reading in readings {
        if !filter.is_enabled(&reading.zip_code) {
            continue;
        }
        groups
            .entry((reading.zip_code.as_str(), reading.bucket))
            .and_modify(|acc| acc.push(reading.concentration))
            .or_insert_with(|| Acc::new(reading.concentration));
    }

    groups
        .into_iter()
        .map(|((zip_code, bucket), acc)| AggregateCell {
            zip_code: zip_code.to_string(),
            bucket,
            average: acc.sum / acc.count as f64,
            minimum: acc.min,
            maximum: acc.max,
            count: acc.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_readings() -> Vec<Reading> {
        vec![
            Reading::new("94043", TimeBucket::Morning, 5.0),
            Reading::new("94043", TimeBucket::Morning, 15.0),
            Reading::new("94303", TimeBucket::Evening, 2.0),
        ]
    }

    #[test]
    fn test_aggregate_example() {
        let readings = sample_readings();
        let filter = FilterState::from_readings(&readings);
        let cells = aggregate(&readings, &filter);

        assert_eq!(cells.len(), 2);

        assert_eq!(cells[0].zip_code, "94043");
        assert_eq!(cells[0].bucket, TimeBucket::Morning);
        assert_eq!(cells[0].average, 10.0);
        assert_eq!(cells[0].minimum, 5.0);
        assert_eq!(cells[0].maximum, 15.0);
        assert_eq!(cells[0].count, 2);

        assert_eq!(cells[1].zip_code, "94303");
        assert_eq!(cells[1].bucket, TimeBucket::Evening);
        assert_eq!(cells[1].average, 2.0);
        assert_eq!(cells[1].minimum, 2.0);
        assert_eq!(cells[1].maximum, 2.0);
    }

    #[test]
    fn test_disabled_zip_excluded() {
        let readings = sample_readings();
        let mut filter = FilterState::from_readings(&readings);
        filter.toggle("94303").unwrap();

        let cells = aggregate(&readings, &filter);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].zip_code, "94043");
    }

    #[test]
    fn test_empty_filter_yields_empty_cells() {
        let readings = sample_readings();
        let mut filter = FilterState::from_readings(&readings);
        filter.toggle("94043").unwrap();
        filter.toggle("94303").unwrap();

        assert!(aggregate(&readings, &filter).is_empty());
    }

    #[test]
    fn test_min_avg_max_ordering_invariant() {
        let readings = vec![
            Reading::new("94022", TimeBucket::Midday, 3.2),
            Reading::new("94022", TimeBucket::Midday, 0.0),
            Reading::new("94022", TimeBucket::Midday, 7.7),
            Reading::new("94040", TimeBucket::Night, 1.1),
        ];
        let filter = FilterState::from_readings(&readings);

        for cell in aggregate(&readings, &filter) {
            assert!(cell.minimum <= cell.average);
            assert!(cell.average <= cell.maximum);
        }
    }

    #[test]
    fn test_cells_ordered_by_zip_then_bucket() {
        let readings = vec![
            Reading::new("95014", TimeBucket::Night, 1.0),
            Reading::new("94022", TimeBucket::Night, 1.0),
            Reading::new("94022", TimeBucket::Morning, 1.0),
            Reading::new("94022", TimeBucket::Evening, 1.0),
            Reading::new("95014", TimeBucket::Morning, 1.0),
        ];
        let filter = FilterState::from_readings(&readings);
        let cells = aggregate(&readings, &filter);

        let keys: Vec<(&str, TimeBucket)> = cells
            .iter()
            .map(|c| (c.zip_code.as_str(), c.bucket))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("94022", TimeBucket::Morning),
                ("94022", TimeBucket::Evening),
                ("94022", TimeBucket::Night),
                ("95014", TimeBucket::Morning),
                ("95014", TimeBucket::Night),
            ]
        );
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let readings = sample_readings();
        let filter = FilterState::from_readings(&readings);
        assert_eq!(aggregate(&readings, &filter), aggregate(&readings, &filter));
    }

    #[test]
    fn test_empty_groups_omitted() {
        // 94043 has no Evening readings; no zero-filled cell appears for it.
        let readings = sample_readings();
        let filter = FilterState::from_readings(&readings);
        let cells = aggregate(&readings, &filter);
        assert!(
            !cells
                .iter()
                .any(|c| c.zip_code == "94043" && c.bucket == TimeBucket::Evening)
        );
    }

    #[test]
    fn test_statistic_selection() {
        let readings = sample_readings();
        let filter = FilterState::from_readings(&readings);
        let cell = &aggregate(&readings, &filter)[0];

        assert_eq!(cell.value(Statistic::Average), 10.0);
        assert_eq!(cell.value(Statistic::Minimum), 5.0);
        assert_eq!(cell.value(Statistic::Maximum), 15.0);
    }
}
