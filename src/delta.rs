use serde::Serialize;
use tracing::debug;

use crate::error::{ChartError, Result};
use crate::slack::MetricSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Improved,
    Worsened,
}

impl Direction {
    /// Slack is better when it is larger, so only a strict increase counts.
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Direction::Improved
        } else {
            Direction::Worsened
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Improved => '↑',
            Direction::Worsened => '↓',
        }
    }
}

/// Change of one series from the previous run into `run`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub run: u32,
    /// Signed, relative to the previous value.
    pub percent: f64,
    pub direction: Direction,
}

/// `(current - previous) / previous * 100`.
///
/// Returns `None` when `previous` is exactly zero.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Deltas for every run after the first, in run order.
///
/// Pairs runs with values positionally and stops at the shorter of the two.
pub fn series_deltas(runs: &[u32], series: &MetricSeries) -> Result<Vec<Delta>> {
    let mut deltas = Vec::with_capacity(runs.len().saturating_sub(1));

    for (&run, pair) in runs.iter().skip(1).zip(series.values.windows(2)) {
        let (previous, current) = (pair[0], pair[1]);

        let percent = percent_change(previous, current).ok_or(ChartError::ZeroBaseline {
            metric: series.metric,
            run,
        })?;
        let direction = Direction::between(previous, current);

        debug!(metric = %series.metric, run, percent, ?direction, "computed delta");

        deltas.push(Delta {
            run,
            percent,
            direction,
        });
    }

    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::Metric;
    use crate::slack_data::{RUNS, TNS_NS, WNS_NS};
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-2
    }

    #[test]
    fn wns_first_step() {
        let series = MetricSeries::new(Metric::Wns, &WNS_NS);
        let deltas = series_deltas(&RUNS, &series).unwrap();
        assert_eq!(deltas.len(), 4);
        assert_eq!(deltas[0].run, 2);
        assert!(close(deltas[0].percent, -16.67), "{}", deltas[0].percent);
        assert_eq!(deltas[0].direction, Direction::Improved);
    }

    #[test]
    fn tns_first_step() {
        let series = MetricSeries::new(Metric::Tns, &TNS_NS);
        let deltas = series_deltas(&RUNS, &series).unwrap();
        assert!(close(deltas[0].percent, -79.31), "{}", deltas[0].percent);
        assert_eq!(deltas[0].direction, Direction::Improved);
    }

    #[test]
    fn sample_directions() {
        let series = MetricSeries::new(Metric::Wns, &WNS_NS);
        let directions: Vec<_> = series_deltas(&RUNS, &series)
            .unwrap()
            .iter()
            .map(|d| d.direction)
            .collect();
        assert_eq!(
            directions,
            vec![
                Direction::Improved,
                Direction::Improved,
                Direction::Improved,
                Direction::Worsened
            ]
        );
    }

    #[test]
    fn equal_values_count_as_worsened() {
        assert_eq!(Direction::between(0.5, 0.5), Direction::Worsened);
    }

    #[test]
    fn zero_baseline_fails_at_that_run() {
        let values = [-0.2, 0.0, 0.3];
        let series = MetricSeries::new(Metric::Tns, &values);
        let err = series_deltas(&[1, 2, 3], &series).unwrap_err();
        assert!(matches!(
            err,
            ChartError::ZeroBaseline {
                metric: Metric::Tns,
                run: 3
            }
        ));
    }

    #[test]
    fn zero_in_last_position_is_fine() {
        let values = [-0.2, 0.0];
        let series = MetricSeries::new(Metric::Wns, &values);
        let deltas = series_deltas(&[1, 2], &series).unwrap();
        assert!(close(deltas[0].percent, -100.0));
    }

    #[test]
    fn single_run_has_no_deltas() {
        let series = MetricSeries::new(Metric::Wns, &[0.0]);
        assert!(series_deltas(&[1], &series).unwrap().is_empty());
    }

    #[test]
    fn values_beyond_the_run_index_are_ignored() {
        let values = [-0.4, -0.2, -0.1, 0.3];
        let series = MetricSeries::new(Metric::Wns, &values);
        let deltas = series_deltas(&[1, 2], &series).unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].run, 2);
        assert!(close(deltas[0].percent, -50.0));
    }

    proptest! {
        #[test]
        fn change_matches_formula(prev in -100.0f64..100.0, cur in -100.0f64..100.0) {
            prop_assume!(prev != 0.0);
            let got = percent_change(prev, cur).unwrap();
            let want = (cur - prev) / prev * 100.0;
            prop_assert!((got - want).abs() <= want.abs() * 1e-12 + 1e-12);
        }

        #[test]
        fn improved_iff_increase(values in proptest::collection::vec(0.001f64..50.0, 2..10)) {
            let runs: Vec<u32> = (1..=values.len() as u32).collect();
            let series = MetricSeries::new(Metric::Tns, &values);
            let deltas = series_deltas(&runs, &series).unwrap();
            for (i, d) in deltas.iter().enumerate() {
                let improved = values[i + 1] > values[i];
                prop_assert_eq!(d.direction == Direction::Improved, improved);
            }
        }
    }
}
