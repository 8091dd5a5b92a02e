use crate::delta::{series_deltas, Delta, Direction};
use crate::error::Result;
use crate::slack::{Metric, MetricSeries, RunSet};

/// WNS labels sit above their point, TNS labels below, so the two series
/// don't overprint each other where they converge.
pub fn label_offset(metric: Metric) -> f64 {
    match metric {
        Metric::Wns => 0.15,
        Metric::Tns => -0.55,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// First run, no previous value to compare against.
    Neutral,
    Improved,
    Worsened,
}

impl From<Direction> for Tone {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Improved => Tone::Improved,
            Direction::Worsened => Tone::Worsened,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub metric: Metric,
    pub run: u32,
    pub value: f64,
    pub delta: Option<Delta>,
    pub text: String,
    pub tone: Tone,
    /// Data-space y where the bottom of the label is placed.
    pub anchor_y: f64,
}

impl Annotation {
    pub fn timing_met(&self) -> bool {
        self.value >= 0.0
    }
}

pub fn delta_label(delta: &Delta) -> String {
    format!("{} {:.2}%", delta.direction.arrow(), delta.percent.abs())
}

pub fn raw_label(value: f64) -> String {
    format!("{:.3}", value)
}

pub fn annotate_series(runs: &[u32], series: &MetricSeries) -> Result<Vec<Annotation>> {
    let deltas = series_deltas(runs, series)?;
    let offset = label_offset(series.metric);

    let first = Annotation {
        metric: series.metric,
        run: runs[0],
        value: series.values[0],
        delta: None,
        text: raw_label(series.values[0]),
        tone: Tone::Neutral,
        anchor_y: series.values[0] + offset,
    };

    let rest = deltas
        .into_iter()
        .zip(&series.values[1..])
        .map(|(delta, &value)| Annotation {
            metric: series.metric,
            run: delta.run,
            value,
            text: delta_label(&delta),
            tone: delta.direction.into(),
            delta: Some(delta),
            anchor_y: value + offset,
        });

    Ok(std::iter::once(first).chain(rest).collect())
}

/// Annotations for both series, WNS first.
pub fn annotate(set: &RunSet) -> Result<Vec<Annotation>> {
    let mut annotations = annotate_series(set.runs, &set.wns)?;
    annotations.extend(annotate_series(set.runs, &set.tns)?);
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::slack_data::{RUNS, TNS_NS, WNS_NS};

    fn sample() -> Vec<Annotation> {
        let set = RunSet::new(&RUNS, &WNS_NS, &TNS_NS).unwrap();
        annotate(&set).unwrap()
    }

    #[test]
    fn first_run_shows_raw_value() {
        let annotations = sample();
        let wns = &annotations[0];
        assert_eq!(wns.run, 1);
        assert_eq!(wns.text, "-0.042");
        assert_eq!(wns.tone, Tone::Neutral);
        assert!(wns.delta.is_none());

        let tns = &annotations[5];
        assert_eq!(tns.metric, Metric::Tns);
        assert_eq!(tns.text, "-10.568");
        assert_eq!(tns.tone, Tone::Neutral);
    }

    #[test]
    fn later_runs_show_change() {
        let annotations = sample();
        assert_eq!(annotations[1].text, "↑ 16.67%");
        assert_eq!(annotations[1].tone, Tone::Improved);
        assert_eq!(annotations[6].text, "↑ 79.31%");
        assert_eq!(annotations[6].tone, Tone::Improved);
    }

    #[test]
    fn drop_into_negative_is_worsened() {
        let annotations = sample();
        // 0.01 -> -0.01 on both series.
        for i in [4, 9] {
            assert_eq!(annotations[i].run, 5);
            assert_eq!(annotations[i].text, "↓ 200.00%");
            assert_eq!(annotations[i].tone, Tone::Worsened);
        }
    }

    #[test]
    fn labels_offset_per_series() {
        let annotations = sample();
        assert!((annotations[0].anchor_y - (-0.042 + 0.15)).abs() < 1e-12);
        assert!((annotations[5].anchor_y - (-10.568 - 0.55)).abs() < 1e-12);
    }

    #[test]
    fn timing_met_flag() {
        let annotations = sample();
        let met: Vec<_> = annotations[..5].iter().map(|a| a.timing_met()).collect();
        assert_eq!(met, vec![false, false, false, true, false]);
    }

    #[test]
    fn raw_label_rounds_to_three_places() {
        assert_eq!(raw_label(0.12345), "0.123");
        assert_eq!(raw_label(-2.0), "-2.000");
    }

    #[test]
    fn zero_baseline_propagates() {
        let set = RunSet::new(&[1, 2], &[0.0, 0.1], &[-1.0, -0.5]).unwrap();
        assert!(matches!(
            annotate(&set),
            Err(ChartError::ZeroBaseline {
                metric: Metric::Wns,
                run: 2
            })
        ));
    }
}
