use std::fmt;

use serde::Serialize;

use crate::error::{ChartError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    /// Worst negative slack.
    #[serde(rename = "WNS")]
    Wns,
    /// Total negative slack.
    #[serde(rename = "TNS")]
    Tns,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Wns => "WNS",
            Metric::Tns => "TNS",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One slack value per run, in nanoseconds.
#[derive(Debug, Clone, Copy)]
pub struct MetricSeries<'a> {
    pub metric: Metric,
    pub values: &'a [f64],
}

impl<'a> MetricSeries<'a> {
    pub fn new(metric: Metric, values: &'a [f64]) -> Self {
        Self { metric, values }
    }
}

/// The run index plus the WNS and TNS series recorded for it.
///
/// Construction checks that both series line up with the run index, so
/// every consumer can index `values[i]` for each position of `runs`.
#[derive(Debug, Clone, Copy)]
pub struct RunSet<'a> {
    pub runs: &'a [u32],
    pub wns: MetricSeries<'a>,
    pub tns: MetricSeries<'a>,
}

impl<'a> RunSet<'a> {
    pub fn new(runs: &'a [u32], wns: &'a [f64], tns: &'a [f64]) -> Result<Self> {
        if runs.is_empty() {
            return Err(ChartError::EmptyRuns);
        }

        let set = Self {
            runs,
            wns: MetricSeries::new(Metric::Wns, wns),
            tns: MetricSeries::new(Metric::Tns, tns),
        };

        for series in set.series() {
            if series.values.len() != runs.len() {
                return Err(ChartError::LengthMismatch {
                    metric: series.metric,
                    expected: runs.len(),
                    actual: series.values.len(),
                });
            }
        }

        Ok(set)
    }

    pub fn series(&self) -> [MetricSeries<'a>; 2] {
        [self.wns, self.tns]
    }

    pub fn first_run(&self) -> u32 {
        self.runs[0]
    }

    pub fn last_run(&self) -> u32 {
        self.runs[self.runs.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }
}
