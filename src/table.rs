use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::annotate::Annotation;
use crate::delta::Direction;
use crate::error::Result;
use crate::slack::Metric;

#[derive(Debug, Serialize)]
struct AnnotationRow<'a> {
    metric: Metric,
    run: u32,
    value_ns: f64,
    change_pct: Option<f64>,
    direction: Option<Direction>,
    label: &'a str,
    timing_met: bool,
}

impl<'a> From<&'a Annotation> for AnnotationRow<'a> {
    fn from(a: &'a Annotation) -> Self {
        Self {
            metric: a.metric,
            run: a.run,
            value_ns: a.value,
            change_pct: a.delta.map(|d| d.percent),
            direction: a.delta.map(|d| d.direction),
            label: &a.text,
            timing_met: a.timing_met(),
        }
    }
}

pub fn write_table<W: Write>(writer: W, annotations: &[Annotation]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for annotation in annotations {
        csv.serialize(AnnotationRow::from(annotation))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_table_file(path: &Path, annotations: &[Annotation]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_table(file, annotations)?;
    info!(path = %path.display(), rows = annotations.len(), "annotation table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::annotate;
    use crate::slack::RunSet;
    use crate::slack_data::{RUNS, TNS_NS, WNS_NS};

    fn sample() -> Vec<Annotation> {
        let set = RunSet::new(&RUNS, &WNS_NS, &TNS_NS).unwrap();
        annotate(&set).unwrap()
    }

    #[test]
    fn one_row_per_point() {
        let mut out = Vec::new();
        write_table(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "metric,run,value_ns,change_pct,direction,label,timing_met"
        );
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "WNS,1,-0.042,,,-0.042,false");
        assert!(lines[2].starts_with("WNS,2,-0.035,-16.66"), "{}", lines[2]);
        assert!(lines[2].ends_with(",improved,↑ 16.67%,false"), "{}", lines[2]);
        assert!(lines[6].starts_with("TNS,1,-10.568,,,"), "{}", lines[6]);
        assert!(lines[4].ends_with(",true"), "{}", lines[4]);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        write_table_file(&path, &sample()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 10);
    }
}
