// ============================================================
// DESCRIPTIVE STATISTICS
// ============================================================
// Per-column summaries in the shape of pandas `DataFrame.describe()`

use std::collections::HashMap;

use serde::Serialize;

use super::dataset::{Column, Dataset};

pub const NUMERIC_STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
pub const OBJECT_STAT_LABELS: [&str; 4] = ["count", "unique", "top", "freq"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatValue {
    Number(f64),
    Count(usize),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub values: Vec<StatValue>,
}

/// Statistics table: one column per described dataset column, one row per statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn row(&self, label: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Describe numeric columns, or every column when none is numeric.
pub fn describe(dataset: &Dataset) -> Summary {
    let numeric: Vec<&Column> = dataset.numeric_columns().collect();
    if !numeric.is_empty() {
        return describe_numeric(&numeric);
    }

    let all: Vec<&Column> = dataset.columns().iter().collect();
    if all.is_empty() {
        return Summary {
            columns: Vec::new(),
            rows: Vec::new(),
        };
    }
    describe_object(&all)
}

fn describe_numeric(columns: &[&Column]) -> Summary {
    let stats: Vec<[f64; 8]> = columns
        .iter()
        .map(|c| numeric_stats(&c.numeric_values()))
        .collect();

    let rows = NUMERIC_STAT_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| SummaryRow {
            label: label.to_string(),
            values: stats.iter().map(|s| StatValue::Number(s[i])).collect(),
        })
        .collect();

    Summary {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        rows,
    }
}

fn describe_object(columns: &[&Column]) -> Summary {
    let mut count = Vec::new();
    let mut unique = Vec::new();
    let mut top = Vec::new();
    let mut freq = Vec::new();

    for column in columns {
        let counts = value_counts(column);
        count.push(StatValue::Count(column.non_null_count()));
        unique.push(StatValue::Count(counts.len()));
        match counts.first() {
            Some((value, n)) => {
                top.push(StatValue::Text(value.clone()));
                freq.push(StatValue::Count(*n));
            }
            None => {
                top.push(StatValue::Missing);
                freq.push(StatValue::Missing);
            }
        }
    }

    let rows = OBJECT_STAT_LABELS
        .iter()
        .zip([count, unique, top, freq])
        .map(|(label, values)| SummaryRow {
            label: label.to_string(),
            values,
        })
        .collect();

    Summary {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        rows,
    }
}

/// count, mean, std, min, 25%, 50%, 75%, max of the given values
pub fn numeric_stats(values: &[f64]) -> [f64; 8] {
    let count = values.len() as f64;
    if values.is_empty() {
        return [0.0, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN];
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    [
        count,
        mean(values),
        sample_std(values),
        sorted[0],
        quantile(&sorted, 0.25),
        quantile(&sorted, 0.5),
        quantile(&sorted, 0.75),
        sorted[sorted.len() - 1],
    ]
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with one degree of freedom removed (NaN below two values)
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Quantile of ascending `sorted` values with linear interpolation
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Frequency of each distinct non-null value, most frequent first.
/// Ties keep first-seen order.
pub fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for cell in column.cells.iter().filter(|c| !c.is_null()) {
        let key = cell.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::from_records(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            100,
        )
    }

    fn number(summary: &Summary, label: &str, col: usize) -> f64 {
        match &summary.row(label).unwrap().values[col] {
            StatValue::Number(v) => *v,
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_numeric_columns_only() {
        let ds = dataset(
            &["a", "name", "b"],
            &[&["1", "x", "10"], &["2", "y", "20"], &["3", "z", "30"], &["4", "w", "40"]],
        );
        let summary = describe(&ds);

        assert_eq!(summary.columns, vec!["a", "b"]);
        let labels: Vec<&str> = summary.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, NUMERIC_STAT_LABELS.to_vec());

        assert_eq!(number(&summary, "count", 0), 4.0);
        assert_eq!(number(&summary, "mean", 0), 2.5);
        assert!((number(&summary, "std", 0) - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(number(&summary, "min", 1), 10.0);
        assert_eq!(number(&summary, "25%", 0), 1.75);
        assert_eq!(number(&summary, "50%", 0), 2.5);
        assert_eq!(number(&summary, "75%", 0), 3.25);
        assert_eq!(number(&summary, "max", 1), 40.0);
    }

    #[test]
    fn test_describe_skips_nulls() {
        let ds = dataset(&["a"], &[&["1"], &[""], &["3"]]);
        let summary = describe(&ds);

        assert_eq!(number(&summary, "count", 0), 2.0);
        assert_eq!(number(&summary, "mean", 0), 2.0);
    }

    #[test]
    fn test_single_value_std_is_nan() {
        let stats = numeric_stats(&[5.0]);
        assert_eq!(stats[0], 1.0);
        assert!(stats[2].is_nan());
        assert_eq!(stats[5], 5.0);
    }

    #[test]
    fn test_all_null_column() {
        let stats = numeric_stats(&[]);
        assert_eq!(stats[0], 0.0);
        assert!(stats[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_describe_object_when_no_numeric() {
        let ds = dataset(&["city"], &[&["Paris"], &["Rome"], &["Paris"]]);
        let summary = describe(&ds);

        assert_eq!(summary.columns, vec!["city"]);
        assert_eq!(summary.row("count").unwrap().values[0], StatValue::Count(3));
        assert_eq!(summary.row("unique").unwrap().values[0], StatValue::Count(2));
        assert_eq!(
            summary.row("top").unwrap().values[0],
            StatValue::Text("Paris".to_string())
        );
        assert_eq!(summary.row("freq").unwrap().values[0], StatValue::Count(2));
    }

    #[test]
    fn test_describe_empty_dataset() {
        assert!(describe(&Dataset::empty()).is_empty());
    }

    #[test]
    fn test_value_counts_ordering() {
        let ds = dataset(&["c"], &[&["b"], &["a"], &["a"], &["c"], &["b"], &["a"]]);
        let counts = value_counts(&ds.columns()[0]);
        assert_eq!(
            counts,
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_value_counts_labels_whole_floats() {
        let ds = dataset(&["x"], &[&["1.0"], &["1.5"], &["1.0"]]);
        assert_eq!(
            value_counts(&ds.columns()[0]),
            vec![("1.0".to_string(), 2), ("1.5".to_string(), 1)]
        );
    }
}
