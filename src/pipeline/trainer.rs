//! Classifier training and held-out evaluation
//!
//! The train/test split is seeded and therefore reproducible; reported
//! metrics are a correctness concern, not a nicety, so the same data must
//! always produce the same split.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::models::{FeatureRow, MonthlyAggregate, FEATURE_COUNT};
use crate::pipeline::{ForestParams, LabelEncoder, PipelineError, RandomForest};

/// Fixed shuffle seed for the train/test split.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of the dataset held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub model: RandomForest,
    pub encoder: LabelEncoder,
    pub report: EvalReport,
}

/// Fit a random forest on the aggregated dataset and evaluate it on a
/// held-out partition.
///
/// Fails fatally when the dataset carries fewer than two distinct
/// severity classes: a single-class model carries no information and
/// must never reach a snapshot.
pub fn train(
    aggregates: &[MonthlyAggregate],
    params: &ForestParams,
) -> Result<TrainOutcome, PipelineError> {
    if aggregates.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let encoder = LabelEncoder::fit(aggregates.iter().map(|a| a.status));
    if encoder.n_classes() < 2 {
        return Err(PipelineError::TooFewClasses {
            found: encoder.n_classes(),
        });
    }

    let features: Vec<[f64; FEATURE_COUNT]> = aggregates
        .iter()
        .map(|a| FeatureRow::from_aggregate(a).to_features())
        .collect();
    let labels: Vec<usize> = aggregates
        .iter()
        .map(|a| encoder.encode(a.status))
        .collect::<Result<_, _>>()?;

    let (train_idx, test_idx) = split_indices(aggregates.len(), TEST_FRACTION, SPLIT_SEED);
    tracing::info!(
        "training on {} rows, evaluating on {} held-out rows, {} classes",
        train_idx.len(),
        test_idx.len(),
        encoder.n_classes()
    );

    let train_x: Vec<[f64; FEATURE_COUNT]> = train_idx.iter().map(|&i| features[i]).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();

    let model = RandomForest::fit(&train_x, &train_y, encoder.n_classes(), params, SPLIT_SEED);

    let truth: Vec<usize> = test_idx.iter().map(|&i| labels[i]).collect();
    let predicted: Vec<usize> = test_idx.iter().map(|&i| model.predict(&features[i])).collect();
    let report = EvalReport::compute(&truth, &predicted, &encoder);

    Ok(TrainOutcome {
        model,
        encoder,
        report,
    })
}

/// Deterministic shuffled split into (train, test) index sets.
///
/// The test partition always gets at least one row and never the whole
/// dataset.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64 * test_fraction).round() as usize)
        .max(1)
        .min(n.saturating_sub(1).max(1));
    let (test, train) = indices.split_at(test_len);
    (train.to_vec(), test.to_vec())
}

/// Per-class held-out metrics, sklearn-report style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation for one training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub test_size: usize,
}

impl EvalReport {
    pub fn compute(truth: &[usize], predicted: &[usize], encoder: &LabelEncoder) -> Self {
        debug_assert_eq!(truth.len(), predicted.len());

        let classes = encoder
            .classes()
            .iter()
            .enumerate()
            .map(|(code, label)| {
                let mut tp = 0usize;
                let mut fp = 0usize;
                let mut fn_ = 0usize;
                for (&t, &p) in truth.iter().zip(predicted) {
                    match (t == code, p == code) {
                        (true, true) => tp += 1,
                        (false, true) => fp += 1,
                        (true, false) => fn_ += 1,
                        (false, false) => {}
                    }
                }
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: tp + fn_,
                }
            })
            .collect();

        let matches = truth
            .iter()
            .zip(predicted)
            .filter(|(t, p)| t == p)
            .count();

        Self {
            classes,
            accuracy: ratio(matches, truth.len()),
            test_size: truth.len(),
        }
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12}  {:>9}  {:>9}  {:>9}  {:>7}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>12}  {:>9.2}  {:>9.2}  {:>9.2}  {:>7}",
                class.label, class.precision, class.recall, class.f1, class.support
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "{:>12}  {:>31.2}  {:>7}",
            "accuracy", self.accuracy, self.test_size
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::models::Severity;

    use super::*;

    fn aggregate(country: &str, month: u32, cases: u64) -> MonthlyAggregate {
        MonthlyAggregate {
            country: country.to_string(),
            year: 2014,
            month,
            cases,
            deaths: cases / 10,
            status: Severity::from_cases(cases),
        }
    }

    /// Dataset spanning all four severity classes.
    fn labeled_dataset() -> Vec<MonthlyAggregate> {
        let mut rows = Vec::new();
        for i in 0..40 {
            rows.push(aggregate("A", (i % 12) + 1, 0));
            rows.push(aggregate("B", (i % 12) + 1, 1 + i as u64 * 2));
            rows.push(aggregate("C", (i % 12) + 1, 100 + i as u64 * 20));
            rows.push(aggregate("D", (i % 12) + 1, 1000 + i as u64 * 200));
        }
        rows
    }

    #[test]
    fn test_train_produces_usable_model() {
        let data = labeled_dataset();
        let params = ForestParams {
            n_trees: 25,
            ..ForestParams::default()
        };
        let outcome = train(&data, &params).unwrap();

        assert_eq!(outcome.encoder.n_classes(), 4);
        assert!(outcome.report.accuracy > 0.8, "accuracy: {}", outcome.report.accuracy);

        // The forest should reproduce the labeling rule on clear-cut rows.
        let row = FeatureRow {
            cases: 5000,
            deaths: 500,
            month: 6,
            year: 2014,
        };
        let code = outcome.model.predict(&row.to_features());
        assert_eq!(outcome.encoder.decode(code).unwrap(), Severity::Pandemic);
    }

    #[test]
    fn test_single_class_dataset_fails_fatally() {
        let data: Vec<MonthlyAggregate> =
            (0..20).map(|i| aggregate("A", (i % 12) + 1, 0)).collect();
        assert!(matches!(
            train(&data, &ForestParams::default()),
            Err(PipelineError::TooFewClasses { found: 1 })
        ));
    }

    #[test]
    fn test_empty_dataset_fails() {
        assert!(matches!(
            train(&[], &ForestParams::default()),
            Err(PipelineError::EmptyDataset)
        ));
    }

    #[test]
    fn test_split_is_reproducible() {
        let a = split_indices(100, TEST_FRACTION, SPLIT_SEED);
        let b = split_indices(100, TEST_FRACTION, SPLIT_SEED);
        assert_eq!(a, b);
        assert_eq!(a.1.len(), 20);
        assert_eq!(a.0.len(), 80);
    }

    #[test]
    fn test_split_holds_out_at_least_one_row() {
        let (train, test) = split_indices(2, TEST_FRACTION, SPLIT_SEED);
        assert_eq!(test.len(), 1);
        assert_eq!(train.len(), 1);
    }

    #[test]
    fn test_eval_report_perfect_prediction() {
        let encoder = LabelEncoder::fit([Severity::Neither, Severity::Epidemic]);
        let truth = vec![0, 1, 0, 1];
        let report = EvalReport::compute(&truth, &truth, &encoder);
        assert_eq!(report.accuracy, 1.0);
        for class in &report.classes {
            assert_eq!(class.precision, 1.0);
            assert_eq!(class.recall, 1.0);
            assert_eq!(class.f1, 1.0);
            assert_eq!(class.support, 2);
        }
    }
}
