//! Random-forest classifier over the four numeric outbreak features
//!
//! Bootstrap-sampled CART trees with gini impurity and majority-vote
//! prediction. All randomness flows from a caller-supplied seed, so a
//! fit is bit-reproducible across runs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::FEATURE_COUNT;

/// Features considered per split (sqrt of the feature count).
const FEATURES_PER_SPLIT: usize = 2;

/// Forest hyperparameters. The defaults mirror the training run the
/// thresholds were tuned against; there is no auto-tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 12,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One CART tree. Nodes live in a flat arena; index 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn fit(
        features: &[[f64; FEATURE_COUNT]],
        labels: &[usize],
        indices: &[usize],
        n_classes: usize,
        params: &ForestParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut nodes = Vec::new();
        build_node(features, labels, indices, n_classes, 0, params, rng, &mut nodes);
        Self { nodes }
    }

    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Ensemble of bootstrap-trained trees with majority-vote prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit `params.n_trees` trees, each on a bootstrap sample of the
    /// training rows. Per-tree RNGs are derived from `seed`, so the same
    /// inputs always yield the same forest.
    pub fn fit(
        features: &[[f64; FEATURE_COUNT]],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
        seed: u64,
    ) -> Self {
        debug_assert_eq!(features.len(), labels.len());
        let n = features.len();
        let mut trees = Vec::with_capacity(params.n_trees);

        for t in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64 + 1));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(
                features, labels, &sample, n_classes, params, &mut rng,
            ));
        }

        Self { trees, n_classes }
    }

    /// Majority vote across all trees; ties resolve to the lowest code.
    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> usize {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let class = tree.predict(row).min(self.n_classes.saturating_sub(1));
            votes[class] += 1;
        }

        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Recursively grow a node over `indices`, returning its arena slot.
#[allow(clippy::too_many_arguments)]
fn build_node(
    features: &[[f64; FEATURE_COUNT]],
    labels: &[usize],
    indices: &[usize],
    n_classes: usize,
    depth: usize,
    params: &ForestParams,
    rng: &mut StdRng,
    nodes: &mut Vec<Node>,
) -> usize {
    let majority = majority_class(labels, indices, n_classes);

    let stop = depth >= params.max_depth
        || indices.len() < params.min_samples_split
        || is_pure(labels, indices);
    if stop {
        nodes.push(Node::Leaf { class: majority });
        return nodes.len() - 1;
    }

    let Some((feature, threshold)) = best_split(features, labels, indices, n_classes, rng) else {
        nodes.push(Node::Leaf { class: majority });
        return nodes.len() - 1;
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| features[i][feature] <= threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        nodes.push(Node::Leaf { class: majority });
        return nodes.len() - 1;
    }

    // Reserve the slot before recursing so children land after the parent.
    let slot = nodes.len();
    nodes.push(Node::Leaf { class: majority });
    let left = build_node(
        features, labels, &left_idx, n_classes, depth + 1, params, rng, nodes,
    );
    let right = build_node(
        features, labels, &right_idx, n_classes, depth + 1, params, rng, nodes,
    );
    nodes[slot] = Node::Split {
        feature,
        threshold,
        left,
        right,
    };
    slot
}

/// Pick the (feature, threshold) with the lowest weighted gini impurity
/// over a random subset of features.
fn best_split(
    features: &[[f64; FEATURE_COUNT]],
    labels: &[usize],
    indices: &[usize],
    n_classes: usize,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let mut order: [usize; FEATURE_COUNT] = std::array::from_fn(|i| i);
    order.shuffle(rng);

    let mut best: Option<(usize, f64, f64)> = None;

    for &feature in order.iter().take(FEATURES_PER_SPLIT) {
        let mut values: Vec<f64> = indices.iter().map(|&i| features[i][feature]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let impurity =
                weighted_gini(features, labels, indices, feature, threshold, n_classes);
            let improves = best.map_or(true, |(_, _, current)| impurity < current);
            if improves {
                best = Some((feature, threshold, impurity));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn weighted_gini(
    features: &[[f64; FEATURE_COUNT]],
    labels: &[usize],
    indices: &[usize],
    feature: usize,
    threshold: f64,
    n_classes: usize,
) -> f64 {
    let mut left = vec![0usize; n_classes];
    let mut right = vec![0usize; n_classes];

    for &i in indices {
        if features[i][feature] <= threshold {
            left[labels[i]] += 1;
        } else {
            right[labels[i]] += 1;
        }
    }

    let n_left: usize = left.iter().sum();
    let n_right: usize = right.iter().sum();
    let total = (n_left + n_right) as f64;

    (n_left as f64 / total) * gini(&left, n_left) + (n_right as f64 / total) * gini(&right, n_right)
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let mut sum_sq = 0.0;
    for &count in counts {
        let p = count as f64 / total as f64;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

fn majority_class(labels: &[usize], indices: &[usize], n_classes: usize) -> usize {
    let mut counts = vec![0usize; n_classes];
    for &i in indices {
        counts[labels[i]] += 1;
    }
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}

fn is_pure(labels: &[usize], indices: &[usize]) -> bool {
    indices
        .windows(2)
        .all(|pair| labels[pair[0]] == labels[pair[1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-class toy problem: class 1 iff the first feature is >= 100.
    fn toy_dataset() -> (Vec<[f64; FEATURE_COUNT]>, Vec<usize>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..200 {
            let cases = (i * 3) as f64;
            features.push([cases, cases / 10.0, ((i % 12) + 1) as f64, 2014.0]);
            labels.push(usize::from(cases >= 100.0));
        }
        (features, labels)
    }

    #[test]
    fn test_forest_learns_threshold_rule() {
        let (features, labels) = toy_dataset();
        let params = ForestParams {
            n_trees: 25,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&features, &labels, 2, &params, 7);

        assert_eq!(forest.predict(&[10.0, 1.0, 3.0, 2014.0]), 0);
        assert_eq!(forest.predict(&[450.0, 45.0, 3.0, 2014.0]), 1);
    }

    #[test]
    fn test_fit_is_deterministic_for_same_seed() {
        let (features, labels) = toy_dataset();
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&features, &labels, 2, &params, 42);
        let b = RandomForest::fit(&features, &labels, 2, &params, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_forest_serde_round_trip() {
        let (features, labels) = toy_dataset();
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&features, &labels, 2, &params, 1);
        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();
        assert_eq!(forest, restored);
    }
}
