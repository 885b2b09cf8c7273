//! Gradient-boosted regression trees
//!
//! Second-order boosting with a squared-error objective: every round fits a
//! regression tree to the gradients of the current ensemble, with leaf
//! weights `-G / (H + lambda)` and split gain
//! `0.5 * (GL²/(HL+λ) + GR²/(HR+λ) - G²/(H+λ)) - gamma`.
//! Splits are found by exact greedy search over midpoints between distinct
//! feature values; a row goes left when `x < threshold`.

use crate::{ensure_finite, MathError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Smallest loss reduction accepted for a split
const MIN_SPLIT_GAIN: f64 = 1e-6;

/// Hyperparameters for [`GradientBoostedTrees`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    /// Number of boosting rounds
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f64,
    /// Maximum depth of each tree (a stump has depth 1)
    pub max_depth: usize,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
    /// Minimum loss reduction required to split
    pub gamma: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
    /// Fraction of rows sampled per round
    pub subsample: f64,
    /// Seed for row subsampling
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.05,
            max_depth: 6,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "n_estimators must be greater than zero".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(MathError::InvalidInput(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(MathError::InvalidInput(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(MathError::InvalidInput(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }
        if self.lambda < 0.0 || self.gamma < 0.0 || self.min_child_weight < 0.0 {
            return Err(MathError::InvalidInput(
                "lambda, gamma and min_child_weight must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        weight: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A single regression tree fitted to gradient statistics
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Node,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    fn fit(
        features: &[Vec<f64>],
        gradients: &[f64],
        hessians: &[f64],
        rows: &[usize],
        params: &BoostingParams,
    ) -> Self {
        let root = Self::grow(features, gradients, hessians, rows, 0, params);
        Self { root }
    }

    fn grow(
        features: &[Vec<f64>],
        gradients: &[f64],
        hessians: &[f64],
        rows: &[usize],
        depth: usize,
        params: &BoostingParams,
    ) -> Node {
        let g_sum: f64 = rows.iter().map(|&r| gradients[r]).sum();
        let h_sum: f64 = rows.iter().map(|&r| hessians[r]).sum();
        let leaf = Node::Leaf {
            weight: -g_sum / (h_sum + params.lambda),
        };

        if depth >= params.max_depth || rows.len() < 2 {
            return leaf;
        }

        let Some(split) = Self::best_split(features, gradients, hessians, rows, g_sum, h_sum, params)
        else {
            return leaf;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| features[r][split.feature] < split.threshold);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(Self::grow(
                features, gradients, hessians, &left_rows, depth + 1, params,
            )),
            right: Box::new(Self::grow(
                features, gradients, hessians, &right_rows, depth + 1, params,
            )),
        }
    }

    fn best_split(
        features: &[Vec<f64>],
        gradients: &[f64],
        hessians: &[f64],
        rows: &[usize],
        g_sum: f64,
        h_sum: f64,
        params: &BoostingParams,
    ) -> Option<SplitCandidate> {
        let score = |g: f64, h: f64| g * g / (h + params.lambda);
        let parent_score = score(g_sum, h_sum);
        let n_features = features[rows[0]].len();

        let mut best: Option<SplitCandidate> = None;
        let mut sorted = rows.to_vec();

        for feature in 0..n_features {
            sorted.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

            let mut g_left = 0.0;
            let mut h_left = 0.0;
            for pair in sorted.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                g_left += gradients[current];
                h_left += hessians[current];

                let x_current = features[current][feature];
                let x_next = features[next][feature];
                if x_current == x_next {
                    continue;
                }

                let g_right = g_sum - g_left;
                let h_right = h_sum - h_left;
                if h_left < params.min_child_weight || h_right < params.min_child_weight {
                    continue;
                }

                let gain = 0.5 * (score(g_left, h_left) + score(g_right, h_right) - parent_score)
                    - params.gamma;
                if gain > MIN_SPLIT_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (x_current + x_next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Raw leaf weight for a feature row (before shrinkage)
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { weight } => return *weight,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                }
            }
        }
    }

    /// Number of leaves in the tree
    pub fn n_leaves(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

/// An additive ensemble of regression trees
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    params: BoostingParams,
    base_score: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    /// Fit the ensemble on `features` (one row per sample) and `targets`.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: BoostingParams) -> Result<Self> {
        params.validate()?;

        if features.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit boosted trees on zero rows".to_string(),
            ));
        }
        if features.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                features.len(),
                targets.len()
            )));
        }
        let n_features = features[0].len();
        if n_features == 0 || features.iter().any(|row| row.len() != n_features) {
            return Err(MathError::InvalidInput(
                "Every feature row must have the same, non-zero width".to_string(),
            ));
        }
        for row in features {
            ensure_finite(row, "features")?;
        }
        ensure_finite(targets, "targets")?;

        let n_rows = targets.len();
        let base_score = targets.iter().sum::<f64>() / n_rows as f64;
        let mut predictions = vec![base_score; n_rows];
        let hessians = vec![1.0; n_rows];
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let gradients: Vec<f64> = predictions
                .iter()
                .zip(targets)
                .map(|(pred, target)| pred - target)
                .collect();

            let rows = sample_rows(n_rows, params.subsample, &mut rng);
            let tree = RegressionTree::fit(features, &gradients, &hessians, &rows, &params);

            for (pred, row) in predictions.iter_mut().zip(features) {
                *pred += params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        if predictions.iter().any(|p| !p.is_finite()) {
            return Err(MathError::CalculationError(
                "Boosting diverged to non-finite predictions".to_string(),
            ));
        }

        Ok(Self {
            params,
            base_score,
            n_features,
            trees,
        })
    }

    /// Predict a single feature row.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let boost: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        Ok(self.base_score + self.params.learning_rate * boost)
    }

    /// Predict many rows at once.
    pub fn predict_many(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn params(&self) -> &BoostingParams {
        &self.params
    }
}

fn sample_rows(n_rows: usize, subsample: f64, rng: &mut StdRng) -> Vec<usize> {
    if subsample >= 1.0 {
        return (0..n_rows).collect();
    }

    let rows: Vec<usize> = (0..n_rows).filter(|_| rng.gen_bool(subsample)).collect();
    if rows.is_empty() {
        vec![rng.gen_range(0..n_rows)]
    } else {
        rows
    }
}
