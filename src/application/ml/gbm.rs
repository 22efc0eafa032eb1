//! Gradient-boosted regression trees.
//!
//! Squared-error boosting: every stage fits a smartcore decision tree to the
//! current residuals on a seeded sample of rows and columns, then adds the
//! shrunken tree output to the running prediction. The fitted ensemble keeps
//! the ordered feature names it was trained on so the artifact carries its own
//! input contract.

use super::predictor::DemandRegressor;
use crate::domain::errors::ModelError;
use crate::domain::ml::FeatureTable;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use tracing::{debug, info};

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Fixed boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Number of boosting stages (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: u16,
    /// Fraction of rows sampled per tree
    pub subsample: f64,
    /// Fraction of columns sampled per tree
    pub colsample_bytree: f64,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 500,
            learning_rate: 0.05,
            max_depth: 6,
            subsample: 0.8,
            colsample_bytree: 0.8,
            min_samples_leaf: 1,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BoostingStage {
    /// Indices into the feature contract this tree was fit on
    columns: Vec<usize>,
    tree: Tree,
}

#[derive(Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    feature_names: Vec<String>,
    params: GbmParams,
    base_score: f64,
    stages: Vec<BoostingStage>,
}

fn sample_size(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction).floor() as usize).clamp(1, n)
}

fn project(rows: &[Vec<f64>], columns: &[usize]) -> Result<DenseMatrix<f64>, ModelError> {
    let projected: Vec<Vec<f64>> = rows
        .iter()
        .map(|r| columns.iter().map(|&c| r[c]).collect())
        .collect();
    DenseMatrix::from_2d_vec(&projected)
        .map_err(|e| ModelError::Prediction(format!("Matrix creation failed: {}", e)))
}

fn sorted_sample(rng: &mut StdRng, length: usize, amount: usize) -> Vec<usize> {
    let mut picked = index::sample(rng, length, amount).into_vec();
    picked.sort_unstable();
    picked
}

impl GradientBoostedRegressor {
    pub fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        feature_names: Vec<String>,
        params: GbmParams,
    ) -> Result<Self, ModelError> {
        if x.is_empty() {
            return Err(ModelError::Training("Empty dataset".to_string()));
        }
        if x.len() != y.len() {
            return Err(ModelError::Training(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        let n_rows = x.len();
        let n_cols = feature_names.len();
        if let Some(bad) = x.iter().position(|r| r.len() != n_cols) {
            return Err(ModelError::Training(format!(
                "Row {} has {} values, expected {}",
                bad,
                x[bad].len(),
                n_cols
            )));
        }

        info!(
            "Training gradient boosting regressor with {} samples and {} features",
            n_rows, n_cols
        );
        info!("Parameters: {:?}", params);

        let base_score = y.iter().sum::<f64>() / n_rows as f64;
        let mut fitted = vec![base_score; n_rows];
        let mut rng = StdRng::seed_from_u64(params.seed);
        let row_take = sample_size(n_rows, params.subsample);
        let col_take = sample_size(n_cols, params.colsample_bytree);
        let tree_params = DecisionTreeRegressorParameters::default()
            .with_max_depth(params.max_depth)
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_min_samples_split(params.min_samples_split);

        let mut stages = Vec::with_capacity(params.n_estimators);
        for stage in 0..params.n_estimators {
            let rows = sorted_sample(&mut rng, n_rows, row_take);
            let columns = sorted_sample(&mut rng, n_cols, col_take);

            let sampled: Vec<Vec<f64>> = rows.iter().map(|&r| x[r].clone()).collect();
            let residuals: Vec<f64> = rows.iter().map(|&r| y[r] - fitted[r]).collect();

            let tree = Tree::fit(&project(&sampled, &columns)?, &residuals, tree_params.clone())
                .map_err(|e| ModelError::Training(format!("Stage {}: {}", stage, e)))?;

            let update = tree
                .predict(&project(x, &columns)?)
                .map_err(|e| ModelError::Training(format!("Stage {}: {}", stage, e)))?;
            for (f, u) in fitted.iter_mut().zip(update) {
                *f += params.learning_rate * u;
            }

            if stage % 100 == 0 {
                debug!("Stage {} fitted on columns {:?}", stage, columns);
            }
            stages.push(BoostingStage { columns, tree });
        }

        info!("Model training completed: {} stages", stages.len());

        Ok(Self {
            feature_names,
            params,
            base_score,
            stages,
        })
    }

    pub fn fit_table(table: &FeatureTable, params: GbmParams) -> Result<Self, ModelError> {
        Self::fit(&table.matrix(), &table.targets(), table.column_names(), params)
    }

    /// Raw ensemble output for each row, columns in contract order.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if let Some(bad) = rows.iter().find(|r| r.len() != self.feature_names.len()) {
            return Err(ModelError::InvalidInput(format!(
                "expected {} features, got {}",
                self.feature_names.len(),
                bad.len()
            )));
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = vec![self.base_score; rows.len()];
        for stage in &self.stages {
            let update = stage
                .tree
                .predict(&project(rows, &stage.columns)?)
                .map_err(|e| ModelError::Prediction(e.to_string()))?;
            for (o, u) in out.iter_mut().zip(update) {
                *o += self.params.learning_rate * u;
            }
        }
        Ok(out)
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }
}

impl DemandRegressor for GradientBoostedRegressor {
    fn predict_row(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.predict_rows(&[features.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Prediction("No prediction returned".to_string()))
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn name(&self) -> &str {
        "Gradient Boosted Trees"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> GbmParams {
        GbmParams {
            n_estimators: 50,
            learning_rate: 0.3,
            max_depth: 3,
            ..GbmParams::default()
        }
    }

    fn toy_data() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, (i % 2) as f64]).collect();
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 100.0 } else { 500.0 }).collect();
        (x, y, vec!["a".to_string(), "b".to_string()])
    }

    #[test]
    fn test_sample_size_bounds() {
        assert_eq!(sample_size(8, 0.8), 6);
        assert_eq!(sample_size(1, 0.8), 1);
        assert_eq!(sample_size(10, 1.0), 10);
    }

    #[test]
    fn test_fit_rejects_empty() {
        let err = GradientBoostedRegressor::fit(&[], &[], vec![], GbmParams::default());
        assert!(matches!(err, Err(ModelError::Training(_))));
    }

    #[test]
    fn test_fit_learns_step_function() {
        let (x, y, names) = toy_data();
        let params = GbmParams {
            colsample_bytree: 1.0,
            ..small_params()
        };
        let model = GradientBoostedRegressor::fit(&x, &y, names, params).unwrap();
        assert_eq!(model.n_stages(), 50);

        let low = model.predict_row(&[5.0, 1.0]).unwrap();
        let high = model.predict_row(&[35.0, 1.0]).unwrap();
        assert!(low < 200.0, "low={}", low);
        assert!(high > 400.0, "high={}", high);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y, names) = toy_data();
        let a = GradientBoostedRegressor::fit(&x, &y, names.clone(), small_params()).unwrap();
        let b = GradientBoostedRegressor::fit(&x, &y, names, small_params()).unwrap();
        assert_eq!(a.predict_rows(&x).unwrap(), b.predict_rows(&x).unwrap());
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y, names) = toy_data();
        let model = GradientBoostedRegressor::fit(&x, &y, names, small_params()).unwrap();
        assert!(matches!(
            model.predict_row(&[1.0]),
            Err(ModelError::InvalidInput(_))
        ));
    }
}
