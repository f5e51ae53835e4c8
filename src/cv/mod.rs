//! Cross-validation: fold generation and the fold-parallel training loop.

pub mod folds;
pub mod runner;
pub mod stratify;

pub use folds::{generate, generate_folds, FoldPartition, FoldSplit};
pub use runner::{cross_validate, summarize, CvResult, CvRound, FoldData, MetricSummary};
pub use stratify::StratumRule;

use crate::config::loader::read_config_file;
use crate::config::validation::Validated;
use crate::core::constants::*;
use crate::core::error::Result;
use crate::core::types::Label;
use crate::{config_error, ensure};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cross-validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    /// Number of folds
    pub nfold: usize,
    /// Keep label distributions balanced across folds
    pub stratified: bool,
    /// Seed for reproducible folds; `None` draws from entropy
    pub seed: Option<u64>,
    /// Number of boosting rounds
    pub nrounds: usize,
    /// Stop after this many rounds without improvement of the averaged metric
    pub early_stopping_rounds: Option<usize>,
    /// Explicit metric direction for early stopping
    pub maximize: Option<bool>,
    /// Log aggregated metrics every this many rounds
    pub print_every_n: usize,
}

impl Default for CvConfig {
    fn default() -> Self {
        CvConfig {
            nfold: DEFAULT_NFOLD,
            stratified: false,
            seed: None,
            nrounds: 10,
            early_stopping_rounds: None,
            maximize: None,
            print_every_n: DEFAULT_PRINT_EVERY_N,
        }
    }
}

impl CvConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a `.json` or `.toml` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: CvConfig = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of folds.
    pub fn with_nfold(mut self, nfold: usize) -> Self {
        self.nfold = nfold;
        self
    }

    /// Enable or disable stratification.
    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Fix the fold seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of boosting rounds.
    pub fn with_nrounds(mut self, nrounds: usize) -> Self {
        self.nrounds = nrounds;
        self
    }

    /// Enable early stopping.
    pub fn with_early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = Some(rounds);
        self
    }

    /// Fix the metric direction.
    pub fn with_maximize(mut self, maximize: bool) -> Self {
        self.maximize = Some(maximize);
        self
    }

    /// Set the progress logging period.
    pub fn with_print_every_n(mut self, n: usize) -> Self {
        self.print_every_n = n;
        self
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.nfold >= MIN_NFOLD,
            config_error!("'nfold' must be at least {}, got {}", MIN_NFOLD, self.nfold)
        );
        ensure!(self.nrounds > 0, config_error!("'nrounds' must be positive"));
        ensure!(
            self.early_stopping_rounds != Some(0),
            config_error!("'early_stopping_rounds' must be positive")
        );
        ensure!(
            self.print_every_n > 0,
            config_error!("'print_every_n' must be positive")
        );
        Ok(())
    }

    /// Random generator for fold generation, seeded if a seed is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate folds over `num_rows` rows with these settings.
    pub fn make_folds(
        &self,
        num_rows: usize,
        labels: Option<&[Label]>,
        objective: Option<&str>,
    ) -> Result<Validated<FoldPartition>> {
        self.validate()?;
        generate_folds(
            &mut self.rng(),
            self.nfold,
            num_rows,
            self.stratified,
            labels,
            objective,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GbmError;

    #[test]
    fn test_cv_config_defaults() {
        let config = CvConfig::default();
        assert_eq!(config.nfold, DEFAULT_NFOLD);
        assert!(!config.stratified);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cv_config_builder() {
        let config = CvConfig::new()
            .with_nfold(3)
            .with_stratified(true)
            .with_seed(9)
            .with_nrounds(20)
            .with_early_stopping_rounds(4)
            .with_maximize(true)
            .with_print_every_n(5);
        assert_eq!(config.nfold, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.early_stopping_rounds, Some(4));
        assert_eq!(config.maximize, Some(true));
    }

    #[test]
    fn test_cv_config_validation() {
        assert!(matches!(
            CvConfig::new().with_nfold(1).validate(),
            Err(GbmError::Config { .. })
        ));
        assert!(CvConfig::new().with_nrounds(0).validate().is_err());
        assert!(CvConfig::new().with_early_stopping_rounds(0).validate().is_err());
    }

    #[test]
    fn test_cv_config_seeded_folds_repeat() {
        let config = CvConfig::new().with_nfold(4).with_seed(3);
        let a = config.make_folds(40, None, None).unwrap().value;
        let b = config.make_folds(40, None, None).unwrap().value;
        assert_eq!(a, b);
        assert_eq!(a.num_folds(), 4);
    }

    #[test]
    fn test_cv_config_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.toml");
        std::fs::write(&path, "nfold = 3\nstratified = true\nseed = 1\n").unwrap();
        let config = CvConfig::load_from_file(&path).unwrap();
        assert_eq!(config.nfold, 3);
        assert!(config.stratified);
        assert_eq!(config.nrounds, 10);

        let bad = dir.path().join("cv.json");
        std::fs::write(&bad, r#"{"nfold": 1}"#).unwrap();
        assert!(CvConfig::load_from_file(&bad).is_err());
    }
}
