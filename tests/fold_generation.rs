//! Integration and property tests for cross-validation fold generation.

use gbm_control::*;
use gbm_control::cv::generate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

mod common;
use common::*;

fn assert_is_partition(partition: &FoldPartition, num_rows: usize) {
    let mut all: Vec<usize> = partition.folds().iter().flatten().copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..num_rows).collect::<Vec<_>>());
}

fn class_counts(rows: &[usize], labels: &[Label]) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for &row in rows {
        *counts.entry(labels[row].to_bits()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_unstratified_last_fold_takes_remainder() {
    let mut rng = StdRng::seed_from_u64(3);
    let partition = generate_folds(&mut rng, 5, 14, false, None, None).unwrap().value;
    let sizes: Vec<usize> = partition.folds().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 2, 2, 6]);
    assert_is_partition(&partition, 14);
}

#[test]
fn test_stratified_imbalanced_binary() {
    let labels = binary_labels(503, 0.1, 5);
    let mut rng = StdRng::seed_from_u64(1);
    let partition = generate_folds(&mut rng, 5, labels.len(), true, Some(&labels[..]), None)
        .unwrap()
        .value;

    assert_is_partition(&partition, labels.len());
    let totals = class_counts(&(0..labels.len()).collect::<Vec<_>>(), &labels);
    for fold in partition.folds() {
        let counts = class_counts(fold, &labels);
        for (class, &total) in &totals {
            let got = counts.get(class).copied().unwrap_or(0);
            assert!(got == total / 5 || got == total / 5 + 1);
        }
    }
}

#[test]
fn test_stratified_regression_uses_quantiles() {
    let labels = regression_labels(200, 17);
    let mut rng = StdRng::seed_from_u64(2);
    let partition = generate_folds(
        &mut rng,
        4,
        labels.len(),
        true,
        Some(&labels[..]),
        Some("reg:squarederror"),
    )
    .unwrap()
    .value;

    assert_is_partition(&partition, labels.len());
    let overall_mean = labels.iter().sum::<Label>() / labels.len() as Label;
    for fold in partition.folds() {
        assert!(fold.len() >= 45 && fold.len() <= 55);
        let mean = fold.iter().map(|&r| labels[r]).sum::<Label>() / fold.len() as Label;
        assert!((mean - overall_mean).abs() < 1.0);
    }
}

#[test]
fn test_ranking_objective_rejected() {
    let labels = vec![0.0, 1.0, 2.0, 0.0];
    let err = generate(2, 4, false, Some(&labels[..]), Some("rank:ndcg")).unwrap_err();
    assert!(matches!(err, GbmError::Unsupported { .. }));
}

#[test]
fn test_cv_config_drives_generation() {
    let labels = binary_labels(60, 0.5, 3);
    let config = CvConfig::new().with_nfold(3).with_stratified(true).with_seed(99);
    let first = config
        .make_folds(labels.len(), Some(&labels[..]), Some("binary:logistic"))
        .unwrap();
    let second = config
        .make_folds(labels.len(), Some(&labels[..]), Some("binary:logistic"))
        .unwrap();
    assert_eq!(first.value, second.value);
    assert!(first.warnings.is_empty());
}

#[test]
fn test_user_supplied_folds_round_trip_through_splits() {
    let partition = FoldPartition::from_folds(vec![vec![4, 1], vec![0, 3], vec![2]], 5).unwrap();
    for split in partition.splits() {
        let mut rows = split.train.clone();
        rows.extend(&split.test);
        rows.sort_unstable();
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
        assert!(split.test.iter().all(|r| !split.train.contains(r)));
    }
}

proptest! {
    // First k-1 folds take floor(n/k) rows, the last takes the remainder.
    #[test]
    fn prop_unstratified_slices_leave_remainder_in_last_fold(
        nfold in 2usize..12,
        num_rows in 0usize..300,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let partition = generate_folds(&mut rng, nfold, num_rows, false, None, None).unwrap().value;

        prop_assert_eq!(partition.num_folds(), nfold);
        let step = num_rows / nfold;
        for fold in &partition.folds()[..nfold - 1] {
            prop_assert_eq!(fold.len(), step);
        }
        prop_assert_eq!(partition.folds()[nfold - 1].len(), num_rows - step * (nfold - 1));
        assert_is_partition(&partition, num_rows);
    }

    #[test]
    fn prop_stratified_is_partition(
        nfold in 2usize..10,
        labels in prop::collection::vec(0u8..4, 0..200),
        seed in any::<u64>(),
    ) {
        let labels: Vec<Label> = labels.into_iter().map(Label::from).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let partition = generate_folds(&mut rng, nfold, labels.len(), true, Some(&labels[..]), None)
            .unwrap()
            .value;

        prop_assert_eq!(partition.num_folds(), nfold);
        assert_is_partition(&partition, labels.len());
    }

    #[test]
    fn prop_stratified_class_balance(
        nfold in 2usize..6,
        labels in prop::collection::vec(0u8..3, 10..150),
        seed in any::<u64>(),
    ) {
        let labels: Vec<Label> = labels.into_iter().map(Label::from).collect();
        prop_assume!(nfold < labels.len());
        let mut rng = StdRng::seed_from_u64(seed);
        let partition = generate_folds(
            &mut rng,
            nfold,
            labels.len(),
            true,
            Some(&labels[..]),
            Some("multi:softprob"),
        )
        .unwrap()
        .value;

        let totals = class_counts(&(0..labels.len()).collect::<Vec<_>>(), &labels);
        for fold in partition.folds() {
            let counts = class_counts(fold, &labels);
            for (class, &total) in &totals {
                let got = counts.get(class).copied().unwrap_or(0);
                prop_assert!(got == total / nfold || got == total / nfold + 1);
            }
        }
    }

    #[test]
    fn prop_continuous_labels_partition(
        nfold in 2usize..8,
        labels in prop::collection::vec(-1.0e3f32..1.0e3, 0..200),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let partition = generate_folds(&mut rng, nfold, labels.len(), true, Some(&labels[..]), None)
            .unwrap()
            .value;
        assert_is_partition(&partition, labels.len());
    }
}
